use super::{create_scratch_account, delete_scratch_account, record_entity_diffs};
use crate::client::{Account, command};
use crate::key::Keyed;
use crate::validate::check::{Check, CheckContext, CheckResult};
use crate::validate::diff::compare_intersection;
use crate::validate::generate::{FieldScope, create_identity, create_input};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Creating an account without attributes must fail.
pub struct AccountCreateEmpty;

#[async_trait]
impl Check for AccountCreateEmpty {
    fn id(&self) -> &'static str {
        "account-create-empty"
    }

    fn description(&self) -> &'static str {
        "Creating an account with no attributes should fail"
    }

    fn is_data_modifier(&self) -> bool {
        true
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[command::ACCOUNT_CREATE]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let created = ctx.client.account_create(None, &Map::new(), None).await;
        if let Ok((account, _)) = created {
            res.err("expected error for empty account created");
            delete_scratch_account(ctx, res, &account).await;
        }
    }
}

/// Creating an account from the create template must succeed and read back
/// with the submitted values.
pub struct AccountCreate {
    scope: FieldScope,
}

impl AccountCreate {
    /// Only the required template fields.
    pub fn minimal() -> Self {
        Self {
            scope: FieldScope::RequiredOnly,
        }
    }

    /// Every template field.
    pub fn maximal() -> Self {
        Self {
            scope: FieldScope::All,
        }
    }

    async fn verify(
        &self,
        ctx: &CheckContext<'_>,
        res: &mut CheckResult,
        input: &Map<String, Value>,
        created: &Account,
    ) {
        for diff in compare_intersection(input, &created.attributes) {
            res.err(format_args!("input vs create mismatch: {diff}"));
        }

        ctx.settle().await;
        let schema = ctx.account_schema();
        let read = match ctx
            .client
            .account_read(created.id(), created.unique_id(), Some(&schema))
            .await
        {
            Ok((account, _)) => account,
            Err(e) => {
                res.err(format_args!("reading account: {e}"));
                return;
            }
        };
        for diff in compare_intersection(input, &read.attributes) {
            res.err(format_args!("input vs read mismatch: {diff}"));
        }
    }
}

#[async_trait]
impl Check for AccountCreate {
    fn id(&self) -> &'static str {
        match self.scope {
            FieldScope::RequiredOnly => "account-create-minimal",
            FieldScope::All => "account-create-maximal",
        }
    }

    fn description(&self) -> &'static str {
        match self.scope {
            FieldScope::RequiredOnly => {
                "Creating an account with only required fields should be successful"
            }
            FieldScope::All => "Creating an account with all fields should be successful",
        }
    }

    fn is_data_modifier(&self) -> bool {
        true
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[
            command::ACCOUNT_CREATE,
            command::ACCOUNT_READ,
            command::ACCOUNT_DELETE,
        ]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let input = create_input(&ctx.spec.account_create_template, self.scope);
        let identity = create_identity(&input);
        let schema = ctx.account_schema();

        let Some(created) =
            create_scratch_account(ctx, res, &identity, &input, Some(&schema)).await
        else {
            return;
        };
        self.verify(ctx, res, &input, &created).await;
        delete_scratch_account(ctx, res, &created).await;
    }
}

/// A created account must appear in the account list and disappear again
/// once deleted.
pub struct AccountCreateListDelete;

impl AccountCreateListDelete {
    async fn count_accounts(
        ctx: &CheckContext<'_>,
        res: &mut CheckResult,
        schema: &Value,
    ) -> Option<usize> {
        match ctx.client.account_list(None, None, Some(schema)).await {
            Ok(list) => Some(list.items.len()),
            Err(e) => {
                res.err(e);
                None
            }
        }
    }

    /// Checks made while the account exists. Returns the account count.
    async fn verify_created(
        ctx: &CheckContext<'_>,
        res: &mut CheckResult,
        schema: &Value,
        created: &Account,
    ) -> Option<usize> {
        ctx.settle().await;
        let count = Self::count_accounts(ctx, res, schema).await;

        match ctx
            .client
            .account_read(created.id(), created.unique_id(), Some(schema))
            .await
        {
            Ok((read, _)) => record_entity_diffs(res, &created.identity, created, &read),
            Err(e) => res.err(format_args!("reading created account: {e}")),
        }
        count
    }
}

#[async_trait]
impl Check for AccountCreateListDelete {
    fn id(&self) -> &'static str {
        "account-create-list-delete"
    }

    fn description(&self) -> &'static str {
        "Created accounts should show up in list accounts response; after deletion they should not"
    }

    fn is_data_modifier(&self) -> bool {
        true
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[
            command::ACCOUNT_CREATE,
            command::ACCOUNT_READ,
            command::ACCOUNT_DELETE,
            command::ACCOUNT_LIST,
        ]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let schema = ctx.account_schema();
        let Some(before) = Self::count_accounts(ctx, res, &schema).await else {
            return;
        };

        let input = create_input(&ctx.spec.account_create_template, FieldScope::RequiredOnly);
        let identity = create_identity(&input);
        let Some(created) =
            create_scratch_account(ctx, res, &identity, &input, Some(&schema)).await
        else {
            return;
        };

        let after_create = Self::verify_created(ctx, res, &schema, &created).await;
        if !delete_scratch_account(ctx, res, &created).await {
            return;
        }

        ctx.settle().await;
        if ctx
            .client
            .account_read(created.id(), created.unique_id(), Some(&schema))
            .await
            .is_ok()
        {
            res.err(format_args!(
                "was able to read deleted account: {:?}",
                created.identity
            ));
        }

        if let Some(after_create) = after_create {
            if after_create != before + 1 {
                res.err(format_args!(
                    "expected # of accounts to be 1 larger after creation ({after_create}) compared to before creation ({before})"
                ));
            }
        }
        if let Some(after_delete) = Self::count_accounts(ctx, res, &schema).await {
            if after_delete != before {
                res.err(format_args!(
                    "expected # of accounts to match before creation ({before}) and after deletion ({after_delete})"
                ));
            }
        }
    }
}
