use super::{create_scratch_account, delete_scratch_account};
use crate::client::{Account, AttributeChange, AttributeOp, Entitlement, command};
use crate::key::Keyed;
use crate::schema::{attribute_values, canonicalize_value};
use crate::validate::check::{Check, CheckContext, CheckResult};
use crate::validate::generate::{FieldScope, attribute_change, create_identity, create_input};
use async_trait::async_trait;
use serde_json::Value;

/// Each writable attribute must accept a new value and read it back.
pub struct AccountUpdateSingleAttrs;

#[async_trait]
impl Check for AccountUpdateSingleAttrs {
    fn id(&self) -> &'static str {
        "account-update-single-attrs"
    }

    fn description(&self) -> &'static str {
        "Test updating writable attributes"
    }

    fn is_data_modifier(&self) -> bool {
        true
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[
            command::ACCOUNT_READ,
            command::ACCOUNT_LIST,
            command::ACCOUNT_UPDATE,
        ]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let schema = ctx.account_schema();
        let accounts = match ctx.client.account_list(None, None, Some(&schema)).await {
            Ok(list) => list.items,
            Err(e) => {
                res.err(e);
                return;
            }
        };
        let Some(mut account) = accounts.into_iter().last() else {
            res.warn("account list is empty");
            return;
        };

        let writable = ctx
            .spec
            .account_schema
            .attributes
            .iter()
            .filter(|attr| attr.writable && !attr.entitlement);
        for attr in writable {
            let Some(change) = attribute_change(&account, attr) else {
                res.warn(format!(
                    "no test value for {:?} of type {:?}",
                    attr.name,
                    attr.attr_type.as_str()
                ));
                continue;
            };

            if let Err(e) = ctx
                .client
                .account_update(
                    account.id(),
                    account.unique_id(),
                    std::slice::from_ref(&change),
                    Some(&schema),
                )
                .await
            {
                res.err(format_args!("update for {:?} failed: {e}", attr.name));
                continue;
            }

            ctx.settle().await;
            let read = match ctx
                .client
                .account_read(account.id(), account.unique_id(), Some(&schema))
                .await
            {
                Ok((read, _)) => read,
                Err(e) => {
                    res.err(format_args!(
                        "reading account after updating {:?}: {e}",
                        attr.name
                    ));
                    continue;
                }
            };

            let actual = read.attributes.get(&attr.name);
            if !change_applied(&change, actual) {
                res.err(format_args!(
                    "mismatch for {}. expected {}; got {}",
                    attr.name,
                    change.value,
                    actual.unwrap_or(&Value::Null)
                ));
            }
            account = read;
        }
    }
}

fn change_applied(change: &AttributeChange, actual: Option<&Value>) -> bool {
    match change.op {
        AttributeOp::Add => attribute_values(actual).contains(&&change.value),
        AttributeOp::Remove => !attribute_values(actual).contains(&&change.value),
        AttributeOp::Set => {
            canonicalize_value(actual.unwrap_or(&Value::Null)) == canonicalize_value(&change.value)
        }
    }
}

/// Entitlements must be assignable to and removable from an account.
pub struct AccountUpdateEntitlement;

impl AccountUpdateEntitlement {
    async fn read_account(
        ctx: &CheckContext<'_>,
        res: &mut CheckResult,
        scratch: &Account,
        schema: &Value,
    ) -> Option<Account> {
        match ctx
            .client
            .account_read(scratch.id(), scratch.unique_id(), Some(schema))
            .await
        {
            Ok((account, _)) => Some(account),
            Err(e) => {
                res.err(format_args!(
                    "failed to read account {:?}: {e}",
                    scratch.identity
                ));
                None
            }
        }
    }

    async fn change_entitlement(
        ctx: &CheckContext<'_>,
        res: &mut CheckResult,
        scratch: &Account,
        change: AttributeChange,
    ) -> bool {
        let op = change.op;
        let id = change.value.clone();
        match ctx
            .client
            .account_update(scratch.id(), scratch.unique_id(), &[change], None)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                res.err(format_args!("failed to {op} entitlement {id}: {e}"));
                false
            }
        }
    }

    /// Add every entitlement not yet held, then remove them again while
    /// more than one stays assigned.
    async fn exercise(
        ctx: &CheckContext<'_>,
        res: &mut CheckResult,
        scratch: &Account,
        attribute: &str,
        entitlements: &[Entitlement],
    ) {
        let schema = ctx.account_schema();

        for entitlement in entitlements {
            let Some(account) = Self::read_account(ctx, res, scratch, &schema).await else {
                continue;
            };
            if holds(&account, attribute, entitlement.id()) {
                continue;
            }

            let add = AttributeChange::new(AttributeOp::Add, attribute, entitlement.id().into());
            if !Self::change_entitlement(ctx, res, scratch, add).await {
                continue;
            }
            ctx.settle().await;
            if let Some(account) = Self::read_account(ctx, res, scratch, &schema).await {
                if !holds(&account, attribute, entitlement.id()) {
                    res.err(format_args!(
                        "failed to add entitlement: {:?}",
                        entitlement.id()
                    ));
                }
            }
        }

        for entitlement in entitlements {
            let Some(account) = Self::read_account(ctx, res, scratch, &schema).await else {
                continue;
            };
            let held = attribute_values(account.attributes.get(attribute));
            if held.len() <= 1 || !holds(&account, attribute, entitlement.id()) {
                continue;
            }

            let remove =
                AttributeChange::new(AttributeOp::Remove, attribute, entitlement.id().into());
            if !Self::change_entitlement(ctx, res, scratch, remove).await {
                continue;
            }
            ctx.settle().await;
            if let Some(account) = Self::read_account(ctx, res, scratch, &schema).await {
                if holds(&account, attribute, entitlement.id()) {
                    res.err(format_args!(
                        "failed to remove entitlement: {:?}",
                        entitlement.id()
                    ));
                }
            }
        }
    }
}

fn holds(account: &Account, attribute: &str, entitlement_id: &str) -> bool {
    attribute_values(account.attributes.get(attribute))
        .iter()
        .any(|value| value.as_str() == Some(entitlement_id))
}

#[async_trait]
impl Check for AccountUpdateEntitlement {
    fn id(&self) -> &'static str {
        "account-update-entitlement"
    }

    fn description(&self) -> &'static str {
        "Test updating entitlement field(s)"
    }

    fn is_data_modifier(&self) -> bool {
        true
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[
            command::ENTITLEMENT_LIST,
            command::ACCOUNT_CREATE,
            command::ACCOUNT_READ,
            command::ACCOUNT_UPDATE,
            command::ACCOUNT_DELETE,
        ]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let Some(attribute) = ctx.spec.entitlement_attribute() else {
            res.warn("no entitlement attribute");
            return;
        };
        if !attribute.writable {
            res.warn(format!(
                "entitlement attribute {:?} is not writable",
                attribute.name
            ));
            return;
        }

        let entitlement_schema = ctx.entitlement_schema();
        let entitlements = match ctx
            .client
            .entitlement_list(ctx.entitlement_type(), None, None, entitlement_schema.as_ref())
            .await
        {
            Ok(list) => list.items,
            Err(e) => {
                res.err(e);
                return;
            }
        };
        if entitlements.is_empty() {
            res.warn("no entitlements found");
            return;
        }

        let input = create_input(&ctx.spec.account_create_template, FieldScope::RequiredOnly);
        let identity = create_identity(&input);
        let Some(scratch) = create_scratch_account(ctx, res, &identity, &input, None).await
        else {
            return;
        };

        ctx.settle().await;
        Self::exercise(ctx, res, &scratch, &attribute.name, &entitlements).await;
        delete_scratch_account(ctx, res, &scratch).await;
    }
}
