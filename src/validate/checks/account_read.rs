use super::{NOT_FOUND_ID, record_entity_diffs, sample};
use crate::client::command;
use crate::key::Keyed;
use crate::schema::AttributeIndex;
use crate::validate::check::{Check, CheckContext, CheckResult};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Every listed account must read back individually with the same content.
pub struct AccountListAndRead;

#[async_trait]
impl Check for AccountListAndRead {
    fn id(&self) -> &'static str {
        "account-list-and-read"
    }

    fn description(&self) -> &'static str {
        "List accounts and read each account individually; ensure responses are equivalent"
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[command::ACCOUNT_READ, command::ACCOUNT_LIST]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let schema = ctx.account_schema();
        let mut accounts = match ctx.client.account_list(None, None, Some(&schema)).await {
            Ok(list) => list.items,
            Err(e) => {
                res.err(e);
                return;
            }
        };
        if accounts.is_empty() {
            res.warn("no accounts");
            return;
        }

        sample(&mut accounts, ctx.read_limit());
        for listed in &accounts {
            let read = match ctx
                .client
                .account_read(listed.id(), listed.unique_id(), Some(&schema))
                .await
            {
                Ok((account, _)) => account,
                Err(e) => {
                    res.err(format_args!("reading account {:?}: {e}", listed.identity));
                    continue;
                }
            };
            if read.identity != listed.identity {
                res.err(format_args!(
                    "want {:?}; got {:?}",
                    listed.identity, read.identity
                ));
            }
            record_entity_diffs(res, &read.identity, listed, &read);
        }
    }
}

/// Reading an account that cannot exist must fail.
pub struct AccountNotFound;

#[async_trait]
impl Check for AccountNotFound {
    fn id(&self) -> &'static str {
        "account-not-found"
    }

    fn description(&self) -> &'static str {
        "Reading an account based on an id which doesn't exist should fail"
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[command::ACCOUNT_READ]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let schema = ctx.account_schema();
        if ctx
            .client
            .account_read(NOT_FOUND_ID, "", Some(&schema))
            .await
            .is_ok()
        {
            res.err("expected error for non-existent identity");
        }
    }
}

/// Listed account attributes must match their declared type and multiplicity.
pub struct AccountSchemaCheck;

#[async_trait]
impl Check for AccountSchemaCheck {
    fn id(&self) -> &'static str {
        "account-schema-check"
    }

    fn description(&self) -> &'static str {
        "Verify account fields match schema"
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[command::ACCOUNT_LIST]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let index = match AttributeIndex::new("account", &ctx.spec.account_schema.attributes) {
            Ok(index) => index,
            Err(e) => {
                res.err(e);
                return;
            }
        };

        let schema = ctx.account_schema();
        let accounts = match ctx.client.account_list(None, None, Some(&schema)).await {
            Ok(list) => list.items,
            Err(e) => {
                res.err(e);
                return;
            }
        };

        let mut undeclared = BTreeSet::new();
        for account in &accounts {
            for violation in index.check_attributes(&account.attributes, &mut undeclared) {
                res.err(format_args!("[identity={}] {violation}", account.identity));
            }
        }
        for name in undeclared {
            res.warn(format!("additional attribute {name:?}"));
        }
    }
}
