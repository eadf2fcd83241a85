use super::{NOT_FOUND_ID, record_entity_diffs, sample};
use crate::client::command;
use crate::key::Keyed;
use crate::schema::AttributeIndex;
use crate::validate::check::{Check, CheckContext, CheckResult};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Reading an entitlement that cannot exist must fail.
pub struct EntitlementNotFound;

#[async_trait]
impl Check for EntitlementNotFound {
    fn id(&self) -> &'static str {
        "entitlement-not-found"
    }

    fn description(&self) -> &'static str {
        "Verify reading a non-existent entitlement fails"
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[command::ENTITLEMENT_READ]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let schema = ctx.entitlement_schema();
        let read = ctx
            .client
            .entitlement_read(NOT_FOUND_ID, "", ctx.entitlement_type(), schema.as_ref())
            .await;
        if read.is_ok() {
            res.err("expected error for non-existent entitlement");
        }
    }
}

/// Every listed entitlement must read back individually with the same content.
pub struct EntitlementListRead;

#[async_trait]
impl Check for EntitlementListRead {
    fn id(&self) -> &'static str {
        "entitlement-list-read"
    }

    fn description(&self) -> &'static str {
        "Verify that we can list each entitlement and then read; results should match"
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[command::ENTITLEMENT_READ, command::ENTITLEMENT_LIST]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let entitlement_type = ctx.entitlement_type();
        let schema = ctx.entitlement_schema();
        let mut entitlements = match ctx
            .client
            .entitlement_list(entitlement_type, None, None, schema.as_ref())
            .await
        {
            Ok(list) => list.items,
            Err(e) => {
                res.err(e);
                return;
            }
        };
        if entitlements.is_empty() {
            res.warn("no entitlements");
            return;
        }

        sample(&mut entitlements, ctx.read_limit());
        for listed in &entitlements {
            let read = match ctx
                .client
                .entitlement_read(
                    listed.id(),
                    listed.unique_id(),
                    entitlement_type,
                    schema.as_ref(),
                )
                .await
            {
                Ok((entitlement, _)) => entitlement,
                Err(e) => {
                    res.err(format_args!(
                        "failed to read entitlement {:?}: {e}",
                        listed.identity
                    ));
                    continue;
                }
            };
            if read.identity != listed.identity {
                res.err(format_args!(
                    "want {:?}; got {:?}",
                    listed.identity, read.identity
                ));
            }
            record_entity_diffs(res, &listed.identity, listed, &read);
        }
    }
}

/// Listed entitlement attributes must match the schema of their type.
pub struct EntitlementSchemaCheck;

#[async_trait]
impl Check for EntitlementSchemaCheck {
    fn id(&self) -> &'static str {
        "entitlement-schema-check"
    }

    fn description(&self) -> &'static str {
        "Verify entitlement fields match schema"
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[command::ENTITLEMENT_LIST]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        let entitlement_type = ctx.entitlement_type();
        let Some(declared) = ctx.spec.entitlement_schema(entitlement_type) else {
            res.skip(format!(
                "no entitlement schema declared for type {entitlement_type:?}"
            ));
            return;
        };
        let index = match AttributeIndex::new(entitlement_type, &declared.attributes) {
            Ok(index) => index,
            Err(e) => {
                res.err(e);
                return;
            }
        };

        let schema = ctx.entitlement_schema();
        let entitlements = match ctx
            .client
            .entitlement_list(entitlement_type, None, None, schema.as_ref())
            .await
        {
            Ok(list) => list.items,
            Err(e) => {
                res.err(e);
                return;
            }
        };

        let mut undeclared = BTreeSet::new();
        for entitlement in &entitlements {
            for violation in index.check_attributes(&entitlement.attributes, &mut undeclared) {
                res.err(format_args!(
                    "[identity={}] {violation}",
                    entitlement.identity
                ));
            }
        }
        for name in undeclared {
            res.warn(format!("additional attribute {name:?}"));
        }
    }
}
