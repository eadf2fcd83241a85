//! The standard conformance checks, grouped by entity family.

mod account_create;
mod account_read;
mod account_update;
mod entitlement_read;
mod test_connection;

pub use account_create::{AccountCreate, AccountCreateEmpty, AccountCreateListDelete};
pub use account_read::{AccountListAndRead, AccountNotFound, AccountSchemaCheck};
pub use account_update::{AccountUpdateEntitlement, AccountUpdateSingleAttrs};
pub use entitlement_read::{EntitlementListRead, EntitlementNotFound, EntitlementSchemaCheck};
pub use test_connection::{TestConnectionEmpty, TestConnectionSuccess};

use super::check::{CheckContext, CheckResult};
use super::diff::structural_diff;
use crate::client::Account;
use crate::key::Keyed;
use crate::schema::canonicalize_attributes;
use log::warn;
use rand::seq::SliceRandom;
use serde::Serialize;
use serde_json::{Map, Value};

/// Identifier no connector can hold; reading it must fail.
pub const NOT_FOUND_ID: &str = "__sailpoint__not__found__";

/// Shuffle `items` and keep at most `limit` of them.
fn sample<T>(items: &mut Vec<T>, limit: Option<usize>) {
    items.shuffle(&mut rand::thread_rng());
    if let Some(limit) = limit {
        items.truncate(limit);
    }
}

/// Record every field-level difference between two representations of the
/// same entity, after canonicalizing both attribute maps.
fn record_entity_diffs<T: Serialize>(
    res: &mut CheckResult,
    identity: &str,
    left: &T,
    right: &T,
) {
    let (left, right) = match (serde_json::to_value(left), serde_json::to_value(right)) {
        (Ok(left), Ok(right)) => (left, right),
        (Err(e), _) | (_, Err(e)) => {
            res.err(format_args!("[identity={identity}] cannot compare: {e}"));
            return;
        }
    };
    for diff in structural_diff(&canonical(left), &canonical(right)) {
        res.err(format_args!("[identity={identity}] Diff: {diff}"));
    }
}

fn canonical(mut entity: Value) -> Value {
    if let Some(Value::Object(attributes)) = entity.get_mut("attributes") {
        canonicalize_attributes(attributes);
    }
    entity
}

/// Create a throwaway account. A failure is recorded and yields `None`.
///
/// Every account returned here must be handed to [`delete_scratch_account`]
/// on all paths.
async fn create_scratch_account(
    ctx: &CheckContext<'_>,
    res: &mut CheckResult,
    identity: &str,
    input: &Map<String, Value>,
    schema: Option<&Value>,
) -> Option<Account> {
    match ctx.client.account_create(Some(identity), input, schema).await {
        Ok((account, _)) => Some(account),
        Err(e) => {
            res.err(format_args!("creating account: {e}"));
            None
        }
    }
}

/// Delete a throwaway account, recording a failure without hiding it.
async fn delete_scratch_account(
    ctx: &CheckContext<'_>,
    res: &mut CheckResult,
    account: &Account,
) -> bool {
    match ctx
        .client
        .account_delete(account.id(), account.unique_id(), None)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Failed to delete scratch account {:?}: {}",
                account.identity, e
            );
            res.err(format_args!("deleting account {:?}: {e}", account.identity));
            false
        }
    }
}
