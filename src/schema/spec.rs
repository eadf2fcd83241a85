//! Connector self-description returned by `std:spec:read`.

use super::types::{
    AccountCreateTemplate, AccountSchema, AccountSchemaAttribute, AttributeDescriptor,
    EntitlementSchema,
};
use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Entitlement type assumed when a connector declares no entitlement schema.
pub const DEFAULT_ENTITLEMENT_TYPE: &str = "group";

/// A connector specification.
///
/// `commands` is the capability set: checks whose required commands are not
/// all listed here are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnSpec {
    pub name: String,
    pub commands: Vec<String>,
    pub account_create_template: AccountCreateTemplate,
    pub account_schema: AccountSchema,
    pub entitlement_schemas: Vec<EntitlementSchema>,
}

impl ConnSpec {
    /// Whether the connector declares `command`.
    pub fn supports(&self, command: &str) -> bool {
        self.commands.iter().any(|c| c == command)
    }

    /// Commands from `required` the connector does not declare, in the order
    /// they were required.
    pub fn missing_commands(&self, required: &[&str]) -> Vec<String> {
        let declared: HashSet<&str> = self.commands.iter().map(String::as_str).collect();
        required
            .iter()
            .filter(|command| !declared.contains(*command))
            .map(|command| command.to_string())
            .collect()
    }

    /// Check schema invariants: attribute names are unique within each schema.
    pub fn validate(&self) -> SchemaResult<()> {
        ensure_unique("account", &self.account_schema.attributes)?;
        for schema in &self.entitlement_schemas {
            let label = format!("entitlement '{}'", schema.entitlement_type);
            ensure_unique(&label, &schema.attributes)?;
        }
        Ok(())
    }

    /// First account attribute flagged as holding entitlements.
    pub fn entitlement_attribute(&self) -> Option<&AccountSchemaAttribute> {
        self.account_schema
            .attributes
            .iter()
            .find(|attr| attr.entitlement)
    }

    /// Entitlement schema declared for `entitlement_type`.
    pub fn entitlement_schema(&self, entitlement_type: &str) -> Option<&EntitlementSchema> {
        self.entitlement_schemas
            .iter()
            .find(|schema| schema.entitlement_type == entitlement_type)
    }

    /// Entitlement type validated when none is configured: the first declared
    /// schema's type, or [`DEFAULT_ENTITLEMENT_TYPE`].
    pub fn default_entitlement_type(&self) -> &str {
        self.entitlement_schemas
            .first()
            .map(|schema| schema.entitlement_type.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_ENTITLEMENT_TYPE)
    }
}

fn ensure_unique<A: AttributeDescriptor>(schema: &str, attributes: &[A]) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    for attr in attributes {
        if !seen.insert(attr.name()) {
            return Err(SchemaError::duplicate_attribute(schema, attr.name()));
        }
    }
    Ok(())
}
