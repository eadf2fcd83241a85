//! Schema type definitions reported by connectors.
//!
//! These mirror the `accountSchema`, `entitlementSchemas` and
//! `accountCreateTemplate` sections of a connector specification. Every
//! field defaults so that partially filled specifications still load.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Declared data type of a connector attribute.
///
/// Connectors only standardise `string`, `int` and `boolean`; anything else
/// is preserved verbatim so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum AttributeType {
    /// String value
    #[default]
    String,
    /// Integer value, transported as a JSON number or a numeric string
    Int,
    /// Boolean value
    Boolean,
    /// Any type outside the standard set
    Other(String),
}

impl AttributeType {
    /// Wire name of the type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Boolean => "boolean",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for AttributeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "string" => Self::String,
            "int" => Self::Int,
            "boolean" => Self::Boolean,
            _ => Self::Other(value),
        }
    }
}

impl From<AttributeType> for String {
    fn from(value: AttributeType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account attribute descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSchemaAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub description: String,
    pub required: bool,
    /// Attribute holds entitlement identifiers
    pub entitlement: bool,
    pub managed: bool,
    pub multi: bool,
    /// Not a standard field yet; connectors opt in to update checks with it
    pub writable: bool,
}

/// Entitlement attribute descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitlementSchemaAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub description: String,
    pub multi: bool,
    pub required: bool,
}

/// Account schema section of a connector specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountSchema {
    pub display_attribute: String,
    pub group_attribute: String,
    pub identity_attribute: String,
    pub attributes: Vec<AccountSchemaAttribute>,
}

/// One entry of the `entitlementSchemas` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntitlementSchema {
    #[serde(rename = "type")]
    pub entitlement_type: String,
    pub display_attribute: String,
    pub identity_attribute: String,
    pub hierarchy_attribute: String,
    pub attributes: Vec<EntitlementSchemaAttribute>,
}

/// Fields a connector needs to create an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountCreateTemplate {
    pub fields: Vec<AccountCreateTemplateField>,
}

/// One field of the account create template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountCreateTemplateField {
    /// Deprecated; superseded by `key`
    pub name: String,
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    pub initial_value: TemplateInitialValue,
}

impl AccountCreateTemplateField {
    /// Attribute name the field populates. Deprecated templates carry only `name`.
    pub fn field_name(&self) -> &str {
        if self.key.is_empty() {
            &self.name
        } else {
            &self.key
        }
    }
}

/// How the initial value of a template field is produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateInitialValue {
    /// `static`, `generator` or `identityAttribute`
    #[serde(rename = "type")]
    pub value_type: String,
    pub attributes: TemplateAttributes,
}

/// Parameters of a template initial value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateAttributes {
    /// Generator name for `generator` values
    pub name: String,
    /// Literal for `static` values
    pub value: Value,
    /// Pattern for the unique account id generator
    pub template: String,
}

/// Common view over account and entitlement attribute descriptors.
pub trait AttributeDescriptor {
    fn name(&self) -> &str;
    fn attr_type(&self) -> &AttributeType;
    fn multi(&self) -> bool;
}

impl AttributeDescriptor for AccountSchemaAttribute {
    fn name(&self) -> &str {
        &self.name
    }
    fn attr_type(&self) -> &AttributeType {
        &self.attr_type
    }
    fn multi(&self) -> bool {
        self.multi
    }
}

impl AttributeDescriptor for EntitlementSchemaAttribute {
    fn name(&self) -> &str {
        &self.name
    }
    fn attr_type(&self) -> &AttributeType {
        &self.attr_type
    }
    fn multi(&self) -> bool {
        self.multi
    }
}
