//! Entities and command payloads exchanged with connectors.

use crate::key::{Key, Keyed, deserialize_optional_key};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// An account as returned by list, read, create and update commands.
///
/// Accounts are never edited locally; a fresh value comes from every
/// response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(deserialize_with = "null_as_default")]
    pub identity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(
        deserialize_with = "deserialize_optional_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<Key>,
    #[serde(deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,
}

/// An entitlement as returned by list and read commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entitlement {
    #[serde(deserialize_with = "null_as_default")]
    pub identity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(
        deserialize_with = "deserialize_optional_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<Key>,
    #[serde(deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,
}

/// Decodes an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Keyed for Account {
    fn identity(&self) -> &str {
        &self.identity
    }
    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
    fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }
}

impl Keyed for Entitlement {
    fn identity(&self) -> &str {
        &self.identity
    }
    fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
    fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }
}

/// Operation of an [`AttributeChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeOp {
    /// Add a value to a multi-valued attribute
    Add,
    /// Remove a value from a multi-valued attribute
    Remove,
    /// Replace the value of an attribute
    Set,
}

impl fmt::Display for AttributeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "Add",
            Self::Remove => "Remove",
            Self::Set => "Set",
        };
        f.write_str(name)
    }
}

/// One change submitted to `std:account:update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub op: AttributeOp,
    pub attribute: String,
    pub value: Value,
}

impl AttributeChange {
    pub fn new(op: AttributeOp, attribute: impl Into<String>, value: Value) -> Self {
        Self {
            op,
            attribute: attribute.into(),
            value,
        }
    }
}

/// Items returned by a list command.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse<T> {
    /// Parsed output items in the order the connector produced them
    pub items: Vec<T>,
    /// Continuation state, when the connector sent one
    pub state: Option<Value>,
    /// Raw output items joined by newlines, for display
    pub printable: String,
}

/// One source data entry returned by the source-data commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceData {
    pub key: String,
    pub label: String,
    pub sublabel: String,
}
