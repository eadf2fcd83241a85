//! Addressable identity of connector entities.
//!
//! On the wire a key is an object carrying exactly one of `simple` or
//! `compound`:
//!
//! ```json
//! {"simple": {"id": "john.doe"}}
//! {"compound": {"lookupId": "john.doe", "uniqueId": "8f2c"}}
//! ```
//!
//! [`Key`] models this as a sum type so that the "neither" and "both" shapes
//! cannot exist once a key has been parsed.

use crate::error::ConnectorError;
use serde::{Deserialize, Deserializer, Serialize};

/// Identity of an account or entitlement as understood by the connector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireKey", into = "WireKey")]
pub enum Key {
    /// Single identifier used both for lookup and uniqueness
    Simple { id: String },
    /// Lookup identifier paired with a separate immutable unique identifier
    Compound {
        lookup_id: String,
        unique_id: String,
    },
}

impl Key {
    /// Simple key for `id`.
    pub fn simple(id: impl Into<String>) -> Self {
        Self::Simple { id: id.into() }
    }

    /// Compound key for `lookup_id` / `unique_id`.
    pub fn compound(lookup_id: impl Into<String>, unique_id: impl Into<String>) -> Self {
        Self::Compound {
            lookup_id: lookup_id.into(),
            unique_id: unique_id.into(),
        }
    }

    /// Key the protocol client sends for an `(identity, unique_id)` pair:
    /// simple when `unique_id` is empty, compound otherwise.
    pub fn for_identity(identity: &str, unique_id: &str) -> Self {
        if unique_id.is_empty() {
            Self::simple(identity)
        } else {
            Self::compound(identity, unique_id)
        }
    }

    /// Identifier used to look the entity up.
    pub fn lookup_id(&self) -> &str {
        match self {
            Self::Simple { id } => id,
            Self::Compound { lookup_id, .. } => lookup_id,
        }
    }

    /// Unique identifier, present only on compound keys.
    pub fn unique_id(&self) -> Option<&str> {
        match self {
            Self::Simple { .. } => None,
            Self::Compound { unique_id, .. } => Some(unique_id),
        }
    }
}

/// Entities addressable through a [`Key`].
///
/// Provides the resolution rules shared by accounts and entitlements.
pub trait Keyed {
    /// The entity's identity field
    fn identity(&self) -> &str;

    /// The entity's UUID field, if it reported one
    fn uuid(&self) -> Option<&str>;

    /// The entity's key, if it reported one
    fn key(&self) -> Option<&Key>;

    /// Lookup identifier: the key's id, falling back to the identity field.
    fn id(&self) -> &str {
        match self.key() {
            Some(key) => key.lookup_id(),
            None => self.identity(),
        }
    }

    /// Unique identifier: the compound key's unique id, else a non-empty
    /// UUID, else the empty string.
    fn unique_id(&self) -> &str {
        if let Some(unique_id) = self.key().and_then(Key::unique_id) {
            return unique_id;
        }
        self.uuid().filter(|uuid| !uuid.is_empty()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    simple: Option<WireSimpleKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compound: Option<WireCompoundKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireSimpleKey {
    id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCompoundKey {
    lookup_id: String,
    unique_id: String,
}

impl WireKey {
    fn is_empty(&self) -> bool {
        self.simple.is_none() && self.compound.is_none()
    }
}

impl TryFrom<WireKey> for Key {
    type Error = ConnectorError;

    fn try_from(wire: WireKey) -> Result<Self, Self::Error> {
        match (wire.simple, wire.compound) {
            (Some(simple), None) => Ok(Key::Simple { id: simple.id }),
            (None, Some(compound)) => Ok(Key::Compound {
                lookup_id: compound.lookup_id,
                unique_id: compound.unique_id,
            }),
            (Some(_), Some(_)) => Err(ConnectorError::invalid_key(
                "both simple and compound are populated",
            )),
            (None, None) => Err(ConnectorError::invalid_key(
                "neither simple nor compound is populated",
            )),
        }
    }
}

impl From<Key> for WireKey {
    fn from(key: Key) -> Self {
        match key {
            Key::Simple { id } => WireKey {
                simple: Some(WireSimpleKey { id }),
                compound: None,
            },
            Key::Compound {
                lookup_id,
                unique_id,
            } => WireKey {
                simple: None,
                compound: Some(WireCompoundKey {
                    lookup_id,
                    unique_id,
                }),
            },
        }
    }
}

/// Deserialize an optional entity key.
///
/// Connectors commonly omit the key, send `null`, or send `{}`; all three
/// mean "no key". A key carrying both variants is rejected.
pub(crate) fn deserialize_optional_key<'de, D>(deserializer: D) -> Result<Option<Key>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Option::<WireKey>::deserialize(deserializer)?;
    match wire {
        None => Ok(None),
        Some(wire) if wire.is_empty() => Ok(None),
        Some(wire) => Key::try_from(wire)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
