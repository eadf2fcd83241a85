//! Connector schema model: specification types, value classification,
//! canonicalization and query-time schema objects.
//!
//! # Key Types
//!
//! - [`ConnSpec`] - The connector's self-reported specification
//! - [`AttributeIndex`] - Declared attributes of one schema, indexed by name
//! - [`SchemaViolation`] - A returned value that contradicts its declaration
//!
//! # Examples
//!
//! ```rust
//! use connector_validator::schema::{AttributeIndex, ConnSpec};
//! use serde_json::json;
//! use std::collections::BTreeSet;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let spec: ConnSpec = serde_json::from_value(json!({
//!     "commands": ["std:account:list"],
//!     "accountSchema": {"attributes": [{"name": "age", "type": "int"}]}
//! }))?;
//! let index = AttributeIndex::new("account", &spec.account_schema.attributes)?;
//!
//! let attrs = json!({"age": "forty", "nickname": "jd"});
//! let mut undeclared = BTreeSet::new();
//! let violations = index.check_attributes(attrs.as_object().unwrap(), &mut undeclared);
//! assert_eq!(violations.len(), 1);
//! assert!(undeclared.contains("nickname"));
//! # Ok(())
//! # }
//! ```

pub mod canonical;
pub mod query;
pub mod spec;
pub mod types;
pub mod validation;


// Re-export the main types for convenience
pub use canonical::{attribute_values, canonicalize_attributes, canonicalize_value};
pub use query::{build_account_schema, build_entitlement_schema};
pub use spec::{ConnSpec, DEFAULT_ENTITLEMENT_TYPE};
pub use types::{
    AccountCreateTemplate, AccountCreateTemplateField, AccountSchema, AccountSchemaAttribute,
    AttributeDescriptor, AttributeType, EntitlementSchema, EntitlementSchemaAttribute,
    TemplateAttributes, TemplateInitialValue,
};
pub use validation::{AttributeIndex, AttributeShape, SchemaViolation, check_value};
