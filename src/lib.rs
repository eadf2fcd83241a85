//! Conformance validation for identity connectors.
//!
//! Invokes a connector's standard commands over its JSON wire protocol and
//! verifies that it behaves correctly: list/read consistency, schema
//! conformance, not-found semantics and create/update/delete round trips.
//!
//! # Core Components
//!
//! - [`ConnClient`] - Protocol client for the standard command set
//! - [`ConnSpec`] - The connector's self-reported capabilities and schemas
//! - [`Validator`] - Runs the capability-gated check registry
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use connector_validator::{ClientConfig, ConnClient, Validator, ValidatorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ConnClient::new(ClientConfig::new("http://localhost:7100", "my-connector"))?;
//! let report = Validator::new(ValidatorConfig::default(), client)
//!     .run_report()
//!     .await?;
//! assert!(!report.has_failures());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod key;
pub mod schema;
pub mod validate;

// Re-export commonly used types for convenience
pub use client::{
    Account, AttributeChange, AttributeOp, ClientConfig, ConnClient, Entitlement, ListResponse,
};
pub use error::{ConnectorError, ConnectorResult, SchemaError, SchemaResult};
pub use key::{Key, Keyed};
pub use schema::{AccountSchema, ConnSpec, EntitlementSchema};
pub use validate::{
    Check, CheckRegistry, CheckResult, CheckStatus, ValidationReport, Validator, ValidatorConfig,
};
