//! Connector conformance validation.
//!
//! A [`Validator`] fetches the connector's specification, then runs each
//! registered [`Check`] whose required commands the connector declares.
//! Checks requiring undeclared commands are recorded as skipped and never
//! run.
//!
//! # Examples
//!
//! ```rust,no_run
//! use connector_validator::client::{ClientConfig, ConnClient};
//! use connector_validator::validate::{Validator, ValidatorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ConnClient::new(ClientConfig::new("http://localhost:7100", "my-connector"))?;
//! let validator = Validator::new(ValidatorConfig::default().with_read_only(true), client);
//!
//! let report = validator.run_report().await?;
//! for result in &report.results {
//!     println!("{} {}", result.status(), result.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod checks;
pub mod config;
pub mod diff;
pub mod generate;
pub mod registry;
pub mod report;
pub mod validator;

pub use check::{Check, CheckContext, CheckResult, CheckStatus};
pub use config::ValidatorConfig;
pub use registry::CheckRegistry;
pub use report::{ReportSummary, ValidationReport};
pub use validator::Validator;
