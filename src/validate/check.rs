//! The check protocol: what a check declares, what it receives, and how it
//! reports.

use super::config::ValidatorConfig;
use crate::client::ConnClient;
use crate::schema::{ConnSpec, build_account_schema, build_entitlement_schema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One named conformance test.
///
/// A check never returns an error. Everything it finds, including failed
/// connector calls, is recorded on the [`CheckResult`] it is handed.
#[async_trait]
pub trait Check: Send + Sync {
    /// Unique slug identifying the check
    fn id(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Whether running the check creates, changes or deletes connector data
    fn is_data_modifier(&self) -> bool {
        false
    }

    /// Commands the connector must declare for the check to run
    fn required_commands(&self) -> &'static [&'static str];

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult);
}

/// Everything a running check may use.
pub struct CheckContext<'a> {
    pub spec: &'a ConnSpec,
    pub client: &'a ConnClient,
    pub config: &'a ValidatorConfig,
}

impl CheckContext<'_> {
    /// Maximum number of entities to read individually.
    pub fn read_limit(&self) -> Option<usize> {
        self.config.read_limit
    }

    /// Entitlement type exercised by entitlement checks.
    pub fn entitlement_type(&self) -> &str {
        match &self.config.entitlement_type {
            Some(entitlement_type) => entitlement_type,
            None => self.spec.default_entitlement_type(),
        }
    }

    /// Query-time account schema handed to account commands.
    pub fn account_schema(&self) -> Value {
        build_account_schema(self.spec)
    }

    /// Query-time schema for [`entitlement_type`](Self::entitlement_type).
    pub fn entitlement_schema(&self) -> Option<Value> {
        build_entitlement_schema(self.spec, self.entitlement_type())
    }

    /// Give a mutation time to propagate before it is verified.
    pub async fn settle(&self) {
        if !self.config.propagation_delay.is_zero() {
            tokio::time::sleep(self.config.propagation_delay).await;
        }
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Skipped => "SKIP",
        };
        f.write_str(label)
    }
}

/// Findings recorded by one check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub skipped: Vec<String>,
}

impl CheckResult {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Record a failure.
    pub fn err(&mut self, error: impl fmt::Display) {
        self.errors.push(error.to_string());
    }

    /// Record an advisory finding; never counts as a failure.
    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Record why (part of) the check did not run.
    pub fn skip(&mut self, reason: impl Into<String>) {
        self.skipped.push(reason.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors win over skips; a result with neither passed.
    pub fn status(&self) -> CheckStatus {
        if self.has_errors() {
            CheckStatus::Failed
        } else if !self.skipped.is_empty() {
            CheckStatus::Skipped
        } else {
            CheckStatus::Passed
        }
    }
}
