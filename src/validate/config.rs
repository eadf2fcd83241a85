//! Validation run options.

use std::time::Duration;

/// Default wait between a mutation and the read that verifies it.
pub const DEFAULT_PROPAGATION_DELAY: Duration = Duration::from_secs(1);

/// Options controlling which checks run and how they sample data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Run only the check with this id
    pub check: Option<String>,
    /// Skip every check that modifies connector data
    pub read_only: bool,
    /// Maximum number of entities read individually by list/read checks
    pub read_limit: Option<usize>,
    /// Wait between a mutation and its verifying read
    pub propagation_delay: Duration,
    /// Entitlement type to exercise; defaults to the first declared schema
    pub entitlement_type: Option<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            check: None,
            read_only: false,
            read_limit: None,
            propagation_delay: DEFAULT_PROPAGATION_DELAY,
            entitlement_type: None,
        }
    }
}

impl ValidatorConfig {
    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_read_limit(mut self, limit: usize) -> Self {
        self.read_limit = Some(limit);
        self
    }

    pub fn with_propagation_delay(mut self, delay: Duration) -> Self {
        self.propagation_delay = delay;
        self
    }

    pub fn with_entitlement_type(mut self, entitlement_type: impl Into<String>) -> Self {
        self.entitlement_type = Some(entitlement_type.into());
        self
    }
}
