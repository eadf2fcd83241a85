//! Runs the registered checks against one connector.

use super::check::{CheckContext, CheckResult};
use super::config::ValidatorConfig;
use super::registry::CheckRegistry;
use super::report::ValidationReport;
use crate::client::ConnClient;
use crate::error::ConnectorResult;
use chrono::Utc;
use log::{debug, info};

/// Validation orchestrator.
///
/// Holds no state between runs. Checks run one at a time in registry order,
/// because data-modifying checks share the connector's remote state.
pub struct Validator {
    config: ValidatorConfig,
    client: ConnClient,
    registry: CheckRegistry,
}

impl Validator {
    /// Validator running the standard checks.
    pub fn new(config: ValidatorConfig, client: ConnClient) -> Self {
        Self::with_registry(config, client, CheckRegistry::standard())
    }

    pub fn with_registry(
        config: ValidatorConfig,
        client: ConnClient,
        registry: CheckRegistry,
    ) -> Self {
        Self {
            config,
            client,
            registry,
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Run every applicable check and return the results in registry order.
    ///
    /// Fails only when the connector's specification cannot be fetched or is
    /// inconsistent; every other problem is recorded on a [`CheckResult`].
    /// Checks excluded by `read_only` or `check` produce no result at all.
    pub async fn run(&self) -> ConnectorResult<Vec<CheckResult>> {
        let spec = self.client.spec_read().await?;
        spec.validate()?;
        debug!(
            "Connector {:?} declares {} command(s)",
            spec.name,
            spec.commands.len()
        );

        let ctx = CheckContext {
            spec: &spec,
            client: &self.client,
            config: &self.config,
        };

        let mut results = Vec::new();
        for check in self.registry.iter() {
            if self.config.read_only && check.is_data_modifier() {
                continue;
            }
            if self
                .config
                .check
                .as_deref()
                .is_some_and(|only| only != check.id())
            {
                continue;
            }

            info!("running check {:?}", check.id());
            let mut result = CheckResult::new(check.id());

            let missing = spec.missing_commands(check.required_commands());
            if missing.is_empty() {
                check.run(&ctx, &mut result).await;
            } else {
                debug!("Skipping {}: missing {:?}", check.id(), missing);
                result.skip(format!("unimplemented commands: {}", missing.join(", ")));
            }
            results.push(result);
        }
        Ok(results)
    }

    /// [`run`](Self::run), wrapped in a timestamped report.
    pub async fn run_report(&self) -> ConnectorResult<ValidationReport> {
        let started_at = Utc::now();
        let results = self.run().await?;
        Ok(ValidationReport {
            connector: self.client.connector_ref().to_string(),
            started_at,
            finished_at: Utc::now(),
            results,
        })
    }
}
