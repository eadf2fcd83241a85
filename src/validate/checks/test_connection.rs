use crate::client::command;
use crate::validate::check::{Check, CheckContext, CheckResult};
use async_trait::async_trait;
use serde_json::json;

/// `std:test-connection` must fail when the connector gets an empty config.
pub struct TestConnectionEmpty;

#[async_trait]
impl Check for TestConnectionEmpty {
    fn id(&self) -> &'static str {
        "test-connection-empty"
    }

    fn description(&self) -> &'static str {
        "Verify that test connection fails with an empty config"
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[command::TEST_CONNECTION]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        if ctx.client.test_connection_with_config(&json!({})).await.is_ok() {
            res.err("expected test-connection failure for empty config");
        }
    }
}

/// `std:test-connection` must succeed with the configured config.
pub struct TestConnectionSuccess;

#[async_trait]
impl Check for TestConnectionSuccess {
    fn id(&self) -> &'static str {
        "test-connection-success"
    }

    fn description(&self) -> &'static str {
        "Verify that test connection succeeds with provided config"
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &[command::TEST_CONNECTION]
    }

    async fn run(&self, ctx: &CheckContext<'_>, res: &mut CheckResult) {
        if let Err(e) = ctx.client.test_connection().await {
            res.err(e);
        }
    }
}
