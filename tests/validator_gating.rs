//! Capability gating and run selection in the validator.

mod common;

use async_trait::async_trait;
use common::{INVOKE_PATH, MockConnector, client, fast_config, init_logging, sample_spec};
use connector_validator::validate::CheckContext;
use connector_validator::{
    Check, CheckRegistry, CheckResult, CheckStatus, ConnectorError, Validator,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records whether it ran.
struct SpyCheck {
    ran: Arc<AtomicBool>,
}

#[async_trait]
impl Check for SpyCheck {
    fn id(&self) -> &'static str {
        "spy"
    }

    fn description(&self) -> &'static str {
        "Records that it ran"
    }

    fn required_commands(&self) -> &'static [&'static str] {
        &["std:account:list", "std:account:read"]
    }

    async fn run(&self, _ctx: &CheckContext<'_>, _res: &mut CheckResult) {
        self.ran.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_check_with_missing_command_never_runs() {
    init_logging();
    let connector = MockConnector::new(sample_spec(&["std:spec:read", "std:account:list"]));
    let server = connector.start().await;

    let ran = Arc::new(AtomicBool::new(false));
    let registry = CheckRegistry::new().with(SpyCheck { ran: ran.clone() });
    let validator = Validator::with_registry(fast_config(), client(&server), registry);

    let results = assert_ok!(validator.run().await);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status(), CheckStatus::Skipped);
    assert_eq!(
        results[0].skipped,
        vec!["unimplemented commands: std:account:read".to_string()]
    );
    assert!(!ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_check_with_all_commands_runs() {
    let connector = MockConnector::new(sample_spec(&[
        "std:spec:read",
        "std:account:list",
        "std:account:read",
    ]));
    let server = connector.start().await;

    let ran = Arc::new(AtomicBool::new(false));
    let registry = CheckRegistry::new().with(SpyCheck { ran: ran.clone() });
    let validator = Validator::with_registry(fast_config(), client(&server), registry);

    let results = assert_ok!(validator.run().await);
    assert_eq!(results[0].status(), CheckStatus::Passed);
    assert!(ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_skipped_standard_check_sends_no_commands() {
    init_logging();
    let connector = MockConnector::new(sample_spec(&["std:spec:read", "std:account:list"]));
    connector.seed_sample_data();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .and(body_partial_json(json!({"type": "std:account:read"})))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(INVOKE_PATH))
        .respond_with(connector.clone())
        .mount(&server)
        .await;

    let results = assert_ok!(Validator::new(fast_config(), client(&server)).run().await);

    let read = results
        .iter()
        .find(|r| r.id == "account-list-and-read")
        .unwrap();
    assert_eq!(read.status(), CheckStatus::Skipped);
    assert!(read.skipped[0].contains("std:account:read"));
    assert_eq!(connector.calls_to("std:account:list"), 1);
    assert_eq!(connector.calls_to("std:account:read"), 0);
    server.verify().await;
}

#[tokio::test]
async fn test_standard_run_reports_every_check_in_order() {
    let connector = MockConnector::new(sample_spec(&["std:spec:read"]));
    let server = connector.start().await;

    let validator = Validator::new(fast_config(), client(&server));
    let results = assert_ok!(validator.run().await);

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, validator.registry().ids());
    assert!(results.iter().all(|r| r.status() == CheckStatus::Skipped));
    assert_eq!(connector.state().calls, vec!["std:spec:read".to_string()]);
}

#[tokio::test]
async fn test_read_only_excludes_data_modifiers() {
    let connector = MockConnector::conforming();
    let server = connector.start().await;
    let before = connector.account_count();

    let validator = Validator::new(fast_config().with_read_only(true), client(&server));
    let results = assert_ok!(validator.run().await);

    for result in &results {
        let check = validator.registry().get(&result.id).unwrap();
        assert!(!check.is_data_modifier(), "{} ran in read-only mode", result.id);
    }
    assert_eq!(results.len(), 8);
    assert_eq!(connector.calls_to("std:account:create"), 0);
    assert_eq!(connector.calls_to("std:account:update"), 0);
    assert_eq!(connector.account_count(), before);
}

#[tokio::test]
async fn test_single_check_selection() {
    let connector = MockConnector::conforming();
    let server = connector.start().await;

    let config = fast_config().with_check("account-not-found");
    let results = assert_ok!(Validator::new(config, client(&server)).run().await);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "account-not-found");
    assert_eq!(results[0].status(), CheckStatus::Passed);
}

#[tokio::test]
async fn test_unknown_check_selection_runs_nothing() {
    let connector = MockConnector::conforming();
    let server = connector.start().await;

    let config = fast_config().with_check("no-such-check");
    let results = assert_ok!(Validator::new(config, client(&server)).run().await);
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_spec_fetch_failure_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = assert_err!(Validator::new(fast_config(), client(&server)).run().await);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
}

#[tokio::test]
async fn test_duplicate_attribute_spec_aborts_run() {
    let mut spec = sample_spec(&["std:spec:read", "std:account:list"]);
    spec["accountSchema"]["attributes"]
        .as_array_mut()
        .unwrap()
        .push(json!({"name": "email", "type": "string"}));
    let connector = MockConnector::new(spec);
    let server = connector.start().await;

    let err = assert_err!(Validator::new(fast_config(), client(&server)).run().await);
    assert!(matches!(err, ConnectorError::Schema(_)));
    assert_eq!(connector.state().calls.len(), 1);
}

#[tokio::test]
async fn test_run_report_summarizes() {
    let connector = MockConnector::conforming();
    let server = connector.start().await;

    let config = fast_config().with_read_only(true);
    let report = assert_ok!(Validator::new(config, client(&server)).run_report().await);

    assert_eq!(report.connector, "test-connector");
    assert!(report.finished_at >= report.started_at);
    assert!(!report.has_failures());
    let summary = report.summary();
    assert_eq!(summary.passed + summary.failed + summary.skipped, report.results.len());
}
