//! # Connector Validator
//!
//! Runs the conformance suite against a connector and prints one line per
//! check.
//!
//! ## Usage
//!
//! ```bash
//! CONNECTOR_ENDPOINT=http://localhost:7100 \
//! CONNECTOR_REF=my-connector \
//! CONNECTOR_CONFIG=./config.json \
//! VALIDATE_READ_ONLY=true \
//!   cargo run --bin connector-validator
//! ```
//!
//! ## Environment
//!
//! - `CONNECTOR_REF` (required): connector id or alias
//! - `CONNECTOR_ENDPOINT`: connector runtime base URL (default `http://localhost:7100`)
//! - `CONNECTOR_VERSION`: pin a connector version instead of `latest`
//! - `CONNECTOR_CONFIG`: path to a JSON config file (default `{}`)
//! - `VALIDATE_CHECK`: run only the check with this id
//! - `VALIDATE_READ_ONLY`: `true` or `1` skips data-modifying checks
//! - `VALIDATE_READ_LIMIT`: read at most this many entities per list/read check;
//!   must be greater than zero
//! - `RUST_LOG`: log filter (default `info`)
//!
//! ## Output
//!
//! ```text
//! PASS test-connection-success
//! FAIL account-list-and-read
//!   error: [identity=john.doe] Diff: attributes.email: "a@example.com" != "b@example.com"
//! SKIP account-update-entitlement
//!   skipped: unimplemented commands: std:entitlement:list
//!
//! 12 passed, 1 failed, 1 skipped, 0 warning(s) in 842ms
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: No check recorded an error
//! - `1`: At least one check failed, or the specification could not be fetched
//! - `2`: Invalid configuration

use connector_validator::{ClientConfig, ConnClient, ValidationReport, Validator, ValidatorConfig};
use serde_json::Value;
use std::env;
use std::fs;
use std::process;

const DEFAULT_ENDPOINT: &str = "http://localhost:7100";

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (client_config, validator_config) = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(2);
        }
    };

    let client = match ConnClient::new(client_config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(2);
        }
    };

    let report = match Validator::new(validator_config, client).run_report().await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ Validation aborted: {}", e);
            process::exit(1);
        }
    };

    print_report(&report);
    if report.has_failures() {
        process::exit(1);
    }
}

fn load_config() -> Result<(ClientConfig, ValidatorConfig), Box<dyn std::error::Error>> {
    let connector_ref = env::var("CONNECTOR_REF").map_err(|_| "CONNECTOR_REF must be set")?;
    let endpoint = env::var("CONNECTOR_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

    let mut client_config = ClientConfig::new(endpoint, connector_ref);
    if let Ok(version) = env::var("CONNECTOR_VERSION") {
        let version = version
            .parse()
            .map_err(|e| format!("CONNECTOR_VERSION {:?}: {}", version, e))?;
        client_config = client_config.with_version(version);
    }
    if let Ok(path) = env::var("CONNECTOR_CONFIG") {
        let content = fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
        let config: Value =
            serde_json::from_str(&content).map_err(|e| format!("{}: {}", path, e))?;
        client_config = client_config.with_config(config);
    }

    let mut validator_config = ValidatorConfig::default();
    if let Ok(check) = env::var("VALIDATE_CHECK") {
        validator_config = validator_config.with_check(check);
    }
    if let Ok(read_only) = env::var("VALIDATE_READ_ONLY") {
        validator_config = validator_config.with_read_only(parse_flag(&read_only)?);
    }
    if let Ok(limit) = env::var("VALIDATE_READ_LIMIT") {
        validator_config = validator_config.with_read_limit(parse_read_limit(&limit)?);
    }

    Ok((client_config, validator_config))
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(format!(
            "VALIDATE_READ_ONLY {:?}: expected true or false",
            other
        )),
    }
}

fn parse_read_limit(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err(format!(
            "VALIDATE_READ_LIMIT {:?}: must be greater than zero",
            value
        )),
        Ok(limit) => Ok(limit),
        Err(e) => Err(format!("VALIDATE_READ_LIMIT {:?}: {}", value, e)),
    }
}

fn print_report(report: &ValidationReport) {
    for result in &report.results {
        println!("{} {}", result.status(), result.id);
        for error in &result.errors {
            println!("  error: {}", error);
        }
        for warning in &result.warnings {
            println!("  warning: {}", warning);
        }
        for reason in &result.skipped {
            println!("  skipped: {}", reason);
        }
    }

    let summary = report.summary();
    println!(
        "\n{} passed, {} failed, {} skipped, {} warning(s) in {}ms",
        summary.passed,
        summary.failed,
        summary.skipped,
        summary.warnings,
        report.elapsed().num_milliseconds()
    );
}
