//! Shared test utilities: a stateful synthetic connector served by wiremock.
//!
//! [`MockConnector`] answers the standard command set from an in-memory
//! account store, records every command it receives, and can be told to
//! misbehave in specific ways.

#![allow(dead_code)]

use connector_validator::{ClientConfig, ConnClient, ValidatorConfig};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const CONNECTOR_REF: &str = "test-connector";
pub const INVOKE_PATH: &str = "/test-connector/invoke";

pub const ALL_COMMANDS: &[&str] = &[
    "std:test-connection",
    "std:spec:read",
    "std:account:list",
    "std:account:read",
    "std:account:create",
    "std:account:update",
    "std:account:delete",
    "std:entitlement:list",
    "std:entitlement:read",
    "std:change-password",
];

/// Behaviour switches for [`MockConnector`].
#[derive(Debug, Clone, Default)]
pub struct Quirks {
    /// Reply in the deprecated bare-value format
    pub deprecated_format: bool,
    /// Reads of unknown ids return the first account instead of failing
    pub lenient_reads: bool,
    /// Reads add an attribute the list does not carry
    pub drifting_reads: bool,
    /// Updates succeed without changing anything
    pub ignore_updates: bool,
    /// Creating an account without attributes succeeds
    pub accept_empty_create: bool,
}

#[derive(Debug, Default)]
pub struct ConnectorState {
    pub accounts: Vec<Value>,
    pub entitlements: Vec<Value>,
    /// Command types in the order they were received
    pub calls: Vec<String>,
    /// Remaining injected failures per command
    pub failures: HashMap<String, usize>,
    pub quirks: Quirks,
}

/// In-memory connector implementing [`Respond`].
#[derive(Clone)]
pub struct MockConnector {
    spec: Value,
    state: Arc<Mutex<ConnectorState>>,
}

impl MockConnector {
    pub fn new(spec: Value) -> Self {
        Self {
            spec,
            state: Arc::new(Mutex::new(ConnectorState::default())),
        }
    }

    /// Connector declaring every standard command, seeded with sample data.
    pub fn conforming() -> Self {
        let connector = Self::new(sample_spec(ALL_COMMANDS));
        connector.seed_sample_data();
        connector
    }

    pub fn state(&self) -> MutexGuard<'_, ConnectorState> {
        self.state.lock().unwrap()
    }

    pub fn seed_sample_data(&self) {
        let mut state = self.state();
        state.accounts = vec![
            json!({
                "identity": "john.doe",
                "uuid": "uuid-john",
                "attributes": {
                    "email": "john.doe@example.com",
                    "firstName": "John",
                    "age": 41,
                    "active": true,
                    "groups": ["admins"]
                }
            }),
            json!({
                "identity": "jane.roe",
                "uuid": "uuid-jane",
                "attributes": {
                    "email": "jane.roe@example.com",
                    "firstName": "Jane",
                    "age": 35,
                    "active": false,
                    "groups": ["admins", "users"]
                }
            }),
        ];
        state.entitlements = ["admins", "users", "auditors"]
            .iter()
            .map(|id| json!({"identity": id, "attributes": {"name": id}}))
            .collect();
    }

    pub fn insert_account(&self, account: Value) {
        self.state().accounts.push(account);
    }

    pub fn set_quirks(&self, quirks: Quirks) {
        self.state().quirks = quirks;
    }

    /// Fail the next `count` invocations of `command` with a 500.
    pub fn fail_next(&self, command: &str, count: usize) {
        self.state().failures.insert(command.to_string(), count);
    }

    pub fn account_count(&self) -> usize {
        self.state().accounts.len()
    }

    pub fn calls_to(&self, command: &str) -> usize {
        self.state().calls.iter().filter(|c| *c == command).count()
    }

    /// Start a server routing the invoke path to this connector.
    pub async fn start(&self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(INVOKE_PATH))
            .respond_with(self.clone())
            .mount(&server)
            .await;
        server
    }

    fn handle(&self, command: &str, config: &Value, input: &Value) -> ResponseTemplate {
        let mut state = self.state();
        state.calls.push(command.to_string());

        if let Some(remaining) = state.failures.get_mut(command) {
            if *remaining > 0 {
                *remaining -= 1;
                return error(500, "injected failure");
            }
        }

        let deprecated = state.quirks.deprecated_format;
        match command {
            "std:spec:read" => single(json!({"specification": self.spec}), deprecated),
            "std:test-connection" => {
                if config.as_object().is_some_and(Map::is_empty) {
                    error(400, "missing configuration")
                } else {
                    single(json!({}), deprecated)
                }
            }
            "std:change-password" => single(json!({}), deprecated),
            "std:account:list" => list(&state.accounts, deprecated),
            "std:entitlement:list" => list(&state.entitlements, deprecated),
            "std:account:read" => {
                let id = lookup_id(input);
                let quirks = state.quirks.clone();
                let found = find(&state.accounts, &id).or_else(|| {
                    quirks
                        .lenient_reads
                        .then(|| state.accounts.first().cloned())
                        .flatten()
                });
                match found {
                    Some(mut account) => {
                        if quirks.drifting_reads {
                            account["attributes"]["title"] = json!("drift");
                        }
                        single(account, deprecated)
                    }
                    None => error(404, "account not found"),
                }
            }
            "std:entitlement:read" => match find(&state.entitlements, &lookup_id(input)) {
                Some(entitlement) => single(entitlement, deprecated),
                None => error(404, "entitlement not found"),
            },
            "std:account:create" => {
                let attributes = input["attributes"].clone();
                let empty = attributes.as_object().is_none_or(Map::is_empty);
                if empty && !state.quirks.accept_empty_create {
                    return error(400, "attributes are required");
                }
                let uuid = Uuid::new_v4().to_string();
                let identity = input["identity"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("generated-{uuid}"));
                let account = json!({
                    "identity": identity,
                    "uuid": uuid,
                    "attributes": attributes
                });
                state.accounts.push(account.clone());
                single(account, deprecated)
            }
            "std:account:update" => {
                let id = lookup_id(input);
                let ignore = state.quirks.ignore_updates;
                let Some(account) = state
                    .accounts
                    .iter_mut()
                    .find(|a| a["identity"] == id.as_str())
                else {
                    return error(404, "account not found");
                };
                if !ignore {
                    for change in input["changes"].as_array().into_iter().flatten() {
                        apply_change(&mut account["attributes"], change);
                    }
                }
                single(account.clone(), deprecated)
            }
            "std:account:delete" => {
                let id = lookup_id(input);
                let before = state.accounts.len();
                state.accounts.retain(|a| a["identity"] != id.as_str());
                if state.accounts.len() == before {
                    error(404, "account not found")
                } else {
                    single(json!({}), deprecated)
                }
            }
            other => error(400, &format!("unsupported command {other}")),
        }
    }
}

impl Respond for MockConnector {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = request.body_json::<Value>() else {
            return error(400, "malformed envelope");
        };
        let command = body["type"].as_str().unwrap_or_default().to_string();
        self.handle(&command, &body["config"], &body["input"])
    }
}

fn lookup_id(input: &Value) -> String {
    let key = &input["key"];
    key["simple"]["id"]
        .as_str()
        .or_else(|| key["compound"]["lookupId"].as_str())
        .or_else(|| input["identity"].as_str())
        .unwrap_or_default()
        .to_string()
}

fn find(entities: &[Value], id: &str) -> Option<Value> {
    entities.iter().find(|e| e["identity"] == id).cloned()
}

fn apply_change(attributes: &mut Value, change: &Value) {
    let name = change["attribute"].as_str().unwrap_or_default();
    let value = change["value"].clone();
    match change["op"].as_str() {
        Some("Set") => attributes[name] = value,
        Some("Add") => match &mut attributes[name] {
            Value::Array(items) => items.push(value),
            slot @ Value::Null => *slot = json!([value]),
            scalar => *scalar = json!([scalar.clone(), value]),
        },
        Some("Remove") => {
            if let Value::Array(items) = &mut attributes[name] {
                items.retain(|item| *item != value);
            }
        }
        _ => {}
    }
}

fn single(data: Value, deprecated: bool) -> ResponseTemplate {
    let body = if deprecated {
        data.to_string()
    } else {
        json!({"type": "output", "data": data}).to_string()
    };
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

fn list(items: &[Value], deprecated: bool) -> ResponseTemplate {
    let mut body: Vec<String> = items
        .iter()
        .map(|item| {
            if deprecated {
                item.to_string()
            } else {
                json!({"type": "output", "data": item}).to_string()
            }
        })
        .collect();
    if !deprecated {
        body.push(json!({"type": "state", "data": {"page": 1}}).to_string());
    }
    ResponseTemplate::new(200).set_body_raw(body.join("\n"), "application/json")
}

fn error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({"message": message}))
}

/// Specification declaring `commands`, with a complete account schema, one
/// entitlement schema and a create template.
pub fn sample_spec(commands: &[&str]) -> Value {
    json!({
        "name": "mock-connector",
        "commands": commands,
        "accountCreateTemplate": {
            "fields": [
                {"key": "email", "type": "string", "required": true,
                 "initialValue": {"type": "identityAttribute", "attributes": {"name": "email"}}},
                {"key": "firstName", "type": "string", "required": true,
                 "initialValue": {"type": "static", "attributes": {"value": "Test"}}},
                {"key": "password", "type": "string", "required": true,
                 "initialValue": {"type": "generator", "attributes": {"name": "Create Password"}}},
                {"key": "department", "type": "string", "required": false}
            ]
        },
        "accountSchema": {
            "displayAttribute": "email",
            "identityAttribute": "email",
            "groupAttribute": "groups",
            "attributes": [
                {"name": "email", "type": "string", "writable": true},
                {"name": "firstName", "type": "string", "writable": true},
                {"name": "age", "type": "int", "writable": true},
                {"name": "active", "type": "boolean", "writable": true},
                {"name": "groups", "type": "string", "multi": true,
                 "entitlement": true, "managed": true, "writable": true}
            ]
        },
        "entitlementSchemas": [
            {
                "type": "group",
                "displayAttribute": "name",
                "identityAttribute": "name",
                "attributes": [{"name": "name", "type": "string"}]
            }
        ]
    })
}

/// Client pointed at `server`.
pub fn client(server: &MockServer) -> ConnClient {
    let config = ClientConfig::new(server.uri(), CONNECTOR_REF)
        .with_config(json!({"token": "secret"}))
        .with_timeout(Duration::from_secs(10));
    ConnClient::new(config).unwrap()
}

/// Validator options without propagation waits.
pub fn fast_config() -> ValidatorConfig {
    ValidatorConfig::default().with_propagation_delay(Duration::ZERO)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
