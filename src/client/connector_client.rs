//! HTTP protocol client for the standard connector command set.

use super::command;
use super::config::ClientConfig;
use super::response::ResponseBatch;
use super::types::{Account, AttributeChange, Entitlement, ListResponse, SourceData};
use crate::error::{ConnectorError, ConnectorResult};
use crate::key::Key;
use crate::schema::{AccountSchema, ConnSpec};
use log::{debug, info};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Replaces the password in every logged change-password input.
pub const MASKED_PASSWORD: &str = "******";

const ACTION_INVOKE: &str = "invoke";
const ACTION_INVOKE_DIRECT: &str = "invoke-direct";
const LATEST_TAG: &str = "latest";

/// Client for one connector.
///
/// Immutable after construction and cheap to clone; clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct ConnClient {
    http: Client,
    endpoint: Url,
    connector_ref: String,
    version: Option<i64>,
    config: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvokeCommand<'a> {
    connector_ref: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'static str>,
    #[serde(rename = "type")]
    command: &'a str,
    config: &'a Value,
    input: &'a Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListInput<'a> {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    entitlement_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stateful: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a Value>,
}

#[derive(Serialize)]
struct KeyedInput<'a> {
    identity: &'a str,
    key: Key,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    entitlement_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a Value>,
}

#[derive(Serialize)]
struct CreateInput<'a> {
    identity: Option<&'a str>,
    attributes: &'a Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a Value>,
}

#[derive(Serialize)]
struct UpdateInput<'a> {
    #[serde(flatten)]
    target: KeyedInput<'a>,
    changes: &'a [AttributeChange],
}

#[derive(Serialize)]
struct ChangePasswordInput<'a> {
    identity: &'a str,
    key: &'a Key,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceDataInput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    source_data_key: Option<&'a str>,
    query_input: &'a Value,
}

#[derive(Deserialize)]
struct ReadSpecOutput {
    #[serde(default)]
    specification: Option<ConnSpec>,
}

impl ConnClient {
    /// Build a client with its own HTTP connection pool.
    pub fn new(config: ClientConfig) -> ConnectorResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Self::with_http_client(config, http)
    }

    /// Build a client on top of a pre-configured `reqwest::Client`.
    pub fn with_http_client(config: ClientConfig, http: Client) -> ConnectorResult<Self> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        debug!(
            "Connector client for {} at {} (version {:?})",
            config.connector_ref, endpoint, config.version
        );
        Ok(Self {
            http,
            endpoint,
            connector_ref: config.connector_ref,
            version: config.version,
            config: config.config,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn connector_ref(&self) -> &str {
        &self.connector_ref
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    /// Connector configuration sent with every command.
    pub fn config(&self) -> &Value {
        &self.config
    }

    /// Run `std:test-connection` with the configured config and return the
    /// raw output item.
    pub async fn test_connection(&self) -> ConnectorResult<Vec<u8>> {
        let output = self
            .invoke_single(command::TEST_CONNECTION, &json!({}), &self.config)
            .await?;
        Ok(serde_json::to_vec(&output)?)
    }

    /// Run `std:test-connection` with `config` in place of the configured one.
    pub async fn test_connection_with_config(&self, config: &Value) -> ConnectorResult<()> {
        self.invoke_raw(
            command::TEST_CONNECTION,
            &json!({}),
            config,
            None,
            ACTION_INVOKE,
        )
        .await?;
        Ok(())
    }

    /// Run `std:change-password`.
    ///
    /// The password travels to the connector unmodified; the logged input
    /// carries [`MASKED_PASSWORD`] instead.
    pub async fn change_password(
        &self,
        identity: &str,
        unique_id: &str,
        password: &str,
    ) -> ConnectorResult<Vec<u8>> {
        let (input, masked) = change_password_inputs(identity, unique_id, password)?;
        let body = self
            .invoke_raw(
                command::CHANGE_PASSWORD,
                &input,
                &self.config,
                Some(&masked),
                ACTION_INVOKE,
            )
            .await?;
        let output = ResponseBatch::parse(&body)?.into_single(command::CHANGE_PASSWORD)?;
        Ok(serde_json::to_vec(&output)?)
    }

    pub async fn account_list(
        &self,
        stateful: Option<bool>,
        state_id: Option<&str>,
        schema: Option<&Value>,
    ) -> ConnectorResult<ListResponse<Account>> {
        let input = ListInput {
            entitlement_type: None,
            stateful,
            state_id,
            schema,
        };
        self.invoke_list(command::ACCOUNT_LIST, &input).await
    }

    pub async fn account_read(
        &self,
        id: &str,
        unique_id: &str,
        schema: Option<&Value>,
    ) -> ConnectorResult<(Account, Vec<u8>)> {
        let input = KeyedInput {
            identity: id,
            key: Key::for_identity(id, unique_id),
            entitlement_type: None,
            schema,
        };
        let output = self
            .invoke_single(command::ACCOUNT_READ, &input, &self.config)
            .await?;
        decode_output(output)
    }

    /// Run `std:account:create`. `identity` is sent as `null` when absent.
    pub async fn account_create(
        &self,
        identity: Option<&str>,
        attributes: &Map<String, Value>,
        schema: Option<&Value>,
    ) -> ConnectorResult<(Account, Vec<u8>)> {
        let input = CreateInput {
            identity,
            attributes,
            schema,
        };
        let output = self
            .invoke_single(command::ACCOUNT_CREATE, &input, &self.config)
            .await?;
        decode_output(output)
    }

    pub async fn account_update(
        &self,
        id: &str,
        unique_id: &str,
        changes: &[AttributeChange],
        schema: Option<&Value>,
    ) -> ConnectorResult<(Account, Vec<u8>)> {
        let input = UpdateInput {
            target: KeyedInput {
                identity: id,
                key: Key::for_identity(id, unique_id),
                entitlement_type: None,
                schema,
            },
            changes,
        };
        let output = self
            .invoke_single(command::ACCOUNT_UPDATE, &input, &self.config)
            .await?;
        decode_output(output)
    }

    /// Run `std:account:delete`. The response body is not inspected.
    pub async fn account_delete(
        &self,
        id: &str,
        unique_id: &str,
        schema: Option<&Value>,
    ) -> ConnectorResult<()> {
        let input = serde_json::to_value(KeyedInput {
            identity: id,
            key: Key::for_identity(id, unique_id),
            entitlement_type: None,
            schema,
        })?;
        self.invoke_raw(
            command::ACCOUNT_DELETE,
            &input,
            &self.config,
            None,
            ACTION_INVOKE,
        )
        .await?;
        Ok(())
    }

    pub async fn account_discover_schema(&self) -> ConnectorResult<(AccountSchema, Vec<u8>)> {
        let output = self
            .invoke_single(command::ACCOUNT_DISCOVER_SCHEMA, &json!({}), &self.config)
            .await?;
        decode_output(output)
    }

    pub async fn entitlement_list(
        &self,
        entitlement_type: &str,
        stateful: Option<bool>,
        state_id: Option<&str>,
        schema: Option<&Value>,
    ) -> ConnectorResult<ListResponse<Entitlement>> {
        let input = ListInput {
            entitlement_type: Some(entitlement_type),
            stateful,
            state_id,
            schema,
        };
        self.invoke_list(command::ENTITLEMENT_LIST, &input).await
    }

    pub async fn entitlement_read(
        &self,
        id: &str,
        unique_id: &str,
        entitlement_type: &str,
        schema: Option<&Value>,
    ) -> ConnectorResult<(Entitlement, Vec<u8>)> {
        let input = KeyedInput {
            identity: id,
            key: Key::for_identity(id, unique_id),
            entitlement_type: Some(entitlement_type),
            schema,
        };
        let output = self
            .invoke_single(command::ENTITLEMENT_READ, &input, &self.config)
            .await?;
        decode_output(output)
    }

    /// Fetch the connector's self-reported specification.
    pub async fn spec_read(&self) -> ConnectorResult<ConnSpec> {
        let output = self
            .invoke_single(command::SPEC_READ, &json!({}), &self.config)
            .await?;
        let ReadSpecOutput { specification } = serde_json::from_value(output)?;
        specification.ok_or(ConnectorError::MissingSpecification)
    }

    /// Run an arbitrary command and return the undecoded response body.
    pub async fn invoke(&self, command: &str, input: &Value) -> ConnectorResult<Vec<u8>> {
        self.invoke_raw(command, input, &self.config, None, ACTION_INVOKE)
            .await
    }

    /// Discover source data. Posted to `{endpoint}/{ref}/invoke` like every
    /// other command, not to the bare endpoint.
    pub async fn source_data_discover(
        &self,
        query_input: &Value,
    ) -> ConnectorResult<(Vec<SourceData>, Vec<u8>)> {
        let input = serde_json::to_value(SourceDataInput {
            source_data_key: None,
            query_input,
        })?;
        self.invoke_source_data(command::SOURCE_DATA_DISCOVER, &input, ACTION_INVOKE)
            .await
    }

    /// Read source data through the direct invocation path.
    pub async fn source_data_read(
        &self,
        source_data_key: &str,
        query_input: &Value,
    ) -> ConnectorResult<(Vec<SourceData>, Vec<u8>)> {
        let input = serde_json::to_value(SourceDataInput {
            source_data_key: Some(source_data_key),
            query_input,
        })?;
        self.invoke_source_data(command::SOURCE_DATA_READ, &input, ACTION_INVOKE_DIRECT)
            .await
    }

    async fn invoke_source_data(
        &self,
        command: &str,
        input: &Value,
        action: &str,
    ) -> ConnectorResult<(Vec<SourceData>, Vec<u8>)> {
        let body = self
            .invoke_raw(command, input, &self.config, None, action)
            .await?;
        let output = ResponseBatch::parse(&body)?.into_single(command)?;
        decode_output(output)
    }

    async fn invoke_single<I: Serialize>(
        &self,
        command: &str,
        input: &I,
        config: &Value,
    ) -> ConnectorResult<Value> {
        let input = serde_json::to_value(input)?;
        let body = self
            .invoke_raw(command, &input, config, None, ACTION_INVOKE)
            .await?;
        ResponseBatch::parse(&body)?.into_single(command)
    }

    async fn invoke_list<T, I>(&self, command: &str, input: &I) -> ConnectorResult<ListResponse<T>>
    where
        T: DeserializeOwned,
        I: Serialize,
    {
        let input = serde_json::to_value(input)?;
        let body = self
            .invoke_raw(command, &input, &self.config, None, ACTION_INVOKE)
            .await?;
        let (outputs, state) = ResponseBatch::parse(&body)?.into_parts();

        let printable = outputs
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let items = outputs
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;

        debug!("{} returned {} item(s)", command, items.len());
        Ok(ListResponse {
            items,
            state,
            printable,
        })
    }

    /// POST one command envelope and return the body of a 200 response.
    ///
    /// `masked`, when given, is logged in place of `input`.
    async fn invoke_raw(
        &self,
        command: &str,
        input: &Value,
        config: &Value,
        masked: Option<&Value>,
        action: &str,
    ) -> ConnectorResult<Vec<u8>> {
        info!("Running {:?} with {}", command, masked.unwrap_or(input));

        let envelope = self.envelope(command, input, config);
        let response = self
            .http
            .post(self.resource_url(action))
            .json(&envelope)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if status != StatusCode::OK {
            debug!("{} failed with {}", command, status);
            return Err(ConnectorError::protocol(status, &body));
        }
        Ok(body.to_vec())
    }

    fn envelope<'a>(
        &'a self,
        command: &'a str,
        input: &'a Value,
        config: &'a Value,
    ) -> InvokeCommand<'a> {
        InvokeCommand {
            connector_ref: &self.connector_ref,
            version: self.version,
            tag: self.version.is_none().then_some(LATEST_TAG),
            command,
            config,
            input,
        }
    }

    fn resource_url(&self, action: &str) -> Url {
        let mut url = self.endpoint.clone();
        // Endpoints are checked for a usable base at construction.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.connector_ref)
                .push(action);
        }
        url
    }
}

fn parse_endpoint(endpoint: &str) -> ConnectorResult<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConnectorError::invalid_endpoint(endpoint, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConnectorError::invalid_endpoint(
            endpoint,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() {
        return Err(ConnectorError::invalid_endpoint(
            endpoint,
            "cannot be used as a base URL",
        ));
    }
    Ok(url)
}

/// Build the real and the masked change-password inputs independently.
fn change_password_inputs(
    identity: &str,
    unique_id: &str,
    password: &str,
) -> ConnectorResult<(Value, Value)> {
    let key = Key::for_identity(identity, unique_id);
    let input = serde_json::to_value(ChangePasswordInput {
        identity,
        key: &key,
        password,
    })?;
    let masked = serde_json::to_value(ChangePasswordInput {
        identity,
        key: &key,
        password: MASKED_PASSWORD,
    })?;
    Ok((input, masked))
}

fn decode_output<T: DeserializeOwned>(output: Value) -> ConnectorResult<(T, Vec<u8>)> {
    let raw = serde_json::to_vec(&output)?;
    let value = serde_json::from_value(output)?;
    Ok((value, raw))
}
