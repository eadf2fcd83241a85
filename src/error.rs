//! Error types for connector invocations and spec handling.
//!
//! Checks never surface these directly: a running check converts any
//! [`ConnectorError`] it receives into an entry on its
//! [`CheckResult`](crate::validate::CheckResult). Only errors raised while
//! fetching the connector's specification escape a validation run.

use reqwest::StatusCode;

/// Main error type for protocol client operations.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// The connector could not be reached or the response body could not be read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The connector answered with anything other than 200 OK
    #[error("non-200 response: {status} (body {body})")]
    Protocol { status: StatusCode, body: String },

    /// Malformed JSON in a response, or an output item of the wrong shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single-object command produced no output item
    #[error("no output returned for {command}")]
    EmptyResponse { command: String },

    /// `std:spec:read` answered without a specification
    #[error("connector returned no specification")]
    MissingSpecification,

    /// The configured endpoint cannot be used as a base URL
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// A key object carrying both or neither of `simple` and `compound`
    #[error("invalid key: {reason}")]
    InvalidKey { reason: String },

    /// The connector's self-reported specification is inconsistent
    #[error("invalid specification: {0}")]
    Schema(#[from] SchemaError),
}

/// Violations of schema invariants in a connector specification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two attribute descriptors in one schema share a name
    #[error("attribute '{attribute}' declared more than once in {schema} schema")]
    DuplicateAttribute { schema: String, attribute: String },
}

impl ConnectorError {
    /// Build a protocol error from a non-200 status and its raw body.
    ///
    /// The body is pretty-printed when it parses as JSON and kept verbatim
    /// otherwise.
    pub fn protocol(status: StatusCode, body: &[u8]) -> Self {
        let body = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(payload) => serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned()),
            Err(_) => String::from_utf8_lossy(body).into_owned(),
        };
        Self::Protocol { status, body }
    }

    /// Create an empty response error for a command
    pub fn empty_response(command: impl Into<String>) -> Self {
        Self::EmptyResponse {
            command: command.into(),
        }
    }

    /// Create an invalid endpoint error
    pub fn invalid_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid key error
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }

    /// HTTP status of a protocol error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl SchemaError {
    /// Create a duplicate attribute error
    pub fn duplicate_attribute(schema: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::DuplicateAttribute {
            schema: schema.into(),
            attribute: attribute.into(),
        }
    }
}

// Result type aliases for convenience
pub type ConnectorResult<T> = Result<T, ConnectorError>;
pub type SchemaResult<T> = Result<T, SchemaError>;
