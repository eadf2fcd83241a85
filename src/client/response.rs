//! Connector response parsing.
//!
//! A connector reply comes in one of two shapes, and the caller does not
//! know which in advance:
//!
//! * **deprecated**: one or more bare JSON values, each of which is an
//!   output item
//! * **enveloped**: a stream of `{"type": ..., "data": ...}` envelopes where
//!   `output` envelopes carry result items and a `state` envelope carries the
//!   continuation state of a list
//!
//! Values may be concatenated with or without separators. Parsing is two
//! passes: decode every value, then classify the whole stream by its first
//! value.

use crate::error::{ConnectorError, ConnectorResult};
use log::trace;
use serde_json::{Deserializer, Value};

/// Envelope type of a result item.
pub const RESPONSE_TYPE_OUTPUT: &str = "output";
/// Envelope type of the list continuation state.
pub const RESPONSE_TYPE_STATE: &str = "state";

/// A decoded connector reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBatch {
    /// Bare values; every value is an output item and no state exists
    Deprecated(Vec<Value>),
    /// Envelope stream; outputs in decode order and the first state seen
    Enveloped {
        outputs: Vec<Value>,
        state: Option<Value>,
    },
}

impl ResponseBatch {
    /// Decode and classify a response body.
    pub fn parse(body: &[u8]) -> ConnectorResult<Self> {
        let values = Deserializer::from_slice(body)
            .into_iter::<Value>()
            .collect::<Result<Vec<_>, _>>()?;

        let enveloped = values.first().is_some_and(is_envelope);
        if !enveloped {
            trace!("Parsed {} value(s) in deprecated format", values.len());
            return Ok(Self::Deprecated(values));
        }

        let mut outputs = Vec::new();
        let mut state = None;
        for value in values {
            let Value::Object(mut envelope) = value else {
                continue;
            };
            let data = envelope.remove("data").unwrap_or(Value::Null);
            match envelope.get("type").and_then(Value::as_str) {
                Some(RESPONSE_TYPE_OUTPUT) => outputs.push(data),
                Some(RESPONSE_TYPE_STATE) if state.is_none() => state = Some(data),
                other => trace!("Ignoring envelope of type {:?}", other),
            }
        }
        trace!(
            "Parsed {} output(s) in enveloped format (state: {})",
            outputs.len(),
            state.is_some()
        );
        Ok(Self::Enveloped { outputs, state })
    }

    /// Output items in decode order.
    pub fn outputs(&self) -> &[Value] {
        match self {
            Self::Deprecated(outputs) => outputs,
            Self::Enveloped { outputs, .. } => outputs,
        }
    }

    /// Continuation state, only ever present in the enveloped format.
    pub fn state(&self) -> Option<&Value> {
        match self {
            Self::Deprecated(_) => None,
            Self::Enveloped { state, .. } => state.as_ref(),
        }
    }

    /// Split into output items and state.
    pub fn into_parts(self) -> (Vec<Value>, Option<Value>) {
        match self {
            Self::Deprecated(outputs) => (outputs, None),
            Self::Enveloped { outputs, state } => (outputs, state),
        }
    }

    /// The single output item of a single-object command. Extra items are
    /// ignored; no item at all is an error.
    pub fn into_single(self, command: &str) -> ConnectorResult<Value> {
        let (outputs, _) = self.into_parts();
        outputs
            .into_iter()
            .next()
            .ok_or_else(|| ConnectorError::empty_response(command))
    }
}

fn is_envelope(value: &Value) -> bool {
    let has_type = value
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.is_empty());
    let has_data = value.get("data").is_some_and(|data| !data.is_null());
    has_type && has_data
}
