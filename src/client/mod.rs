//! Protocol client for identity connectors.
//!
//! Every command is an HTTP POST of a JSON envelope to
//! `{endpoint}/{connectorRef}/invoke`:
//!
//! ```json
//! {
//!   "connectorRef": "c0ffee",
//!   "tag": "latest",
//!   "type": "std:account:read",
//!   "config": {"baseUrl": "https://app.example.com"},
//!   "input": {"identity": "john.doe", "key": {"simple": {"id": "john.doe"}}}
//! }
//! ```
//!
//! `version` replaces `tag` when the client is pinned to a connector
//! version. Only a 200 response is a success; see [`ResponseBatch`] for how
//! response bodies are read.

pub mod command;
pub mod config;
pub mod connector_client;
pub mod response;
pub mod types;

pub use config::ClientConfig;
pub use connector_client::{ConnClient, MASKED_PASSWORD};
pub use response::ResponseBatch;
pub use types::{
    Account, AttributeChange, AttributeOp, Entitlement, ListResponse, SourceData,
};
