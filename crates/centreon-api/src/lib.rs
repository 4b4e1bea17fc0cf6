// centreon-api: Async Rust client for the Centreon legacy (v1) REST API

pub mod auth;
pub mod client;
pub mod command;
pub mod error;
pub mod request;
pub mod transport;

mod clapi;
mod externalcmd;
mod metrics;

pub use auth::ConnectOutcome;
pub use client::{AUTH_TOKEN_HEADER, CentreonClient, ClientConfig};
pub use command::{AckOptions, CommandBatch, CommandKind, ExternalCommand};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};

/// Decoded JSON body of a successful (HTTP 200) call, returned verbatim.
pub type ApiResponse = serde_json::Value;
