//! esagg-client: send esagg search requests to an Elasticsearch-compatible engine
//!
//! Responses are returned as raw JSON; parsing aggregation results is left
//! to the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::Client;
pub use config::{Config, ConnectionConfig, LoggingConfig};
pub use error::{ClientError, Result};
pub use http::HttpTransport;
pub use transport::Transport;
