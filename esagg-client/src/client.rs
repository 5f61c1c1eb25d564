use esagg::SearchRequest;
use reqwest::Method;
use serde_json::Value;

use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::http::HttpTransport;
use crate::transport::Transport;

/// Sends search requests through a [`Transport`]
pub struct Client<T: Transport> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run a search and return the engine's raw response
    pub async fn search(&self, request: &SearchRequest) -> Result<Value> {
        let body = request.body()?;
        tracing::info!(
            "Searching '{}' with {} aggregation(s) via {}",
            request.index(),
            request.aggregations().len(),
            self.transport.transport_name()
        );
        self.transport
            .send(Method::POST, &request.path_segments(), Some(&body))
            .await
    }
}

impl Client<HttpTransport> {
    pub fn from_config(config: &ConnectionConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}
