use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::ConnectionConfig;
use crate::error::{ClientError, Result};
use crate::transport::Transport;

/// Transport over HTTP(S) using a pooled reqwest client
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::CannotBeABase(config.url.clone()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `segments` below the base URL, keeping any base path prefix.
    /// Each segment is percent-encoded, so `/`, `?` and `#` stay inside it.
    fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::CannotBeABase(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url_for(segments)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Engine returned {}: {}", status, body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    fn transport_name(&self) -> &str {
        "http"
    }
}
