use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;

/// Sends a JSON request to the engine and returns its JSON response.
///
/// Implementations own connection handling and escaping; callers pass raw
/// path segments and bodies. Responses are returned as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, segments: &[&str], body: Option<&Value>)
        -> Result<Value>;

    /// Human-readable transport name
    fn transport_name(&self) -> &str;
}
