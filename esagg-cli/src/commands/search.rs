//! Search command implementation.

use anyhow::{Context, Result};
use esagg::SearchRequest;
use esagg_client::{Client, ConnectionConfig};
use std::path::Path;

use crate::definition::load_definitions;

/// Run the search command.
pub async fn run_search(
    connection: &ConnectionConfig,
    file: &Path,
    index: &str,
    size: Option<usize>,
) -> Result<()> {
    let aggregations = load_definitions(file)?;
    let mut request = SearchRequest::new(index).aggregates(aggregations);
    if let Some(size) = size {
        request = request.size(size);
    }

    let client = Client::from_config(connection)
        .with_context(|| format!("Failed to create client for {}", connection.url))?;
    let response = client
        .search(&request)
        .await
        .with_context(|| format!("Search on '{}' failed", index))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
