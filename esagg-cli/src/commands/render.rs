//! Render command implementation.

use anyhow::Result;
use esagg::SearchRequest;
use serde_json::Value;
use std::path::Path;

use crate::definition::load_definitions;

/// Build the request body for a definition file without sending it.
pub fn render_body(file: &Path, index: &str, size: Option<usize>) -> Result<Value> {
    let aggregations = load_definitions(file)?;
    let mut request = SearchRequest::new(index).aggregates(aggregations);
    if let Some(size) = size {
        request = request.size(size);
    }
    Ok(request.body()?)
}

/// Run the render command.
pub fn run_render(file: &Path, index: &str, size: Option<usize>, compact: bool) -> Result<()> {
    let body = render_body(file, index, size)?;
    let text = if compact {
        serde_json::to_string(&body)?
    } else {
        serde_json::to_string_pretty(&body)?
    };
    println!("{}", text);
    Ok(())
}
