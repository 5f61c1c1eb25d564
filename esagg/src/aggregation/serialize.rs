//! Aggregation tree serializer
//!
//! Renders named aggregations into the nested object the engine expects:
//!
//! ```text
//! { <name>: { <kind>: { ..params.. }, "aggregations": { <child name>: ... } } }
//! ```
//!
//! Rendering is a pure read of the tree, so the same tree can be rendered
//! any number of times.

use serde_json::{Map, Value};

use super::Aggregation;
use crate::error::{Error, Result};

/// Key that sub-aggregations nest under
pub const AGGREGATIONS_KEY: &str = "aggregations";

/// Render a collection of named aggregations as `{name: body, ...}`.
///
/// Duplicate sibling names are not rejected; the later one wins.
pub fn to_value(aggregations: &[Aggregation]) -> Result<Value> {
    let mut out = Map::with_capacity(aggregations.len());

    for aggregation in aggregations {
        let body = render_node(aggregation)?;
        if out.insert(aggregation.name.clone(), body).is_some() {
            tracing::debug!(
                "Duplicate aggregation name '{}', keeping the last one",
                aggregation.name
            );
        }
    }

    Ok(Value::Object(out))
}

/// Render a single aggregation body: its kind entry plus any children.
pub fn render_node(aggregation: &Aggregation) -> Result<Value> {
    let mut body = Map::new();

    if let Some(kind) = &aggregation.kind {
        if let Some(v) = kind.first_non_finite() {
            return Err(Error::NonFiniteNumber(v));
        }

        // Externally tagged, so this is always a single-entry object
        match serde_json::to_value(kind).map_err(|e| sub_query_error(kind.key(), e))? {
            Value::Object(entry) => body.extend(entry),
            other => {
                body.insert(kind.key().to_string(), other);
            }
        }
    } else {
        tracing::trace!("Aggregation '{}' has no kind set", aggregation.name);
    }

    if !aggregation.children.is_empty() {
        body.insert(
            AGGREGATIONS_KEY.to_string(),
            to_value(&aggregation.children)?,
        );
    }

    Ok(Value::Object(body))
}

/// Filter bodies render their sub-query inside serde, so its failures come
/// back as serde errors; surface them as sub-query errors instead.
fn sub_query_error(key: &str, err: serde_json::Error) -> Error {
    if key == "filter" {
        Error::SubQuery(err.to_string())
    } else {
        Error::Serialization(err)
    }
}
