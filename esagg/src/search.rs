//! Search request envelope
//!
//! Places a serialized aggregation tree (and optionally a query and
//! pagination) into the body of a `_search` request.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::aggregation::serialize::AGGREGATIONS_KEY;
use crate::aggregation::{Aggregation, Aggregations};
use crate::error::Result;
use crate::query::SubQuery;

/// Body and target of a single `_search` call
#[derive(Debug, Clone)]
pub struct SearchRequest {
    index: String,
    query: Option<Arc<dyn SubQuery>>,
    from: Option<usize>,
    size: Option<usize>,
    aggregations: Aggregations,
}

impl SearchRequest {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            query: None,
            from: None,
            size: None,
            aggregations: Aggregations::new(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn query(mut self, query: impl SubQuery + 'static) -> Self {
        self.query = Some(Arc::new(query));
        self
    }

    /// Starting offset into the hits
    pub fn from(mut self, from: usize) -> Self {
        self.from = Some(from);
        self
    }

    /// Number of hits to return. Use 0 for aggregation-only requests.
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Append top-level aggregations in iteration order
    pub fn aggregates(mut self, aggregations: impl IntoIterator<Item = Aggregation>) -> Self {
        self.aggregations.extend(aggregations);
        self
    }

    pub fn aggregate(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    pub fn aggregations(&self) -> &Aggregations {
        &self.aggregations
    }

    /// The serialized aggregation tree on its own
    pub fn aggregations_value(&self) -> Result<Value> {
        self.aggregations.to_value()
    }

    /// Request path, relative to the engine's base URL. The index is not
    /// escaped; use [`path_segments`](Self::path_segments) to build URLs.
    pub fn path(&self) -> String {
        format!("/{}/_search", self.index)
    }

    /// Unescaped path segments of the request, for transports that encode
    /// each segment on their own
    pub fn path_segments(&self) -> [&str; 2] {
        [&self.index, "_search"]
    }

    /// Full request body. Unset parts are left out.
    pub fn body(&self) -> Result<Value> {
        let mut body = Map::new();

        if let Some(query) = &self.query {
            body.insert("query".to_string(), query.to_json()?);
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), Value::from(size));
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), Value::from(from));
        }
        if !self.aggregations.is_empty() {
            body.insert(AGGREGATIONS_KEY.to_string(), self.aggregations.to_value()?);
        }

        Ok(Value::Object(body))
    }
}
