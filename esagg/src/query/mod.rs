//! Query sub-documents embedded by filter aggregations
//!
//! The aggregation core only needs to render a query to JSON, so it depends
//! on the [`SubQuery`] capability rather than on a full query grammar.

mod types;

pub use types::{ExistsQuery, RangeParams, RangeQuery, TermQuery};

use crate::error::Result;
use serde_json::Value;
use std::fmt::Debug;

/// Anything that can render itself as a query DSL document
pub trait SubQuery: Debug + Send + Sync {
    fn to_json(&self) -> Result<Value>;
}

/// Raw query documents are embedded verbatim
impl SubQuery for Value {
    fn to_json(&self) -> Result<Value> {
        Ok(self.clone())
    }
}
