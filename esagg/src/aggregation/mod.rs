//! Aggregation tree
//!
//! An [`Aggregation`] is one named node: a kind (metric, bucket or filter)
//! plus its ordered sub-aggregations. Nodes are configured through chained
//! by-value calls and rendered with [`serialize::to_value`]:
//!
//! ```
//! use esagg::aggregation::{serialize, Aggregation};
//! use esagg::query::RangeQuery;
//!
//! let in_stock = Aggregation::new("in_stock_products")
//!     .filter(RangeQuery::new().field("stock").gt(0))
//!     .aggregate(Aggregation::new("avg_price").avg("price"));
//!
//! let json = serialize::to_value(&[in_stock]).unwrap();
//! assert_eq!(json["in_stock_products"]["aggregations"]["avg_price"]["avg"]["field"], "price");
//! ```

mod builder;
pub mod serialize;
pub mod types;

pub use types::{
    AggregationKind, Bound, CardinalityAgg, DateHistogramAgg, ExtendedBounds, FieldAgg,
    FilterAgg, GlobalAgg, HistogramAgg, Numeric, TermsAgg, DEFAULT_HISTOGRAM_MIN_DOC_COUNT,
};

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::Result;

/// A single named aggregation and its sub-aggregations
#[derive(Debug, Clone)]
pub struct Aggregation {
    name: String,
    kind: Option<AggregationKind>,
    children: Vec<Aggregation>,
}

impl Aggregation {
    /// Start a new aggregation. No kind is set until a kind method is called.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Option<&AggregationKind> {
        self.kind.as_ref()
    }

    pub fn children(&self) -> &[Aggregation] {
        &self.children
    }

    /// Append sub-aggregations in iteration order
    pub fn aggregates(mut self, children: impl IntoIterator<Item = Aggregation>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a single sub-aggregation
    pub fn aggregate(mut self, child: Aggregation) -> Self {
        self.children.push(child);
        self
    }

    /// Append a sub-aggregation in place
    pub fn push(&mut self, child: Aggregation) {
        self.children.push(child);
    }

    /// Render this node's body (without its name)
    pub fn to_value(&self) -> Result<Value> {
        serialize::render_node(self)
    }
}

/// Top-level collection of named aggregations
#[derive(Debug, Clone, Default)]
pub struct Aggregations(Vec<Aggregation>);

impl Aggregations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, aggregation: Aggregation) {
        self.0.push(aggregation);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Aggregation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Aggregation] {
        &self.0
    }

    /// Render as `{name: body, ...}`
    pub fn to_value(&self) -> Result<Value> {
        serialize::to_value(&self.0)
    }
}

impl From<Vec<Aggregation>> for Aggregations {
    fn from(aggregations: Vec<Aggregation>) -> Self {
        Self(aggregations)
    }
}

impl FromIterator<Aggregation> for Aggregations {
    fn from_iter<I: IntoIterator<Item = Aggregation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Aggregation> for Aggregations {
    fn extend<I: IntoIterator<Item = Aggregation>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Aggregations {
    type Item = &'a Aggregation;
    type IntoIter = std::slice::Iter<'a, Aggregation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Aggregations {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::Error as _;
        self.to_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}
