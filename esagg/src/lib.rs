//! Aggregation request builder for Elasticsearch-compatible engines
//!
//! This crate builds the `aggregations` section of a search request as a
//! typed tree and renders it to the exact JSON shape the engine accepts.
//! It performs no I/O; see `esagg-client` for sending requests.
//!
//! # Supported aggregations
//!
//! Metric:
//! - `min` / `max` / `sum` / `avg`
//! - `stats` / `extended_stats`
//! - `value_count` / `percentiles` / `cardinality`
//!
//! Bucket:
//! - `global` / `missing` / `filter`
//! - `terms` / `significant_terms`
//! - `histogram` / `date_histogram`
//!
//! # Example
//!
//! ```
//! use esagg::{Aggregation, SearchRequest};
//!
//! let request = SearchRequest::new("github").size(0).aggregate(
//!     Aggregation::new("articles_over_time")
//!         .date_histogram("date", "month")
//!         .min_doc_count(0)
//!         .aggregate(Aggregation::new("avg_price").avg("price")),
//! );
//!
//! let body = request.body().unwrap();
//! assert_eq!(body["aggregations"]["articles_over_time"]["date_histogram"]["interval"], "month");
//! ```

pub mod aggregation;
pub mod error;
pub mod query;
pub mod search;

pub use aggregation::{Aggregation, AggregationKind, Aggregations, Bound, Numeric};
pub use error::{Error, Result};
pub use query::{ExistsQuery, RangeQuery, SubQuery, TermQuery};
pub use search::SearchRequest;
