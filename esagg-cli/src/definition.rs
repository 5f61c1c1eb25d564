//! Aggregation definition files
//!
//! A definition file is a YAML (or JSON) list of aggregations. Each entry
//! has a `name`, one kind key mirroring the builder, and optional nested
//! `aggregations`:
//!
//! ```yaml
//! - name: articles_over_time
//!   date_histogram:
//!     field: date
//!     interval: month
//!     min_doc_count: 0
//!     extended_bounds: { min: "2013-01-01T00:00:00Z" }
//!   aggregations:
//!     - name: avg_price
//!       avg: { field: price }
//! ```
//!
//! An entry with more than one kind key is rejected. An entry with no kind
//! key renders an empty body. `global` may be written bare (`global:`).

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset};
use esagg::Aggregation;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationDef {
    pub name: String,

    // Metric aggregations
    #[serde(default)]
    pub min: Option<FieldDef>,
    #[serde(default)]
    pub max: Option<FieldDef>,
    #[serde(default)]
    pub sum: Option<FieldDef>,
    #[serde(default)]
    pub avg: Option<FieldDef>,
    #[serde(default)]
    pub stats: Option<FieldDef>,
    #[serde(default)]
    pub extended_stats: Option<FieldDef>,
    #[serde(default)]
    pub value_count: Option<FieldDef>,
    #[serde(default)]
    pub percentiles: Option<FieldDef>,
    #[serde(default)]
    pub cardinality: Option<CardinalityDef>,

    // Bucket aggregations
    #[serde(default, deserialize_with = "deserialize_global")]
    pub global: Option<GlobalDef>,
    #[serde(default)]
    pub missing: Option<FieldDef>,
    #[serde(default)]
    pub terms: Option<TermsDef>,
    #[serde(default)]
    pub significant_terms: Option<FieldDef>,
    #[serde(default)]
    pub histogram: Option<HistogramDef>,
    #[serde(default)]
    pub date_histogram: Option<DateHistogramDef>,
    /// Raw query document, embedded verbatim
    #[serde(default, deserialize_with = "deserialize_filter")]
    pub filter: Option<Value>,

    // Nested aggregations
    #[serde(default, alias = "aggs")]
    pub aggregations: Vec<AggregationDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub field: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardinalityDef {
    pub field: String,
    #[serde(default)]
    pub precision_threshold: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalDef {}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermsDef {
    pub field: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistogramDef {
    pub field: String,
    pub interval: f64,
    #[serde(default)]
    pub min_doc_count: Option<u64>,
    #[serde(default)]
    pub extended_bounds: Option<BoundsDef<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateHistogramDef {
    pub field: String,
    pub interval: String,
    #[serde(default)]
    pub min_doc_count: Option<u64>,
    #[serde(default)]
    pub extended_bounds: Option<BoundsDef<DateTime<FixedOffset>>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundsDef<T> {
    #[serde(default)]
    pub min: Option<T>,
    #[serde(default)]
    pub max: Option<T>,
}

/// A present `global` key is set even when its value is null
fn deserialize_global<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<GlobalDef>, D::Error> {
    Ok(Some(Option::<GlobalDef>::deserialize(deserializer)?.unwrap_or_default()))
}

/// A present `filter` key must carry a query document
fn deserialize_filter<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Err(D::Error::custom("filter requires a query document")),
        query => Ok(Some(query)),
    }
}

impl AggregationDef {
    /// Kind keys present on this entry, in field order
    fn kind_keys(&self) -> Vec<&'static str> {
        [
            ("min", self.min.is_some()),
            ("max", self.max.is_some()),
            ("sum", self.sum.is_some()),
            ("avg", self.avg.is_some()),
            ("stats", self.stats.is_some()),
            ("extended_stats", self.extended_stats.is_some()),
            ("value_count", self.value_count.is_some()),
            ("percentiles", self.percentiles.is_some()),
            ("cardinality", self.cardinality.is_some()),
            ("global", self.global.is_some()),
            ("missing", self.missing.is_some()),
            ("terms", self.terms.is_some()),
            ("significant_terms", self.significant_terms.is_some()),
            ("histogram", self.histogram.is_some()),
            ("date_histogram", self.date_histogram.is_some()),
            ("filter", self.filter.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, present)| present.then_some(key))
        .collect()
    }

    /// Build the aggregation tree. Fails if this entry or any nested entry
    /// declares more than one kind.
    pub fn into_aggregation(self) -> Result<Aggregation> {
        let kinds = self.kind_keys();
        if kinds.len() > 1 {
            bail!(
                "Aggregation '{}' declares several kinds ({}), expected one",
                self.name,
                kinds.join(", ")
            );
        }

        let mut agg = Aggregation::new(self.name);

        macro_rules! field_kind {
            ($def:expr, $method:ident) => {
                if let Some(def) = $def {
                    agg = agg.$method(def.field);
                }
            };
        }

        field_kind!(self.min, min);
        field_kind!(self.max, max);
        field_kind!(self.sum, sum);
        field_kind!(self.avg, avg);
        field_kind!(self.stats, stats);
        field_kind!(self.extended_stats, extended_stats);
        field_kind!(self.value_count, value_count);
        field_kind!(self.percentiles, percentiles);

        if let Some(def) = self.cardinality {
            agg = agg.cardinality(def.field, def.precision_threshold);
        }
        if self.global.is_some() {
            agg = agg.global();
        }

        field_kind!(self.missing, missing);

        if let Some(def) = self.terms {
            agg = match def.size {
                Some(size) => agg.terms_with_size(def.field, size),
                None => agg.terms(def.field),
            };
        }

        field_kind!(self.significant_terms, significant_terms);

        if let Some(def) = self.histogram {
            agg = agg.histogram(def.field, def.interval);
            if let Some(count) = def.min_doc_count {
                agg = agg.min_doc_count(count);
            }
            if let Some(bounds) = def.extended_bounds {
                agg = agg.extended_bounds(bounds.min, bounds.max);
            }
        }
        if let Some(def) = self.date_histogram {
            agg = agg.date_histogram(def.field, def.interval);
            if let Some(count) = def.min_doc_count {
                agg = agg.min_doc_count(count);
            }
            if let Some(bounds) = def.extended_bounds {
                agg = agg.extended_bounds(bounds.min, bounds.max);
            }
        }
        if let Some(query) = self.filter {
            agg = agg.filter(query);
        }

        let children = self
            .aggregations
            .into_iter()
            .map(AggregationDef::into_aggregation)
            .collect::<Result<Vec<_>>>()?;
        Ok(agg.aggregates(children))
    }
}

/// Parse definitions from text. JSON is valid YAML, so one parser covers both.
pub fn parse_definitions(content: &str) -> Result<Vec<Aggregation>> {
    let defs: Vec<AggregationDef> =
        serde_yaml::from_str(content).context("Invalid aggregation definition")?;
    defs.into_iter()
        .map(AggregationDef::into_aggregation)
        .collect()
}

/// Load definitions from a YAML or JSON file
pub fn load_definitions(path: &Path) -> Result<Vec<Aggregation>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read definitions {}", path.display()))?;
    let aggregations = parse_definitions(&content)
        .with_context(|| format!("Failed to parse definitions {}", path.display()))?;
    tracing::debug!(
        "Loaded {} top-level aggregation(s) from {}",
        aggregations.len(),
        path.display()
    );
    Ok(aggregations)
}
