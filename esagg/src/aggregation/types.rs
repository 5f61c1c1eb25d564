//! Aggregation kind bodies
//!
//! Each struct here is the JSON body that sits under an aggregation's kind
//! key, e.g. the `{"field": "price"}` in `{"avg": {"field": "price"}}`.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::query::SubQuery;

/// `min_doc_count` emitted by a histogram when the caller never set one
pub const DEFAULT_HISTOGRAM_MIN_DOC_COUNT: u64 = 1;

/// Largest float that still round-trips exactly through an `i64`
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// All supported aggregation kinds, keyed by their wire name
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    // Metric aggregations
    Min(FieldAgg),
    Max(FieldAgg),
    Sum(FieldAgg),
    Avg(FieldAgg),
    Stats(FieldAgg),
    ExtendedStats(FieldAgg),
    ValueCount(FieldAgg),
    Percentiles(FieldAgg),
    Cardinality(CardinalityAgg),

    // Bucket aggregations
    Global(GlobalAgg),
    Missing(FieldAgg),
    Terms(TermsAgg),
    SignificantTerms(FieldAgg),
    Histogram(HistogramAgg),
    DateHistogram(DateHistogramAgg),
    Filter(FilterAgg),
}

impl AggregationKind {
    /// The key this kind's body is serialized under
    pub fn key(&self) -> &'static str {
        match self {
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::Sum(_) => "sum",
            Self::Avg(_) => "avg",
            Self::Stats(_) => "stats",
            Self::ExtendedStats(_) => "extended_stats",
            Self::ValueCount(_) => "value_count",
            Self::Percentiles(_) => "percentiles",
            Self::Cardinality(_) => "cardinality",
            Self::Global(_) => "global",
            Self::Missing(_) => "missing",
            Self::Terms(_) => "terms",
            Self::SignificantTerms(_) => "significant_terms",
            Self::Histogram(_) => "histogram",
            Self::DateHistogram(_) => "date_histogram",
            Self::Filter(_) => "filter",
        }
    }

    /// Field the aggregation runs over, for the kinds that have one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Min(f)
            | Self::Max(f)
            | Self::Sum(f)
            | Self::Avg(f)
            | Self::Stats(f)
            | Self::ExtendedStats(f)
            | Self::ValueCount(f)
            | Self::Percentiles(f)
            | Self::Missing(f)
            | Self::SignificantTerms(f) => Some(&f.field),
            Self::Cardinality(c) => Some(&c.field),
            Self::Terms(t) => Some(&t.field),
            Self::Histogram(h) => Some(&h.field),
            Self::DateHistogram(h) => Some(&h.field),
            Self::Global(_) | Self::Filter(_) => None,
        }
    }

    /// First numeric parameter that JSON cannot encode (NaN or infinite)
    pub(crate) fn first_non_finite(&self) -> Option<f64> {
        let (interval, bounds) = match self {
            Self::Histogram(h) => (Some(h.interval), h.extended_bounds.as_ref()),
            Self::DateHistogram(h) => (None, h.extended_bounds.as_ref()),
            _ => return None,
        };

        interval
            .into_iter()
            .chain(bounds.into_iter().flat_map(ExtendedBounds::numbers))
            .find_map(Numeric::non_finite)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldAgg {
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardinalityAgg {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision_threshold: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalAgg {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermsAgg {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramAgg {
    pub field: String,
    pub interval: Numeric,
    /// Always emitted; `None` serializes as [`DEFAULT_HISTOGRAM_MIN_DOC_COUNT`]
    #[serde(serialize_with = "serialize_histogram_min_doc_count")]
    pub min_doc_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_bounds: Option<ExtendedBounds>,
}

fn serialize_histogram_min_doc_count<S: Serializer>(
    value: &Option<u64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.unwrap_or(DEFAULT_HISTOGRAM_MIN_DOC_COUNT))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateHistogramAgg {
    pub field: String,
    /// Calendar unit, e.g. `month` or `1d`
    pub interval: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_doc_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_bounds: Option<ExtendedBounds>,
}

/// Explicit histogram range, overriding the data-driven one
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtendedBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Bound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Bound>,
}

impl ExtendedBounds {
    fn numbers(&self) -> impl Iterator<Item = Numeric> + '_ {
        [self.min, self.max].into_iter().flatten().filter_map(|b| match b {
            Bound::Number(n) => Some(n),
            Bound::Instant(_) => None,
        })
    }
}

/// Filter bucket: the embedded query is rendered verbatim under `"filter"`
#[derive(Debug, Clone)]
pub struct FilterAgg {
    pub query: Arc<dyn SubQuery>,
}

impl Serialize for FilterAgg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.query
            .to_json()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

/// Numeric parameter value.
///
/// Integral floats are written as JSON integers so `50.0` and `50` render
/// identically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    fn non_finite(self) -> Option<f64> {
        match self {
            Self::Float(v) if !v.is_finite() => Some(v),
            _ => None,
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Int(v) => serializer.serialize_i64(v),
            Self::Float(v) if !v.is_finite() => Err(S::Error::custom(format!(
                "non-finite number {} has no JSON encoding",
                v
            ))),
            Self::Float(v) if v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER => {
                serializer.serialize_i64(v as i64)
            }
            Self::Float(v) => serializer.serialize_f64(v),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Numeric {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for Numeric {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Numeric {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f32> for Numeric {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<f64> for Numeric {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// One side of an [`ExtendedBounds`] range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Number(Numeric),
    /// Serialized as an RFC 3339 UTC string with a `Z` suffix
    Instant(DateTime<Utc>),
}

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => n.serialize(serializer),
            Self::Instant(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl From<Numeric> for Bound {
    fn from(n: Numeric) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Bound {
    fn from(v: i32) -> Self {
        Self::Number(v.into())
    }
}

impl From<i64> for Bound {
    fn from(v: i64) -> Self {
        Self::Number(v.into())
    }
}

impl From<u32> for Bound {
    fn from(v: u32) -> Self {
        Self::Number(v.into())
    }
}

impl From<f32> for Bound {
    fn from(v: f32) -> Self {
        Self::Number(v.into())
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Self::Number(v.into())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Bound {
    fn from(t: DateTime<Tz>) -> Self {
        Self::Instant(t.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    // ===================================================================
    // Numeric encoding
    // ===================================================================

    #[test]
    fn test_numeric_int() {
        assert_eq!(serde_json::to_value(Numeric::from(50)).unwrap(), json!(50));
    }

    #[test]
    fn test_numeric_integral_float_renders_as_integer() {
        let v = serde_json::to_value(Numeric::from(50.0)).unwrap();
        assert_eq!(v, json!(50));
        assert!(v.is_i64());
    }

    #[test]
    fn test_numeric_fractional_float() {
        assert_eq!(serde_json::to_value(Numeric::from(0.5)).unwrap(), json!(0.5));
    }

    #[test]
    fn test_numeric_nan_fails() {
        assert!(serde_json::to_value(Numeric::from(f64::NAN)).is_err());
    }

    #[test]
    fn test_numeric_negative_zero() {
        assert_eq!(serde_json::to_value(Numeric::from(-0.0)).unwrap(), json!(0));
    }

    // ===================================================================
    // Bound encoding
    // ===================================================================

    #[test]
    fn test_bound_instant_utc() {
        let t = DateTime::parse_from_rfc3339("2013-01-01T00:00:00+00:00").unwrap();
        let v = serde_json::to_value(Bound::from(t)).unwrap();
        assert_eq!(v, json!("2013-01-01T00:00:00Z"));
    }

    #[test]
    fn test_bound_instant_offset_normalized() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let t = offset.with_ymd_and_hms(2014, 1, 1, 2, 0, 0).unwrap();
        let v = serde_json::to_value(Bound::from(t)).unwrap();
        assert_eq!(v, json!("2014-01-01T00:00:00Z"));
    }

    #[test]
    fn test_bound_instant_keeps_millis() {
        let t = DateTime::parse_from_rfc3339("2013-01-01T00:00:00.250Z").unwrap();
        let v = serde_json::to_value(Bound::from(t)).unwrap();
        assert_eq!(v, json!("2013-01-01T00:00:00.250Z"));
    }

    #[test]
    fn test_extended_bounds_omits_unset_side() {
        let bounds = ExtendedBounds {
            min: None,
            max: Some(Bound::from(0)),
        };
        assert_eq!(serde_json::to_value(bounds).unwrap(), json!({"max": 0}));
    }

    // ===================================================================
    // Kind bodies
    // ===================================================================

    #[test]
    fn test_global_body_is_empty_object() {
        let v = serde_json::to_value(AggregationKind::Global(GlobalAgg {})).unwrap();
        assert_eq!(v, json!({"global": {}}));
    }

    #[test]
    fn test_histogram_default_min_doc_count() {
        let kind = AggregationKind::Histogram(HistogramAgg {
            field: "price".to_string(),
            interval: Numeric::from(50),
            min_doc_count: None,
            extended_bounds: None,
        });
        assert_eq!(
            serde_json::to_value(kind).unwrap(),
            json!({"histogram": {"field": "price", "interval": 50, "min_doc_count": 1}})
        );
    }

    #[test]
    fn test_kind_keys() {
        let f = || FieldAgg {
            field: "price".to_string(),
        };
        assert_eq!(AggregationKind::ExtendedStats(f()).key(), "extended_stats");
        assert_eq!(AggregationKind::ValueCount(f()).key(), "value_count");
        assert_eq!(AggregationKind::SignificantTerms(f()).key(), "significant_terms");
    }

    #[test]
    fn test_first_non_finite_in_bounds() {
        let kind = AggregationKind::Histogram(HistogramAgg {
            field: "price".to_string(),
            interval: Numeric::from(10),
            min_doc_count: None,
            extended_bounds: Some(ExtendedBounds {
                min: Some(Bound::from(f64::NEG_INFINITY)),
                max: None,
            }),
        });
        assert_eq!(kind.first_non_finite(), Some(f64::NEG_INFINITY));
    }
}
