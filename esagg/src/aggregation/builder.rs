use std::sync::Arc;

use super::types::*;
use super::Aggregation;
use crate::query::SubQuery;

fn field_agg(field: impl Into<String>) -> FieldAgg {
    FieldAgg {
        field: field.into(),
    }
}

// Every kind method replaces whatever kind was set before.
impl Aggregation {
    fn with_kind(mut self, kind: AggregationKind) -> Self {
        if let Some(previous) = &self.kind {
            tracing::trace!(
                "Aggregation '{}': kind {} replaced by {}",
                self.name,
                previous.key(),
                kind.key()
            );
        }
        self.kind = Some(kind);
        self
    }

    pub fn min(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::Min(field_agg(field)))
    }

    pub fn max(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::Max(field_agg(field)))
    }

    pub fn sum(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::Sum(field_agg(field)))
    }

    pub fn avg(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::Avg(field_agg(field)))
    }

    pub fn stats(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::Stats(field_agg(field)))
    }

    pub fn extended_stats(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::ExtendedStats(field_agg(field)))
    }

    pub fn value_count(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::ValueCount(field_agg(field)))
    }

    pub fn percentiles(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::Percentiles(field_agg(field)))
    }

    /// Approximate distinct count. `precision_threshold` is only emitted
    /// when `Some`; use `flag.then_some(n)` for a set/unset pair.
    pub fn cardinality(self, field: impl Into<String>, precision_threshold: Option<u64>) -> Self {
        self.with_kind(AggregationKind::Cardinality(CardinalityAgg {
            field: field.into(),
            precision_threshold,
        }))
    }

    pub fn global(self) -> Self {
        self.with_kind(AggregationKind::Global(GlobalAgg {}))
    }

    pub fn missing(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::Missing(field_agg(field)))
    }

    pub fn terms(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::Terms(TermsAgg {
            field: field.into(),
            size: None,
        }))
    }

    /// Terms with an explicit `size`. A size of 0 is emitted as-is.
    pub fn terms_with_size(self, field: impl Into<String>, size: u64) -> Self {
        self.with_kind(AggregationKind::Terms(TermsAgg {
            field: field.into(),
            size: Some(size),
        }))
    }

    pub fn significant_terms(self, field: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::SignificantTerms(field_agg(field)))
    }

    /// Numeric histogram. Emits `min_doc_count: 1` unless
    /// [`min_doc_count`](Self::min_doc_count) is called.
    pub fn histogram(self, field: impl Into<String>, interval: impl Into<Numeric>) -> Self {
        self.with_kind(AggregationKind::Histogram(HistogramAgg {
            field: field.into(),
            interval: interval.into(),
            min_doc_count: None,
            extended_bounds: None,
        }))
    }

    /// Date histogram over a calendar unit such as `month` or `1d`
    pub fn date_histogram(self, field: impl Into<String>, interval: impl Into<String>) -> Self {
        self.with_kind(AggregationKind::DateHistogram(DateHistogramAgg {
            field: field.into(),
            interval: interval.into(),
            min_doc_count: None,
            extended_bounds: None,
        }))
    }

    /// Filter bucket scoped by `query`
    pub fn filter(self, query: impl SubQuery + 'static) -> Self {
        self.with_kind(AggregationKind::Filter(FilterAgg {
            query: Arc::new(query),
        }))
    }

    /// Set `min_doc_count` on the active histogram kind; ignored otherwise
    pub fn min_doc_count(mut self, count: u64) -> Self {
        match &mut self.kind {
            Some(AggregationKind::Histogram(h)) => h.min_doc_count = Some(count),
            Some(AggregationKind::DateHistogram(h)) => h.min_doc_count = Some(count),
            other => tracing::debug!(
                "Aggregation '{}': min_doc_count ignored for kind {}",
                self.name,
                other.as_ref().map_or("<unset>", |k| k.key())
            ),
        }
        self
    }

    /// Set `extended_bounds` on the active histogram kind; ignored otherwise.
    /// A `None` side is left out of the output.
    pub fn extended_bounds<B: Into<Bound>>(mut self, min: Option<B>, max: Option<B>) -> Self {
        let bounds = ExtendedBounds {
            min: min.map(Into::into),
            max: max.map(Into::into),
        };
        match &mut self.kind {
            Some(AggregationKind::Histogram(h)) => h.extended_bounds = Some(bounds),
            Some(AggregationKind::DateHistogram(h)) => h.extended_bounds = Some(bounds),
            other => tracing::debug!(
                "Aggregation '{}': extended_bounds ignored for kind {}",
                self.name,
                other.as_ref().map_or("<unset>", |k| k.key())
            ),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::RangeQuery;

    #[test]
    fn test_new_has_no_kind() {
        let agg = Aggregation::new("empty");
        assert_eq!(agg.name(), "empty");
        assert!(agg.kind().is_none());
        assert!(agg.children().is_empty());
    }

    #[test]
    fn test_last_kind_wins() {
        let agg = Aggregation::new("price").min("price").terms_with_size("sku", 5);
        match agg.kind() {
            Some(AggregationKind::Terms(t)) => {
                assert_eq!(t.field, "sku");
                assert_eq!(t.size, Some(5));
            }
            other => panic!("Expected terms, got {:?}", other),
        }
    }

    #[test]
    fn test_cardinality_flag_pair() {
        let set = Aggregation::new("c").cardinality("price", true.then_some(50));
        let unset = Aggregation::new("c").cardinality("price", false.then_some(50));
        match (set.kind(), unset.kind()) {
            (Some(AggregationKind::Cardinality(a)), Some(AggregationKind::Cardinality(b))) => {
                assert_eq!(a.precision_threshold, Some(50));
                assert_eq!(b.precision_threshold, None);
            }
            _ => panic!("Expected cardinality"),
        }
    }

    #[test]
    fn test_min_doc_count_on_histogram() {
        let agg = Aggregation::new("h").histogram("price", 50).min_doc_count(0);
        match agg.kind() {
            Some(AggregationKind::Histogram(h)) => assert_eq!(h.min_doc_count, Some(0)),
            _ => panic!("Expected histogram"),
        }
    }

    #[test]
    fn test_min_doc_count_ignored_on_terms() {
        let agg = Aggregation::new("t").terms("status").min_doc_count(3);
        match agg.kind() {
            Some(AggregationKind::Terms(t)) => assert_eq!(t.size, None),
            _ => panic!("Expected terms"),
        }
    }

    #[test]
    fn test_extended_bounds_before_kind_is_ignored() {
        let agg = Aggregation::new("h")
            .extended_bounds(Some(0), Some(100))
            .histogram("price", 10);
        match agg.kind() {
            Some(AggregationKind::Histogram(h)) => assert!(h.extended_bounds.is_none()),
            _ => panic!("Expected histogram"),
        }
    }

    #[test]
    fn test_extended_bounds_only_max() {
        let agg = Aggregation::new("h")
            .histogram("price", 50)
            .extended_bounds(None, Some(0.0));
        match agg.kind() {
            Some(AggregationKind::Histogram(h)) => {
                let bounds = h.extended_bounds.as_ref().unwrap();
                assert!(bounds.min.is_none());
                assert_eq!(bounds.max, Some(Bound::Number(Numeric::Float(0.0))));
            }
            _ => panic!("Expected histogram"),
        }
    }

    #[test]
    fn test_filter_keeps_query() {
        let agg = Aggregation::new("in_stock").filter(RangeQuery::new().field("stock").gt(0));
        match agg.kind() {
            Some(AggregationKind::Filter(f)) => {
                assert_eq!(
                    f.query.to_json().unwrap(),
                    serde_json::json!({"range": {"stock": {"gt": 0}}})
                );
            }
            _ => panic!("Expected filter"),
        }
    }

    #[test]
    fn test_children_keep_order() {
        let mut agg = Aggregation::new("parent")
            .terms("category")
            .aggregates([Aggregation::new("a").avg("price"), Aggregation::new("b").max("price")])
            .aggregate(Aggregation::new("c").min("price"));
        agg.push(Aggregation::new("d").sum("price"));

        let names: Vec<&str> = agg.children().iter().map(Aggregation::name).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }
}
