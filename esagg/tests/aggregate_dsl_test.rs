//! End-to-end rendering of full aggregation trees through a search request.

use chrono::DateTime;
use esagg::{Aggregation, RangeQuery, SearchRequest};
use serde_json::{json, Value};

fn every_kind_children() -> Vec<Aggregation> {
    vec![
        Aggregation::new("min_price").min("price"),
        Aggregation::new("max_price").max("price"),
        Aggregation::new("sum_price").sum("price"),
        Aggregation::new("avg_price").avg("price"),
        Aggregation::new("stats_price").stats("price"),
        Aggregation::new("extended_stats_price").extended_stats("price"),
        Aggregation::new("value_count_price").value_count("price"),
        Aggregation::new("percentiles_price").percentiles("price"),
        Aggregation::new("cardinality_price").cardinality("price", true.then_some(50)),
        Aggregation::new("global").global(),
        Aggregation::new("missing_price").missing("price"),
        Aggregation::new("terms_price").terms("price"),
        Aggregation::new("terms_price_size").terms_with_size("price", 0),
        Aggregation::new("significant_terms_price").significant_terms("price"),
        Aggregation::new("histogram_price")
            .histogram("price", 50)
            .min_doc_count(0)
            .extended_bounds(None, Some(0.0)),
        Aggregation::new("histogram_other").histogram("price", 50),
    ]
}

fn expected_children() -> Value {
    json!({
        "min_price": {"min": {"field": "price"}},
        "max_price": {"max": {"field": "price"}},
        "sum_price": {"sum": {"field": "price"}},
        "avg_price": {"avg": {"field": "price"}},
        "stats_price": {"stats": {"field": "price"}},
        "extended_stats_price": {"extended_stats": {"field": "price"}},
        "value_count_price": {"value_count": {"field": "price"}},
        "percentiles_price": {"percentiles": {"field": "price"}},
        "cardinality_price": {"cardinality": {"field": "price", "precision_threshold": 50}},
        "global": {"global": {}},
        "missing_price": {"missing": {"field": "price"}},
        "terms_price": {"terms": {"field": "price"}},
        "terms_price_size": {"terms": {"field": "price", "size": 0}},
        "significant_terms_price": {"significant_terms": {"field": "price"}},
        "histogram_other": {"histogram": {
            "field": "price",
            "min_doc_count": 1,
            "interval": 50
        }},
        "histogram_price": {"histogram": {
            "field": "price",
            "interval": 50,
            "min_doc_count": 0,
            "extended_bounds": {"max": 0}
        }}
    })
}

#[test]
fn test_every_kind_under_date_histogram() {
    let from = DateTime::parse_from_rfc3339("2013-01-01T00:00:00+00:00").unwrap();
    let to = DateTime::parse_from_rfc3339("2014-01-01T00:00:00+00:00").unwrap();

    let date_agg = Aggregation::new("articles_over_time")
        .date_histogram("date", "month")
        .min_doc_count(0)
        .extended_bounds(Some(from), Some(to))
        .aggregates(every_kind_children());

    let request = SearchRequest::new("github").aggregate(date_agg);
    let rendered = request.aggregations_value().unwrap();

    assert_eq!(
        rendered,
        json!({
            "articles_over_time": {
                "date_histogram": {
                    "field": "date",
                    "interval": "month",
                    "min_doc_count": 0,
                    "extended_bounds": {
                        "min": "2013-01-01T00:00:00Z",
                        "max": "2014-01-01T00:00:00Z"
                    }
                },
                "aggregations": expected_children()
            }
        })
    );
}

#[test]
fn test_filter_aggregation_in_request() {
    let in_stock = Aggregation::new("in_stock_products")
        .filter(RangeQuery::new().field("stock").gt(0))
        .aggregate(Aggregation::new("avg_price").avg("price"));

    let request = SearchRequest::new("github").aggregate(in_stock);

    assert_eq!(
        request.aggregations_value().unwrap(),
        json!({
            "in_stock_products": {
                "filter": {"range": {"stock": {"gt": 0}}},
                "aggregations": {"avg_price": {"avg": {"field": "price"}}}
            }
        })
    );
}

#[test]
fn test_rendered_text_parses_back_to_same_value() {
    let request = SearchRequest::new("github")
        .size(0)
        .aggregates(every_kind_children());

    let body = request.body().unwrap();
    let text = serde_json::to_string_pretty(&body).unwrap();
    let reparsed: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(reparsed, body);
    assert_eq!(reparsed["aggregations"], expected_children());
}

#[test]
fn test_aggregations_serialize_inside_envelope() {
    #[derive(serde::Serialize)]
    struct Envelope<'a> {
        aggregations: &'a esagg::Aggregations,
    }

    let request = SearchRequest::new("github").aggregate(Aggregation::new("g").global());
    let v = serde_json::to_value(Envelope {
        aggregations: request.aggregations(),
    })
    .unwrap();

    assert_eq!(v, json!({"aggregations": {"g": {"global": {}}}}));
}
