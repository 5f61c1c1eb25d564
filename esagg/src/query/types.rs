//! Filter query builders
//!
//! Only the handful of leaf queries commonly used to scope a filter bucket.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::SubQuery;
use crate::error::Result;

/// Range query: `{"range": {<field>: {"gt": .., "lte": ..}}}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeQuery {
    pub field: String,
    pub params: RangeParams,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl RangeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn gt(mut self, value: impl Into<Value>) -> Self {
        self.params.gt = Some(value.into());
        self
    }

    pub fn gte(mut self, value: impl Into<Value>) -> Self {
        self.params.gte = Some(value.into());
        self
    }

    pub fn lt(mut self, value: impl Into<Value>) -> Self {
        self.params.lt = Some(value.into());
        self
    }

    pub fn lte(mut self, value: impl Into<Value>) -> Self {
        self.params.lte = Some(value.into());
        self
    }

    /// Date format used to parse string bounds
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.params.format = Some(format.into());
        self
    }

    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.params.time_zone = Some(time_zone.into());
        self
    }
}

impl Serialize for RangeQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut outer = serializer.serialize_map(Some(1))?;
        outer.serialize_entry("range", &SingleField(&self.field, &self.params))?;
        outer.end()
    }
}

impl SubQuery for RangeQuery {
    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Exact-value term query: `{"term": {<field>: <value>}}`
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    pub field: String,
    pub value: Value,
}

impl TermQuery {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl Serialize for TermQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut outer = serializer.serialize_map(Some(1))?;
        outer.serialize_entry("term", &SingleField(&self.field, &self.value))?;
        outer.end()
    }
}

impl SubQuery for TermQuery {
    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Matches documents that have any value for `field`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistsQuery {
    pub field: String,
}

impl ExistsQuery {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl SubQuery for ExistsQuery {
    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::json!({ "exists": { "field": self.field } }))
    }
}

/// `{<name>: <value>}` with a caller-chosen key
struct SingleField<'a, T>(&'a str, &'a T);

impl<T: Serialize> Serialize for SingleField<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, self.1)?;
        map.end()
    }
}
