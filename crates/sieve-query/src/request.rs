use bson::Bson;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SpecError;
use crate::filter::{Filter, QueryFilter};
use crate::function::AggregateFunction;
use crate::populate::Populate;
use crate::sort::Sort;

/// Request-shaped description of a query, as received from (or exported
/// back to) the outside world.
///
/// `offset` and `limit` distinguish an absent key (`None`) from an explicit
/// `null` (`Some(Bson::Null)`): only presence triggers coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub offset: Option<Bson>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub limit: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<Sort>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub populates: Option<Vec<Populate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_filters: Option<Vec<QueryFilter>>,
    #[serde(rename = "fn", default, skip_serializing_if = "Option::is_none")]
    pub function: Option<AggregateFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

impl QueryRequest {
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SpecError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// A key that is present maps to `Some`, even when its value is `null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Bson>, D::Error> {
    Bson::deserialize(deserializer).map(Some)
}
