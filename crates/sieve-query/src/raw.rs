use bson::Bson;
use serde::Deserialize;

use crate::filter::{ConditionalFilter, ConditionalOp, Filter, FilterKind, QueryFilter};

/// Parse error for untyped filter records.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParseError(pub String);

impl std::fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "filter parse error: {}", self.0)
    }
}

impl std::error::Error for FilterParseError {}

/// Every field either filter shape can carry. Which shape a record is gets
/// decided structurally, see [`is_conditional_query_filter`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawFilter {
    filter_type: String,
    #[serde(default)]
    field_name: String,
    #[serde(default)]
    value: Option<Bson>,
    #[serde(default)]
    options: Option<String>,
    /// Kept untyped so that a non-array `conditions` reads as a leaf, the
    /// same way [`is_conditional_query_filter`] judges it.
    #[serde(default)]
    conditions: Option<serde_json::Value>,
}

impl TryFrom<RawFilter> for Filter {
    type Error = FilterParseError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        let conditions = match raw.conditions {
            Some(conditions @ serde_json::Value::Array(_)) => conditions,
            _ => {
                return Ok(Filter::Leaf(QueryFilter {
                    kind: FilterKind::from(raw.filter_type),
                    field_name: raw.field_name,
                    value: raw.value.unwrap_or(Bson::Null),
                    options: raw.options,
                }));
            }
        };

        let op = match raw.filter_type.as_str() {
            "AND" => ConditionalOp::And,
            "OR" => ConditionalOp::Or,
            other => {
                return Err(FilterParseError(format!(
                    "conditional filter type must be AND or OR, got {other}"
                )));
            }
        };
        let conditions = Vec::<QueryFilter>::deserialize(conditions)
            .map_err(|e| FilterParseError(format!("malformed conditions: {e}")))?;
        Ok(Filter::Conditional(ConditionalFilter { op, conditions }))
    }
}

/// Structural check used at the untyped boundary: a record is a conditional
/// filter iff it carries a `conditions` array.
pub fn is_conditional_query_filter(record: &serde_json::Value) -> bool {
    record
        .get("conditions")
        .is_some_and(serde_json::Value::is_array)
}

/// Parse one untyped filter record.
///
/// - `{ "filterType": "OR", "conditions": [...] }` is a conditional group
///   (the type must be `AND` or `OR`)
/// - `{ "filterType": "GT", "fieldName": "age", "value": 21 }` is a leaf
/// - an unknown leaf `filterType` is kept as [`FilterKind::Unrecognized`]
pub fn parse_filter(record: &serde_json::Value) -> Result<Filter, FilterParseError> {
    if !record.is_object() {
        return Err(FilterParseError("filter record must be an object".into()));
    }
    let raw = RawFilter::deserialize(record)
        .map_err(|e| FilterParseError(format!("malformed filter record: {e}")))?;
    Filter::try_from(raw)
}
