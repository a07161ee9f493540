use std::fmt;

use bson::Bson;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::raw::RawFilter;

/// Kind of a single-field filter.
///
/// Kind names outside the supported set are kept as `Unrecognized` when a
/// filter is read from an untyped record, so translation can reject them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterKind {
    Equals,
    In,
    Not,
    Gt,
    Lt,
    Match,
    Size,
    Regexp,
    Exists,
    Unrecognized(String),
}

impl FilterKind {
    pub fn as_str(&self) -> &str {
        match self {
            FilterKind::Equals => "EQUALS",
            FilterKind::In => "IN",
            FilterKind::Not => "NOT",
            FilterKind::Gt => "GT",
            FilterKind::Lt => "LT",
            FilterKind::Match => "MATCH",
            FilterKind::Size => "SIZE",
            FilterKind::Regexp => "REGEXP",
            FilterKind::Exists => "EXISTS",
            FilterKind::Unrecognized(name) => name,
        }
    }
}

impl From<String> for FilterKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "EQUALS" => FilterKind::Equals,
            "IN" => FilterKind::In,
            "NOT" => FilterKind::Not,
            "GT" => FilterKind::Gt,
            "LT" => FilterKind::Lt,
            "MATCH" => FilterKind::Match,
            "SIZE" => FilterKind::Size,
            "REGEXP" => FilterKind::Regexp,
            "EXISTS" => FilterKind::Exists,
            _ => FilterKind::Unrecognized(name),
        }
    }
}

impl From<FilterKind> for String {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Unrecognized(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionalOp {
    And,
    Or,
}

impl fmt::Display for ConditionalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionalOp::And => f.write_str("AND"),
            ConditionalOp::Or => f.write_str("OR"),
        }
    }
}

fn null() -> Bson {
    Bson::Null
}

/// A single-field predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    #[serde(rename = "filterType")]
    pub kind: FilterKind,
    #[serde(default)]
    pub field_name: String,
    #[serde(default = "null")]
    pub value: Bson,
    /// Regex flags; only meaningful for [`FilterKind::Regexp`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl QueryFilter {
    pub fn new(kind: FilterKind, field_name: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self {
            kind,
            field_name: field_name.into(),
            value: value.into(),
            options: None,
        }
    }

    pub fn equals(field_name: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::new(FilterKind::Equals, field_name, value)
    }

    /// Membership filter. A non-array value is treated as a one-element set
    /// when translated.
    pub fn in_values(field_name: impl Into<String>, values: impl Into<Bson>) -> Self {
        Self::new(FilterKind::In, field_name, values)
    }

    /// Negation filter: "not in" for an array value, "not equal" otherwise.
    pub fn not(field_name: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::new(FilterKind::Not, field_name, value)
    }

    pub fn gt(field_name: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::new(FilterKind::Gt, field_name, value)
    }

    pub fn lt(field_name: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::new(FilterKind::Lt, field_name, value)
    }

    /// Array element match against a sub-document.
    pub fn element_match(field_name: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::new(FilterKind::Match, field_name, value)
    }

    pub fn size(field_name: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::new(FilterKind::Size, field_name, value)
    }

    /// Regex filter. Missing options are stored as an empty flag string.
    pub fn regexp(
        field_name: impl Into<String>,
        pattern: impl Into<String>,
        options: Option<&str>,
    ) -> Self {
        Self {
            kind: FilterKind::Regexp,
            field_name: field_name.into(),
            value: Bson::String(pattern.into()),
            options: Some(options.unwrap_or_default().to_string()),
        }
    }

    pub fn exists(field_name: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::new(FilterKind::Exists, field_name, value)
    }
}

/// A boolean group over leaf filters. Groups do not nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalFilter {
    #[serde(rename = "filterType")]
    pub op: ConditionalOp,
    pub conditions: Vec<QueryFilter>,
}

impl ConditionalFilter {
    pub fn or(conditions: Vec<QueryFilter>) -> Self {
        Self {
            op: ConditionalOp::Or,
            conditions,
        }
    }

    pub fn and(conditions: Vec<QueryFilter>) -> Self {
        Self {
            op: ConditionalOp::And,
            conditions,
        }
    }
}

/// Either a leaf filter or a conditional group.
///
/// On the wire both shapes share a `filterType` field; they are told apart by
/// the presence of a `conditions` array.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Leaf(QueryFilter),
    Conditional(ConditionalFilter),
}

impl Filter {
    pub fn is_conditional(&self) -> bool {
        matches!(self, Filter::Conditional(_))
    }
}

impl From<QueryFilter> for Filter {
    fn from(filter: QueryFilter) -> Self {
        Filter::Leaf(filter)
    }
}

impl From<ConditionalFilter> for Filter {
    fn from(filter: ConditionalFilter) -> Self {
        Filter::Conditional(filter)
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Filter::Leaf(leaf) => leaf.serialize(serializer),
            Filter::Conditional(group) => group.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawFilter::deserialize(deserializer)?;
        Filter::try_from(raw).map_err(serde::de::Error::custom)
    }
}
