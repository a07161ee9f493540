use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maps logical (list/column) field names to physical store field names.
pub trait FieldResolver {
    /// Field used for DISTINCT.
    fn resolve_filter_field(&self, logical: &str) -> String;
    /// Field used for legacy list filters.
    fn resolve_query_field(&self, logical: &str) -> String;
}

/// One column of a list configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldColumn {
    pub field: String,
    /// Physical field for list filters. Defaults to `field`.
    #[serde(default)]
    pub query_on: Option<String>,
    /// Physical field for DISTINCT. Defaults to `field`.
    #[serde(default)]
    pub filter_on: Option<String>,
}

/// [`FieldResolver`] backed by a list of columns. Unknown names resolve to
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    query_on: HashMap<String, String>,
    filter_on: HashMap<String, String>,
}

impl FieldMap {
    pub fn new(columns: impl IntoIterator<Item = FieldColumn>) -> Self {
        let mut map = Self::default();
        for column in columns {
            if let Some(query_on) = column.query_on {
                map.query_on.insert(column.field.clone(), query_on);
            }
            if let Some(filter_on) = column.filter_on {
                map.filter_on.insert(column.field, filter_on);
            }
        }
        map
    }

    pub fn with_query_field(mut self, logical: impl Into<String>, physical: impl Into<String>) -> Self {
        self.query_on.insert(logical.into(), physical.into());
        self
    }

    pub fn with_filter_field(mut self, logical: impl Into<String>, physical: impl Into<String>) -> Self {
        self.filter_on.insert(logical.into(), physical.into());
        self
    }
}

impl FieldResolver for FieldMap {
    fn resolve_filter_field(&self, logical: &str) -> String {
        self.filter_on
            .get(logical)
            .cloned()
            .unwrap_or_else(|| logical.to_string())
    }

    fn resolve_query_field(&self, logical: &str) -> String {
        self.query_on
            .get(logical)
            .cloned()
            .unwrap_or_else(|| logical.to_string())
    }
}
