use std::fmt;

use crate::pattern::RegexError;

/// Which filter list a failing filter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOrigin {
    Filters,
    ListFilters,
}

impl fmt::Display for FilterOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOrigin::Filters => f.write_str("filters"),
            FilterOrigin::ListFilters => f.write_str("list filters"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("unrecognized filter type in {origin}: {kind}")]
    UnrecognizedFilterKind { kind: String, origin: FilterOrigin },

    #[error("unsupported {kind} condition on field {field:?} inside a conditional filter")]
    UnsupportedConditionalLeaf { kind: String, field: String },

    #[error("invalid regex on field {field:?}: {source}")]
    InvalidRegex {
        field: String,
        #[source]
        source: RegexError,
    },

    #[error("filter field name is empty")]
    EmptyFieldName,

    #[error("list filters require a field resolver")]
    MissingResolver,
}
