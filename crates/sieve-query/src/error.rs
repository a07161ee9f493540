use bson::Bson;

#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("invalid {field} value: {value}")]
    InvalidPaginationValue { field: &'static str, value: Bson },

    #[error("malformed query request: {0}")]
    Request(#[from] serde_json::Error),
}

/// How strictly input that was historically ignored gets treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Drop bad input silently (with a log line), as existing callers expect.
    #[default]
    Permissive,
    /// Surface bad input as an error.
    Strict,
}

impl Strictness {
    pub fn is_strict(self) -> bool {
        self == Strictness::Strict
    }
}
