use serde::{Deserialize, Serialize};
use sieve_query::Strictness;

/// When skip/limit get applied to a paginated specification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagingRule {
    /// Skip if an offset is set, limit if a limit is set.
    #[default]
    Independent,
    /// Nothing unless both offset and limit are set and non-zero.
    RequireBoth,
}

impl PagingRule {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "independent" => Some(PagingRule::Independent),
            "require_both" | "require-both" => Some(PagingRule::RequireBoth),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    pub paging: PagingRule,
    pub strictness: Strictness,
}

impl TranslateOptions {
    pub const PAGING_ENV: &'static str = "SIEVE_PAGING_RULE";
    pub const STRICT_ENV: &'static str = "SIEVE_STRICT";

    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
            ..Self::default()
        }
    }

    pub fn with_paging(mut self, paging: PagingRule) -> Self {
        self.paging = paging;
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Defaults overridden by `SIEVE_PAGING_RULE` (`independent` |
    /// `require_both`) and `SIEVE_STRICT` (`1` / `true`). Unset or
    /// unparseable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(paging) = lookup(Self::PAGING_ENV).as_deref().and_then(PagingRule::parse) {
            options.paging = paging;
        }
        if let Some(strict) = lookup(Self::STRICT_ENV) {
            if matches!(strict.trim().to_ascii_lowercase().as_str(), "1" | "true") {
                options.strictness = Strictness::Strict;
            }
        }
        options
    }
}
