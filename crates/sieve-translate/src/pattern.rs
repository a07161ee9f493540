use std::fmt;

use fancy_regex::Regex;

#[derive(Debug, thiserror::Error)]
pub enum RegexError {
    #[error("unknown regex option: {0}")]
    UnknownOption(char),

    #[error("regex source must be a string, got {0}")]
    NonStringSource(bson::Bson),

    #[error("invalid regex pattern: {0}")]
    Pattern(#[from] fancy_regex::Error),
}

/// A compiled regex that remembers the source and flag string it was built
/// from, so document backends can render `$regex`/`$options`.
///
/// Compiled with a backtracking engine, so look-around and backreferences
/// (`^(?!admin)`, `(a)\1`) are accepted as the store accepts them.
#[derive(Clone)]
pub struct RegexPattern {
    source: String,
    options: String,
    compiled: Regex,
}

impl RegexPattern {
    /// Compile `source` with the given flag string.
    ///
    /// `i`, `m`, `s` and `x` become inline flags. `d`, `g`, `u`, `v` and `y`
    /// are accepted and have no effect on matching. Anything else is an
    /// error.
    pub fn new(source: impl Into<String>, options: impl Into<String>) -> Result<Self, RegexError> {
        let source = source.into();
        let options = options.into();

        let mut flags = String::with_capacity(4);
        for ch in options.chars() {
            match ch {
                'i' | 'm' | 's' | 'x' => {
                    if !flags.contains(ch) {
                        flags.push(ch);
                    }
                }
                'd' | 'g' | 'u' | 'v' | 'y' => {}
                c => return Err(RegexError::UnknownOption(c)),
            }
        }

        let compiled = if flags.is_empty() {
            Regex::new(&source)?
        } else {
            Regex::new(&format!("(?{flags}){source}"))?
        };

        Ok(Self {
            source,
            options,
            compiled,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> &str {
        &self.options
    }

    pub fn regex(&self) -> &Regex {
        &self.compiled
    }

    /// A match that runs into the backtracking limit counts as no match.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.compiled.is_match(haystack).unwrap_or(false)
    }
}

impl PartialEq for RegexPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.options == other.options
    }
}

impl fmt::Debug for RegexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.options)
    }
}
