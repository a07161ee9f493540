use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FunctionName {
    Count,
    Distinct,
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionName::Count => f.write_str("COUNT"),
            FunctionName::Distinct => f.write_str("DISTINCT"),
        }
    }
}

/// Scalar aggregate applied instead of a document selection. The key for
/// `DISTINCT` lives on the specification, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateFunction {
    pub name: FunctionName,
}

impl AggregateFunction {
    pub const COUNT: AggregateFunction = AggregateFunction {
        name: FunctionName::Count,
    };
    pub const DISTINCT: AggregateFunction = AggregateFunction {
        name: FunctionName::Distinct,
    };
}
