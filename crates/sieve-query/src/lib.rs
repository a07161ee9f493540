//! Backend-agnostic query specifications.
//!
//! A [`QuerySpecification`] describes what to fetch: filters, sort order,
//! population of related documents, field selection, pagination, or a scalar
//! aggregate (COUNT / DISTINCT) in place of a document selection. It knows
//! nothing about the store that eventually runs the query.

mod error;
mod filter;
mod function;
mod populate;
mod raw;
mod request;
mod sort;
mod specification;
pub mod value;

pub use bson::Bson;
pub use error::{SpecError, Strictness};
pub use filter::{ConditionalFilter, ConditionalOp, Filter, FilterKind, QueryFilter};
pub use function::{AggregateFunction, FunctionName};
pub use populate::Populate;
pub use raw::{FilterParseError, is_conditional_query_filter, parse_filter};
pub use request::QueryRequest;
pub use sort::{Sort, SortDirection};
pub use specification::{Mode, QuerySpecification, Selection};
