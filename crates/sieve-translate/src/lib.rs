//! Translation of a [`QuerySpecification`](sieve_query::QuerySpecification)
//! into calls on a fluent query builder.
//!
//! The store side is abstracted by [`QueryBuilder`] and [`FieldMatcher`].
//! [`DocumentQuery`] is a ready-made builder that renders a Mongo-style
//! filter document.

mod builder;
mod condition;
mod document;
mod error;
mod options;
mod pattern;
mod resolver;
mod translate;

pub use builder::{FieldMatcher, PopulatePath, QueryBuilder, SortOrder};
pub use condition::{Condition, ConditionPredicate};
pub use document::{DocumentField, DocumentQuery, Operation};
pub use error::{FilterOrigin, TranslateError};
pub use options::{PagingRule, TranslateOptions};
pub use pattern::{RegexError, RegexPattern};
pub use resolver::{FieldColumn, FieldMap, FieldResolver};
pub use sieve_query::Strictness;
pub use translate::{
    Translator, add_filters, add_function, add_lean, add_list_filters, add_paging,
    add_populates, add_selects, add_sort_order, build_query, parse_conditional_filter,
};
