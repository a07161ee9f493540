use bson::Bson;
use indexmap::IndexMap;
use sieve_query::SortDirection;

use crate::condition::Condition;
use crate::pattern::RegexPattern;

/// Field → direction, in first-insertion order.
pub type SortOrder = IndexMap<String, SortDirection>;

/// One populate instruction handed to a [`QueryBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulatePath {
    /// Attach the whole related document.
    Full(String),
    /// Attach the related document projected to `select` (space-joined).
    Projected { path: String, select: String },
}

impl PopulatePath {
    pub fn path(&self) -> &str {
        match self {
            PopulatePath::Full(path) | PopulatePath::Projected { path, .. } => path,
        }
    }
}

/// Predicates scoped to one field, obtained from [`QueryBuilder::where_field`].
pub trait FieldMatcher {
    fn equals(self, value: Bson);
    fn not_equals(self, value: Bson);
    fn not_in(self, values: Vec<Bson>);
    fn in_values(self, values: Vec<Bson>);
    fn greater_than(self, value: Bson);
    fn less_than(self, value: Bson);
    fn element_match(self, value: Bson);
    fn size_equals(self, value: Bson);
    fn regex_matches(self, pattern: RegexPattern);
    fn exists(self, value: Bson);
}

/// The imperative query-construction surface of a store client.
///
/// Translation only ever talks to a store through this trait.
pub trait QueryBuilder {
    type Field<'a>: FieldMatcher
    where
        Self: 'a;

    fn where_field(&mut self, name: &str) -> Self::Field<'_>;

    fn or(&mut self, conditions: Vec<Condition>);
    fn and(&mut self, conditions: Vec<Condition>);

    fn sort(&mut self, order: SortOrder);
    fn populate(&mut self, populate: PopulatePath);
    fn skip(&mut self, offset: i64);
    fn limit(&mut self, limit: i64);
    fn count(&mut self);
    fn distinct(&mut self, field: &str);
    fn select(&mut self, fields: &str);
    fn lean(&mut self, lean: bool);
}
