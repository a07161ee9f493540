#![allow(dead_code)]

use sieve_query::{Bson, SortDirection};
use sieve_translate::{Condition, FieldMatcher, PopulatePath, QueryBuilder, RegexPattern, SortOrder};

// ── Recording builder ──────────────────────────────────────────

/// One builder call, in the order it was issued.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Where(String),
    Equals(Bson),
    NotEquals(Bson),
    NotIn(Vec<Bson>),
    In(Vec<Bson>),
    GreaterThan(Bson),
    LessThan(Bson),
    ElementMatch(Bson),
    SizeEquals(Bson),
    Regex { source: String, options: String },
    Exists(Bson),
    Or(Vec<Condition>),
    And(Vec<Condition>),
    Sort(Vec<(String, SortDirection)>),
    Populate(PopulatePath),
    Skip(i64),
    Limit(i64),
    Count,
    Distinct(String),
    Select(String),
    Lean(bool),
}

#[derive(Debug, Default)]
pub struct RecordingBuilder {
    pub calls: Vec<Call>,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct RecordingField<'a> {
    calls: &'a mut Vec<Call>,
}

impl FieldMatcher for RecordingField<'_> {
    fn equals(self, value: Bson) {
        self.calls.push(Call::Equals(value));
    }

    fn not_equals(self, value: Bson) {
        self.calls.push(Call::NotEquals(value));
    }

    fn not_in(self, values: Vec<Bson>) {
        self.calls.push(Call::NotIn(values));
    }

    fn in_values(self, values: Vec<Bson>) {
        self.calls.push(Call::In(values));
    }

    fn greater_than(self, value: Bson) {
        self.calls.push(Call::GreaterThan(value));
    }

    fn less_than(self, value: Bson) {
        self.calls.push(Call::LessThan(value));
    }

    fn element_match(self, value: Bson) {
        self.calls.push(Call::ElementMatch(value));
    }

    fn size_equals(self, value: Bson) {
        self.calls.push(Call::SizeEquals(value));
    }

    fn regex_matches(self, pattern: RegexPattern) {
        self.calls.push(Call::Regex {
            source: pattern.source().to_string(),
            options: pattern.options().to_string(),
        });
    }

    fn exists(self, value: Bson) {
        self.calls.push(Call::Exists(value));
    }
}

impl QueryBuilder for RecordingBuilder {
    type Field<'a> = RecordingField<'a>;

    fn where_field(&mut self, name: &str) -> RecordingField<'_> {
        self.calls.push(Call::Where(name.to_string()));
        RecordingField {
            calls: &mut self.calls,
        }
    }

    fn or(&mut self, conditions: Vec<Condition>) {
        self.calls.push(Call::Or(conditions));
    }

    fn and(&mut self, conditions: Vec<Condition>) {
        self.calls.push(Call::And(conditions));
    }

    fn sort(&mut self, order: SortOrder) {
        self.calls.push(Call::Sort(order.into_iter().collect()));
    }

    fn populate(&mut self, populate: PopulatePath) {
        self.calls.push(Call::Populate(populate));
    }

    fn skip(&mut self, offset: i64) {
        self.calls.push(Call::Skip(offset));
    }

    fn limit(&mut self, limit: i64) {
        self.calls.push(Call::Limit(limit));
    }

    fn count(&mut self) {
        self.calls.push(Call::Count);
    }

    fn distinct(&mut self, field: &str) {
        self.calls.push(Call::Distinct(field.to_string()));
    }

    fn select(&mut self, fields: &str) {
        self.calls.push(Call::Select(fields.to_string()));
    }

    fn lean(&mut self, lean: bool) {
        self.calls.push(Call::Lean(lean));
    }
}

// ── Helpers ────────────────────────────────────────────────────

pub fn on(field: &str) -> Call {
    Call::Where(field.to_string())
}
