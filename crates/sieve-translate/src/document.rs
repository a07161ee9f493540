use bson::{Bson, Document};
use sieve_query::SortDirection;

use crate::builder::{FieldMatcher, PopulatePath, QueryBuilder, SortOrder};
use crate::condition::{Condition, regex_document};
use crate::pattern::RegexPattern;

/// What the built query asks the store for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Operation {
    #[default]
    Find,
    Count,
    Distinct(String),
}

/// A [`QueryBuilder`] that renders a Mongo-style filter document plus find
/// options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    filter: Document,
    sort: Option<Document>,
    skip: Option<i64>,
    limit: Option<i64>,
    populates: Vec<PopulatePath>,
    projection: Option<String>,
    lean: bool,
    operation: Operation,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &Document {
        &self.filter
    }

    pub fn into_filter(self) -> Document {
        self.filter
    }

    /// Ordered `{field: 1 | -1}` sort document.
    pub fn sort_document(&self) -> Option<&Document> {
        self.sort.as_ref()
    }

    pub fn skip_count(&self) -> Option<i64> {
        self.skip
    }

    pub fn limit_count(&self) -> Option<i64> {
        self.limit
    }

    pub fn populates(&self) -> &[PopulatePath] {
        &self.populates
    }

    /// Space-separated projection as passed to `select`.
    pub fn projection(&self) -> Option<&str> {
        self.projection.as_deref()
    }

    /// Projection as a document: `-field` excludes, anything else includes.
    pub fn projection_document(&self) -> Option<Document> {
        let projection = self.projection.as_deref()?;
        let mut document = Document::new();
        for field in projection.split_whitespace() {
            match field.strip_prefix('-') {
                Some(excluded) => document.insert(excluded, 0),
                None => document.insert(field.trim_start_matches('+'), 1),
            };
        }
        if document.is_empty() { None } else { Some(document) }
    }

    pub fn is_lean(&self) -> bool {
        self.lean
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    fn push_group(&mut self, key: &str, conditions: Vec<Condition>) {
        if conditions.is_empty() {
            return;
        }
        let rendered = conditions
            .iter()
            .map(|condition| Bson::Document(condition.to_document()));
        match self.filter.get_mut(key) {
            Some(Bson::Array(existing)) => existing.extend(rendered),
            _ => {
                self.filter.insert(key, Bson::Array(rendered.collect()));
            }
        }
    }
}

/// Field-scoped view into a [`DocumentQuery`] filter.
pub struct DocumentField<'q> {
    filter: &'q mut Document,
    field: String,
}

impl DocumentField<'_> {
    /// Merge `entries` into the field's operator document. A plain equality
    /// value already on the field is replaced.
    fn merge(self, entries: Document) {
        if let Some(Bson::Document(operators)) = self.filter.get_mut(&self.field) {
            if operators.keys().all(|key| key.starts_with('$')) {
                for (key, value) in entries {
                    operators.insert(key, value);
                }
                return;
            }
        }
        self.filter.insert(self.field, entries);
    }

    fn operator(self, op: &str, value: Bson) {
        let mut entries = Document::new();
        entries.insert(op, value);
        self.merge(entries);
    }
}

impl FieldMatcher for DocumentField<'_> {
    fn equals(self, value: Bson) {
        self.filter.insert(self.field, value);
    }

    fn not_equals(self, value: Bson) {
        self.operator("$ne", value);
    }

    fn not_in(self, values: Vec<Bson>) {
        self.operator("$nin", Bson::Array(values));
    }

    fn in_values(self, values: Vec<Bson>) {
        self.operator("$in", Bson::Array(values));
    }

    fn greater_than(self, value: Bson) {
        self.operator("$gt", value);
    }

    fn less_than(self, value: Bson) {
        self.operator("$lt", value);
    }

    fn element_match(self, value: Bson) {
        self.operator("$elemMatch", value);
    }

    fn size_equals(self, value: Bson) {
        self.operator("$size", value);
    }

    fn regex_matches(self, pattern: RegexPattern) {
        self.merge(regex_document(&pattern));
    }

    fn exists(self, value: Bson) {
        self.operator("$exists", value);
    }
}

impl QueryBuilder for DocumentQuery {
    type Field<'a> = DocumentField<'a>;

    fn where_field(&mut self, name: &str) -> DocumentField<'_> {
        DocumentField {
            filter: &mut self.filter,
            field: name.to_string(),
        }
    }

    fn or(&mut self, conditions: Vec<Condition>) {
        self.push_group("$or", conditions);
    }

    fn and(&mut self, conditions: Vec<Condition>) {
        self.push_group("$and", conditions);
    }

    fn sort(&mut self, order: SortOrder) {
        let sort = self.sort.get_or_insert_with(Document::new);
        for (field, direction) in order {
            let value = match direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            };
            sort.insert(field, value);
        }
    }

    fn populate(&mut self, populate: PopulatePath) {
        self.populates.push(populate);
    }

    fn skip(&mut self, offset: i64) {
        self.skip = Some(offset);
    }

    fn limit(&mut self, limit: i64) {
        self.limit = Some(limit);
    }

    fn count(&mut self) {
        self.operation = Operation::Count;
    }

    fn distinct(&mut self, field: &str) {
        self.operation = Operation::Distinct(field.to_string());
    }

    fn select(&mut self, fields: &str) {
        match &mut self.projection {
            Some(projection) => {
                projection.push(' ');
                projection.push_str(fields);
            }
            None => self.projection = Some(fields.to_string()),
        }
    }

    fn lean(&mut self, lean: bool) {
        self.lean = lean;
    }
}
