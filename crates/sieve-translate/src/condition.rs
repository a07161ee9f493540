use bson::{Bson, Document, doc};

use crate::pattern::RegexPattern;

/// One single-field entry of a boolean group (`$or` / `$and`).
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub predicate: ConditionPredicate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionPredicate {
    Equals(Bson),
    NotEquals(Bson),
    /// Passed through as given; a scalar is not wrapped in an array here.
    In(Bson),
    ElementMatch(Bson),
    SizeEquals(Bson),
    Regex(RegexPattern),
}

impl Condition {
    pub fn new(field: impl Into<String>, predicate: ConditionPredicate) -> Self {
        Self {
            field: field.into(),
            predicate,
        }
    }

    /// Render as a Mongo-style condition document, e.g. `{ "b": { "$size": 3 } }`.
    pub fn to_document(&self) -> Document {
        let value = match &self.predicate {
            ConditionPredicate::Equals(v) => v.clone(),
            ConditionPredicate::NotEquals(v) => Bson::Document(doc! { "$ne": v.clone() }),
            ConditionPredicate::In(v) => Bson::Document(doc! { "$in": v.clone() }),
            ConditionPredicate::ElementMatch(v) => {
                Bson::Document(doc! { "$elemMatch": v.clone() })
            }
            ConditionPredicate::SizeEquals(v) => Bson::Document(doc! { "$size": v.clone() }),
            ConditionPredicate::Regex(pattern) => Bson::Document(regex_document(pattern)),
        };
        let mut document = Document::new();
        document.insert(self.field.clone(), value);
        document
    }
}

pub(crate) fn regex_document(pattern: &RegexPattern) -> Document {
    let mut document = doc! { "$regex": pattern.source() };
    if !pattern.options().is_empty() {
        document.insert("$options", pattern.options());
    }
    document
}
