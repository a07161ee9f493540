use serde::{Deserialize, Serialize};

/// Request to resolve a reference field into its related document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Populate {
    pub field_name: String,
    /// Child fields to keep on the related document. `None` or empty keeps
    /// the whole document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_field_names: Option<Vec<String>>,
}

impl Populate {
    pub fn new(field_name: impl Into<String>, children_field_names: Option<Vec<String>>) -> Self {
        Self {
            field_name: field_name.into(),
            children_field_names,
        }
    }

    /// Space-joined child projection, or `None` for a full populate.
    pub fn projection(&self) -> Option<String> {
        match &self.children_field_names {
            Some(children) if !children.is_empty() => Some(children.join(" ")),
            _ => None,
        }
    }
}
