use serde_json::Value;

use crate::Body;

/// Selection criteria for collection reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every document in the collection.
    #[default]
    All,
    /// Documents whose fields all equal the given string values.
    ///
    /// A field holding an array matches when any element equals the value,
    /// so `Filter::eq("genre", id)` finds books tagged with that genre.
    Eq(Vec<(String, String)>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Eq(vec![(field.into(), value.into())])
    }

    /// Add another equality condition.
    pub fn and(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let condition = (field.into(), value.into());
        match self {
            Self::All => Self::Eq(vec![condition]),
            Self::Eq(mut conditions) => {
                conditions.push(condition);
                Self::Eq(conditions)
            }
        }
    }

    pub fn matches(&self, body: &Body) -> bool {
        match self {
            Self::All => true,
            Self::Eq(conditions) => conditions
                .iter()
                .all(|(field, expected)| field_matches(body.get(field), expected)),
        }
    }
}

fn field_matches(value: Option<&Value>, expected: &str) -> bool {
    match value {
        Some(Value::String(actual)) => actual == expected,
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| matches!(item, Value::String(actual) if actual == expected)),
        _ => false,
    }
}
