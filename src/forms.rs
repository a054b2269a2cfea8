//! Form bodies as submitted by the browser.
//!
//! Bodies are decoded as ordered `key=value` pairs so repeated keys (checked
//! genre boxes) survive. A field is then read either as text or, for
//! multi-valued inputs, as a [`Selection`].

use axum::extract::{Form, FromRequest, Request};
use locallib_db::RecordId;
use locallib_http::AppError;

use crate::catalog::{Entity, Record};

/// Shape a form field arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Absent,
    Single(String),
    Many(Vec<String>),
}

/// Ordered set of selected identities from a multi-valued field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Vec<String>);

impl Selection {
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|item| item == value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.0.iter().map(|item| RecordId::from(item.as_str())).collect()
    }
}

impl FromIterator<String> for Selection {
    /// Duplicates are dropped, keeping first-seen order.
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut items: Vec<String> = Vec::new();
        for item in iter {
            if !items.contains(&item) {
                items.push(item);
            }
        }
        Self(items)
    }
}

impl From<FieldValue> for Selection {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Absent => Self::default(),
            FieldValue::Single(item) => Self(vec![item]),
            FieldValue::Many(items) => items.into_iter().collect(),
        }
    }
}

impl IntoIterator for Selection {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Decoded `application/x-www-form-urlencoded` body.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn field(&self, name: &str) -> FieldValue {
        let mut values: Vec<String> = self
            .pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect();
        match values.len() {
            0 => FieldValue::Absent,
            1 => FieldValue::Single(values.remove(0)),
            _ => FieldValue::Many(values),
        }
    }

    /// First value of `name`, if present.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(Self::from_pairs(pairs))
    }
}

/// Whether a form is creating a record or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

impl FormMode {
    /// Page title such as "Create Book".
    pub fn title(self, noun: &str) -> String {
        match self {
            FormMode::Create => format!("Create {noun}"),
            FormMode::Update => format!("Update {noun}"),
        }
    }
}

/// One option of a select list or checkbox group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: RecordId,
    pub label: String,
    pub checked: bool,
}

impl Choice {
    pub fn of<T: Entity>(record: &Record<T>) -> Self {
        Self {
            id: record.id.clone(),
            label: record.label(),
            checked: false,
        }
    }
}

/// Mark every choice `is_selected` accepts as checked.
pub fn check_where(choices: &mut [Choice], is_selected: impl Fn(&RecordId) -> bool) {
    for choice in choices {
        choice.checked = is_selected(&choice.id);
    }
}
