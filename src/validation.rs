//! Ordered per-field validation and sanitization of form input.
//!
//! Each field is trimmed, checked, then escaped. Required and length
//! constraints are declared with `garde` on a per-form input type and run
//! against the trimmed text, before escaping can change its length. Every
//! field is checked even after earlier fields failed, and the re-rendered
//! form echoes the sanitized value.

use std::collections::HashMap;

use garde::{Report, Validate};
use time::Date;

use crate::forms::{FormData, Selection};
use crate::schema::{SchemaError, DATE_FORMAT};

/// A problem with one submitted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<SchemaError> for FieldError {
    fn from(err: SchemaError) -> Self {
        Self::new(err.field(), err.to_string())
    }
}

/// Trimmed, not yet escaped, single-valued fields of a submission.
#[derive(Debug, Default)]
pub struct Trimmed {
    values: HashMap<&'static str, String>,
}

impl Trimmed {
    /// Empty when no rule covered `field`.
    pub fn text(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }
}

/// Constraint set of one form, read from its trimmed input.
pub trait FormInput: Validate<Context = ()> {
    fn read(input: &Trimmed) -> Self;
}

type Constraints = fn(&Trimmed) -> Result<(), Report>;

fn check_input<C: FormInput>(input: &Trimmed) -> Result<(), Report> {
    C::read(input).validate()
}

#[derive(Debug, Clone)]
enum Check {
    OptionalDate(&'static str),
    OneOf(&'static [&'static str], &'static str),
}

impl Check {
    fn failure(&self, value: &str) -> Option<&'static str> {
        match self {
            Check::OptionalDate(message) => {
                (!value.is_empty() && Date::parse(value, DATE_FORMAT).is_err()).then_some(*message)
            }
            Check::OneOf(options, message) => {
                (!value.is_empty() && !options.iter().any(|option| *option == value))
                    .then_some(*message)
            }
        }
    }
}

/// Rule chain for one field: trim, constraint messages, checks, escape.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: &'static str,
    list: bool,
    trim: bool,
    escape: bool,
    missing: Option<&'static str>,
    too_long: Option<&'static str>,
    checks: Vec<Check>,
}

impl FieldRule {
    fn new(field: &'static str, list: bool) -> Self {
        Self {
            field,
            list,
            trim: false,
            escape: false,
            missing: None,
            too_long: None,
            checks: Vec::new(),
        }
    }

    /// Single-valued field.
    pub fn text(field: &'static str) -> Self {
        Self::new(field, false)
    }

    /// Multi-valued field; the chain runs on every element.
    pub fn list(field: &'static str) -> Self {
        Self::new(field, true)
    }

    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    /// Message shown when the field's constraints fail on empty input.
    pub fn missing(mut self, message: &'static str) -> Self {
        self.missing = Some(message);
        self
    }

    /// Message shown when the field's constraints fail on non-empty input.
    pub fn too_long(mut self, message: &'static str) -> Self {
        self.too_long = Some(message);
        self
    }

    /// `YYYY-MM-DD` or empty.
    pub fn optional_date(mut self, message: &'static str) -> Self {
        self.checks.push(Check::OptionalDate(message));
        self
    }

    /// One of `options`, or empty.
    pub fn one_of(mut self, options: &'static [&'static str], message: &'static str) -> Self {
        self.checks.push(Check::OneOf(options, message));
        self
    }

    /// Encode characters that carry meaning in HTML.
    pub fn escape(mut self) -> Self {
        self.escape = true;
        self
    }

    fn prepare(&self, raw: &str) -> String {
        if self.trim {
            raw.trim().to_string()
        } else {
            raw.to_string()
        }
    }

    fn failure(&self, value: &str) -> Option<&'static str> {
        self.checks.iter().find_map(|check| check.failure(value))
    }

    fn finish(&self, value: &str) -> String {
        if self.escape {
            escape_input(value)
        } else {
            value.to_string()
        }
    }

    /// Message for a constraint violation reported on this field.
    fn violation(&self, value: &str, reported: &str) -> String {
        let message = if value.is_empty() {
            self.missing
        } else {
            self.too_long
        };
        message.unwrap_or(reported).to_string()
    }
}

/// Ordered rule set for one form.
#[derive(Clone)]
pub struct Validator {
    rules: Vec<FieldRule>,
    constraints: Option<Constraints>,
}

impl Validator {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self {
            rules,
            constraints: None,
        }
    }

    /// Check the trimmed input against the constraints derived on `C`.
    pub fn constrained_by<C: FormInput>(mut self) -> Self {
        self.constraints = Some(check_input::<C>);
        self
    }

    pub fn validate(&self, form: &FormData) -> Validated {
        let trimmed = Trimmed {
            values: self
                .rules
                .iter()
                .filter(|rule| !rule.list)
                .map(|rule| {
                    let raw = form.text(rule.field).unwrap_or_default();
                    (rule.field, rule.prepare(raw))
                })
                .collect(),
        };
        let checked = self.constraints.map(|check| check(&trimmed));
        let violations: Vec<(String, String)> = match checked {
            Some(Err(report)) => report
                .iter()
                .map(|(path, error)| (path.to_string(), error.message().to_string()))
                .collect(),
            _ => Vec::new(),
        };

        let mut validated = Validated::default();
        for rule in &self.rules {
            if rule.list {
                let mut failure = None;
                let items: Selection = Selection::from(form.field(rule.field))
                    .into_iter()
                    .map(|raw| {
                        let value = rule.prepare(&raw);
                        failure = failure.or_else(|| rule.failure(&value));
                        rule.finish(&value)
                    })
                    .collect();
                if let Some(message) = failure {
                    validated.errors.push(FieldError::new(rule.field, message));
                }
                validated.lists.insert(rule.field, items);
            } else {
                let value = trimmed.text(rule.field);
                let failure = violations
                    .iter()
                    .find(|(field, _)| field == rule.field)
                    .map(|(_, reported)| rule.violation(value, reported))
                    .or_else(|| rule.failure(value).map(str::to_string));
                if let Some(message) = failure {
                    validated.errors.push(FieldError::new(rule.field, message));
                }
                validated.values.insert(rule.field, rule.finish(value));
            }
        }

        validated
    }
}

/// Sanitized values plus every error found.
#[derive(Debug, Clone, Default)]
pub struct Validated {
    values: HashMap<&'static str, String>,
    lists: HashMap<&'static str, Selection>,
    errors: Vec<FieldError>,
}

impl Validated {
    /// Sanitized text of `field`, empty when no rule covered it.
    pub fn text(&self, field: &str) -> String {
        self.values.get(field).cloned().unwrap_or_default()
    }

    pub fn selection(&self, field: &str) -> Selection {
        self.lists.get(field).cloned().unwrap_or_default()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// HTML-escape user input before it is stored.
pub fn escape_input(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(ch),
        }
    }
    out
}
