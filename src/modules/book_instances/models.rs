use std::fmt;
use std::str::FromStr;

use garde::Validate;
use locallib_db::RecordId;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::catalog::Entity;
use crate::schema::{checked, format_date, optional_date, reference, SchemaError};
use crate::validation::{FieldRule, FormInput, Trimmed, Validated, Validator};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Whether a copy can be borrowed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoanStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Available,
        LoanStatus::Maintenance,
        LoanStatus::Loaned,
        LoanStatus::Reserved,
    ];

    pub const NAMES: &'static [&'static str] = &["Available", "Maintenance", "Loaned", "Reserved"];

    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Available => "Available",
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::Loaned => "Loaned",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = SchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        LoanStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| SchemaError::Unknown {
                field: "status",
                value: value.to_string(),
            })
    }
}

/// A physical copy of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BookInstance {
    #[garde(custom(reference))]
    pub book: RecordId,
    #[garde(length(min = 1))]
    pub imprint: String,
    #[serde(default)]
    #[garde(skip)]
    pub status: LoanStatus,
    #[serde(default = "today", with = "iso_date")]
    #[garde(skip)]
    pub due_back: Date,
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

impl BookInstance {
    /// `due_back` defaults to today.
    pub fn new(
        book: &str,
        imprint: &str,
        status: LoanStatus,
        due_back: Option<Date>,
    ) -> Result<Self, SchemaError> {
        checked(Self {
            book: RecordId::from(book),
            imprint: imprint.to_string(),
            status,
            due_back: due_back.unwrap_or_else(today),
        })
    }

    /// "October 16th, 2026"
    pub fn due_back_formatted(&self) -> String {
        let day = self.due_back.day();
        format!(
            "{} {day}{}, {}",
            self.due_back.month(),
            ordinal_suffix(day),
            self.due_back.year()
        )
    }
}

fn ordinal_suffix(day: u8) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

impl Entity for BookInstance {
    const COLLECTION: &'static str = "bookinstances";
    const URL_PREFIX: &'static str = "/catalog/bookinstance";

    fn label(&self) -> String {
        self.imprint.clone()
    }
}

#[derive(Debug, Validate)]
pub struct BookInstanceInput {
    #[garde(length(min = 1))]
    book: String,
    #[garde(length(min = 1))]
    imprint: String,
}

impl FormInput for BookInstanceInput {
    fn read(input: &Trimmed) -> Self {
        Self {
            book: input.text("book").to_string(),
            imprint: input.text("imprint").to_string(),
        }
    }
}

pub fn rules() -> Validator {
    Validator::new(vec![
        FieldRule::text("book")
            .trim()
            .missing("Book must be specified")
            .escape(),
        FieldRule::text("imprint")
            .trim()
            .missing("Imprint must be specified")
            .escape(),
        FieldRule::text("status")
            .trim()
            .one_of(LoanStatus::NAMES, "Invalid status"),
        FieldRule::text("due_back").trim().optional_date("Invalid date"),
    ])
    .constrained_by::<BookInstanceInput>()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookInstanceDraft {
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: String,
}

impl BookInstanceDraft {
    pub fn from_validated(validated: &Validated) -> Self {
        Self {
            book: validated.text("book"),
            imprint: validated.text("imprint"),
            status: validated.text("status"),
            due_back: validated.text("due_back"),
        }
    }

    /// An empty status means the default, `Maintenance`.
    pub fn to_instance(&self) -> Result<BookInstance, SchemaError> {
        let status = if self.status.is_empty() {
            LoanStatus::default()
        } else {
            self.status.parse()?
        };
        BookInstance::new(
            &self.book,
            &self.imprint,
            status,
            optional_date("due_back", &self.due_back)?,
        )
    }
}

impl From<&BookInstance> for BookInstanceDraft {
    fn from(copy: &BookInstance) -> Self {
        Self {
            book: copy.book.to_string(),
            imprint: copy.imprint.clone(),
            status: copy.status.to_string(),
            due_back: format_date(copy.due_back),
        }
    }
}
