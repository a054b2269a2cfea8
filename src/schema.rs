//! Field constraints enforced when an entity value is constructed.
//!
//! Entities derive `garde::Validate`; [`checked`] runs those constraints and
//! reports the first violation.

use garde::Validate;
use locallib_db::RecordId;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

/// `YYYY-MM-DD`, the format of date inputs and stored dates.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Rejected entity construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{field}: {message}")]
    Invalid { field: String, message: String },

    #[error("{field} is not a valid date")]
    InvalidDate { field: &'static str },

    #[error("{field} has unknown value '{value}'")]
    Unknown { field: &'static str, value: String },
}

impl SchemaError {
    pub fn field(&self) -> &str {
        match self {
            SchemaError::Invalid { field, .. } => field,
            SchemaError::InvalidDate { field } | SchemaError::Unknown { field, .. } => field,
        }
    }
}

/// `value`, if it satisfies its derived constraints.
pub fn checked<T: Validate<Context = ()>>(value: T) -> Result<T, SchemaError> {
    let Err(report) = value.validate() else {
        return Ok(value);
    };
    let error = match report.iter().next() {
        Some((path, error)) => SchemaError::Invalid {
            field: path.to_string(),
            message: error.message().to_string(),
        },
        None => SchemaError::Invalid {
            field: String::new(),
            message: report.to_string(),
        },
    };
    Err(error)
}

/// Custom `garde` rule: a reference must name a record.
pub fn reference(id: &RecordId, _ctx: &()) -> garde::Result {
    if id.as_str().trim().is_empty() {
        return Err(garde::Error::new("must reference a record"));
    }
    Ok(())
}

/// Empty input means no date.
pub fn optional_date(field: &'static str, value: &str) -> Result<Option<Date>, SchemaError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    Date::parse(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| SchemaError::InvalidDate { field })
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[derive(Debug, Validate)]
    struct Shelf {
        #[garde(length(min = 1))]
        label: String,
        #[garde(custom(reference))]
        room: RecordId,
    }

    #[test]
    fn checked_reports_first_violation() {
        let shelf = Shelf {
            label: String::new(),
            room: RecordId::from(""),
        };
        let err = checked(shelf).unwrap_err();
        assert_eq!(err.field(), "label");

        let shelf = Shelf {
            label: "A".to_string(),
            room: RecordId::from(" "),
        };
        assert_eq!(
            checked(shelf).unwrap_err(),
            SchemaError::Invalid {
                field: "room".to_string(),
                message: "must reference a record".to_string(),
            }
        );
    }

    #[test]
    fn checked_passes_valid_values_through() {
        let shelf = Shelf {
            label: "A".to_string(),
            room: RecordId::from("r1"),
        };
        assert_eq!(checked(shelf).unwrap().label, "A");
    }

    #[test]
    fn optional_date_parses_iso_dates() {
        assert_eq!(optional_date("due_back", "").unwrap(), None);
        assert_eq!(
            optional_date("due_back", "2026-10-16").unwrap(),
            Some(date!(2026 - 10 - 16))
        );
        assert_eq!(
            optional_date("due_back", "16/10/2026"),
            Err(SchemaError::InvalidDate { field: "due_back" })
        );
    }

    #[test]
    fn dates_format_as_iso() {
        assert_eq!(format_date(date!(1920 - 01 - 02)), "1920-01-02");
    }
}
