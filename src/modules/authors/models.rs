use garde::Validate;
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::catalog::Entity;
use crate::schema::{checked, format_date, optional_date, SchemaError};
use crate::validation::{FieldRule, FormInput, Trimmed, Validated, Validator};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Names are stored escaped, so the 100 character bound applies to the
/// typed input (see [`AuthorInput`]) rather than to the stored text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Author {
    #[garde(length(min = 1))]
    pub first_name: String,
    #[garde(length(min = 1))]
    pub family_name: String,
    #[serde(default, with = "iso_date::option")]
    #[garde(skip)]
    pub date_of_birth: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    #[garde(skip)]
    pub date_of_death: Option<Date>,
}

impl Author {
    pub fn new(
        first_name: &str,
        family_name: &str,
        date_of_birth: Option<Date>,
        date_of_death: Option<Date>,
    ) -> Result<Self, SchemaError> {
        checked(Self {
            first_name: first_name.to_string(),
            family_name: family_name.to_string(),
            date_of_birth,
            date_of_death,
        })
    }

    /// "Family, First"
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Time between birth and death; `None` unless both are known.
    pub fn lifespan(&self) -> Option<Duration> {
        Some(self.date_of_death? - self.date_of_birth?)
    }

    pub fn date_of_birth_formatted(&self) -> String {
        self.date_of_birth.map(format_date).unwrap_or_default()
    }

    pub fn date_of_death_formatted(&self) -> String {
        self.date_of_death.map(format_date).unwrap_or_default()
    }

    /// "1920-01-02 - 1992-04-06"; either side may be blank.
    pub fn life_span_formatted(&self) -> String {
        format!(
            "{} - {}",
            self.date_of_birth_formatted(),
            self.date_of_death_formatted()
        )
    }
}

impl Entity for Author {
    const COLLECTION: &'static str = "authors";
    const URL_PREFIX: &'static str = "/catalog/author";

    fn label(&self) -> String {
        self.name()
    }
}

/// Trimmed author names as typed, before escaping.
#[derive(Debug, Validate)]
pub struct AuthorInput {
    #[garde(length(chars, min = 1, max = 100))]
    first_name: String,
    #[garde(length(chars, min = 1, max = 100))]
    family_name: String,
}

impl FormInput for AuthorInput {
    fn read(input: &Trimmed) -> Self {
        Self {
            first_name: input.text("first_name").to_string(),
            family_name: input.text("family_name").to_string(),
        }
    }
}

pub fn rules() -> Validator {
    Validator::new(vec![
        FieldRule::text("first_name")
            .trim()
            .missing("First name must be specified.")
            .too_long("First name must not exceed 100 characters.")
            .escape(),
        FieldRule::text("family_name")
            .trim()
            .missing("Family name must be specified.")
            .too_long("Family name must not exceed 100 characters.")
            .escape(),
        FieldRule::text("date_of_birth")
            .trim()
            .optional_date("Invalid date of birth"),
        FieldRule::text("date_of_death")
            .trim()
            .optional_date("Invalid date of death"),
    ])
    .constrained_by::<AuthorInput>()
}

/// Author form values as the user last saw them. Dates stay as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorDraft {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: String,
    pub date_of_death: String,
}

impl AuthorDraft {
    pub fn from_validated(validated: &Validated) -> Self {
        Self {
            first_name: validated.text("first_name"),
            family_name: validated.text("family_name"),
            date_of_birth: validated.text("date_of_birth"),
            date_of_death: validated.text("date_of_death"),
        }
    }

    pub fn to_author(&self) -> Result<Author, SchemaError> {
        Author::new(
            &self.first_name,
            &self.family_name,
            optional_date("date_of_birth", &self.date_of_birth)?,
            optional_date("date_of_death", &self.date_of_death)?,
        )
    }
}

impl From<&Author> for AuthorDraft {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth_formatted(),
            date_of_death: author.date_of_death_formatted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormData;
    use crate::validation::FieldError;
    use serde_json::json;
    use time::macros::date;

    fn asimov() -> Author {
        Author::new(
            "Isaac",
            "Asimov",
            Some(date!(1920 - 01 - 02)),
            Some(date!(1992 - 04 - 06)),
        )
        .unwrap()
    }

    #[test]
    fn derived_fields() {
        let author = asimov();
        assert_eq!(author.name(), "Asimov, Isaac");
        assert_eq!(author.life_span_formatted(), "1920-01-02 - 1992-04-06");
        assert_eq!(author.lifespan().map(|d| d.whole_days()), Some(26_393));
    }

    #[test]
    fn lifespan_needs_both_dates() {
        let author = Author::new("Ben", "Bova", Some(date!(1932 - 11 - 08)), None).unwrap();
        assert_eq!(author.lifespan(), None);
        assert_eq!(author.date_of_death_formatted(), "");
        assert_eq!(author.life_span_formatted(), "1932-11-08 - ");
    }

    #[test]
    fn names_are_required() {
        let err = Author::new("Ben", "", None, None).unwrap_err();
        assert_eq!(err.field(), "family_name");
    }

    #[test]
    fn escaped_names_may_exceed_the_input_bound() {
        let escaped = "O&#x27;".repeat(40);
        let author = Author::new(&escaped, "Brien", None, None).unwrap();
        assert_eq!(author.first_name.chars().count(), 280);
    }

    #[test]
    fn name_bound_counts_typed_characters() {
        let at_bound = format!("{}{}", "O'".repeat(10), "é".repeat(80));
        let form = FormData::from_pairs([
            ("first_name", at_bound.as_str()),
            ("family_name", "Brien"),
        ]);
        let validated = rules().validate(&form);
        assert!(validated.is_valid());
        assert!(AuthorDraft::from_validated(&validated).to_author().is_ok());

        let over = format!("{at_bound}x");
        let form = FormData::from_pairs([("first_name", over.as_str()), ("family_name", "B")]);
        assert_eq!(
            rules().validate(&form).into_errors(),
            vec![FieldError::new(
                "first_name",
                "First name must not exceed 100 characters."
            )]
        );
    }

    #[test]
    fn dates_serialize_as_iso_strings() {
        let value = serde_json::to_value(asimov()).unwrap();
        assert_eq!(value["date_of_birth"], json!("1920-01-02"));

        let undated: Author =
            serde_json::from_value(json!({"first_name": "Bob", "family_name": "Billings"}))
                .unwrap();
        assert_eq!(undated.date_of_birth, None);
    }

    #[test]
    fn rules_report_each_field() {
        let form = FormData::from_pairs([
            ("first_name", ""),
            ("family_name", "y".repeat(101).as_str()),
            ("date_of_birth", "1920-13-01"),
            ("date_of_death", "soon"),
        ]);
        let messages: Vec<_> = rules()
            .validate(&form)
            .into_errors()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "First name must be specified.",
                "Family name must not exceed 100 characters.",
                "Invalid date of birth",
                "Invalid date of death",
            ]
        );
    }

    #[test]
    fn draft_round_trips_through_author() {
        let draft = AuthorDraft::from(&asimov());
        assert_eq!(draft.date_of_birth, "1920-01-02");
        assert_eq!(draft.to_author().unwrap(), asimov());
    }
}
