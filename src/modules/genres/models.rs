use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::catalog::Entity;
use crate::schema::{checked, SchemaError};
use crate::validation::{FieldRule, FormInput, Trimmed, Validated, Validator};

/// A category books can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Genre {
    #[garde(length(min = 1))]
    pub name: String,
}

impl Genre {
    pub fn new(name: &str) -> Result<Self, SchemaError> {
        checked(Self {
            name: name.to_string(),
        })
    }
}

impl Entity for Genre {
    const COLLECTION: &'static str = "genres";
    const URL_PREFIX: &'static str = "/catalog/genre";

    fn label(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Validate)]
pub struct GenreInput {
    #[garde(length(min = 1))]
    name: String,
}

impl FormInput for GenreInput {
    fn read(input: &Trimmed) -> Self {
        Self {
            name: input.text("name").to_string(),
        }
    }
}

/// Form rules for genre create and update.
pub fn rules() -> Validator {
    Validator::new(vec![FieldRule::text("name")
        .trim()
        .missing("Genre name required")
        .escape()])
    .constrained_by::<GenreInput>()
}

/// Genre form values as the user last saw them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreDraft {
    pub name: String,
}

impl GenreDraft {
    pub fn from_validated(validated: &Validated) -> Self {
        Self {
            name: validated.text("name"),
        }
    }

    pub fn to_genre(&self) -> Result<Genre, SchemaError> {
        Genre::new(&self.name)
    }
}

impl From<&Genre> for GenreDraft {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormData;

    #[test]
    fn name_is_required() {
        assert_eq!(Genre::new("").unwrap_err().field(), "name");
    }

    #[test]
    fn rules_report_missing_name() {
        let validated = rules().validate(&FormData::from_pairs([("name", "  ")]));
        assert_eq!(validated.errors()[0].message, "Genre name required");
    }

    #[test]
    fn draft_carries_escaped_name() {
        let validated = rules().validate(&FormData::from_pairs([("name", " Sci-Fi & <Fantasy> ")]));
        let draft = GenreDraft::from_validated(&validated);
        assert_eq!(draft.name, "Sci-Fi &amp; &lt;Fantasy&gt;");
        assert_eq!(draft.to_genre().unwrap().name, draft.name);
    }
}
