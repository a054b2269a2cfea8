use garde::Validate;
use locallib_db::RecordId;
use serde::{Deserialize, Serialize};

use crate::catalog::Entity;
use crate::forms::Selection;
use crate::schema::{checked, reference, SchemaError};
use crate::validation::{FieldRule, FormInput, Trimmed, Validated, Validator};

/// A catalogued title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Book {
    #[garde(length(min = 1))]
    pub title: String,
    /// Identity of the author record
    #[garde(custom(reference))]
    pub author: RecordId,
    #[garde(length(min = 1))]
    pub summary: String,
    #[garde(length(min = 1))]
    pub isbn: String,
    /// Genre identities, in the order they were chosen
    #[serde(default)]
    #[garde(skip)]
    pub genre: Vec<RecordId>,
}

impl Book {
    pub fn new(
        title: &str,
        author: &str,
        summary: &str,
        isbn: &str,
        genre: Vec<RecordId>,
    ) -> Result<Self, SchemaError> {
        checked(Self {
            title: title.to_string(),
            author: RecordId::from(author),
            summary: summary.to_string(),
            isbn: isbn.to_string(),
            genre,
        })
    }
}

impl Entity for Book {
    const COLLECTION: &'static str = "books";
    const URL_PREFIX: &'static str = "/catalog/book";

    fn label(&self) -> String {
        self.title.clone()
    }
}

/// Trimmed book fields as typed, before escaping.
#[derive(Debug, Validate)]
pub struct BookInput {
    #[garde(length(min = 1))]
    title: String,
    #[garde(length(min = 1))]
    author: String,
    #[garde(length(min = 1))]
    summary: String,
    #[garde(length(min = 1))]
    isbn: String,
}

impl FormInput for BookInput {
    fn read(input: &Trimmed) -> Self {
        Self {
            title: input.text("title").to_string(),
            author: input.text("author").to_string(),
            summary: input.text("summary").to_string(),
            isbn: input.text("isbn").to_string(),
        }
    }
}

pub fn rules() -> Validator {
    Validator::new(vec![
        FieldRule::text("title")
            .trim()
            .missing("Title must not be empty")
            .escape(),
        FieldRule::text("author")
            .trim()
            .missing("Author must not be empty")
            .escape(),
        FieldRule::text("summary")
            .trim()
            .missing("Summary must not be empty")
            .escape(),
        FieldRule::text("isbn")
            .trim()
            .missing("ISBN must not be empty")
            .escape(),
        FieldRule::list("genre").escape(),
    ])
    .constrained_by::<BookInput>()
}

/// Book form values as the user last saw them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub isbn: String,
    pub genre: Selection,
}

impl BookDraft {
    pub fn from_validated(validated: &Validated) -> Self {
        Self {
            title: validated.text("title"),
            author: validated.text("author"),
            summary: validated.text("summary"),
            isbn: validated.text("isbn"),
            genre: validated.selection("genre"),
        }
    }

    pub fn to_book(&self) -> Result<Book, SchemaError> {
        Book::new(
            &self.title,
            &self.author,
            &self.summary,
            &self.isbn,
            self.genre.ids(),
        )
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.iter().map(RecordId::to_string).collect(),
        }
    }
}
