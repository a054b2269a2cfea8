//! The book pages. Every operation ends in exactly one rendered view or one
//! redirect; store failures propagate to the error page untouched.

use locallib_db::{Filter, RecordId, StoreError};
use locallib_http::{AppError, Outcome};

use super::models::{rules, Book, BookDraft};
use super::views::{BookDetail, BookForm, BookSummary, BookView};
use crate::catalog::Catalog;
use crate::forms::{Choice, FormData, FormMode};
use crate::lookup::{choices, NamedFetch};
use crate::modules::authors::Author;
use crate::modules::book_instances::BookInstance;
use crate::modules::genres::Genre;
use crate::validation::FieldError;

const LIST_URL: &str = "/catalog/books";

type BookOutcome = Result<Outcome<BookView>, AppError>;

/// Reference lists a book form needs.
struct FormLookups {
    authors: Vec<Choice>,
    genres: Vec<Choice>,
}

pub struct BookWorkflow {
    catalog: Catalog,
}

impl BookWorkflow {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub async fn list(&self) -> BookOutcome {
        let (books, authors) = tokio::try_join!(
            self.catalog.all::<Book>(),
            self.catalog.index::<Author>()
        )?;
        let books = books
            .into_iter()
            .map(|book| BookSummary {
                author: authors.get(&book.author).cloned(),
                book,
            })
            .collect();
        Ok(Outcome::Render(BookView::List { books }))
    }

    pub async fn detail(&self, id: &RecordId) -> BookOutcome {
        let detail = self
            .load_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book not found"))?;
        Ok(Outcome::Render(BookView::Detail(detail)))
    }

    pub async fn create_form(&self) -> BookOutcome {
        let lookups = self.form_lookups().await?;
        Ok(render_form(FormMode::Create, BookDraft::default(), lookups, Vec::new()))
    }

    pub async fn create(&self, submitted: &FormData) -> BookOutcome {
        let book = match self.candidate(submitted, FormMode::Create).await? {
            Ok(book) => book,
            Err(repaint) => return Ok(repaint),
        };

        let record = self.catalog.insert(book).await?;
        tracing::info!(id = %record.id, title = %record.title, "book created");
        Ok(Outcome::Redirect(record.url()))
    }

    pub async fn update_form(&self, id: &RecordId) -> BookOutcome {
        let (book, lookups) =
            tokio::try_join!(self.catalog.get::<Book>(id), self.form_lookups())?;
        let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;
        Ok(render_form(
            FormMode::Update,
            BookDraft::from(&book.data),
            lookups,
            Vec::new(),
        ))
    }

    /// The replacement keeps the identity from the path.
    pub async fn update(&self, id: &RecordId, submitted: &FormData) -> BookOutcome {
        let book = match self.candidate(submitted, FormMode::Update).await? {
            Ok(book) => book,
            Err(repaint) => return Ok(repaint),
        };

        let record = self
            .catalog
            .replace(id, book)
            .await?
            .ok_or_else(|| AppError::not_found("Book not found"))?;
        tracing::info!(id = %record.id, "book updated");
        Ok(Outcome::Redirect(record.url()))
    }

    pub async fn delete_form(&self, id: &RecordId) -> BookOutcome {
        Ok(match self.load_detail(id).await? {
            Some(detail) => Outcome::Render(BookView::Delete(detail)),
            None => Outcome::Redirect(LIST_URL.to_string()),
        })
    }

    /// Removing an absent book is not an error.
    pub async fn delete(&self, id: &RecordId) -> BookOutcome {
        if self.catalog.remove::<Book>(id).await? {
            tracing::info!(id = %id, "book deleted");
        } else {
            tracing::debug!(id = %id, "book already absent");
        }
        Ok(Outcome::Redirect(LIST_URL.to_string()))
    }

    async fn load_detail(&self, id: &RecordId) -> Result<Option<BookDetail>, StoreError> {
        let copies_of = Filter::eq("book", id.as_str());
        let (book, copies) = tokio::try_join!(
            self.catalog.get::<Book>(id),
            self.catalog.find::<BookInstance>(&copies_of)
        )?;
        let Some(book) = book else {
            return Ok(None);
        };

        let (author, genres) = tokio::try_join!(
            self.catalog.get::<Author>(&book.author),
            self.catalog.resolve::<Genre>(&book.genre)
        )?;
        Ok(Some(BookDetail {
            book,
            author,
            genres,
            copies,
        }))
    }

    async fn form_lookups(&self) -> Result<FormLookups, StoreError> {
        let mut results = NamedFetch::new()
            .with("authors", choices::<Author>(self.catalog.clone()))
            .with("genres", choices::<Genre>(self.catalog.clone()))
            .run()
            .await?;
        Ok(FormLookups {
            authors: results.take("authors").unwrap_or_default(),
            genres: results.take("genres").unwrap_or_default(),
        })
    }

    /// Validated book, or the repainted form. Only a store failure while
    /// fetching the lookups is an error.
    async fn candidate(
        &self,
        submitted: &FormData,
        mode: FormMode,
    ) -> Result<Result<Book, Outcome<BookView>>, StoreError> {
        let validated = rules().validate(submitted);
        let draft = BookDraft::from_validated(&validated);
        let errors = if validated.is_valid() {
            match draft.to_book() {
                Ok(book) => return Ok(Ok(book)),
                Err(err) => vec![FieldError::from(err)],
            }
        } else {
            validated.into_errors()
        };

        tracing::debug!(errors = errors.len(), "book form rejected");
        let lookups = self.form_lookups().await?;
        Ok(Err(render_form(mode, draft, lookups, errors)))
    }
}

fn render_form(
    mode: FormMode,
    draft: BookDraft,
    lookups: FormLookups,
    errors: Vec<FieldError>,
) -> Outcome<BookView> {
    Outcome::Render(BookView::Form(BookForm::new(
        mode,
        draft,
        lookups.authors,
        lookups.genres,
        errors,
    )))
}
