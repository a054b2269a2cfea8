//! Copy pages: list, detail, create, update and delete.

use locallib_db::{RecordId, StoreError};
use locallib_http::{AppError, Outcome};

use super::models::{rules, BookInstance, BookInstanceDraft};
use super::views::{BookInstanceForm, BookInstanceView, CopySummary};
use crate::catalog::Catalog;
use crate::forms::{Choice, FormData, FormMode};
use crate::lookup::{choices, NamedFetch};
use crate::modules::books::Book;
use crate::validation::FieldError;

const LIST_URL: &str = "/catalog/bookinstances";

type CopyOutcome = Result<Outcome<BookInstanceView>, AppError>;

pub struct BookInstanceWorkflow {
    catalog: Catalog,
}

impl BookInstanceWorkflow {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub async fn list(&self) -> CopyOutcome {
        let (copies, books) = tokio::try_join!(
            self.catalog.all::<BookInstance>(),
            self.catalog.index::<Book>()
        )?;
        let copies = copies
            .into_iter()
            .map(|copy| CopySummary {
                book: books.get(&copy.book).cloned(),
                copy,
            })
            .collect();
        Ok(Outcome::Render(BookInstanceView::List { copies }))
    }

    pub async fn detail(&self, id: &RecordId) -> CopyOutcome {
        let summary = self
            .summary(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book copy not found"))?;
        Ok(Outcome::Render(BookInstanceView::Detail(summary)))
    }

    pub async fn create_form(&self) -> CopyOutcome {
        let books = self.book_choices().await?;
        Ok(self.render_form(FormMode::Create, BookInstanceDraft::default(), books, Vec::new()))
    }

    pub async fn create(&self, submitted: &FormData) -> CopyOutcome {
        let copy = match self.candidate(submitted, FormMode::Create).await? {
            Ok(copy) => copy,
            Err(repaint) => return Ok(repaint),
        };

        let record = self.catalog.insert(copy).await?;
        tracing::info!(id = %record.id, book = %record.book, "book copy created");
        Ok(Outcome::Redirect(record.url()))
    }

    pub async fn update_form(&self, id: &RecordId) -> CopyOutcome {
        let (copy, books) = tokio::try_join!(
            self.catalog.get::<BookInstance>(id),
            self.book_choices()
        )?;
        let copy = copy.ok_or_else(|| AppError::not_found("Book copy not found"))?;
        Ok(self.render_form(
            FormMode::Update,
            BookInstanceDraft::from(&copy.data),
            books,
            Vec::new(),
        ))
    }

    pub async fn update(&self, id: &RecordId, submitted: &FormData) -> CopyOutcome {
        let copy = match self.candidate(submitted, FormMode::Update).await? {
            Ok(copy) => copy,
            Err(repaint) => return Ok(repaint),
        };

        let record = self
            .catalog
            .replace(id, copy)
            .await?
            .ok_or_else(|| AppError::not_found("Book copy not found"))?;
        tracing::info!(id = %record.id, "book copy updated");
        Ok(Outcome::Redirect(record.url()))
    }

    pub async fn delete_form(&self, id: &RecordId) -> CopyOutcome {
        Ok(match self.summary(id).await? {
            Some(summary) => Outcome::Render(BookInstanceView::Delete(summary)),
            None => Outcome::Redirect(LIST_URL.to_string()),
        })
    }

    pub async fn delete(&self, id: &RecordId) -> CopyOutcome {
        if self.catalog.remove::<BookInstance>(id).await? {
            tracing::info!(id = %id, "book copy deleted");
        }
        Ok(Outcome::Redirect(LIST_URL.to_string()))
    }

    async fn summary(&self, id: &RecordId) -> Result<Option<CopySummary>, StoreError> {
        let Some(copy) = self.catalog.get::<BookInstance>(id).await? else {
            return Ok(None);
        };
        let book = self.catalog.get::<Book>(&copy.book).await?;
        Ok(Some(CopySummary { copy, book }))
    }

    async fn book_choices(&self) -> Result<Vec<Choice>, StoreError> {
        let mut results = NamedFetch::new()
            .with("books", choices::<Book>(self.catalog.clone()))
            .run()
            .await?;
        Ok(results.take("books").unwrap_or_default())
    }

    /// Validated copy, or the repainted form. Only a store failure while
    /// fetching the form's book list is an error.
    async fn candidate(
        &self,
        submitted: &FormData,
        mode: FormMode,
    ) -> Result<Result<BookInstance, Outcome<BookInstanceView>>, StoreError> {
        let validated = rules().validate(submitted);
        let draft = BookInstanceDraft::from_validated(&validated);
        let errors = if validated.is_valid() {
            match draft.to_instance() {
                Ok(copy) => return Ok(Ok(copy)),
                Err(err) => vec![FieldError::from(err)],
            }
        } else {
            validated.into_errors()
        };

        let books = self.book_choices().await?;
        Ok(Err(self.render_form(mode, draft, books, errors)))
    }

    fn render_form(
        &self,
        mode: FormMode,
        draft: BookInstanceDraft,
        books: Vec<Choice>,
        errors: Vec<FieldError>,
    ) -> Outcome<BookInstanceView> {
        Outcome::Render(BookInstanceView::Form(BookInstanceForm::new(
            mode, draft, books, errors,
        )))
    }
}
