//! Author pages: list, detail, create, update and delete.
//!
//! Deleting an author leaves their books pointing at a missing record; book
//! pages render such references blank.

use locallib_db::{Filter, RecordId};
use locallib_http::{AppError, Outcome};

use super::models::{rules, Author, AuthorDraft};
use super::views::{AuthorForm, AuthorView};
use crate::catalog::{Catalog, Record};
use crate::forms::{FormData, FormMode};
use crate::modules::books::Book;
use crate::validation::FieldError;

const LIST_URL: &str = "/catalog/authors";

type AuthorOutcome = Result<Outcome<AuthorView>, AppError>;

pub struct AuthorWorkflow {
    catalog: Catalog,
}

impl AuthorWorkflow {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub async fn list(&self) -> AuthorOutcome {
        let mut authors = self.catalog.all::<Author>().await?;
        authors.sort_by(|a, b| a.family_name.cmp(&b.family_name));
        Ok(Outcome::Render(AuthorView::List { authors }))
    }

    pub async fn detail(&self, id: &RecordId) -> AuthorOutcome {
        let (author, books) = self.author_with_books(id).await?;
        let author = author.ok_or_else(|| AppError::not_found("Author not found"))?;
        Ok(Outcome::Render(AuthorView::Detail { author, books }))
    }

    pub fn create_form(&self) -> Outcome<AuthorView> {
        Outcome::Render(form(FormMode::Create, AuthorDraft::default(), Vec::new()))
    }

    pub async fn create(&self, submitted: &FormData) -> AuthorOutcome {
        let author = match candidate(submitted, FormMode::Create) {
            Ok(author) => author,
            Err(repaint) => return Ok(repaint),
        };

        let record = self.catalog.insert(author).await?;
        tracing::info!(id = %record.id, "author created");
        Ok(Outcome::Redirect(record.url()))
    }

    pub async fn update_form(&self, id: &RecordId) -> AuthorOutcome {
        let author = self
            .catalog
            .get::<Author>(id)
            .await?
            .ok_or_else(|| AppError::not_found("Author not found"))?;
        Ok(Outcome::Render(form(
            FormMode::Update,
            AuthorDraft::from(&author.data),
            Vec::new(),
        )))
    }

    pub async fn update(&self, id: &RecordId, submitted: &FormData) -> AuthorOutcome {
        let author = match candidate(submitted, FormMode::Update) {
            Ok(author) => author,
            Err(repaint) => return Ok(repaint),
        };

        let record = self
            .catalog
            .replace(id, author)
            .await?
            .ok_or_else(|| AppError::not_found("Author not found"))?;
        tracing::info!(id = %record.id, "author updated");
        Ok(Outcome::Redirect(record.url()))
    }

    pub async fn delete_form(&self, id: &RecordId) -> AuthorOutcome {
        let (author, books) = self.author_with_books(id).await?;
        Ok(match author {
            Some(author) => Outcome::Render(AuthorView::Delete { author, books }),
            None => Outcome::Redirect(LIST_URL.to_string()),
        })
    }

    pub async fn delete(&self, id: &RecordId) -> AuthorOutcome {
        if self.catalog.remove::<Author>(id).await? {
            tracing::info!(id = %id, "author deleted");
        }
        Ok(Outcome::Redirect(LIST_URL.to_string()))
    }

    async fn author_with_books(
        &self,
        id: &RecordId,
    ) -> Result<(Option<Record<Author>>, Vec<Record<Book>>), AppError> {
        let written_by = Filter::eq("author", id.as_str());
        let found = tokio::try_join!(
            self.catalog.get::<Author>(id),
            self.catalog.find::<Book>(&written_by)
        )?;
        Ok(found)
    }
}

/// Validated author, or the form page to show instead.
fn candidate(submitted: &FormData, mode: FormMode) -> Result<Author, Outcome<AuthorView>> {
    let validated = rules().validate(submitted);
    let draft = AuthorDraft::from_validated(&validated);
    if !validated.is_valid() {
        return Err(Outcome::Render(form(mode, draft, validated.into_errors())));
    }
    draft
        .to_author()
        .map_err(move |err| Outcome::Render(form(mode, draft, vec![FieldError::from(err)])))
}

fn form(mode: FormMode, draft: AuthorDraft, errors: Vec<FieldError>) -> AuthorView {
    AuthorView::Form(AuthorForm {
        mode,
        draft,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_book;

    fn workflow() -> (AuthorWorkflow, Catalog) {
        let catalog = Catalog::in_memory();
        (AuthorWorkflow::new(catalog.clone()), catalog)
    }

    #[tokio::test]
    async fn create_stores_parsed_dates() {
        let (workflow, catalog) = workflow();
        let form = FormData::from_pairs([
            ("first_name", "Isaac"),
            ("family_name", "Asimov"),
            ("date_of_birth", "1920-01-02"),
            ("date_of_death", ""),
        ]);

        let outcome = workflow.create(&form).await.unwrap();
        let authors = catalog.all::<Author>().await.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].date_of_birth_formatted(), "1920-01-02");
        assert_eq!(authors[0].date_of_death, None);
        assert!(matches!(outcome, Outcome::Redirect(location) if location == authors[0].url()));
    }

    #[tokio::test]
    async fn invalid_input_repaints_with_typed_values() {
        let (workflow, catalog) = workflow();
        let form = FormData::from_pairs([
            ("first_name", "Isaac"),
            ("family_name", ""),
            ("date_of_birth", "not a date"),
        ]);

        match workflow.create(&form).await.unwrap() {
            Outcome::Render(AuthorView::Form(form)) => {
                assert_eq!(form.draft.first_name, "Isaac");
                assert_eq!(form.draft.date_of_birth, "not a date");
                let fields: Vec<_> = form.errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["family_name", "date_of_birth"]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(catalog.all::<Author>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn apostrophes_count_once_toward_the_name_bound() {
        let (workflow, catalog) = workflow();
        let first_name = "O'".repeat(40);
        let form = FormData::from_pairs([
            ("first_name", first_name.as_str()),
            ("family_name", "Brien"),
        ]);

        let outcome = workflow.create(&form).await.unwrap();
        let authors = catalog.all::<Author>().await.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].first_name, "O&#x27;".repeat(40));
        assert!(matches!(outcome, Outcome::Redirect(location) if location == authors[0].url()));

        let at_bound = format!("{}{}", "'".repeat(50), "a".repeat(50));
        let form = FormData::from_pairs([
            ("first_name", "Flann"),
            ("family_name", at_bound.as_str()),
        ]);
        assert!(matches!(
            workflow.create(&form).await.unwrap(),
            Outcome::Redirect(_)
        ));
        assert_eq!(catalog.all::<Author>().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_update_repaints_in_update_mode() {
        let (workflow, catalog) = workflow();
        let author = catalog
            .insert(Author::new("Frank", "Herbert", None, None).unwrap())
            .await
            .unwrap();

        let form = FormData::from_pairs([
            ("first_name", " <Frank> "),
            ("family_name", ""),
            ("date_of_birth", "1920-10-08"),
        ]);
        match workflow.update(&author.id, &form).await.unwrap() {
            Outcome::Render(AuthorView::Form(form)) => {
                assert_eq!(form.mode, FormMode::Update);
                assert_eq!(form.draft.first_name, "&lt;Frank&gt;");
                assert_eq!(form.draft.date_of_birth, "1920-10-08");
                let fields: Vec<_> = form.errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["family_name"]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let stored = catalog.get::<Author>(&author.id).await.unwrap().unwrap();
        assert_eq!(stored, author);
    }

    #[tokio::test]
    async fn detail_lists_their_books() {
        let (workflow, catalog) = workflow();
        let author = catalog
            .insert(Author::new("Frank", "Herbert", None, None).unwrap())
            .await
            .unwrap();
        let mut dune = sample_book("Dune", Vec::new());
        dune.author = author.id.clone();
        catalog.insert(dune).await.unwrap();
        catalog.insert(sample_book("Other", Vec::new())).await.unwrap();

        match workflow.detail(&author.id).await.unwrap() {
            Outcome::Render(AuthorView::Detail { books, .. }) => {
                assert_eq!(books.len(), 1);
                assert_eq!(books[0].title, "Dune");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_does_not_cascade() {
        let (workflow, catalog) = workflow();
        let author = catalog
            .insert(Author::new("Frank", "Herbert", None, None).unwrap())
            .await
            .unwrap();
        let mut dune = sample_book("Dune", Vec::new());
        dune.author = author.id.clone();
        let book = catalog.insert(dune).await.unwrap();

        let outcome = workflow.delete(&author.id).await.unwrap();
        assert!(matches!(outcome, Outcome::Redirect(location) if location == LIST_URL));
        assert!(catalog.get::<Author>(&author.id).await.unwrap().is_none());
        assert!(catalog.get::<Book>(&book.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_form_prefills_dates() {
        let (workflow, catalog) = workflow();
        let author = catalog
            .insert(
                Author::new("Ben", "Bova", Some(time::macros::date!(1932 - 11 - 08)), None)
                    .unwrap(),
            )
            .await
            .unwrap();

        match workflow.update_form(&author.id).await.unwrap() {
            Outcome::Render(AuthorView::Form(form)) => {
                assert_eq!(form.mode, FormMode::Update);
                assert_eq!(form.draft.date_of_birth, "1932-11-08");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
