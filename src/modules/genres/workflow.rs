//! Genre pages: list, detail, create, update and delete.

use locallib_db::{Filter, RecordId};
use locallib_http::{AppError, Outcome};

use super::models::{rules, Genre, GenreDraft};
use super::views::{GenreForm, GenreView};
use crate::catalog::{Catalog, Record};
use crate::forms::{FormData, FormMode};
use crate::modules::books::Book;
use crate::validation::FieldError;

const LIST_URL: &str = "/catalog/genres";

type GenreOutcome = Result<Outcome<GenreView>, AppError>;

pub struct GenreWorkflow {
    catalog: Catalog,
}

impl GenreWorkflow {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub async fn list(&self) -> GenreOutcome {
        let mut genres = self.catalog.all::<Genre>().await?;
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Outcome::Render(GenreView::List { genres }))
    }

    pub async fn detail(&self, id: &RecordId) -> GenreOutcome {
        let (genre, books) = self.genre_with_books(id).await?;
        let genre = genre.ok_or_else(|| AppError::not_found("Genre not found"))?;
        Ok(Outcome::Render(GenreView::Detail { genre, books }))
    }

    pub fn create_form(&self) -> Outcome<GenreView> {
        Outcome::Render(form(FormMode::Create, GenreDraft::default(), Vec::new()))
    }

    /// A genre whose name already exists is not inserted twice; the user is
    /// sent to the existing one.
    pub async fn create(&self, submitted: &FormData) -> GenreOutcome {
        let genre = match self.candidate(submitted, FormMode::Create) {
            Ok(genre) => genre,
            Err(repaint) => return Ok(repaint),
        };

        let existing = self
            .catalog
            .find::<Genre>(&Filter::eq("name", genre.name.as_str()))
            .await?;
        if let Some(existing) = existing.into_iter().next() {
            tracing::debug!(id = %existing.id, "genre already exists");
            return Ok(Outcome::Redirect(existing.url()));
        }

        let record = self.catalog.insert(genre).await?;
        tracing::info!(id = %record.id, "genre created");
        Ok(Outcome::Redirect(record.url()))
    }

    pub async fn update_form(&self, id: &RecordId) -> GenreOutcome {
        let genre = self
            .catalog
            .get::<Genre>(id)
            .await?
            .ok_or_else(|| AppError::not_found("Genre not found"))?;
        Ok(Outcome::Render(form(
            FormMode::Update,
            GenreDraft::from(&genre.data),
            Vec::new(),
        )))
    }

    pub async fn update(&self, id: &RecordId, submitted: &FormData) -> GenreOutcome {
        let genre = match self.candidate(submitted, FormMode::Update) {
            Ok(genre) => genre,
            Err(repaint) => return Ok(repaint),
        };

        let record = self
            .catalog
            .replace(id, genre)
            .await?
            .ok_or_else(|| AppError::not_found("Genre not found"))?;
        tracing::info!(id = %record.id, "genre updated");
        Ok(Outcome::Redirect(record.url()))
    }

    pub async fn delete_form(&self, id: &RecordId) -> GenreOutcome {
        let (genre, books) = self.genre_with_books(id).await?;
        Ok(match genre {
            Some(genre) => Outcome::Render(GenreView::Delete { genre, books }),
            None => Outcome::Redirect(LIST_URL.to_string()),
        })
    }

    pub async fn delete(&self, id: &RecordId) -> GenreOutcome {
        if self.catalog.remove::<Genre>(id).await? {
            tracing::info!(id = %id, "genre deleted");
        }
        Ok(Outcome::Redirect(LIST_URL.to_string()))
    }

    async fn genre_with_books(
        &self,
        id: &RecordId,
    ) -> Result<(Option<Record<Genre>>, Vec<Record<Book>>), AppError> {
        let tagged = Filter::eq("genre", id.as_str());
        let found = tokio::try_join!(
            self.catalog.get::<Genre>(id),
            self.catalog.find::<Book>(&tagged)
        )?;
        Ok(found)
    }

    /// Validated genre, or the form page to show instead.
    fn candidate(&self, submitted: &FormData, mode: FormMode) -> Result<Genre, Outcome<GenreView>> {
        let validated = rules().validate(submitted);
        let draft = GenreDraft::from_validated(&validated);
        if !validated.is_valid() {
            return Err(Outcome::Render(form(mode, draft, validated.into_errors())));
        }
        draft
            .to_genre()
            .map_err(move |err| Outcome::Render(form(mode, draft, vec![FieldError::from(err)])))
    }
}

fn form(mode: FormMode, draft: GenreDraft, errors: Vec<FieldError>) -> GenreView {
    GenreView::Form(GenreForm {
        mode,
        draft,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{failing_catalog, sample_book};
    use locallib_http::View;

    fn workflow() -> (GenreWorkflow, Catalog) {
        let catalog = Catalog::in_memory();
        (GenreWorkflow::new(catalog.clone()), catalog)
    }

    fn redirect(outcome: Outcome<GenreView>) -> String {
        match outcome {
            Outcome::Redirect(location) => location,
            Outcome::Render(view) => panic!("expected redirect, rendered {}", view.template()),
        }
    }

    #[tokio::test]
    async fn create_redirects_to_new_genre() {
        let (workflow, catalog) = workflow();
        let location = redirect(
            workflow
                .create(&FormData::from_pairs([("name", " Fantasy ")]))
                .await
                .unwrap(),
        );

        let genres = catalog.all::<Genre>().await.unwrap();
        assert_eq!(genres.len(), 1);
        assert_eq!(genres[0].name, "Fantasy");
        assert_eq!(location, genres[0].url());
    }

    #[tokio::test]
    async fn create_with_existing_name_redirects_to_existing() {
        let (workflow, catalog) = workflow();
        let existing = catalog.insert(Genre::new("Poetry").unwrap()).await.unwrap();

        let location = redirect(
            workflow
                .create(&FormData::from_pairs([("name", "Poetry")]))
                .await
                .unwrap(),
        );

        assert_eq!(location, existing.url());
        assert_eq!(catalog.count::<Genre>(&Filter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn create_without_name_repaints_form() {
        let (workflow, catalog) = workflow();
        let outcome = workflow.create(&FormData::default()).await.unwrap();

        match outcome {
            Outcome::Render(GenreView::Form(form)) => {
                assert_eq!(form.mode, FormMode::Create);
                assert_eq!(form.errors, vec![FieldError::new("name", "Genre name required")]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(catalog.count::<Genre>(&Filter::All).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_update_repaints_in_update_mode() {
        let (workflow, catalog) = workflow();
        let genre = catalog.insert(Genre::new("Poetry").unwrap()).await.unwrap();

        match workflow
            .update(&genre.id, &FormData::from_pairs([("name", "   ")]))
            .await
            .unwrap()
        {
            Outcome::Render(GenreView::Form(form)) => {
                assert_eq!(form.mode, FormMode::Update);
                assert_eq!(form.draft.name, "");
                assert_eq!(form.errors, vec![FieldError::new("name", "Genre name required")]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let stored = catalog.get::<Genre>(&genre.id).await.unwrap().unwrap();
        assert_eq!(stored, genre);
    }

    #[tokio::test]
    async fn detail_lists_books_in_genre() {
        let (workflow, catalog) = workflow();
        let fantasy = catalog.insert(Genre::new("Fantasy").unwrap()).await.unwrap();
        let poetry = catalog.insert(Genre::new("Poetry").unwrap()).await.unwrap();
        catalog
            .insert(sample_book("Dune", vec![fantasy.id.clone()]))
            .await
            .unwrap();
        catalog
            .insert(sample_book("Odes", vec![poetry.id.clone()]))
            .await
            .unwrap();

        match workflow.detail(&fantasy.id).await.unwrap() {
            Outcome::Render(GenreView::Detail { genre, books }) => {
                assert_eq!(genre, fantasy);
                let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
                assert_eq!(titles, vec!["Dune"]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_genre_is_not_found() {
        let (workflow, _) = workflow();
        let err = workflow.detail(&RecordId::from("nope")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let err = workflow
            .update(&RecordId::from("nope"), &FormData::from_pairs([("name", "X")]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_keeps_identity() {
        let (workflow, catalog) = workflow();
        let genre = catalog.insert(Genre::new("Sci-fi").unwrap()).await.unwrap();

        let location = redirect(
            workflow
                .update(&genre.id, &FormData::from_pairs([("name", "Science Fiction")]))
                .await
                .unwrap(),
        );

        assert_eq!(location, genre.url());
        let stored = catalog.get::<Genre>(&genre.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Science Fiction");
    }

    #[tokio::test]
    async fn delete_is_silent_for_missing_genre() {
        let (workflow, _) = workflow();
        let id = RecordId::from("gone");
        assert_eq!(redirect(workflow.delete_form(&id).await.unwrap()), LIST_URL);
        assert_eq!(redirect(workflow.delete(&id).await.unwrap()), LIST_URL);
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let workflow = GenreWorkflow::new(failing_catalog());
        let err = workflow.list().await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }
}
