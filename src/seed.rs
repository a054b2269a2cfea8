//! Sample catalog data for demos and local development.

use anyhow::Context;
use locallib_db::{Filter, RecordId};
use time::macros::date;
use time::Date;

use crate::catalog::Catalog;
use crate::modules::authors::Author;
use crate::modules::book_instances::{BookInstance, LoanStatus};
use crate::modules::books::Book;
use crate::modules::genres::Genre;
use crate::validation::escape_input;

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub authors: usize,
    pub genres: usize,
    pub books: usize,
    pub copies: usize,
    /// The catalog already had books, so nothing was inserted.
    pub skipped: bool,
}

type AuthorRow = (&'static str, &'static str, Option<Date>, Option<Date>);

const AUTHORS: &[AuthorRow] = &[
    ("Patrick", "Rothfuss", Some(date!(1973 - 06 - 06)), None),
    ("Ben", "Bova", Some(date!(1932 - 11 - 08)), None),
    ("Isaac", "Asimov", Some(date!(1920 - 01 - 02)), Some(date!(1992 - 04 - 06))),
    ("Bob", "Billings", None, None),
    ("Jim", "Jones", Some(date!(1971 - 12 - 16)), None),
];

const GENRES: &[&str] = &["Fantasy", "Science Fiction", "French Poetry"];

/// (title, author index, summary, isbn, genre indexes)
type BookRow = (&'static str, usize, &'static str, &'static str, &'static [usize]);

const BOOKS: &[BookRow] = &[
    (
        "The Name of the Wind (The Kingkiller Chronicle, #1)",
        0,
        "I have stolen princesses back from sleeping barrow kings. I burned down the town of Trebon. I have spent the night with Felurian and left with both my sanity and my life.",
        "9781473211896",
        &[0],
    ),
    (
        "The Wise Man's Fear (The Kingkiller Chronicle, #2)",
        0,
        "Picking up the tale of Kvothe Kingkiller once again, we follow him into exile, into political intrigue, courtship, adventure, love and magic.",
        "9788401352836",
        &[0],
    ),
    (
        "The Slow Regard of Silent Things (Kingkiller Chronicle)",
        0,
        "Deep below the University, there is a dark place. Few people know of it: a broken web of ancient passageways and abandoned rooms.",
        "9780756411336",
        &[0],
    ),
    (
        "Apes and Angels",
        1,
        "Humankind headed out to the stars not for conquest, nor exploration, nor even for curiosity. Humans went to the stars in a desperate crusade to save intelligent life wherever they found it.",
        "9780765379528",
        &[1],
    ),
    (
        "Death Wave",
        1,
        "In Ben Bova's previous novel New Earth, Jordan Kell led the first human mission beyond the solar system.",
        "9780765379504",
        &[1],
    ),
    ("Test Book 1", 4, "Summary of test book 1", "ISBN111111", &[0, 1]),
    ("Test Book 2", 4, "Summary of test book 2", "ISBN222222", &[]),
];

/// (book index, imprint, status, due back)
type CopyRow = (usize, &'static str, LoanStatus, Option<Date>);

const COPIES: &[CopyRow] = &[
    (0, "London Gollancz, 2014.", LoanStatus::Available, None),
    (1, "Gollancz, 2011.", LoanStatus::Loaned, Some(date!(2026 - 11 - 02))),
    (2, "Gollancz, 2015.", LoanStatus::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", LoanStatus::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", LoanStatus::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", LoanStatus::Available, None),
    (4, "New York, NY Tom Doherty Associates, LLC, 2015.", LoanStatus::Available, None),
    (4, "New York, NY Tom Doherty Associates, LLC, 2015.", LoanStatus::Maintenance, None),
    (
        4,
        "New York, NY Tom Doherty Associates, LLC, 2015.",
        LoanStatus::Loaned,
        Some(date!(2026 - 12 - 01)),
    ),
    (0, "Imprint XXX2", LoanStatus::Available, None),
    (1, "Imprint XXX3", LoanStatus::Available, None),
];

/// Insert the sample catalog unless it already holds books.
pub async fn seed(catalog: &Catalog) -> anyhow::Result<SeedReport> {
    let existing = catalog
        .count::<Book>(&Filter::All)
        .await
        .context("failed to inspect catalog before seeding")?;
    if existing > 0 {
        tracing::info!(books = existing, "catalog already populated; skipping seed");
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    let mut authors: Vec<RecordId> = Vec::with_capacity(AUTHORS.len());
    for (first, family, born, died) in AUTHORS {
        let author = Author::new(&escape_input(first), &escape_input(family), *born, *died)?;
        authors.push(catalog.insert(author).await?.id);
    }

    let mut genres: Vec<RecordId> = Vec::with_capacity(GENRES.len());
    for name in GENRES {
        genres.push(catalog.insert(Genre::new(&escape_input(name))?).await?.id);
    }

    let mut books: Vec<RecordId> = Vec::with_capacity(BOOKS.len());
    for (title, author, summary, isbn, genre) in BOOKS {
        let genre = genre.iter().map(|index| genres[*index].clone()).collect();
        let book = Book::new(
            &escape_input(title),
            authors[*author].as_str(),
            &escape_input(summary),
            &escape_input(isbn),
            genre,
        )?;
        books.push(catalog.insert(book).await?.id);
    }

    for (book, imprint, status, due_back) in COPIES {
        let copy = BookInstance::new(
            books[*book].as_str(),
            &escape_input(imprint),
            *status,
            *due_back,
        )?;
        catalog.insert(copy).await?;
    }

    let report = SeedReport {
        authors: authors.len(),
        genres: genres.len(),
        books: books.len(),
        copies: COPIES.len(),
        skipped: false,
    };
    tracing::info!(?report, "catalog seeded");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::home::counts;

    #[tokio::test]
    async fn seeds_once() {
        let catalog = Catalog::in_memory();

        let report = seed(&catalog).await.unwrap();
        assert_eq!(report.books, BOOKS.len());
        assert!(!report.skipped);

        let counts = counts(&catalog).await.unwrap();
        assert_eq!(counts.books, BOOKS.len() as u64);
        assert_eq!(counts.copies, COPIES.len() as u64);
        assert_eq!(counts.authors, AUTHORS.len() as u64);

        let again = seed(&catalog).await.unwrap();
        assert!(again.skipped);
        assert_eq!(catalog.count::<Book>(&Filter::All).await.unwrap(), BOOKS.len() as u64);
    }

    #[tokio::test]
    async fn seeded_references_resolve() {
        let catalog = Catalog::in_memory();
        seed(&catalog).await.unwrap();

        let authors = catalog.index::<Author>().await.unwrap();
        for book in catalog.all::<Book>().await.unwrap() {
            assert!(authors.contains_key(&book.author), "{} has no author", book.title);
        }
    }

    #[tokio::test]
    async fn seeded_text_is_stored_escaped() {
        let catalog = Catalog::in_memory();
        seed(&catalog).await.unwrap();

        let titles: Vec<String> = catalog
            .all::<Book>()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.data.title)
            .collect();
        assert!(titles.iter().any(|title| title.starts_with("The Wise Man&#x27;s Fear")));
        assert!(titles.iter().all(|title| !title.contains('\'')));
    }
}
