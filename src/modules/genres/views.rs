use locallib_http::View;
use maud::{html, Markup};

use super::models::{Genre, GenreDraft};
use crate::catalog::Record;
use crate::forms::FormMode;
use crate::modules::books::Book;
use crate::utils::html::{self, stored};
use crate::validation::FieldError;

/// Every page the genre workflow can end in.
#[derive(Debug)]
pub enum GenreView {
    List {
        genres: Vec<Record<Genre>>,
    },
    Detail {
        genre: Record<Genre>,
        books: Vec<Record<Book>>,
    },
    Form(GenreForm),
    Delete {
        genre: Record<Genre>,
        books: Vec<Record<Book>>,
    },
}

#[derive(Debug)]
pub struct GenreForm {
    pub mode: FormMode,
    pub draft: GenreDraft,
    pub errors: Vec<FieldError>,
}

impl View for GenreView {
    fn template(&self) -> &'static str {
        match self {
            GenreView::List { .. } => "genre_list",
            GenreView::Detail { .. } => "genre_detail",
            GenreView::Form(_) => "genre_form",
            GenreView::Delete { .. } => "genre_delete",
        }
    }

    fn title(&self) -> Markup {
        match self {
            GenreView::List { .. } => html! { "Genre List" },
            GenreView::Detail { genre, .. } => html! { "Genre: " (stored(&genre.name)) },
            GenreView::Form(form) => html! { (form.mode.title("Genre")) },
            GenreView::Delete { .. } => html! { "Delete Genre" },
        }
    }

    fn body(&self) -> Markup {
        match self {
            GenreView::List { genres } => html::list(
                genres
                    .iter()
                    .map(|genre| html::link(&genre.url(), stored(&genre.name))),
                "There are no genres.",
            ),
            GenreView::Detail { genre, books } => html! {
                h4 { "Books" }
                (book_summaries(books))
                hr;
                p {
                    (html::link(&format!("{}/update", genre.url()), "Update genre"))
                    " | "
                    (html::link(&format!("{}/delete", genre.url()), "Delete genre"))
                }
            },
            GenreView::Form(form) => html! {
                (html::error_list(&form.errors))
                (html::form(
                    html::text_input("name", "Genre", stored(&form.draft.name)),
                    "Submit",
                ))
            },
            GenreView::Delete { genre, books } => html! {
                p { (html::link(&genre.url(), stored(&genre.name))) }
                @if !books.is_empty() {
                    p { "These books stay in the catalog without this genre:" }
                    (book_summaries(books))
                }
                p { "Do you really want to delete this genre?" }
                (html::form(html! {}, "Delete"))
            },
        }
    }
}

fn book_summaries(books: &[Record<Book>]) -> Markup {
    html::list(
        books.iter().map(|book| {
            html! {
                (html::link(&book.url(), stored(&book.title)))
                p { (stored(&book.summary)) }
            }
        }),
        "This genre has no books.",
    )
}
