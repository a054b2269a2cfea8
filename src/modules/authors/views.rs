use locallib_http::View;
use maud::{html, Markup};

use super::models::{Author, AuthorDraft};
use crate::catalog::Record;
use crate::forms::FormMode;
use crate::modules::books::Book;
use crate::utils::html::{self, stored};
use crate::validation::FieldError;

#[derive(Debug)]
pub enum AuthorView {
    List {
        authors: Vec<Record<Author>>,
    },
    Detail {
        author: Record<Author>,
        books: Vec<Record<Book>>,
    },
    Form(AuthorForm),
    Delete {
        author: Record<Author>,
        books: Vec<Record<Book>>,
    },
}

#[derive(Debug)]
pub struct AuthorForm {
    pub mode: FormMode,
    pub draft: AuthorDraft,
    pub errors: Vec<FieldError>,
}

impl View for AuthorView {
    fn template(&self) -> &'static str {
        match self {
            AuthorView::List { .. } => "author_list",
            AuthorView::Detail { .. } => "author_detail",
            AuthorView::Form(_) => "author_form",
            AuthorView::Delete { .. } => "author_delete",
        }
    }

    fn title(&self) -> Markup {
        match self {
            AuthorView::List { .. } => html! { "Author List" },
            AuthorView::Detail { author, .. } => html! { "Author: " (stored(&author.name())) },
            AuthorView::Form(form) => html! { (form.mode.title("Author")) },
            AuthorView::Delete { .. } => html! { "Delete Author" },
        }
    }

    fn body(&self) -> Markup {
        match self {
            AuthorView::List { authors } => html::list(
                authors.iter().map(|author| {
                    html! {
                        (html::link(&author.url(), stored(&author.name())))
                        " (" (author.life_span_formatted()) ")"
                    }
                }),
                "There are no authors.",
            ),
            AuthorView::Detail { author, books } => html! {
                p { (author.life_span_formatted()) }
                h4 { "Books" }
                (book_summaries(books))
                hr;
                p {
                    (html::link(&format!("{}/update", author.url()), "Update author"))
                    " | "
                    (html::link(&format!("{}/delete", author.url()), "Delete author"))
                }
            },
            AuthorView::Form(form) => {
                let draft = &form.draft;
                let fields = html! {
                    (html::text_input("first_name", "First Name", stored(&draft.first_name)))
                    (html::text_input("family_name", "Family Name", stored(&draft.family_name)))
                    (html::date_input("date_of_birth", "Date of birth", &draft.date_of_birth))
                    (html::date_input("date_of_death", "Date of death", &draft.date_of_death))
                };
                html! {
                    (html::error_list(&form.errors))
                    (html::form(fields, "Submit"))
                }
            }
            AuthorView::Delete { author, books } => html! {
                p { (html::link(&author.url(), stored(&author.name()))) }
                @if !books.is_empty() {
                    p { "These books keep a reference to this author:" }
                    (book_summaries(books))
                }
                p { "Do you really want to delete this author?" }
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
        "This author has no books.",
    )
}
