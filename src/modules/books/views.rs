use locallib_http::View;
use maud::{html, Markup};

use super::models::{Book, BookDraft};
use crate::catalog::Record;
use crate::forms::{check_where, Choice, FormMode};
use crate::modules::authors::Author;
use crate::modules::book_instances::views::status_line;
use crate::modules::book_instances::BookInstance;
use crate::modules::genres::Genre;
use crate::utils::html::{self, stored};
use crate::validation::FieldError;

/// A book with its author resolved; `None` when the author is gone.
#[derive(Debug)]
pub struct BookSummary {
    pub book: Record<Book>,
    pub author: Option<Record<Author>>,
}

/// Everything the detail and delete pages show about one book.
#[derive(Debug)]
pub struct BookDetail {
    pub book: Record<Book>,
    pub author: Option<Record<Author>>,
    pub genres: Vec<Record<Genre>>,
    pub copies: Vec<Record<BookInstance>>,
}

#[derive(Debug)]
pub enum BookView {
    List { books: Vec<BookSummary> },
    Detail(BookDetail),
    Form(BookForm),
    Delete(BookDetail),
}

#[derive(Debug)]
pub struct BookForm {
    pub mode: FormMode,
    pub draft: BookDraft,
    pub authors: Vec<Choice>,
    pub genres: Vec<Choice>,
    pub errors: Vec<FieldError>,
}

impl BookForm {
    /// Selects the draft's author and checks the draft's genres.
    pub fn new(
        mode: FormMode,
        draft: BookDraft,
        mut authors: Vec<Choice>,
        mut genres: Vec<Choice>,
        errors: Vec<FieldError>,
    ) -> Self {
        check_where(&mut authors, |id| id.as_str() == draft.author);
        check_where(&mut genres, |id| draft.genre.contains(id.as_str()));
        Self {
            mode,
            draft,
            authors,
            genres,
            errors,
        }
    }
}

impl View for BookView {
    fn template(&self) -> &'static str {
        match self {
            BookView::List { .. } => "book_list",
            BookView::Detail(_) => "book_detail",
            BookView::Form(_) => "book_form",
            BookView::Delete(_) => "book_delete",
        }
    }

    fn title(&self) -> Markup {
        match self {
            BookView::List { .. } => html! { "Book List" },
            BookView::Detail(detail) => html! { "Title: " (stored(&detail.book.title)) },
            BookView::Form(form) => html! { (form.mode.title("Book")) },
            BookView::Delete(_) => html! { "Delete Book" },
        }
    }

    fn body(&self) -> Markup {
        match self {
            BookView::List { books } => html::list(
                books.iter().map(|summary| {
                    html! {
                        (html::link(&summary.book.url(), stored(&summary.book.title)))
                        " (" (author_name(&summary.author)) ")"
                    }
                }),
                "There are no books.",
            ),
            BookView::Detail(detail) => html! {
                (book_fields(detail))
                h4 { "Copies" }
                (copy_list(&detail.copies))
                hr;
                p {
                    (html::link(&format!("{}/update", detail.book.url()), "Update book"))
                    " | "
                    (html::link(&format!("{}/delete", detail.book.url()), "Delete book"))
                }
            },
            BookView::Form(form) => {
                let draft = &form.draft;
                let fields = html! {
                    (html::text_input("title", "Title", stored(&draft.title)))
                    (html::select("author", "Author", "Select author", &form.authors))
                    (html::textarea("summary", "Summary", stored(&draft.summary)))
                    (html::text_input("isbn", "ISBN", stored(&draft.isbn)))
                    (html::checkboxes("genre", "Genre", &form.genres))
                };
                html! {
                    (html::error_list(&form.errors))
                    (html::form(fields, "Submit"))
                }
            }
            BookView::Delete(detail) => html! {
                (book_fields(detail))
                @if !detail.copies.is_empty() {
                    p { "These copies will no longer have a book:" }
                    (copy_list(&detail.copies))
                }
                p { "Do you really want to delete this book?" }
                (html::form(html! {}, "Delete"))
            },
        }
    }
}

fn author_name(author: &Option<Record<Author>>) -> Markup {
    html! {
        @if let Some(author) = author {
            (stored(&author.name()))
        }
    }
}

fn book_fields(detail: &BookDetail) -> Markup {
    let author = html! {
        @if let Some(author) = &detail.author {
            (html::link(&author.url(), stored(&author.name())))
        }
    };
    let genres = html! {
        @for (index, genre) in detail.genres.iter().enumerate() {
            @if index > 0 { ", " }
            (html::link(&genre.url(), stored(&genre.name)))
        }
    };
    html! {
        (html::field_line("Author", author))
        (html::field_line("Summary", stored(&detail.book.summary)))
        (html::field_line("ISBN", stored(&detail.book.isbn)))
        (html::field_line("Genre", genres))
    }
}

fn copy_list(copies: &[Record<BookInstance>]) -> Markup {
    html::list(
        copies.iter().map(|copy| {
            html! {
                (status_line(copy))
                (html::field_line("Imprint", stored(&copy.imprint)))
                (html::field_line("Id", html::link(&copy.url(), copy.id.as_str())))
            }
        }),
        "There are no copies of this book in the library.",
    )
}
