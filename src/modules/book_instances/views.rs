use locallib_http::View;
use maud::{html, Markup};

use super::models::{BookInstance, BookInstanceDraft, LoanStatus};
use crate::catalog::Record;
use crate::forms::{check_where, Choice, FormMode};
use crate::modules::books::Book;
use crate::utils::html::{self, stored};
use crate::validation::FieldError;

/// A copy with its book resolved; `None` when the book is gone.
#[derive(Debug)]
pub struct CopySummary {
    pub copy: Record<BookInstance>,
    pub book: Option<Record<Book>>,
}

#[derive(Debug)]
pub enum BookInstanceView {
    List { copies: Vec<CopySummary> },
    Detail(CopySummary),
    Form(BookInstanceForm),
    Delete(CopySummary),
}

#[derive(Debug)]
pub struct BookInstanceForm {
    pub mode: FormMode,
    pub draft: BookInstanceDraft,
    pub books: Vec<Choice>,
    pub errors: Vec<FieldError>,
}

impl BookInstanceForm {
    /// Marks the draft's book as the selected choice.
    pub fn new(
        mode: FormMode,
        draft: BookInstanceDraft,
        mut books: Vec<Choice>,
        errors: Vec<FieldError>,
    ) -> Self {
        check_where(&mut books, |id| id.as_str() == draft.book);
        Self {
            mode,
            draft,
            books,
            errors,
        }
    }

    fn status_select(&self) -> Markup {
        html! {
            div class="form-group" {
                label for="status" { "Status:" }
                select id="status" name="status" {
                    @for name in LoanStatus::NAMES {
                        option value=(name) selected[*name == self.draft.status] { (name) }
                    }
                }
            }
        }
    }
}

impl View for BookInstanceView {
    fn template(&self) -> &'static str {
        match self {
            BookInstanceView::List { .. } => "bookinstance_list",
            BookInstanceView::Detail(_) => "bookinstance_detail",
            BookInstanceView::Form(_) => "bookinstance_form",
            BookInstanceView::Delete(_) => "bookinstance_delete",
        }
    }

    fn title(&self) -> Markup {
        match self {
            BookInstanceView::List { .. } => html! { "Book Instance List" },
            BookInstanceView::Detail(summary) => html! { "ID: " (summary.copy.id.as_str()) },
            BookInstanceView::Form(form) => html! { (form.mode.title("BookInstance")) },
            BookInstanceView::Delete(_) => html! { "Delete BookInstance" },
        }
    }

    fn body(&self) -> Markup {
        match self {
            BookInstanceView::List { copies } => html::list(
                copies.iter().map(|summary| {
                    html! {
                        (html::link(&summary.copy.url(), copy_heading(summary)))
                        " - "
                        (status_line(&summary.copy))
                    }
                }),
                "There are no book copies in this library.",
            ),
            BookInstanceView::Detail(summary) => html! {
                (copy_fields(summary))
                (html::field_line("Status", status_line(&summary.copy)))
                hr;
                p {
                    (html::link(&format!("{}/update", summary.copy.url()), "Update copy"))
                    " | "
                    (html::link(&format!("{}/delete", summary.copy.url()), "Delete copy"))
                }
            },
            BookInstanceView::Form(form) => {
                let draft = &form.draft;
                let fields = html! {
                    (html::select("book", "Book", "Select book", &form.books))
                    (html::text_input("imprint", "Imprint", stored(&draft.imprint)))
                    (html::date_input("due_back", "Date when book available", &draft.due_back))
                    (form.status_select())
                };
                html! {
                    (html::error_list(&form.errors))
                    (html::form(fields, "Submit"))
                }
            }
            BookInstanceView::Delete(summary) => html! {
                (copy_fields(summary))
                p { "Do you really want to delete this copy?" }
                (html::form(html! {}, "Delete"))
            },
        }
    }
}

fn copy_heading(summary: &CopySummary) -> Markup {
    html! {
        @if let Some(book) = &summary.book {
            (stored(&book.title))
        }
        " : " (stored(&summary.copy.imprint))
    }
}

fn copy_fields(summary: &CopySummary) -> Markup {
    let book = html! {
        @if let Some(book) = &summary.book {
            (html::link(&book.url(), stored(&book.title)))
        }
    };
    html! {
        (html::field_line("Book", book))
        (html::field_line("Imprint", stored(&summary.copy.imprint)))
    }
}

/// Status, plus the due date unless the copy is on the shelf.
pub(crate) fn status_line(copy: &BookInstance) -> Markup {
    let class = match copy.status {
        LoanStatus::Available => "text-success",
        LoanStatus::Maintenance => "text-danger",
        LoanStatus::Loaned | LoanStatus::Reserved => "text-warning",
    };
    html! {
        span class=(class) { (copy.status.as_str()) }
        @if copy.status != LoanStatus::Available {
            " (Due: " (copy.due_back_formatted()) ")"
        }
    }
}
