//! Small HTML fragments shared by the page views.
//!
//! Catalog text is HTML-escaped when it is stored, so it goes through
//! [`stored`] and is emitted as-is. Everything else is escaped by Maud at
//! interpolation.

use maud::{html, Markup, PreEscaped, Render};

use crate::forms::Choice;
use crate::validation::FieldError;

/// Text that was sanitized on its way into the catalog.
pub fn stored(text: &str) -> PreEscaped<&str> {
    PreEscaped(text)
}

pub fn link(href: &str, text: impl Render) -> Markup {
    html! { a href=(href) { (text) } }
}

/// `<p><strong>label:</strong> value</p>`
pub fn field_line(label: &str, value: impl Render) -> Markup {
    html! { p { strong { (label) ":" } " " (value) } }
}

/// Unordered list of `items`, or `empty` as a paragraph.
pub fn list(items: impl IntoIterator<Item = Markup>, empty: &str) -> Markup {
    let items: Vec<Markup> = items.into_iter().collect();
    html! {
        @if items.is_empty() {
            p { (empty) }
        } @else {
            ul {
                @for item in &items {
                    li { (item) }
                }
            }
        }
    }
}

pub fn error_list(errors: &[FieldError]) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul class="errors" {
                @for error in errors {
                    li data-field=(error.field) { (error.message) }
                }
            }
        }
    }
}

pub fn text_input(name: &str, label: &str, value: impl Render) -> Markup {
    input("text", name, label, value)
}

pub fn date_input(name: &str, label: &str, value: impl Render) -> Markup {
    input("date", name, label, value)
}

fn input(kind: &str, name: &str, label: &str, value: impl Render) -> Markup {
    html! {
        div class="form-group" {
            label for=(name) { (label) ":" }
            input id=(name) type=(kind) name=(name) value=(value);
        }
    }
}

pub fn textarea(name: &str, label: &str, value: impl Render) -> Markup {
    html! {
        div class="form-group" {
            label for=(name) { (label) ":" }
            textarea id=(name) name=(name) { (value) }
        }
    }
}

/// Select list; checked choices are rendered `selected`.
pub fn select(name: &str, label: &str, placeholder: &str, choices: &[Choice]) -> Markup {
    html! {
        div class="form-group" {
            label for=(name) { (label) ":" }
            select id=(name) name=(name) {
                option value="" { (placeholder) }
                @for choice in choices {
                    option value=(choice.id.as_str()) selected[choice.checked] {
                        (stored(&choice.label))
                    }
                }
            }
        }
    }
}

pub fn checkboxes(name: &str, label: &str, choices: &[Choice]) -> Markup {
    html! {
        div class="form-group" {
            label { (label) ":" }
            @for choice in choices {
                div class="checkbox" {
                    input type="checkbox" name=(name) id=(choice.id.as_str())
                        value=(choice.id.as_str()) checked[choice.checked];
                    label for=(choice.id.as_str()) { (stored(&choice.label)) }
                }
            }
        }
    }
}

/// POST form around `fields` with a submit button.
pub fn form(fields: Markup, button: &str) -> Markup {
    html! {
        form method="POST" action="" {
            (fields)
            button class="btn btn-primary" type="submit" { (button) }
        }
    }
}
