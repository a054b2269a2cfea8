//! HTML page rendering: the shared layout and the render-or-redirect
//! [`Outcome`] every page handler returns.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use maud::{html, Markup, DOCTYPE};

/// A page view bound to exactly one template.
///
/// Implementations only interpolate the values they carry; no lookups or
/// decisions happen at render time.
pub trait View {
    /// Template name, e.g. `book_form`.
    fn template(&self) -> &'static str;

    /// Page title, shown in `<title>` and the page heading.
    fn title(&self) -> Markup;

    /// Content placed in the layout's content column.
    fn body(&self) -> Markup;
}

/// Terminal state of a page request.
#[derive(Debug)]
pub enum Outcome<V> {
    Render(V),
    Redirect(String),
}

impl<V: View> IntoResponse for Outcome<V> {
    fn into_response(self) -> Response {
        match self {
            Outcome::Render(view) => {
                tracing::debug!(template = view.template(), "rendering view");
                Html(layout(view.title(), view.body()).into_string()).into_response()
            }
            Outcome::Redirect(location) => found(&location),
        }
    }
}

/// `302 Found` pointing at `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

const NAV_LINKS: &[(&str, &str)] = &[
    ("/catalog", "Home"),
    ("/catalog/books", "All books"),
    ("/catalog/authors", "All authors"),
    ("/catalog/genres", "All genres"),
    ("/catalog/bookinstances", "All book-instances"),
    ("/catalog/author/create", "Create new author"),
    ("/catalog/genre/create", "Create new genre"),
    ("/catalog/book/create", "Create new book"),
    ("/catalog/bookinstance/create", "Create new book instance (copy)"),
];

/// Wrap a page body in the site layout.
pub fn layout(title: Markup, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body {
                nav class="sidebar" {
                    ul {
                        @for (href, label) in NAV_LINKS {
                            li { a href=(href) { (label) } }
                        }
                    }
                }
                main class="content" {
                    h1 { (title) }
                    (body)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Hello;

    impl View for Hello {
        fn template(&self) -> &'static str {
            "hello"
        }

        fn title(&self) -> Markup {
            html! { "Hello <World>" }
        }

        fn body(&self) -> Markup {
            html! { p { "hi" } }
        }
    }

    #[test]
    fn layout_wraps_title_and_body() {
        let page = layout(Hello.title(), Hello.body()).into_string();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Hello &lt;World&gt;</title>"));
        assert!(page.contains("<h1>Hello &lt;World&gt;</h1>"));
        assert!(page.contains("<p>hi</p>"));
        assert!(page.contains("href=\"/catalog/books\""));
    }

    #[test]
    fn render_outcome_is_ok_html() {
        let response = Outcome::Render(Hello).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }

    #[test]
    fn redirect_outcome_is_found() {
        let response = Outcome::<Hello>::Redirect("/catalog/books".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/catalog/books"
        );
    }
}
