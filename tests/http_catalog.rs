use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use locallib_app::modules::authors::Author;
use locallib_app::modules::books::Book;
use locallib_app::modules::genres::Genre;
use locallib_app::{router, Catalog, Record};
use locallib_kernel::settings::Settings;
use tower::ServiceExt;

struct App {
    router: Router,
    catalog: Catalog,
}

fn app() -> App {
    let catalog = Catalog::in_memory();
    App {
        router: router(&catalog, &Settings::default()),
        catalog,
    }
}

impl App {
    async fn get(&self, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post(&self, uri: &str, form: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn herbert_and_fantasy(&self) -> (Record<Author>, Record<Genre>) {
        let author = self
            .catalog
            .insert(Author::new("Frank", "Herbert", None, None).unwrap())
            .await
            .unwrap();
        let genre = self
            .catalog
            .insert(Genre::new("Fantasy").unwrap())
            .await
            .unwrap();
        (author, genre)
    }
}

async fn text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect has a location")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn create_book_redirects_to_detail_and_renders() {
    let app = app();
    let (author, genre) = app.herbert_and_fantasy().await;

    let form = format!(
        "title=Dune&author={}&summary=Spice&isbn=9780441013593&genre={}",
        author.id, genre.id
    );
    let response = app.post("/catalog/book/create", &form).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let books = app.catalog.all::<Book>().await.unwrap();
    assert_eq!(books.len(), 1);
    let detail_url = format!("/catalog/book/{}", books[0].id);
    assert_eq!(location(&response), detail_url);

    let detail = app.get(&detail_url).await;
    assert_eq!(detail.status(), StatusCode::OK);
    let html = text(detail).await;
    assert!(html.contains("Title: Dune"));
    assert!(html.contains("Herbert, Frank"));
    assert!(html.contains("Fantasy"));

    let update = text(app.get(&format!("{detail_url}/update")).await).await;
    assert!(update.contains(&format!("value=\"{}\" checked>", genre.id)));
    assert!(update.contains(&format!("<option value=\"{}\" selected>", author.id)));
}

#[tokio::test]
async fn empty_title_rerenders_form_with_error() {
    let app = app();
    let (author, _) = app.herbert_and_fantasy().await;

    let form = format!("title=&author={}&summary=Spice&isbn=1", author.id);
    let response = app.post("/catalog/book/create", &form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = text(response).await;
    assert!(html.contains("<title>Create Book</title>"));
    assert!(html.contains("data-field=\"title\">Title must not be empty"));
    assert!(html.contains("value=\"Spice\"") || html.contains(">Spice</textarea>"));
    assert!(app.catalog.all::<Book>().await.unwrap().is_empty());
}

#[tokio::test]
async fn markup_in_title_is_escaped() {
    let app = app();
    let (author, _) = app.herbert_and_fantasy().await;

    let form = format!(
        "title=%3Cscript%3Ealert(1)%3C%2Fscript%3E&author={}&summary=s&isbn=1",
        author.id
    );
    let response = app.post("/catalog/book/create", &form).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let stored = app.catalog.all::<Book>().await.unwrap().remove(0);
    assert_eq!(stored.title, "&lt;script&gt;alert(1)&lt;&#x2F;script&gt;");

    let html = text(app.get("/catalog/books").await).await;
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn missing_book_pages() {
    let app = app();

    let detail = app.get("/catalog/book/does-not-exist").await;
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
    assert!(text(detail).await.contains("Book not found"));

    let delete_page = app.get("/catalog/book/does-not-exist/delete").await;
    assert_eq!(delete_page.status(), StatusCode::FOUND);
    assert_eq!(location(&delete_page), "/catalog/books");

    let delete = app.post("/catalog/book/does-not-exist/delete", "").await;
    assert_eq!(delete.status(), StatusCode::FOUND);
    assert_eq!(location(&delete), "/catalog/books");
}

#[tokio::test]
async fn delete_book_removes_it() {
    let app = app();
    let (author, _) = app.herbert_and_fantasy().await;
    let book = app
        .catalog
        .insert(Book::new("Dune", author.id.as_str(), "s", "1", Vec::new()).unwrap())
        .await
        .unwrap();

    let response = app
        .post(&format!("/catalog/book/{}/delete", book.id), "")
        .await;
    assert_eq!(location(&response), "/catalog/books");
    assert!(app.catalog.get::<Book>(&book.id).await.unwrap().is_none());
}

#[tokio::test]
async fn home_and_root_redirect() {
    let app = app();
    app.herbert_and_fantasy().await;

    let root = app.get("/").await;
    assert_eq!(root.status(), StatusCode::FOUND);
    assert_eq!(location(&root), "/catalog");

    let home = text(app.get("/catalog").await).await;
    assert!(home.contains("<title>Local Library Home</title>"));
    assert!(home.contains("<strong>Authors:</strong> 1"));
    assert!(home.contains("<strong>Genres:</strong> 1"));
}

#[tokio::test]
async fn other_entities_share_the_workflow_shape() {
    let app = app();

    let author = app
        .post(
            "/catalog/author/create",
            "first_name=Ursula&family_name=Le+Guin&date_of_birth=1929-10-21&date_of_death=",
        )
        .await;
    assert_eq!(author.status(), StatusCode::FOUND);
    assert!(location(&author).starts_with("/catalog/author/"));

    let genre = app.post("/catalog/genre/create", "name=Poetry").await;
    let genre_url = location(&genre).to_string();
    let again = app.post("/catalog/genre/create", "name=Poetry").await;
    assert_eq!(location(&again), genre_url);

    let copy = app
        .post("/catalog/bookinstance/create", "book=&imprint=Ace&status=Available")
        .await;
    assert_eq!(copy.status(), StatusCode::OK);
    assert!(text(copy).await.contains("Book must be specified"));

    let list = text(app.get("/catalog/authors").await).await;
    assert!(list.contains("Le Guin, Ursula"));
}

#[tokio::test]
async fn unknown_route_is_404_page() {
    let app = app();
    let response = app.get("/catalog/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(text(response).await.contains("Page not found"));
}

#[tokio::test]
async fn healthz_and_request_id() {
    let app = app();
    let response = app.get("/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(text(response).await, "ok");
}
