//! End-to-end API tests.
//!
//! Each test starts its own server on an ephemeral port, backed by the
//! in-memory storage backend and a local cache, and drives the HTTP
//! surface with reqwest.

use serde_json::{Value, json};
use tokio::task::JoinHandle;

use shelfmark_server::{AppConfig, build_app};

const BEARER_TOKEN: &str = "supersecrettoken123";

struct TestServer {
    base: String,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    handle: JoinHandle<()>,
    client: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        let mut cfg = AppConfig::default();
        cfg.auth.bearer_token = BEARER_TOKEN.into();

        let app = build_app(&cfg).await.expect("build app");

        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind");
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = rx.await;
                })
                .await;
        });

        Self {
            base: format!("http://{addr}"),
            shutdown: Some(tx),
            handle,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {BEARER_TOKEN}"))
            .send()
            .await
            .expect("request")
    }

    async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {BEARER_TOKEN}"))
            .json(body)
            .send()
            .await
            .expect("request")
    }

    async fn put(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {BEARER_TOKEN}"))
            .json(body)
            .send()
            .await
            .expect("request")
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {BEARER_TOKEN}"))
            .send()
            .await
            .expect("request")
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = self.handle.await;
    }
}

fn author_payload() -> Value {
    json!({
        "name": "Test Author",
        "bio": "This is a test author.",
        "birth_date": "1980-01-01",
    })
}

#[tokio::test]
async fn service_endpoints_work() {
    let server = TestServer::start().await;

    let resp = server.client.get(server.url("/")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["service"], "Shelfmark Server");
    assert_eq!(body["status"], "ok");

    let resp = server.client.get(server.url("/healthz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let resp = server.client.get(server.url("/readyz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["cache_mode"], "local");

    server.stop().await;
}

#[tokio::test]
async fn requests_without_valid_token_are_rejected() {
    let server = TestServer::start().await;

    // No Authorization header
    let resp = server.client.get(server.url("/authors/")).send().await.unwrap();
    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Could not validate credentials");

    // Wrong token
    let resp = server
        .client
        .get(server.url("/authors/"))
        .header("Authorization", "Bearer wrong-token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Wrong scheme
    let resp = server
        .client
        .get(server.url("/books/"))
        .header("Authorization", format!("Basic {BEARER_TOKEN}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    server.stop().await;
}

#[tokio::test]
async fn author_create_then_get_returns_identical_fields() {
    let server = TestServer::start().await;

    let resp = server.post("/authors/", &author_payload()).await;
    assert_eq!(resp.status(), 200);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().expect("generated id");
    assert_eq!(created["name"], "Test Author");
    assert_eq!(created["bio"], "This is a test author.");
    assert_eq!(created["birth_date"], "1980-01-01");
    assert_eq!(created["books"], json!([]));

    let resp = server.get(&format!("/authors/{id}")).await;
    assert_eq!(resp.status(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, created);

    server.stop().await;
}

#[tokio::test]
async fn author_put_overwrites_every_field() {
    let server = TestServer::start().await;

    let resp = server.post("/authors/", &author_payload()).await;
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();

    // bio and birth_date are absent from the PUT body: a full overwrite
    // clears them rather than leaving them in place.
    let resp = server
        .put(&format!("/authors/{id}"), &json!({ "name": "Updated Author" }))
        .await;
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["name"], "Updated Author");
    assert_eq!(updated["bio"], Value::Null);
    assert_eq!(updated["birth_date"], Value::Null);

    let resp = server.put("/authors/9999", &author_payload()).await;
    assert_eq!(resp.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn missing_entities_return_404() {
    let server = TestServer::start().await;

    let resp = server.get("/authors/9999").await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Author not found");

    let resp = server.get("/books/9999").await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Book not found");

    let resp = server.delete("/books/9999").await;
    assert_eq!(resp.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn book_creation_requires_existing_author() {
    let server = TestServer::start().await;

    let resp = server
        .post("/books/", &json!({ "title": "Orphan Book", "author_id": 9999 }))
        .await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Author not found");

    // No row was created.
    let resp = server.get("/books/").await;
    assert_eq!(resp.status(), 200);
    let books: Value = resp.json().await.unwrap();
    assert_eq!(books.as_array().unwrap().len(), 0);

    server.stop().await;
}

#[tokio::test]
async fn books_by_author_scenario() {
    let server = TestServer::start().await;

    // Create author -> 200 with generated id
    let resp = server.post("/authors/", &author_payload()).await;
    assert_eq!(resp.status(), 200);
    let author: Value = resp.json().await.unwrap();
    let author_id = author["id"].as_i64().unwrap();

    // Create book -> 200
    let resp = server
        .post("/books/", &json!({ "title": "Test Book", "author_id": author_id }))
        .await;
    assert_eq!(resp.status(), 200);
    let book: Value = resp.json().await.unwrap();
    assert_eq!(book["author_id"].as_i64().unwrap(), author_id);

    // List the author's books -> exactly one, title verbatim
    let resp = server.get(&format!("/authors/{author_id}/books")).await;
    assert_eq!(resp.status(), 200);
    let books: Value = resp.json().await.unwrap();
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Test Book");

    server.stop().await;
}

#[tokio::test]
async fn books_by_author_is_404_when_empty() {
    let server = TestServer::start().await;

    let resp = server.post("/authors/", &author_payload()).await;
    let author: Value = resp.json().await.unwrap();
    let author_id = author["id"].as_i64().unwrap();

    // An author with no books and a missing author produce the same 404.
    let resp = server.get(&format!("/authors/{author_id}/books")).await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "No books found for this author");

    let resp = server.get("/authors/9999/books").await;
    assert_eq!(resp.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn author_delete_blocked_until_books_are_gone() {
    let server = TestServer::start().await;

    let resp = server.post("/authors/", &author_payload()).await;
    let author: Value = resp.json().await.unwrap();
    let author_id = author["id"].as_i64().unwrap();

    let resp = server
        .post("/books/", &json!({ "title": "Test Book", "author_id": author_id }))
        .await;
    let book: Value = resp.json().await.unwrap();
    let book_id = book["id"].as_i64().unwrap();

    // Author with an associated book -> 400
    let resp = server.delete(&format!("/authors/{author_id}")).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Cannot delete author with associated books");

    // Delete the book, then the author -> 200 both times
    let resp = server.delete(&format!("/books/{book_id}")).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Book deleted successfully");

    let resp = server.delete(&format!("/authors/{author_id}")).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Author deleted successfully");

    // The author is gone
    let resp = server.get(&format!("/authors/{author_id}")).await;
    assert_eq!(resp.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn author_delete_carries_no_bearer_gate() {
    let server = TestServer::start().await;

    let resp = server.post("/authors/", &author_payload()).await;
    let author: Value = resp.json().await.unwrap();
    let author_id = author["id"].as_i64().unwrap();

    // No Authorization header at all; the route is the one unauthenticated
    // write on the surface.
    let resp = server
        .client
        .delete(server.url(&format!("/authors/{author_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    server.stop().await;
}

#[tokio::test]
async fn list_reads_reflect_writes_through_the_cache() {
    let server = TestServer::start().await;

    let resp = server.post("/authors/", &author_payload()).await;
    let author: Value = resp.json().await.unwrap();
    let author_id = author["id"].as_i64().unwrap();

    let resp = server
        .post("/books/", &json!({ "title": "Test Book", "author_id": author_id }))
        .await;
    let book: Value = resp.json().await.unwrap();
    let book_id = book["id"].as_i64().unwrap();

    // Populate both list caches.
    let resp = server.get("/books/").await;
    assert_eq!(resp.status(), 200);
    let resp = server.get("/authors/").await;
    assert_eq!(resp.status(), 200);

    // Update the book; both snapshots must be invalidated.
    let resp = server
        .put(
            &format!("/books/{book_id}"),
            &json!({ "title": "Updated Test Book", "author_id": author_id }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let resp = server.get("/books/").await;
    let books: Value = resp.json().await.unwrap();
    assert_eq!(books[0]["title"], "Updated Test Book");

    let resp = server.get("/authors/").await;
    let authors: Value = resp.json().await.unwrap();
    assert_eq!(authors[0]["books"][0]["title"], "Updated Test Book");

    server.stop().await;
}

#[tokio::test]
async fn author_writes_invalidate_the_authors_list() {
    let server = TestServer::start().await;

    // Prime the (empty) snapshot, then create an author; the next list
    // read must include it.
    let resp = server.get("/authors/").await;
    assert_eq!(resp.status(), 200);
    let authors: Value = resp.json().await.unwrap();
    assert_eq!(authors.as_array().unwrap().len(), 0);

    let resp = server.post("/authors/", &author_payload()).await;
    assert_eq!(resp.status(), 200);

    let resp = server.get("/authors/").await;
    let authors: Value = resp.json().await.unwrap();
    assert_eq!(authors.as_array().unwrap().len(), 1);
    assert_eq!(authors[0]["name"], "Test Author");

    server.stop().await;
}

#[tokio::test]
async fn collection_routes_accept_both_slash_forms() {
    let server = TestServer::start().await;

    let resp = server.get("/authors").await;
    assert_eq!(resp.status(), 200);
    let resp = server.get("/authors/").await;
    assert_eq!(resp.status(), 200);
    let resp = server.get("/books").await;
    assert_eq!(resp.status(), 200);

    server.stop().await;
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let server = TestServer::start().await;

    let resp = server.client.get(server.url("/healthz")).send().await.unwrap();
    assert!(resp.headers().contains_key("x-request-id"));

    server.stop().await;
}
