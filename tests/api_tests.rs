//! API integration tests, driven through the router over the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, config::AppConfig, repository::Repository, AppState};

fn app() -> Router {
    api::create_router(AppState::new(AppConfig::default(), Repository::in_memory()))
}

/// Send one request and return status, Location header and JSON body (Null when empty)
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Option<String>, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .expect("router is infallible");

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, location, json)
}

async fn create_author(app: &Router, name: &str) -> i64 {
    let (status, _, body) = send(app, Method::POST, "/api/v1/authors", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

async fn create_book(app: &Router, title: &str, author_ids: &[i64]) -> i64 {
    let (status, _, body) = send(
        app,
        Method::POST,
        "/api/v1/books",
        Some(json!({ "title": title, "author_ids": author_ids })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

fn author_ids(book: &Value) -> Vec<i64> {
    book["authors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, _, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _, body) = send(&app, Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_create_author_returns_location() {
    let app = app();
    let (status, location, body) =
        send(&app, Method::POST, "/api/v1/authors", Some(json!({ "name": "Jorge Luis Borges" }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Jorge Luis Borges");
    assert_eq!(location.unwrap(), format!("/api/v1/authors/{}", body["id"]));
}

#[tokio::test]
async fn test_duplicate_author_name_is_rejected() {
    let app = app();
    create_author(&app, "Borges").await;

    let (status, _, body) = send(&app, Method::POST, "/api/v1/authors", Some(json!({ "name": "Borges" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Duplicate");

    let (_, _, list) = send(&app, Method::GET, "/api/v1/authors", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_author_name_validation_details() {
    let app = app();
    let (status, _, body) = send(&app, Method::POST, "/api/v1/authors", Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "name");
}

#[tokio::test]
async fn test_search_authors_by_name() {
    let app = app();
    create_author(&app, "Gabriel García Márquez").await;
    create_author(&app, "Gabriela Mistral").await;
    create_author(&app, "Julio Cortázar").await;

    let (status, _, body) = send(&app, Method::GET, "/api/v1/authors/by-name/gabriel", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_book_authors_come_back_in_submission_order() {
    let app = app();
    let a = create_author(&app, "A").await;
    let b = create_author(&app, "B").await;
    let c = create_author(&app, "C").await;

    let (status, location, body) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({ "title": "Anthology", "author_ids": [c, a, b] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Anthology");

    let (status, _, book) = send(&app, Method::GET, &location.unwrap(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(author_ids(&book), [c, a, b]);
}

#[tokio::test]
async fn test_book_with_unknown_or_no_authors_is_rejected() {
    let app = app();
    let a = create_author(&app, "A").await;

    for payload in [
        json!({ "title": "T", "author_ids": [a, 999] }),
        json!({ "title": "T", "author_ids": [] }),
        json!({ "title": "T" }),
    ] {
        let (status, _, _) = send(&app, Method::POST, "/api/v1/books", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // nothing was stored: the first accepted book gets id 1
    let id = create_book(&app, "T", &[a]).await;
    assert_eq!(id, 1);
}

#[tokio::test]
async fn test_put_replaces_author_links() {
    let app = app();
    let a = create_author(&app, "A").await;
    let b = create_author(&app, "B").await;
    let c = create_author(&app, "C").await;
    let book = create_book(&app, "T", &[a, b]).await;

    let (status, _, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/books/{}", book),
        Some(json!({ "title": "T2", "author_ids": [c, b] })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, body) = send(&app, Method::GET, &format!("/api/v1/books/{}", book), None).await;
    assert_eq!(body["title"], "T2");
    assert_eq!(author_ids(&body), [c, b]);

    let (_, _, author) = send(&app, Method::GET, &format!("/api/v1/authors/{}", a), None).await;
    assert!(author["books"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_patch_title_keeps_authors() {
    let app = app();
    let a = create_author(&app, "A").await;
    let b = create_author(&app, "B").await;
    let book = create_book(&app, "Old", &[b, a]).await;
    let uri = format!("/api/v1/books/{}", book);

    let (status, _, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!([
            { "op": "replace", "path": "/title", "value": "New" },
            { "op": "add", "path": "/publication_date", "value": "1999-12-31" }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["title"], "New");
    assert_eq!(body["publication_date"], "1999-12-31");
    assert_eq!(author_ids(&body), [b, a]);
}

#[tokio::test]
async fn test_invalid_patch_reports_all_errors() {
    let app = app();
    let a = create_author(&app, "A").await;
    let book = create_book(&app, "Old", &[a]).await;
    let uri = format!("/api/v1/books/{}", book);

    let (status, _, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!([
            { "op": "remove", "path": "/title" },
            { "op": "replace", "path": "/publication_date", "value": 42 }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"].as_array().unwrap().len(), 2);

    let (status, _, _) = send(&app, Method::PATCH, &uri, Some(json!({ "title": "not a list" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["title"], "Old");
}

#[tokio::test]
async fn test_delete_missing_entities_is_not_found() {
    let app = app();
    for uri in ["/api/v1/authors/42", "/api/v1/books/42"] {
        let (status, _, body) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NoSuchData");
    }
}

#[tokio::test]
async fn test_delete_book_removes_it_from_author() {
    let app = app();
    let a = create_author(&app, "A").await;
    let book = create_book(&app, "T", &[a]).await;

    let (status, _, _) = send(&app, Method::DELETE, &format!("/api/v1/books/{}", book), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, author) = send(&app, Method::GET, &format!("/api/v1/authors/{}", a), None).await;
    assert!(author["books"].as_array().unwrap().is_empty());
    let (status, _, _) = send(&app, Method::GET, &format!("/api/v1/books/{}/comments", book), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_flow() {
    let app = app();
    let a = create_author(&app, "A").await;
    let book = create_book(&app, "T", &[a]).await;
    let base = format!("/api/v1/books/{}/comments", book);

    let (status, location, created) = send(&app, Method::POST, &base, Some(json!({ "body": "Loved it" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(location.clone().unwrap(), format!("{}/{}", base, created["id"]));

    let (status, _, comment) = send(&app, Method::GET, &location.unwrap(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comment["body"], "Loved it");

    let (_, _, list) = send(&app, Method::GET, &base, None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _, _) = send(&app, Method::POST, "/api/v1/books/99/comments", Some(json!({ "body": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_author_lists_linked_book_titles() {
    let app = app();
    let a = create_author(&app, "A").await;
    let b = create_author(&app, "B").await;
    create_book(&app, "First", &[a]).await;
    create_book(&app, "Second", &[b, a]).await;
    create_book(&app, "Other", &[b]).await;

    let (_, _, author) = send(&app, Method::GET, &format!("/api/v1/authors/{}", a), None).await;
    let mut titles: Vec<_> = author["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    assert_eq!(titles, ["First", "Second"]);
}

#[tokio::test]
async fn test_missing_or_null_fields_are_bad_requests() {
    let app = app();
    let a = create_author(&app, "A").await;
    let book = create_book(&app, "T", &[a]).await;

    let cases = [
        ("/api/v1/authors".to_string(), json!({})),
        ("/api/v1/authors".to_string(), json!({ "name": null })),
        ("/api/v1/books".to_string(), json!({ "author_ids": [a] })),
        (format!("/api/v1/books/{}/comments", book), json!({})),
    ];
    for (uri, payload) in cases {
        let (status, _, body) = send(&app, Method::POST, &uri, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "BadValue");
    }

    let (status, _, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/authors/{}", a),
        Some(json!({ "nom": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_author_name_is_rejected() {
    let app = app();
    let (status, _, body) = send(&app, Method::POST, "/api/v1/authors", Some(json!({ "name": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "name");

    let (_, _, list) = send(&app, Method::GET, "/api/v1/authors", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_put_missing_book_is_not_found() {
    let app = app();
    let a = create_author(&app, "A").await;

    let (status, _, body) = send(
        &app,
        Method::PUT,
        "/api/v1/books/42",
        Some(json!({ "title": "T", "author_ids": [a] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchData");
}

#[tokio::test]
async fn test_put_with_unknown_author_keeps_book_unchanged() {
    let app = app();
    let a = create_author(&app, "A").await;
    let b = create_author(&app, "B").await;
    let book = create_book(&app, "Old", &[b, a]).await;
    let uri = format!("/api/v1/books/{}", book);

    let (status, _, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "title": "New", "author_ids": [a, 999] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["title"], "Old");
    assert_eq!(author_ids(&body), [b, a]);
}

#[tokio::test]
async fn test_put_author_checks_existence_and_name() {
    let app = app();
    create_author(&app, "Borges").await;
    let other = create_author(&app, "Cortázar").await;

    let (status, _, _) = send(&app, Method::PUT, "/api/v1/authors/42", Some(json!({ "name": "Sabato" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/authors/{}", other);
    let (status, _, body) = send(&app, Method::PUT, &uri, Some(json!({ "name": "Borges" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Duplicate");

    let (_, _, author) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(author["name"], "Cortázar");
}
