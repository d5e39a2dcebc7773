//! Author endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};

use crate::{
    error::AppResult,
    models::{AuthorCreate, AuthorSummary, AuthorWithBooks},
    AppState,
};

use super::{JsonBody, API_PREFIX};

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "List of authors", body = Vec<AuthorSummary>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorSummary>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Get author details with their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorWithBooks),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorWithBooks>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(author))
}

/// Search authors by name
#[utoipa::path(
    get,
    path = "/authors/by-name/{name}",
    tag = "authors",
    params(
        ("name" = String, Path, description = "Fragment of the author's name")
    ),
    responses(
        (status = 200, description = "Matching authors", body = Vec<AuthorSummary>)
    )
)]
pub async fn search_authors(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<AuthorSummary>>> {
    let authors = state.services.authors.search_by_name(&name).await?;
    Ok(Json(authors))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorCreate,
    responses(
        (status = 201, description = "Author created", body = AuthorSummary),
        (status = 400, description = "Invalid input or name already taken", body = ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<AuthorCreate>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<AuthorSummary>)> {
    let created = state.services.authors.create(data).await?;
    let location = format!("{}/authors/{}", API_PREFIX, created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

/// Replace an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body = AuthorCreate,
    responses(
        (status = 204, description = "Author updated"),
        (status = 400, description = "Invalid input or name already taken", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(data): JsonBody<AuthorCreate>,
) -> AppResult<StatusCode> {
    state.services.authors.update(id, data).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
