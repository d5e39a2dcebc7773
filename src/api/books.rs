//! Book endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};

use crate::{
    error::AppResult,
    models::{BookCreate, BookSummary, BookWithAuthors},
    patch::PatchOperation,
    AppState,
};

use super::{JsonBody, API_PREFIX};

/// Get a book with its authors in order
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookWithAuthors),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookWithAuthors>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Create a book for existing authors
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookCreate,
    responses(
        (status = 201, description = "Book created", body = BookSummary),
        (status = 400, description = "Invalid input, missing or unknown authors", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<BookCreate>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<BookSummary>)> {
    let created = state.services.books.create(data).await?;
    let location = format!("{}/books/{}", API_PREFIX, created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

/// Replace a book's title and author list
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = BookCreate,
    responses(
        (status = 204, description = "Book updated"),
        (status = 400, description = "Invalid input, missing or unknown authors", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn replace_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(data): JsonBody<BookCreate>,
) -> AppResult<StatusCode> {
    state.services.books.replace(id, data).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Partially update a book's title and publication date
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = Vec<PatchOperation>,
    responses(
        (status = 204, description = "Book patched"),
        (status = 400, description = "Malformed patch or validation errors", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn patch_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(ops): JsonBody<Vec<PatchOperation>>,
) -> AppResult<StatusCode> {
    state.services.books.patch(id, &ops).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a book with its links and comments
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
