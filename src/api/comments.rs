//! Comment endpoints, nested under a book

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};

use crate::{
    error::AppResult,
    models::{CommentCreate, CommentSummary},
    AppState,
};

use super::{JsonBody, API_PREFIX};

/// List a book's comments
#[utoipa::path(
    get,
    path = "/books/{id}/comments",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Comments of the book", body = Vec<CommentSummary>),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<CommentSummary>>> {
    let comments = state.services.comments.list(book_id).await?;
    Ok(Json(comments))
}

/// Get one comment of a book
#[utoipa::path(
    get,
    path = "/books/{id}/comments/{comment_id}",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Book ID"),
        ("comment_id" = i32, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment", body = CommentSummary),
        (status = 404, description = "Book or comment not found", body = ErrorResponse)
    )
)]
pub async fn get_comment(
    State(state): State<AppState>,
    Path((book_id, id)): Path<(i32, i32)>,
) -> AppResult<Json<CommentSummary>> {
    let comment = state.services.comments.get(book_id, id).await?;
    Ok(Json(comment))
}

/// Add a comment to a book
#[utoipa::path(
    post,
    path = "/books/{id}/comments",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CommentCreate,
    responses(
        (status = 201, description = "Comment created", body = CommentSummary),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
    JsonBody(data): JsonBody<CommentCreate>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<CommentSummary>)> {
    let created = state.services.comments.create(book_id, data).await?;
    let location = format!("{}/books/{}/comments/{}", API_PREFIX, book_id, created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}
