//! Book model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{author::AuthorSummary, author_book::AuthorBook, comment::Comment};

/// Book row from database
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub publication_date: Option<NaiveDate>,
    #[sqlx(skip)]
    pub comments: Option<Vec<Comment>>,
    /// Links to authors. When `Some` on update, the stored link set is replaced.
    #[sqlx(skip)]
    pub authors: Option<Vec<AuthorBook>>,
}

/// Book as listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
}

/// Book details with its authors in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookWithAuthors {
    pub id: i32,
    pub title: String,
    pub publication_date: Option<NaiveDate>,
    pub authors: Vec<AuthorSummary>,
}

/// Create or replace book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookCreate {
    #[validate(length(min = 1, max = 250, message = "Title is required and must not exceed 250 characters"))]
    pub title: String,
    /// Author ids in display order
    #[serde(default)]
    #[validate(length(min = 1, message = "A book cannot be created without authors"))]
    pub author_ids: Vec<i32>,
}

/// Patchable subset of a book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookPatch {
    #[validate(
        required(message = "Title is required"),
        length(min = 1, max = 250, message = "Title is required and must not exceed 250 characters")
    )]
    pub title: Option<String>,
    pub publication_date: Option<NaiveDate>,
}
