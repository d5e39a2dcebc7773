//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{author_book::AuthorBook, book::BookSummary};

/// Author row from database
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct Author {
    /// Store-assigned, `0` until persisted
    pub id: i32,
    pub name: String,
    /// Links to books, `None` unless the query loaded them
    #[sqlx(skip)]
    pub books: Option<Vec<AuthorBook>>,
}

/// Author as listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthorSummary {
    pub id: i32,
    pub name: String,
}

/// Author details with the books they are linked to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthorWithBooks {
    pub id: i32,
    pub name: String,
    pub books: Vec<BookSummary>,
}

/// Create or replace author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AuthorCreate {
    #[validate(length(min = 1, max = 120, message = "Name is required and must not exceed 120 characters"))]
    pub name: String,
}
