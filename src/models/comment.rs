//! Comment model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Comment row from database
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct Comment {
    pub id: i32,
    pub body: String,
    pub book_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentSummary {
    pub id: i32,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CommentCreate {
    #[validate(length(min = 1, message = "Comment body cannot be empty"))]
    pub body: String,
}
