//! Comments repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::Comment};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsRepository: Send + Sync {
    async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<Comment>>;

    async fn get(&self, id: i32) -> AppResult<Option<Comment>>;

    async fn create(&self, comment: &Comment) -> AppResult<Comment>;
}

#[derive(Clone)]
pub struct PgCommentsRepository {
    pool: Pool<Postgres>,
}

impl PgCommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentsRepository for PgCommentsRepository {
    async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, body, book_id FROM comments WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>("SELECT id, body, book_id FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn create(&self, comment: &Comment) -> AppResult<Comment> {
        let created = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (body, book_id) VALUES ($1, $2) RETURNING id, body, book_id",
        )
        .bind(&comment.body)
        .bind(comment.book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}
