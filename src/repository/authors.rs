//! Authors repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorBook, Book},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorsRepository: Send + Sync {
    /// All authors, without links
    async fn list(&self) -> AppResult<Vec<Author>>;

    /// Author with its links and each link's book loaded
    async fn get_with_books(&self, id: i32) -> AppResult<Option<Author>>;

    /// Case-insensitive substring match on the name
    async fn search_by_name(&self, fragment: &str) -> AppResult<Vec<Author>>;

    async fn exists(&self, id: i32) -> AppResult<bool>;

    /// Whether another author (not `exclude_id`) already uses `name`
    async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    /// The subset of `ids` that exist
    async fn existing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>>;

    async fn create(&self, author: &Author) -> AppResult<Author>;

    async fn update(&self, author: &Author) -> AppResult<()>;

    /// Delete by identity; links go with it
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgAuthorsRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn get_author_books(&self, author_id: i32) -> AppResult<Vec<AuthorBook>> {
        let rows = sqlx::query(
            r#"
            SELECT ab.author_id, ab.book_id, ab."order", b.title, b.publication_date
            FROM authors_books ab
            JOIN books b ON b.id = ab.book_id
            WHERE ab.author_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| AuthorBook {
                author_id: r.get("author_id"),
                book_id: r.get("book_id"),
                order: r.get("order"),
                author: None,
                book: Some(Book {
                    id: r.get("book_id"),
                    title: r.get("title"),
                    publication_date: r.get("publication_date"),
                    ..Default::default()
                }),
            })
            .collect())
    }
}

#[async_trait]
impl AuthorsRepository for PgAuthorsRepository {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    async fn get_with_books(&self, id: i32) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(mut author) = author else {
            return Ok(None);
        };
        author.books = Some(self.get_author_books(id).await?);
        Ok(Some(author))
    }

    async fn search_by_name(&self, fragment: &str) -> AppResult<Vec<Author>> {
        // strpos keeps % and _ in the fragment literal
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, name FROM authors WHERE strpos(LOWER(name), LOWER($1)) > 0 ORDER BY name",
        )
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM authors WHERE name = $1 AND ($2::int IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn existing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        let found: Vec<i32> = sqlx::query_scalar("SELECT id FROM authors WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(found)
    }

    async fn create(&self, author: &Author) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&author.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(&self, author: &Author) -> AppResult<()> {
        let result = sqlx::query("UPDATE authors SET name = $1 WHERE id = $2")
            .bind(&author.name)
            .bind(author.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", author.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }
}
