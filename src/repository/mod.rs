//! Repository layer for database operations
//!
//! Each entity has an async trait with a PostgreSQL implementation (sqlx) and
//! an in-memory one. Services receive a [`Repository`] handle explicitly.

pub mod authors;
pub mod books;
pub mod comments;
pub mod memory;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

pub use authors::AuthorsRepository;
pub use books::BooksRepository;
pub use comments::CommentsRepository;

/// Handle bundling one repository per entity
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorsRepository>,
    pub books: Arc<dyn BooksRepository>,
    pub comments: Arc<dyn CommentsRepository>,
    /// Set for the PostgreSQL backend, used by readiness checks
    pool: Option<Pool<Postgres>>,
}

impl Repository {
    /// Repositories backed by the given PostgreSQL pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::PgAuthorsRepository::new(pool.clone())),
            books: Arc::new(books::PgBooksRepository::new(pool.clone())),
            comments: Arc::new(comments::PgCommentsRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Repositories sharing one fresh in-memory store
    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::default();
        Self {
            authors: Arc::new(store.clone()),
            books: Arc::new(store.clone()),
            comments: Arc::new(store),
            pool: None,
        }
    }

    /// Assemble a handle from arbitrary implementations
    pub fn from_parts(
        authors: Arc<dyn AuthorsRepository>,
        books: Arc<dyn BooksRepository>,
        comments: Arc<dyn CommentsRepository>,
    ) -> Self {
        Self {
            authors,
            books,
            comments,
            pool: None,
        }
    }

    /// Round-trip to the database, if there is one
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}
