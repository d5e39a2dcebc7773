//! Books repository
//!
//! A book and its author links are always written in one transaction.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorBook, Book},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksRepository: Send + Sync {
    /// Plain book row, links not loaded
    async fn get(&self, id: i32) -> AppResult<Option<Book>>;

    /// Book with its links and each link's author loaded, in storage order
    async fn get_with_authors(&self, id: i32) -> AppResult<Option<Book>>;

    async fn exists(&self, id: i32) -> AppResult<bool>;

    /// Insert the book and every link in `book.authors`
    async fn create(&self, book: &Book) -> AppResult<Book>;

    /// Update the row; when `book.authors` is `Some`, replace the whole link set
    async fn update(&self, book: &Book) -> AppResult<()>;

    /// Delete by identity; links and comments go with it
    async fn delete(&self, id: i32) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgBooksRepository {
    pool: Pool<Postgres>,
}

impl PgBooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn get_book_authors(&self, book_id: i32) -> AppResult<Vec<AuthorBook>> {
        let rows = sqlx::query(
            r#"
            SELECT ab.author_id, ab.book_id, ab."order", a.name
            FROM authors_books ab
            JOIN authors a ON a.id = ab.author_id
            WHERE ab.book_id = $1
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| AuthorBook {
                author_id: r.get("author_id"),
                book_id: r.get("book_id"),
                order: r.get("order"),
                author: Some(Author {
                    id: r.get("author_id"),
                    name: r.get("name"),
                    books: None,
                }),
                book: None,
            })
            .collect())
    }
}

/// Replace the link set of `book_id` with `links`
async fn replace_links(
    tx: &mut Transaction<'_, Postgres>,
    book_id: i32,
    links: &[AuthorBook],
) -> AppResult<()> {
    sqlx::query("DELETE FROM authors_books WHERE book_id = $1")
        .bind(book_id)
        .execute(&mut **tx)
        .await?;

    for link in links {
        sqlx::query(r#"INSERT INTO authors_books (author_id, book_id, "order") VALUES ($1, $2, $3)"#)
            .bind(link.author_id)
            .bind(book_id)
            .bind(link.order)
            .execute(&mut **tx)
            .await?;
    }
    tracing::debug!(book_id, links = links.len(), "author links replaced");
    Ok(())
}

#[async_trait]
impl BooksRepository for PgBooksRepository {
    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, publication_date FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn get_with_authors(&self, id: i32) -> AppResult<Option<Book>> {
        let Some(mut book) = self.get(id).await? else {
            return Ok(None);
        };
        book.authors = Some(self.get_book_authors(id).await?);
        Ok(Some(book))
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create(&self, book: &Book) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let mut created = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, publication_date) VALUES ($1, $2) RETURNING id, title, publication_date",
        )
        .bind(&book.title)
        .bind(book.publication_date)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(links) = &book.authors {
            replace_links(&mut tx, created.id, links).await?;
            created.authors = Some(
                links
                    .iter()
                    .map(|l| AuthorBook {
                        book_id: created.id,
                        ..l.clone()
                    })
                    .collect(),
            );
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE books SET title = $1, publication_date = $2 WHERE id = $3")
            .bind(&book.title)
            .bind(book.publication_date)
            .bind(book.id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", book.id)));
        }

        if let Some(links) = &book.authors {
            replace_links(&mut tx, book.id, links).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
