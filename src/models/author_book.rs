//! Author-Book junction model (N:M relationship with ordering)

use sqlx::FromRow;

use super::{author::Author, book::Book};

/// Junction row keyed by `(author_id, book_id)`.
///
/// `order` is the author's 0-based position in the book's author list.
/// The table itself is unordered; readers sort by `order` before exposing it.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct AuthorBook {
    pub author_id: i32,
    pub book_id: i32,
    pub order: i32,
    #[sqlx(skip)]
    pub author: Option<Author>,
    #[sqlx(skip)]
    pub book: Option<Book>,
}

impl AuthorBook {
    /// Unpersisted link to an author, book id and order still unset
    pub fn for_author(author_id: i32) -> Self {
        Self {
            author_id,
            ..Default::default()
        }
    }
}
