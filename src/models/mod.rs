//! Data models for Bookshelf
//!
//! Entities mirror the four persisted tables; the transport shapes next to
//! them are what the API reads and writes. Conversions live in `crate::mapping`.

pub mod author;
pub mod author_book;
pub mod book;
pub mod comment;

// Re-export commonly used types
pub use author::{Author, AuthorCreate, AuthorSummary, AuthorWithBooks};
pub use author_book::AuthorBook;
pub use book::{Book, BookCreate, BookPatch, BookSummary, BookWithAuthors};
pub use comment::{Comment, CommentCreate, CommentSummary};
