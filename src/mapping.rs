//! Conversions between stored entities and API shapes.
//!
//! Every conversion is pure. Those reading a navigation collection expect the
//! repository to have loaded it and yield an empty list when it was not.

use crate::models::{
    Author, AuthorBook, AuthorCreate, AuthorSummary, AuthorWithBooks, Book, BookCreate,
    BookPatch, BookSummary, BookWithAuthors, Comment, CommentCreate, CommentSummary,
};

// --- Authors ---

impl From<&Author> for AuthorSummary {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            name: author.name.clone(),
        }
    }
}

impl From<&Author> for AuthorWithBooks {
    fn from(author: &Author) -> Self {
        let books = author
            .books
            .iter()
            .flatten()
            .filter_map(|link| {
                link.book.as_ref().map(|book| BookSummary {
                    id: link.book_id,
                    title: book.title.clone(),
                })
            })
            .collect();

        Self {
            id: author.id,
            name: author.name.clone(),
            books,
        }
    }
}

impl From<AuthorCreate> for Author {
    fn from(data: AuthorCreate) -> Self {
        Self {
            name: data.name,
            ..Default::default()
        }
    }
}

// --- Books ---

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
        }
    }
}

/// Authors come out in link order; callers sort the links first.
impl From<&Book> for BookWithAuthors {
    fn from(book: &Book) -> Self {
        let authors = book
            .authors
            .iter()
            .flatten()
            .filter_map(|link| {
                link.author.as_ref().map(|author| AuthorSummary {
                    id: link.author_id,
                    name: author.name.clone(),
                })
            })
            .collect();

        Self {
            id: book.id,
            title: book.title.clone(),
            publication_date: book.publication_date,
            authors,
        }
    }
}

/// One link per submitted author id. Ordering is assigned by the book service.
impl From<BookCreate> for Book {
    fn from(data: BookCreate) -> Self {
        let mut book = Book::default();
        apply_book_create(data, &mut book);
        book
    }
}

/// Overwrite a loaded book with a full-replace payload.
///
/// The title is replaced and the link collection rebuilt from scratch;
/// `publication_date` and comments are left alone.
pub fn apply_book_create(data: BookCreate, book: &mut Book) {
    book.title = data.title;
    book.authors = Some(
        data.author_ids
            .into_iter()
            .map(|author_id| AuthorBook {
                book_id: book.id,
                ..AuthorBook::for_author(author_id)
            })
            .collect(),
    );
}

impl From<&Book> for BookPatch {
    fn from(book: &Book) -> Self {
        Self {
            title: Some(book.title.clone()),
            publication_date: book.publication_date,
        }
    }
}

/// Write a validated patch shape back onto the entity. Links are untouched.
pub fn apply_book_patch(patch: BookPatch, book: &mut Book) {
    if let Some(title) = patch.title {
        book.title = title;
    }
    book.publication_date = patch.publication_date;
}

// --- Comments ---

/// `book_id` stays unset until the parent book has been checked
impl From<CommentCreate> for Comment {
    fn from(data: CommentCreate) -> Self {
        Self {
            body: data.body,
            ..Default::default()
        }
    }
}

impl From<&Comment> for CommentSummary {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            body: comment.body.clone(),
        }
    }
}
