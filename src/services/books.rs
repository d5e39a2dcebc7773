//! Book management service

use std::collections::HashSet;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    mapping::{apply_book_create, apply_book_patch},
    models::{AuthorBook, Book, BookCreate, BookPatch, BookSummary, BookWithAuthors},
    patch::{self, PatchOperation},
    repository::Repository,
};

/// Give each link its position in the submitted list: 0, 1, 2, ...
///
/// Run on every create and full update of a book's author list.
pub fn assign_author_order(links: &mut [AuthorBook]) {
    for (idx, link) in links.iter_mut().enumerate() {
        link.order = idx as i32;
    }
}

/// Stored links carry no order; sort them before projecting
pub fn sort_author_links(book: &mut Book) {
    if let Some(links) = book.authors.as_mut() {
        links.sort_by_key(|l| l.order);
    }
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a book with its authors in order
    pub async fn get(&self, id: i32) -> AppResult<BookWithAuthors> {
        let mut book = self
            .repository
            .books
            .get_with_authors(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        sort_author_links(&mut book);
        Ok(BookWithAuthors::from(&book))
    }

    /// Create a book linked to existing authors
    pub async fn create(&self, mut data: BookCreate) -> AppResult<BookSummary> {
        data.title = data.title.trim().to_string();
        data.validate()?;
        self.check_authors(&data.author_ids).await?;

        let mut book = Book::from(data);
        if let Some(links) = book.authors.as_mut() {
            assign_author_order(links);
        }

        let created = self.repository.books.create(&book).await?;
        tracing::info!(
            book_id = created.id,
            authors = book.authors.as_ref().map_or(0, Vec::len),
            "book created"
        );
        Ok(BookSummary::from(&created))
    }

    /// Replace a book's title and its whole author list
    pub async fn replace(&self, id: i32, mut data: BookCreate) -> AppResult<()> {
        data.title = data.title.trim().to_string();
        data.validate()?;

        let mut book = self
            .repository
            .books
            .get_with_authors(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        self.check_authors(&data.author_ids).await?;

        apply_book_create(data, &mut book);
        if let Some(links) = book.authors.as_mut() {
            assign_author_order(links);
        }

        self.repository.books.update(&book).await?;
        tracing::info!(book_id = id, "book replaced");
        Ok(())
    }

    /// Apply patch operations to a book's title and publication date.
    ///
    /// Author links are never touched. Nothing is written if any operation
    /// or the final validation fails; all failures are returned together.
    pub async fn patch(&self, id: i32, ops: &[PatchOperation]) -> AppResult<()> {
        let mut book = self
            .repository
            .books
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        let mut doc = BookPatch::from(&book);
        let errors = patch::apply(&mut doc, ops);
        if !errors.is_empty() {
            tracing::warn!(book_id = id, errors = errors.len(), "book patch rejected");
            return Err(AppError::InvalidFields(errors));
        }

        // `get` leaves `authors` unloaded, so the update keeps the link set
        apply_book_patch(doc, &mut book);
        self.repository.books.update(&book).await?;
        tracing::info!(book_id = id, "book patched");
        Ok(())
    }

    /// Delete a book, its links and its comments
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repository.books.exists(id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    /// Author ids must be non-empty, distinct and all present in the store
    async fn check_authors(&self, author_ids: &[i32]) -> AppResult<()> {
        if author_ids.is_empty() {
            return Err(AppError::Validation(
                "A book cannot be created without authors".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = author_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(AppError::Validation(format!(
                "Author {} is listed more than once",
                dup
            )));
        }

        let found = self.repository.authors.existing_ids(author_ids).await?;
        if found.len() != author_ids.len() {
            let missing: Vec<String> = author_ids
                .iter()
                .filter(|id| !found.contains(*id))
                .map(|id| id.to_string())
                .collect();
            tracing::warn!("Book rejected: unknown authors {}", missing.join(", "));
            return Err(AppError::Validation(format!(
                "Authors do not exist: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}
