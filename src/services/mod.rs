//! Business logic services

pub mod authors;
pub mod books;
pub mod comments;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub comments: comments::CommentsService,
    repository: Repository,
}

impl Services {
    /// Create all services over the given repository handle
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            comments: comments::CommentsService::new(repository.clone()),
            repository,
        }
    }

    /// Check the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
