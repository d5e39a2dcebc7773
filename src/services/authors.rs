//! Author management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorCreate, AuthorSummary, AuthorWithBooks},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List every author
    pub async fn list(&self) -> AppResult<Vec<AuthorSummary>> {
        let authors = self.repository.authors.list().await?;
        Ok(authors.iter().map(AuthorSummary::from).collect())
    }

    /// Get an author with the books they are linked to
    pub async fn get(&self, id: i32) -> AppResult<AuthorWithBooks> {
        let author = self
            .repository
            .authors
            .get_with_books(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;
        Ok(AuthorWithBooks::from(&author))
    }

    /// Authors whose name contains `name`
    pub async fn search_by_name(&self, name: &str) -> AppResult<Vec<AuthorSummary>> {
        let authors = self.repository.authors.search_by_name(name).await?;
        Ok(authors.iter().map(AuthorSummary::from).collect())
    }

    /// Create an author; names are unique
    pub async fn create(&self, mut data: AuthorCreate) -> AppResult<AuthorSummary> {
        data.name = data.name.trim().to_string();
        data.validate()?;

        if self.repository.authors.name_exists(&data.name, None).await? {
            tracing::warn!("Author create rejected: duplicate name {:?}", data.name);
            return Err(AppError::Conflict(format!(
                "An author named {} already exists",
                data.name
            )));
        }

        let created = self.repository.authors.create(&Author::from(data)).await?;
        tracing::info!(author_id = created.id, "author created");
        Ok(AuthorSummary::from(&created))
    }

    /// Replace an author's fields
    pub async fn update(&self, id: i32, mut data: AuthorCreate) -> AppResult<()> {
        data.name = data.name.trim().to_string();
        data.validate()?;

        if !self.repository.authors.exists(id).await? {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }

        if self.repository.authors.name_exists(&data.name, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "An author named {} already exists",
                data.name
            )));
        }

        let author = Author {
            id,
            ..Author::from(data)
        };
        self.repository.authors.update(&author).await?;
        tracing::info!(author_id = id, "author updated");
        Ok(())
    }

    /// Delete an author and their book links
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repository.authors.exists(id).await? {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "author deleted");
        Ok(())
    }
}
