//! Comments service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Comment, CommentCreate, CommentSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct CommentsService {
    repository: Repository,
}

impl CommentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn ensure_book(&self, book_id: i32) -> AppResult<()> {
        if !self.repository.books.exists(book_id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", book_id)));
        }
        Ok(())
    }

    /// Comments of a book
    pub async fn list(&self, book_id: i32) -> AppResult<Vec<CommentSummary>> {
        self.ensure_book(book_id).await?;
        let comments = self.repository.comments.list_for_book(book_id).await?;
        Ok(comments.iter().map(CommentSummary::from).collect())
    }

    /// One comment, which must belong to `book_id`
    pub async fn get(&self, book_id: i32, id: i32) -> AppResult<CommentSummary> {
        self.ensure_book(book_id).await?;
        self.repository
            .comments
            .get(id)
            .await?
            .filter(|c| c.book_id == book_id)
            .map(|c| CommentSummary::from(&c))
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found for book {}", id, book_id)))
    }

    /// Add a comment to an existing book
    pub async fn create(&self, book_id: i32, mut data: CommentCreate) -> AppResult<CommentSummary> {
        data.body = data.body.trim().to_string();
        data.validate()?;
        self.ensure_book(book_id).await?;

        let comment = Comment {
            book_id,
            ..Comment::from(data)
        };
        let created = self.repository.comments.create(&comment).await?;
        tracing::info!(book_id, comment_id = created.id, "comment created");
        Ok(CommentSummary::from(&created))
    }
}
