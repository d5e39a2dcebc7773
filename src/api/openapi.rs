//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, comments, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Authors, books and comments REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::search_authors,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::get_book,
        books::create_book,
        books::replace_book,
        books::patch_book,
        books::delete_book,
        // Comments
        comments::list_comments,
        comments::get_comment,
        comments::create_comment,
    ),
    components(
        schemas(
            // Authors
            crate::models::AuthorSummary,
            crate::models::AuthorWithBooks,
            crate::models::AuthorCreate,
            // Books
            crate::models::BookSummary,
            crate::models::BookWithAuthors,
            crate::models::BookCreate,
            crate::models::BookPatch,
            crate::patch::PatchOperation,
            // Comments
            crate::models::CommentSummary,
            crate::models::CommentCreate,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management and author ordering"),
        (name = "comments", description = "Comments on books")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
