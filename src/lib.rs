//! Bookshelf server
//!
//! A REST JSON API for managing authors, books and comments, where books keep
//! an ordered list of authors.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod mapping;
pub mod models;
pub mod patch;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
        }
    }
}
