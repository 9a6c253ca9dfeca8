//! Local library catalog server
//!
//! A REST JSON API over a small lending library: books, authors, genres,
//! languages, physical copies and their loans.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use crate::config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build repositories and services over an existing pool
    pub fn new(
        config: AppConfig,
        pool: sqlx::PgPool,
        redis_service: services::redis::RedisService,
    ) -> Self {
        let repository = repository::Repository::new(pool);
        let services = services::Services::new(repository, config.auth.clone(), redis_service);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
