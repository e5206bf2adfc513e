//! Local Library catalog server
//!
//! A REST JSON server for a small lending library: browse books and authors,
//! track borrowed copies and renew loans, and edit the catalog.

use std::sync::Arc;

pub mod access;
pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod repository;
pub mod services;

pub use api::create_router;
pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
