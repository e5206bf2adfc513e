//! Business logic services

pub mod catalog;
pub mod loans;
pub mod redis;
pub mod session;
pub mod users;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

use self::session::SessionStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub users: users::UsersService,
    pub sessions: session::SessionService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository and session store
    pub fn new(repository: Repository, config: &AppConfig, store: Arc<dyn SessionStore>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone(), config.catalog.clone()),
            loans: loans::LoansService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            sessions: session::SessionService::new(store),
            repository,
        }
    }

    /// Checks that the database answers
    pub async fn ready(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
