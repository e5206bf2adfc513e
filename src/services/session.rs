//! Per-session key/value counters

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::AppResult;

/// Field holding the home page visit counter
pub const VISITS_FIELD: &str = "num_visits";

/// Backing store for session values
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Atomically add one to `field` of the session and return the new value
    async fn increment(&self, session_id: &str, field: &str) -> AppResult<i64>;
}

/// Process-local store, used in development and tests
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, HashMap<String, i64>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn increment(&self, session_id: &str, field: &str) -> AppResult<i64> {
        let mut sessions = self.sessions.lock().await;
        let value = sessions
            .entry(session_id.to_string())
            .or_default()
            .entry(field.to_string())
            .or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Records a home page visit and returns how many came before it
    pub async fn count_visit(&self, session_id: &str) -> AppResult<i64> {
        let visits = self.store.increment(session_id, VISITS_FIELD).await?;
        tracing::debug!("Session {} visit #{}", session_id, visits);
        Ok(visits - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_memory_store_counts_per_session() {
        let store = MemorySessionStore::new();
        assert_eq!(store.increment("a", VISITS_FIELD).await.unwrap(), 1);
        assert_eq!(store.increment("a", VISITS_FIELD).await.unwrap(), 2);
        assert_eq!(store.increment("b", VISITS_FIELD).await.unwrap(), 1);
        assert_eq!(store.increment("a", "other").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_first_visit_reports_zero() {
        let sessions = SessionService::new(Arc::new(MemorySessionStore::new()));
        assert_eq!(sessions.count_visit("s1").await.unwrap(), 0);
        assert_eq!(sessions.count_visit("s1").await.unwrap(), 1);
        assert_eq!(sessions.count_visit("s1").await.unwrap(), 2);
        assert_eq!(sessions.count_visit("s2").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_count_visit_uses_visits_field() {
        let mut store = MockSessionStore::new();
        store
            .expect_increment()
            .withf(|session_id, field| {
                session_id.to_string() == "abc" && field.to_string() == VISITS_FIELD
            })
            .times(1)
            .returning(|_, _| Ok(5));

        let sessions = SessionService::new(Arc::new(store));
        assert_eq!(sessions.count_visit("abc").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let mut store = MockSessionStore::new();
        store
            .expect_increment()
            .returning(|_, _| Err(AppError::Internal("store down".to_string())));

        let sessions = SessionService::new(Arc::new(store));
        assert!(matches!(
            sessions.count_visit("abc").await,
            Err(AppError::Internal(_))
        ));
    }
}
