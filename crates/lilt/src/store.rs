//! Read-only access to the external state that predicates consult.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use crate::error::StoreError;

static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]*$").expect("Failed to compile table name pattern")
});

/// Reject anything that is not a plain lowercase SQL identifier.
pub fn validate_table_name(table: &str) -> Result<(), StoreError> {
    if TABLE_NAME.is_match(table) {
        Ok(())
    } else {
        Err(StoreError::InvalidTable(table.to_string()))
    }
}

/// Query handle for aggregate facts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Total number of rows in `table`.
    async fn count(&self, table: &str) -> Result<i64, StoreError>;
}

/// In-memory store with fixed per-table counts.
///
/// Unknown tables count as zero. A store built with [`MemoryStore::failing`]
/// rejects every query.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    counts: HashMap<String, i64>,
    failure: Option<StoreError>,
    queries: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, table: impl Into<String>, count: i64) -> Self {
        self.counts.insert(table.into(), count);
        self
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Number of `count` calls served so far, including failed ones.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PolicyStore for MemoryStore {
    async fn count(&self, table: &str) -> Result<i64, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        validate_table_name(table)?;

        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.counts.get(table).copied().unwrap_or(0))
    }
}

/// Postgres-backed store.
#[cfg(feature = "postgres")]
#[derive(Debug, Clone)]
pub struct PgPolicyStore {
    pool: sqlx::PgPool,
}

#[cfg(feature = "postgres")]
impl PgPolicyStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[cfg(feature = "postgres")]
#[async_trait]
impl PolicyStore for PgPolicyStore {
    async fn count(&self, table: &str) -> Result<i64, StoreError> {
        // Identifiers cannot be bound as parameters
        validate_table_name(table)?;

        let count: i64 = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;

        tracing::trace!(table, count, "Counted rows");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_validation() {
        assert!(validate_table_name("profiles").is_ok());
        assert!(validate_table_name("_audit_log2").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("Profiles").is_err());
        assert!(validate_table_name("2posts").is_err());
        assert_eq!(
            validate_table_name("posts; DROP TABLE posts"),
            Err(StoreError::InvalidTable("posts; DROP TABLE posts".to_string()))
        );
    }

    #[tokio::test]
    async fn test_memory_store_counts() {
        let store = MemoryStore::new().with_count("profiles", 42);
        assert_eq!(store.count("profiles").await, Ok(42));
        assert_eq!(store.count("posts").await, Ok(0));
        assert_eq!(store.query_count(), 2);
    }

    #[tokio::test]
    async fn test_memory_store_failure() {
        let store = MemoryStore::failing(StoreError::Unavailable("down".to_string()));
        assert_eq!(
            store.count("profiles").await,
            Err(StoreError::Unavailable("down".to_string()))
        );
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_query_counter() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.count("posts").await.unwrap();
        assert_eq!(store.query_count(), 1);
    }
}
