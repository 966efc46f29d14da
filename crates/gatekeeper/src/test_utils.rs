//! In-memory application state for handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{response::Response, Router};
use chrono::Utc;
use lilt::config::GateConfig;
use lilt::gate::Gate;
use lilt::registry::default_registry;
use lilt::store::MemoryStore;
use uuid::Uuid;

use crate::config::Config;
use crate::db::{PostRow, PostStore};
use crate::state::AppState;

/// A post captured by [`MemoryPostStore`].
#[derive(Debug, Clone)]
pub struct InsertedPost {
    pub row: PostRow,
    pub author_id: Uuid,
}

impl std::ops::Deref for InsertedPost {
    type Target = PostRow;

    fn deref(&self) -> &PostRow {
        &self.row
    }
}

/// Post store that keeps rows in memory and can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    rows: Mutex<Vec<InsertedPost>>,
    failure: Mutex<Option<String>>,
}

impl MemoryPostStore {
    pub fn inserted(&self) -> Vec<InsertedPost> {
        self.rows.lock().unwrap().clone()
    }

    /// Make every subsequent call fail with an error rendered like `err`.
    pub fn fail_with(&self, err: sqlx::Error) {
        *self.failure.lock().unwrap() = Some(err.to_string());
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        match self.failure.lock().unwrap().as_ref() {
            Some(msg) => Err(sqlx::Error::Protocol(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn insert_post(&self, body: &str, author_id: Uuid) -> Result<(), sqlx::Error> {
        self.check()?;
        self.rows.lock().unwrap().push(InsertedPost {
            row: PostRow {
                id: Uuid::new_v4(),
                body: body.to_string(),
                created_at: Utc::now(),
            },
            author_id,
        });
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<PostRow>, sqlx::Error> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().rev().map(|post| post.row.clone()).collect())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check()
    }
}

/// Router plus handles on its in-memory backends.
pub struct TestApp {
    pub router: Router,
    pub posts: Arc<MemoryPostStore>,
    pub store: MemoryStore,
}

/// App with the built-in rules and `profiles` rows already present.
pub fn test_app(profiles: i64) -> TestApp {
    test_app_with_store(MemoryStore::new().with_count("profiles", profiles))
}

pub fn test_app_with_store(store: MemoryStore) -> TestApp {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        environment: "test".to_string(),
        gate: GateConfig::default(),
    };
    let gate = Gate::from_config(&config.gate, default_registry()).unwrap();
    let posts = Arc::new(MemoryPostStore::default());

    let state = AppState::new(gate, Arc::new(store.clone()), posts.clone(), config);
    TestApp {
        router: crate::create_router(state),
        posts,
        store,
    }
}

/// Collect a response body as JSON.
pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
