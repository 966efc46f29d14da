//! Application state shared across all handlers.

use std::sync::Arc;

use lilt::gate::Gate;
use lilt::store::PolicyStore;

use crate::config::Config;
use crate::db::PostStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Compiled rules for every guarded action
    pub gate: Arc<Gate>,
    /// Read-only handle predicates query through
    pub policy_store: Arc<dyn PolicyStore>,
    /// Post storage
    pub posts: Arc<dyn PostStore>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        gate: Gate,
        policy_store: Arc<dyn PolicyStore>,
        posts: Arc<dyn PostStore>,
        config: Config,
    ) -> Self {
        Self {
            gate: Arc::new(gate),
            policy_store,
            posts,
            config: Arc::new(config),
        }
    }
}
