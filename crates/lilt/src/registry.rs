//! Name-to-predicate registry.
//!
//! Operators are a closed set; predicates are open. Adding a predicate means
//! registering it here, with no change to the lexer or parser.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::LiltError;
use crate::operators::Operator;
use crate::predicates::{
    CallerId, IsSignedIn, Predicate, RecordCount, CALLER_ID, IS_SIGNED_IN, POSTS_COUNT,
    PROFILES_COUNT,
};

/// Registry of named predicates.
///
/// # Example
///
/// ```ignore
/// use lilt::registry::PredicateRegistry;
///
/// let mut registry = PredicateRegistry::new();
/// registry.register("is-signed-in", IsSignedIn)?;
/// registry.register("comments-count", RecordCount::new("comments", "Number of comments"))?;
///
/// assert!(registry.contains("comments-count"));
/// ```
#[derive(Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Arc<dyn Predicate>>,
}

impl PredicateRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate under `name`, replacing any previous entry.
    ///
    /// Operator names are reserved and rejected.
    pub fn register<P>(&mut self, name: impl Into<String>, predicate: P) -> Result<(), LiltError>
    where
        P: Predicate + 'static,
    {
        let name = name.into();
        if Operator::from_name(&name).is_some() {
            return Err(LiltError::ReservedName(name));
        }

        if self.predicates.insert(name.clone(), Arc::new(predicate)).is_some() {
            tracing::debug!(predicate = %name, "Replaced registered predicate");
        }
        Ok(())
    }

    /// Check if a predicate is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Look up a predicate by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Predicate>> {
        self.predicates.get(name)
    }

    /// List all registered predicate names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl std::fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("predicates", &self.list())
            .finish()
    }
}

/// Registry with every built-in predicate.
pub fn default_registry() -> PredicateRegistry {
    let mut predicates: HashMap<String, Arc<dyn Predicate>> = HashMap::new();
    predicates.insert(IS_SIGNED_IN.to_string(), Arc::new(IsSignedIn));
    predicates.insert(CALLER_ID.to_string(), Arc::new(CallerId));
    predicates.insert(PROFILES_COUNT.to_string(), Arc::new(RecordCount::profiles()));
    predicates.insert(POSTS_COUNT.to_string(), Arc::new(RecordCount::posts()));
    PredicateRegistry { predicates }
}
