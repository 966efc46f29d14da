//! Built-in zero-argument predicates.
//!
//! A predicate resolves one fact, either about the caller or about external
//! state reached through the context's [`PolicyStore`](crate::store::PolicyStore).
//! Failures propagate; a predicate never reports a failed lookup as `false`.

use async_trait::async_trait;

use crate::ast::{Atom, AtomKind};
use crate::context::PolicyContext;
use crate::error::PredicateError;

pub const IS_SIGNED_IN: &str = "is-signed-in";
pub const CALLER_ID: &str = "caller-id";
pub const PROFILES_COUNT: &str = "profiles-count";
pub const POSTS_COUNT: &str = "posts-count";

/// A named fact that rules can reference as `(name)`.
#[async_trait]
pub trait Predicate: Send + Sync {
    /// Resolve the fact for this context.
    async fn resolve(&self, ctx: &PolicyContext) -> Result<Atom, PredicateError>;

    /// The kind of atom [`resolve`](Predicate::resolve) produces.
    fn kind(&self) -> AtomKind;

    /// Human-readable description for logs and rule listings.
    fn description(&self) -> &'static str;
}

// =============================================================================
// Caller identity
// =============================================================================

/// True when the request carries an authenticated caller.
pub struct IsSignedIn;

#[async_trait]
impl Predicate for IsSignedIn {
    async fn resolve(&self, ctx: &PolicyContext) -> Result<Atom, PredicateError> {
        Ok(Atom::Bool(ctx.is_signed_in()))
    }

    fn kind(&self) -> AtomKind {
        AtomKind::Bool
    }

    fn description(&self) -> &'static str {
        "Caller is authenticated"
    }
}

/// The caller's id as a string; empty for anonymous callers.
pub struct CallerId;

#[async_trait]
impl Predicate for CallerId {
    async fn resolve(&self, ctx: &PolicyContext) -> Result<Atom, PredicateError> {
        Ok(Atom::Str(
            ctx.caller()
                .map(|caller| caller.id.to_string())
                .unwrap_or_default(),
        ))
    }

    fn kind(&self) -> AtomKind {
        AtomKind::Str
    }

    fn description(&self) -> &'static str {
        "Caller id, or an empty string when anonymous"
    }
}

// =============================================================================
// Aggregate facts
// =============================================================================

/// Row count of a table.
pub struct RecordCount {
    table: &'static str,
    description: &'static str,
}

impl RecordCount {
    pub const fn new(table: &'static str, description: &'static str) -> Self {
        Self { table, description }
    }

    /// Number of registered user profiles.
    pub const fn profiles() -> Self {
        Self::new("profiles", "Number of user profiles")
    }

    /// Number of stored posts.
    pub const fn posts() -> Self {
        Self::new("posts", "Number of posts")
    }

    pub fn table(&self) -> &'static str {
        self.table
    }
}

#[async_trait]
impl Predicate for RecordCount {
    async fn resolve(&self, ctx: &PolicyContext) -> Result<Atom, PredicateError> {
        let count = ctx.store().count(self.table).await?;
        Ok(Atom::from(count))
    }

    fn kind(&self) -> AtomKind {
        AtomKind::Number
    }

    fn description(&self) -> &'static str {
        self.description
    }
}
