//! lilt - a tiny s-expression policy language for gating write actions.
//!
//! Rules are static strings attached to a guarded action site. A rule is
//! tokenized, parsed into an [`ast::Expr`] tree and evaluated against a
//! per-request [`context::PolicyContext`]. Named predicates resolve facts about
//! the caller or about external state through an async [`store::PolicyStore`].
//!
//! # Example
//!
//! ```ignore
//! use lilt::prelude::*;
//!
//! let engine = Engine::new(default_registry());
//! let rule = Rule::compile("(and (is-signed-in) (< (profiles-count) 8888))", engine.registry())?;
//!
//! let ctx = PolicyContext::signed_in(user_id, store);
//! if engine.evaluate_rule(&rule, &ctx).await? {
//!     // Allow the write
//! }
//! ```
//!
//! # Language
//!
//! - `(and ...)`, `(or ...)` short-circuit left to right
//! - `(not x)` negates by truthiness
//! - `(= a b)`, `(< a b)`, `(> a b)`, `(<= a b)`, `(>= a b)` evaluate both operands concurrently
//! - `(name)` resolves a registered zero-argument predicate
//! - `;` starts a comment that runs to the end of the line
//!
//! # Features
//!
//! - `postgres` - Enable [`store::PgPolicyStore`] backed by a sqlx `PgPool`

pub mod ast;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod gate;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod predicates;
pub mod registry;
pub mod rule;
pub mod store;

/// Prelude module - import everything you need with `use lilt::prelude::*`
pub mod prelude {
    pub use crate::ast::{Atom, AtomKind, Expr};
    pub use crate::config::{GateConfig, NamedRule, RuleSet};
    pub use crate::context::{Caller, PolicyContext};
    pub use crate::error::{
        ConfigError, ErrorKind, LiltError, PredicateError, StoreError, SyntaxError,
    };
    pub use crate::evaluator::Engine;
    pub use crate::gate::{Decision, Gate, GateError};
    pub use crate::operators::{Arity, Comparison, Operator};
    pub use crate::predicates::{CallerId, IsSignedIn, Predicate, RecordCount};
    pub use crate::registry::{default_registry, PredicateRegistry};
    pub use crate::rule::Rule;
    pub use crate::store::{MemoryStore, PolicyStore};

    #[cfg(feature = "postgres")]
    pub use crate::store::PgPolicyStore;
}
