//! Error types for rule parsing, evaluation and predicate resolution.
//!
//! Every error aborts evaluation. The gate denies on all of them, but the
//! [`ErrorKind`] stays visible so that configuration defects can be told apart
//! from transient store failures and from plain policy denials.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::ast::AtomKind;
use crate::operators::Arity;

/// Malformed rule source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("empty source")]
    EmptySource,

    #[error("unexpected end of input: '(' at token {open} is never closed")]
    UnexpectedEof { open: usize },

    #[error("unbalanced close: ')' at token {position} has no matching '('")]
    UnbalancedClose { position: usize },

    #[error("empty list at token {position}")]
    EmptyList { position: usize },

    #[error("trailing input at token {position} after a complete expression")]
    TrailingInput { position: usize },

    #[error("expression nested deeper than {max} levels")]
    TooDeep { max: usize },
}

/// Failure reported by a [`crate::store::PolicyStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid table name '{0}'")]
    InvalidTable(String),
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Failure raised while a predicate resolves its fact.
#[derive(Debug, Error)]
pub enum PredicateError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Failed(String),
}

/// Main error type for the rule engine.
#[derive(Debug, Error)]
pub enum LiltError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("'{operator}' expects {expected} operand(s), got {got}")]
    Arity {
        operator: String,
        expected: Arity,
        got: usize,
    },

    #[error("'{operator}' cannot compare {left} with {right}")]
    Type {
        operator: &'static str,
        left: AtomKind,
        right: AtomKind,
    },

    #[error("predicate '{name}' failed: {source}")]
    Predicate {
        name: String,
        #[source]
        source: PredicateError,
    },

    #[error("evaluation exceeded its deadline of {0:?}")]
    Timeout(Duration),

    #[error("rule must produce a boolean, but produces a {0}")]
    NonBooleanRule(AtomKind),

    #[error("'{0}' is a built-in operator and cannot be registered as a predicate")]
    ReservedName(String),

    #[error("evaluation nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Coarse classification of a [`LiltError`] for logs and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    UnknownSymbol,
    Arity,
    Type,
    Predicate,
    Configuration,
}

impl LiltError {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LiltError::Syntax(_) | LiltError::TooDeep(_) => ErrorKind::Syntax,
            LiltError::UnknownSymbol(_) => ErrorKind::UnknownSymbol,
            LiltError::Arity { .. } => ErrorKind::Arity,
            LiltError::Type { .. } => ErrorKind::Type,
            LiltError::Predicate { .. } | LiltError::Timeout(_) => ErrorKind::Predicate,
            LiltError::NonBooleanRule(_) | LiltError::ReservedName(_) => ErrorKind::Configuration,
        }
    }

    /// Returns the error code string for this error
    pub fn error_code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Syntax => "SYNTAX_ERROR",
            ErrorKind::UnknownSymbol => "UNKNOWN_SYMBOL",
            ErrorKind::Arity => "ARITY_ERROR",
            ErrorKind::Type => "TYPE_ERROR",
            ErrorKind::Predicate => "PREDICATE_ERROR",
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
        }
    }

    /// Transient failures may succeed if the whole action is retried.
    /// Everything else is a defect in the rule or its registration.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Predicate
    }
}

/// Failure while loading or compiling the configured rule set.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read rule set {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule set JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value '{value}' for {name}")]
    InvalidVar { name: &'static str, value: String },

    #[error("action '{0}' has more than one enabled rule")]
    DuplicateAction(String),

    #[error("rule for action '{action}' does not compile: {source}")]
    Rule {
        action: String,
        #[source]
        source: LiltError,
    },
}
