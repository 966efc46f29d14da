//! Decision gate in front of guarded write actions.
//!
//! The gate owns the compiled rule for every guarded action and turns an
//! evaluation into a [`Decision`]. It is fail-closed: only a truthy result
//! permits the action. Errors deny as well, but stay distinguishable from a
//! policy denial so callers can report "try again later" separately from
//! "not allowed".

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use crate::config::GateConfig;
use crate::context::PolicyContext;
use crate::error::{ConfigError, LiltError};
use crate::evaluator::Engine;
use crate::registry::PredicateRegistry;
use crate::rule::Rule;

/// Outcome of one gate decision.
#[derive(Debug)]
pub enum Decision {
    Permit,
    PolicyDenied,
    /// No enabled rule exists for the action
    NoRule,
    Failed(LiltError),
}

impl Decision {
    pub fn is_permit(&self) -> bool {
        matches!(self, Decision::Permit)
    }

    /// Convert into the handler-facing result.
    pub fn into_result(self, action: &str) -> Result<(), GateError> {
        match self {
            Decision::Permit => Ok(()),
            Decision::PolicyDenied => Err(GateError::PolicyDenied {
                action: action.to_string(),
            }),
            Decision::NoRule => Err(GateError::UnknownAction(action.to_string())),
            Decision::Failed(err) => Err(GateError::Evaluation(err)),
        }
    }
}

/// Why a guarded action may not proceed.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("action '{action}' denied by policy")]
    PolicyDenied { action: String },

    #[error("no rule configured for action '{0}'")]
    UnknownAction(String),

    #[error(transparent)]
    Evaluation(#[from] LiltError),
}

impl GateError {
    /// Returns the error code string for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GateError::PolicyDenied { .. } => "POLICY_DENIED",
            GateError::UnknownAction(_) => "UNKNOWN_ACTION",
            GateError::Evaluation(err) => err.error_code(),
        }
    }

    pub fn is_transient(&self) -> bool {
        match self {
            GateError::Evaluation(err) => err.is_transient(),
            _ => false,
        }
    }
}

/// Compiled rules for every guarded action.
#[derive(Debug)]
pub struct Gate {
    engine: Engine,
    rules: HashMap<String, Rule>,
    deadline: Duration,
}

impl Gate {
    pub fn new(engine: Engine, deadline: Duration) -> Self {
        Self {
            engine,
            rules: HashMap::new(),
            deadline,
        }
    }

    /// Build a gate, compiling every enabled rule in the configuration.
    pub fn from_config(config: &GateConfig, registry: PredicateRegistry) -> Result<Self, ConfigError> {
        let mut engine = Engine::new(registry);
        if config.cache {
            engine = engine.with_cache();
        }
        let mut gate = Self::new(engine, config.deadline);

        for named in config.rules.enabled() {
            if gate.rules.contains_key(&named.action) {
                return Err(ConfigError::DuplicateAction(named.action.clone()));
            }
            let rule = gate
                .engine
                .compile(&named.source)
                .map_err(|source| ConfigError::Rule {
                    action: named.action.clone(),
                    source,
                })?;

            tracing::info!(action = %named.action, rule = %rule, "Compiled rule");
            gate.rules.insert(named.action.clone(), rule);
        }

        Ok(gate)
    }

    /// Compile `source` and guard `action` with it, replacing any previous rule.
    pub fn insert_rule(&mut self, action: impl Into<String>, source: &str) -> Result<(), LiltError> {
        let rule = self.engine.compile(source)?;
        self.rules.insert(action.into(), rule);
        Ok(())
    }

    pub fn rule(&self, action: &str) -> Option<&Rule> {
        self.rules.get(action)
    }

    /// Guarded action names, sorted.
    pub fn actions(&self) -> Vec<&str> {
        let mut actions: Vec<&str> = self.rules.keys().map(|s| s.as_str()).collect();
        actions.sort_unstable();
        actions
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Decide whether `action` may proceed for this context.
    pub async fn decide(&self, action: &str, ctx: &PolicyContext) -> Decision {
        let Some(rule) = self.rules.get(action) else {
            tracing::error!(action, code = "UNKNOWN_ACTION", "No rule configured, denying");
            return Decision::NoRule;
        };

        let outcome = tokio::time::timeout(self.deadline, self.engine.evaluate_rule(rule, ctx))
            .await
            .unwrap_or_else(|_| Err(LiltError::Timeout(self.deadline)));

        match outcome {
            Ok(true) => {
                tracing::debug!(action, "Permitted");
                Decision::Permit
            }
            Ok(false) => {
                tracing::info!(action, code = "POLICY_DENIED", "Denied by policy");
                Decision::PolicyDenied
            }
            Err(err) if err.is_transient() => {
                tracing::warn!(action, code = err.error_code(), error = %err, "Denied: policy check failed");
                Decision::Failed(err)
            }
            Err(err) => {
                tracing::error!(action, code = err.error_code(), error = %err, "Denied: rule defect");
                Decision::Failed(err)
            }
        }
    }

    /// Like [`decide`](Gate::decide), shaped for `?` in handlers.
    pub async fn authorize(&self, action: &str, ctx: &PolicyContext) -> Result<(), GateError> {
        self.decide(action, ctx).await.into_result(action)
    }
}
