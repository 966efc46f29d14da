//! Per-decision evaluation context.
//!
//! A context carries exactly two things: who is calling, and a read-only
//! handle for querying external state. It is built fresh for every decision
//! and never shared between concurrent evaluations.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::store::PolicyStore;

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// Subject id issued by the identity provider
    pub id: Uuid,
}

/// Evaluation context handed to predicates.
pub struct PolicyContext {
    caller: Option<Caller>,
    store: Arc<dyn PolicyStore>,
}

impl PolicyContext {
    pub fn new(caller: Option<Caller>, store: Arc<dyn PolicyStore>) -> Self {
        Self { caller, store }
    }

    pub fn anonymous(store: Arc<dyn PolicyStore>) -> Self {
        Self::new(None, store)
    }

    pub fn signed_in(id: Uuid, store: Arc<dyn PolicyStore>) -> Self {
        Self::new(Some(Caller { id }), store)
    }

    pub fn caller(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.caller.is_some()
    }

    pub fn store(&self) -> &dyn PolicyStore {
        self.store.as_ref()
    }
}

impl fmt::Debug for PolicyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyContext")
            .field("caller", &self.caller)
            .finish_non_exhaustive()
    }
}
