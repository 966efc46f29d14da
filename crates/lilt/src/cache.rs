//! Parse cache keyed by rule source.
//!
//! Parsed trees are immutable, so a cached tree behaves exactly like a fresh
//! parse. Failed parses are not cached.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::ast::Expr;
use crate::error::SyntaxError;
use crate::parser::parse_source;

#[derive(Debug, Default)]
pub struct RuleCache {
    entries: RwLock<HashMap<String, Arc<Expr>>>,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached tree for `source`, parsing it on a miss.
    pub fn get_or_parse(&self, source: &str) -> Result<Arc<Expr>, SyntaxError> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(expr) = entries.get(source) {
                return Ok(Arc::clone(expr));
            }
        }

        let parsed = Arc::new(parse_source(source)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another task may have parsed the same source in the meantime
        let expr = entries.entry(source.to_string()).or_insert(parsed);
        Ok(Arc::clone(expr))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_tree() {
        let cache = RuleCache::new();
        let first = cache.get_or_parse("(not false)").unwrap();
        let second = cache.get_or_parse("(not false)").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(*first, parse_source("(not false)").unwrap());
    }

    #[test]
    fn test_keyed_by_exact_source() {
        let cache = RuleCache::new();
        cache.get_or_parse("(not false)").unwrap();
        cache.get_or_parse("(not  false)").unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_errors_not_cached() {
        let cache = RuleCache::new();
        assert_eq!(
            cache.get_or_parse("(and"),
            Err(SyntaxError::UnexpectedEof { open: 0 })
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = RuleCache::new();
        cache.get_or_parse("true").unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
