//! Async tree-walking evaluator.
//!
//! `and`/`or` run their operands strictly left to right and stop at the first
//! decisive value, so predicates to the right of it are never resolved.
//! Comparison operands are polled concurrently and joined before comparing.

use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::ast::{Atom, Expr};
use crate::cache::RuleCache;
use crate::context::PolicyContext;
use crate::error::{LiltError, SyntaxError};
use crate::operators::{Arity, Operator};
use crate::parser::{parse_source, MAX_PARSE_DEPTH};
use crate::registry::PredicateRegistry;
use crate::rule::Rule;

/// Maximum nesting the evaluator descends into.
pub const MAX_EVAL_DEPTH: usize = MAX_PARSE_DEPTH * 2;

/// Evaluates rule trees against a predicate registry.
#[derive(Debug)]
pub struct Engine {
    registry: Arc<PredicateRegistry>,
    cache: Option<RuleCache>,
}

impl Engine {
    pub fn new(registry: PredicateRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            cache: None,
        }
    }

    /// Cache parsed trees by source text.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(RuleCache::new());
        self
    }

    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    pub fn cache(&self) -> Option<&RuleCache> {
        self.cache.as_ref()
    }

    /// Parse `source`, going through the cache when enabled.
    pub fn parse(&self, source: &str) -> Result<Arc<Expr>, LiltError> {
        let expr = match &self.cache {
            Some(cache) => cache.get_or_parse(source)?,
            None => Arc::new(parse_source(source)?),
        };
        Ok(expr)
    }

    /// Parse and compile `source` against this engine's registry.
    pub fn compile(&self, source: &str) -> Result<Rule, LiltError> {
        let expr = self.parse(source)?;
        Rule::from_parsed(source, expr, &self.registry)
    }

    /// Evaluate an expression to an atom.
    pub async fn evaluate(&self, expr: &Expr, ctx: &PolicyContext) -> Result<Atom, LiltError> {
        self.eval(expr, ctx, 0).await
    }

    /// Evaluate a compiled rule to a decision.
    pub async fn evaluate_rule(&self, rule: &Rule, ctx: &PolicyContext) -> Result<bool, LiltError> {
        Ok(self.evaluate(rule.expr(), ctx).await?.is_truthy())
    }

    /// Parse and evaluate uncompiled source, coercing the result by truthiness.
    pub async fn run(&self, source: &str, ctx: &PolicyContext) -> Result<bool, LiltError> {
        let expr = self.parse(source)?;
        Ok(self.evaluate(&expr, ctx).await?.is_truthy())
    }

    fn eval<'a>(
        &'a self,
        expr: &'a Expr,
        ctx: &'a PolicyContext,
        depth: usize,
    ) -> BoxFuture<'a, Result<Atom, LiltError>> {
        async move {
            if depth > MAX_EVAL_DEPTH {
                return Err(LiltError::TooDeep(MAX_EVAL_DEPTH));
            }

            match expr {
                Expr::Atom(atom) => Ok(atom.clone()),
                // No bindings: a bare symbol in operand position is its own name
                Expr::Symbol(name) => Ok(Atom::Str(name.clone())),
                Expr::List(items) => self.eval_list(items, ctx, depth).await,
            }
        }
        .boxed()
    }

    async fn eval_list(
        &self,
        items: &[Expr],
        ctx: &PolicyContext,
        depth: usize,
    ) -> Result<Atom, LiltError> {
        let Some((head, operands)) = items.split_first() else {
            return Err(SyntaxError::EmptyList { position: 0 }.into());
        };
        let name = head.head_name()?;

        if let Some(op) = Operator::from_name(name) {
            op.check_arity(operands.len())?;
            return self.eval_operator(op, operands, ctx, depth).await;
        }

        let predicate = self
            .registry
            .get(name)
            .ok_or_else(|| LiltError::UnknownSymbol(name.to_string()))?;
        if !operands.is_empty() {
            return Err(LiltError::Arity {
                operator: name.to_string(),
                expected: Arity::Exactly(0),
                got: operands.len(),
            });
        }

        let atom = predicate
            .resolve(ctx)
            .await
            .map_err(|source| LiltError::Predicate {
                name: name.to_string(),
                source,
            })?;
        tracing::trace!(predicate = name, value = %atom, "Resolved predicate");
        Ok(atom)
    }

    async fn eval_operator(
        &self,
        op: Operator,
        operands: &[Expr],
        ctx: &PolicyContext,
        depth: usize,
    ) -> Result<Atom, LiltError> {
        match op {
            Operator::And => {
                for operand in operands {
                    if !self.eval(operand, ctx, depth + 1).await?.is_truthy() {
                        return Ok(Atom::Bool(false));
                    }
                }
                Ok(Atom::Bool(true))
            }
            Operator::Or => {
                for operand in operands {
                    if self.eval(operand, ctx, depth + 1).await?.is_truthy() {
                        return Ok(Atom::Bool(true));
                    }
                }
                Ok(Atom::Bool(false))
            }
            Operator::Not => {
                let value = self.eval(&operands[0], ctx, depth + 1).await?;
                Ok(Atom::Bool(!value.is_truthy()))
            }
            Operator::Compare(cmp) => {
                let (left, right) = future::try_join(
                    self.eval(&operands[0], ctx, depth + 1),
                    self.eval(&operands[1], ctx, depth + 1),
                )
                .await?;
                Ok(Atom::Bool(cmp.apply(&left, &right)?))
            }
        }
    }
}
