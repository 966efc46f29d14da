//! Compiled rules.
//!
//! Compiling resolves every head against the operators and the predicate
//! registry, checks arities and comparison operand kinds, and requires the
//! rule as a whole to produce a boolean. A compiled rule can still fail at
//! evaluation time, but only because a predicate failed.

use std::fmt;
use std::sync::Arc;

use crate::ast::{Atom, AtomKind, Expr};
use crate::error::{LiltError, SyntaxError};
use crate::operators::{Arity, Comparison, Operator};
use crate::parser::parse_source;
use crate::registry::PredicateRegistry;

/// A rule that passed authoring-time checks against a registry.
#[derive(Debug, Clone)]
pub struct Rule {
    source: String,
    expr: Arc<Expr>,
}

impl Rule {
    /// Parse and check `source`.
    pub fn compile(source: &str, registry: &PredicateRegistry) -> Result<Self, LiltError> {
        let expr = Arc::new(parse_source(source)?);
        Self::from_parsed(source, expr, registry)
    }

    /// Check an already parsed tree.
    pub fn from_parsed(
        source: &str,
        expr: Arc<Expr>,
        registry: &PredicateRegistry,
    ) -> Result<Self, LiltError> {
        match result_kind(&expr, registry)? {
            AtomKind::Bool => Ok(Self {
                source: source.to_string(),
                expr,
            }),
            other => Err(LiltError::NonBooleanRule(other)),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

/// Statically determine the kind of atom `expr` evaluates to.
fn result_kind(expr: &Expr, registry: &PredicateRegistry) -> Result<AtomKind, LiltError> {
    let items = match expr {
        Expr::Atom(atom) => return Ok(atom.kind()),
        Expr::Symbol(_) => return Ok(AtomKind::Str),
        Expr::List(items) => items,
    };

    let Some((head, operands)) = items.split_first() else {
        return Err(SyntaxError::EmptyList { position: 0 }.into());
    };
    let name = head.head_name()?;

    if let Some(op) = Operator::from_name(name) {
        op.check_arity(operands.len())?;
        let kinds = operands
            .iter()
            .map(|operand| result_kind(operand, registry))
            .collect::<Result<Vec<_>, _>>()?;

        if let Operator::Compare(cmp) = op
            && cmp != Comparison::Eq
        {
            // Probe with placeholder atoms so the runtime rules decide
            cmp.apply(&placeholder(kinds[0]), &placeholder(kinds[1]))?;
        }
        return Ok(AtomKind::Bool);
    }

    let predicate = registry
        .get(name)
        .ok_or_else(|| LiltError::UnknownSymbol(name.to_string()))?;
    if !operands.is_empty() {
        return Err(LiltError::Arity {
            operator: name.to_string(),
            expected: Arity::Exactly(0),
            got: operands.len(),
        });
    }
    Ok(predicate.kind())
}

fn placeholder(kind: AtomKind) -> Atom {
    match kind {
        AtomKind::Number => Atom::Number(0.0),
        AtomKind::Bool => Atom::Bool(false),
        AtomKind::Str => Atom::Str(String::new()),
    }
}
