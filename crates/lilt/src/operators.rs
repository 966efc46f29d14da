//! Built-in operators: boolean connectives and binary comparisons.

use std::cmp::Ordering;
use std::fmt;

use crate::ast::Atom;
use crate::error::LiltError;

/// How many operands an operator or predicate accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Variadic,
    Exactly(usize),
}

impl Arity {
    pub fn accepts(&self, got: usize) -> bool {
        match self {
            Arity::Variadic => true,
            Arity::Exactly(n) => *n == got,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Variadic => write!(f, "any number of"),
            Arity::Exactly(n) => write!(f, "exactly {n}"),
        }
    }
}

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Comparison {
    pub fn name(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Lt => "<",
            Comparison::Gt => ">",
            Comparison::Le => "<=",
            Comparison::Ge => ">=",
        }
    }

    /// Compare two evaluated operands.
    ///
    /// `=` is strict equality: operands of different kinds are never equal.
    /// Ordering works on two numbers or two strings; any other pairing is a
    /// type error.
    pub fn apply(&self, left: &Atom, right: &Atom) -> Result<bool, LiltError> {
        if *self == Comparison::Eq {
            return Ok(left == right);
        }

        let ordering = match (left, right) {
            (Atom::Number(a), Atom::Number(b)) => a.partial_cmp(b),
            (Atom::Str(a), Atom::Str(b)) => Some(a.cmp(b)),
            _ => {
                return Err(LiltError::Type {
                    operator: self.name(),
                    left: left.kind(),
                    right: right.kind(),
                });
            }
        };

        // NaN compares false under every ordering
        let Some(ordering) = ordering else {
            return Ok(false);
        };

        Ok(match self {
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Le => ordering != Ordering::Greater,
            Comparison::Ge => ordering != Ordering::Less,
            Comparison::Eq => ordering == Ordering::Equal,
        })
    }
}

/// Operators reserved by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Not,
    Compare(Comparison),
}

impl Operator {
    /// Every operator name, in a stable order.
    pub const NAMES: [&'static str; 8] = ["and", "or", "not", "=", "<", ">", "<=", ">="];

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "and" => Operator::And,
            "or" => Operator::Or,
            "not" => Operator::Not,
            "=" => Operator::Compare(Comparison::Eq),
            "<" => Operator::Compare(Comparison::Lt),
            ">" => Operator::Compare(Comparison::Gt),
            "<=" => Operator::Compare(Comparison::Le),
            ">=" => Operator::Compare(Comparison::Ge),
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Compare(cmp) => cmp.name(),
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::And | Operator::Or => Arity::Variadic,
            Operator::Not => Arity::Exactly(1),
            Operator::Compare(_) => Arity::Exactly(2),
        }
    }

    /// Check an operand count, producing the arity error on mismatch.
    pub fn check_arity(&self, got: usize) -> Result<(), LiltError> {
        let expected = self.arity();
        if expected.accepts(got) {
            Ok(())
        } else {
            Err(LiltError::Arity {
                operator: self.name().to_string(),
                expected,
                got,
            })
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
