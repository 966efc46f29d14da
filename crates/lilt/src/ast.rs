//! Rule AST: atoms, bare symbols and nested lists.
//!
//! The helpers [`sym`], [`val`] and [`list`] build trees by hand, which keeps
//! tests readable:
//!
//! ```ignore
//! let expr = list([sym("and"), val(true), val(false)]);
//! assert_eq!(expr.to_string(), "(and true false)");
//! ```

use std::fmt;

use crate::error::LiltError;

/// The kind of an [`Atom`], used in type errors and result-kind checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Number,
    Bool,
    Str,
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomKind::Number => write!(f, "number"),
            AtomKind::Bool => write!(f, "boolean"),
            AtomKind::Str => write!(f, "string"),
        }
    }
}

/// An irreducible value.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Number(f64),
    Bool(bool),
    Str(String),
}

impl Atom {
    pub fn kind(&self) -> AtomKind {
        match self {
            Atom::Number(_) => AtomKind::Number,
            Atom::Bool(_) => AtomKind::Bool,
            Atom::Str(_) => AtomKind::Str,
        }
    }

    /// Everything except `false`, `0` and `""` is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Atom::Bool(b) => *b,
            Atom::Number(n) => *n != 0.0 && !n.is_nan(),
            Atom::Str(s) => !s.is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Atom::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Atom::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Atom::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Number(n) => write!(f, "{n}"),
            Atom::Bool(b) => write!(f, "{b}"),
            Atom::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<bool> for Atom {
    fn from(b: bool) -> Self {
        Atom::Bool(b)
    }
}

impl From<f64> for Atom {
    fn from(n: f64) -> Self {
        Atom::Number(n)
    }
}

impl From<i64> for Atom {
    fn from(n: i64) -> Self {
        Atom::Number(n as f64)
    }
}

impl From<i32> for Atom {
    fn from(n: i32) -> Self {
        Atom::Number(f64::from(n))
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom::Str(s.to_owned())
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Atom::Str(s)
    }
}

/// A parsed rule expression.
///
/// Lists are never empty: the parser rejects `()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Atom(Atom),
    /// A bare token in head position names an operator or predicate.
    /// Anywhere else it evaluates to a string atom of its own text.
    Symbol(String),
    List(Vec<Expr>),
}

impl Expr {
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Expr::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Expr]> {
        match self {
            Expr::List(items) => Some(items),
            _ => None,
        }
    }

    /// The name this expression dispatches on when it sits in head position.
    ///
    /// Quoted strings dispatch by their text just like symbols. Any other head
    /// is reported as an unknown symbol carrying its rendered form.
    pub(crate) fn head_name(&self) -> Result<&str, LiltError> {
        match self {
            Expr::Symbol(name) | Expr::Atom(Atom::Str(name)) => Ok(name),
            other => Err(LiltError::UnknownSymbol(other.to_string())),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Atom(atom) => write!(f, "{atom}"),
            Expr::Symbol(name) => write!(f, "{name}"),
            Expr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<Atom> for Expr {
    fn from(atom: Atom) -> Self {
        Expr::Atom(atom)
    }
}

/// Build a bare symbol.
pub fn sym(name: &str) -> Expr {
    Expr::Symbol(name.to_owned())
}

/// Build a literal atom.
pub fn val(value: impl Into<Atom>) -> Expr {
    Expr::Atom(value.into())
}

/// Build a list form.
pub fn list(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::List(items.into_iter().collect())
}
