//! Recursive-descent parser from tokens to [`Expr`].
//!
//! The parser walks an immutable token slice with an explicit cursor. A rule
//! is exactly one expression.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{Atom, Expr};
use crate::error::SyntaxError;
use crate::lexer::{tokenize, Token};

/// Maximum list nesting accepted by the parser
pub const MAX_PARSE_DEPTH: usize = 64;

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("Failed to compile number pattern")
});

/// Parse a token sequence into a single expression.
pub fn parse(tokens: &[Token<'_>]) -> Result<Expr, SyntaxError> {
    if tokens.is_empty() {
        return Err(SyntaxError::EmptySource);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr(0)?;

    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some(Token::Close) => Err(SyntaxError::UnbalancedClose {
            position: parser.pos,
        }),
        Some(_) => Err(SyntaxError::TrailingInput {
            position: parser.pos,
        }),
    }
}

/// Tokenize and parse rule source.
pub fn parse_source(source: &str) -> Result<Expr, SyntaxError> {
    parse(&tokenize(source))
}

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl Parser<'_, '_> {
    fn parse_expr(&mut self, depth: usize) -> Result<Expr, SyntaxError> {
        let Some(token) = self.tokens.get(self.pos).copied() else {
            return Err(SyntaxError::UnexpectedEof { open: self.pos });
        };

        match token {
            Token::Open => {
                if depth >= MAX_PARSE_DEPTH {
                    return Err(SyntaxError::TooDeep {
                        max: MAX_PARSE_DEPTH,
                    });
                }

                let open = self.pos;
                self.pos += 1; // consume '('
                let mut items = Vec::new();
                loop {
                    match self.tokens.get(self.pos) {
                        None => return Err(SyntaxError::UnexpectedEof { open }),
                        Some(Token::Close) => {
                            self.pos += 1; // consume ')'
                            break;
                        }
                        Some(_) => items.push(self.parse_expr(depth + 1)?),
                    }
                }

                if items.is_empty() {
                    return Err(SyntaxError::EmptyList { position: open });
                }
                Ok(Expr::List(items))
            }
            Token::Close => Err(SyntaxError::UnbalancedClose { position: self.pos }),
            Token::Text(text) => {
                self.pos += 1;
                Ok(classify(text))
            }
        }
    }
}

/// Numbers first, then booleans, then quoted strings; anything else is a symbol.
fn classify(text: &str) -> Expr {
    if NUMBER_PATTERN.is_match(text)
        && let Ok(n) = text.parse::<f64>()
    {
        return Expr::Atom(Atom::Number(n));
    }

    match text {
        "true" => Expr::Atom(Atom::Bool(true)),
        "false" => Expr::Atom(Atom::Bool(false)),
        _ if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') => {
            Expr::Atom(Atom::Str(text[1..text.len() - 1].to_owned()))
        }
        _ => Expr::Symbol(text.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{list, sym, val};

    #[test]
    fn test_parse_flat_list() {
        let expr = parse_source("(and true false)").unwrap();
        assert_eq!(expr, list([sym("and"), val(true), val(false)]));
    }

    #[test]
    fn test_parse_nested() {
        let expr = parse_source("( a b ( c d ) )").unwrap();
        assert_eq!(
            expr,
            list([sym("a"), sym("b"), list([sym("c"), sym("d")])])
        );
    }

    #[test]
    fn test_atom_classification() {
        assert_eq!(parse_source("42").unwrap(), val(42));
        assert_eq!(parse_source("-7").unwrap(), val(-7));
        assert_eq!(parse_source("3.25").unwrap(), val(3.25));
        assert_eq!(parse_source("true").unwrap(), val(true));
        assert_eq!(parse_source("false").unwrap(), val(false));
        assert_eq!(parse_source("\"spaces\"").unwrap(), val("spaces"));
        assert_eq!(parse_source("\"\"").unwrap(), val(""));
        assert_eq!(parse_source("profiles-count").unwrap(), sym("profiles-count"));
    }

    #[test]
    fn test_near_misses_are_symbols() {
        // Not matching the numeric pattern
        assert_eq!(parse_source("1.").unwrap(), sym("1."));
        assert_eq!(parse_source(".5").unwrap(), sym(".5"));
        assert_eq!(parse_source("+1").unwrap(), sym("+1"));
        assert_eq!(parse_source("1e3").unwrap(), sym("1e3"));
        assert_eq!(parse_source("-").unwrap(), sym("-"));
        // Case sensitive booleans
        assert_eq!(parse_source("True").unwrap(), sym("True"));
        // A lone quote is not a wrapped string
        assert_eq!(parse_source("\"").unwrap(), sym("\""));
        assert_eq!(parse_source("\"open").unwrap(), sym("\"open"));
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(parse_source(""), Err(SyntaxError::EmptySource));
        assert_eq!(parse_source("; only a comment"), Err(SyntaxError::EmptySource));
    }

    #[test]
    fn test_unclosed_list() {
        assert_eq!(
            parse_source("(and true"),
            Err(SyntaxError::UnexpectedEof { open: 0 })
        );
        assert_eq!(
            parse_source("(and (not true)"),
            Err(SyntaxError::UnexpectedEof { open: 0 })
        );
        assert_eq!(parse_source("("), Err(SyntaxError::UnexpectedEof { open: 0 }));
    }

    #[test]
    fn test_unbalanced_close() {
        assert_eq!(
            parse_source(")"),
            Err(SyntaxError::UnbalancedClose { position: 0 })
        );
        assert_eq!(
            parse_source("(not true))"),
            Err(SyntaxError::UnbalancedClose { position: 4 })
        );
    }

    #[test]
    fn test_empty_list_rejected() {
        assert_eq!(parse_source("()"), Err(SyntaxError::EmptyList { position: 0 }));
        assert_eq!(
            parse_source("(and ())"),
            Err(SyntaxError::EmptyList { position: 2 })
        );
    }

    #[test]
    fn test_trailing_input_rejected() {
        assert_eq!(
            parse_source("true false"),
            Err(SyntaxError::TrailingInput { position: 1 })
        );
        assert_eq!(
            parse_source("(is-signed-in) (is-signed-in)"),
            Err(SyntaxError::TrailingInput { position: 3 })
        );
    }

    #[test]
    fn test_depth_limit() {
        let ok = format!("{}x{}", "(".repeat(MAX_PARSE_DEPTH), ")".repeat(MAX_PARSE_DEPTH));
        assert!(parse_source(&ok).is_ok());

        let deep = format!(
            "{}x{}",
            "(".repeat(MAX_PARSE_DEPTH + 1),
            ")".repeat(MAX_PARSE_DEPTH + 1)
        );
        assert_eq!(
            parse_source(&deep),
            Err(SyntaxError::TooDeep { max: MAX_PARSE_DEPTH })
        );
    }

    #[test]
    fn test_reparse_is_structurally_equal() {
        let source = "(and (is-signed-in) (< (profiles-count) 8888)) ; cap";
        let first = parse_source(source).unwrap();
        let second = parse_source(source).unwrap();
        assert_eq!(first, second);

        // Display renders canonical source that parses back to the same tree
        let rendered = first.to_string();
        assert_eq!(rendered, "(and (is-signed-in) (< (profiles-count) 8888))");
        assert_eq!(parse_source(&rendered).unwrap(), first);
    }

    #[test]
    fn test_partial_token_slices() {
        let tokens = tokenize("(not true) (and)");
        assert_eq!(parse(&tokens[..4]).unwrap(), list([sym("not"), val(true)]));
        assert_eq!(
            parse(&tokens[4..]).unwrap(),
            list([sym("and")])
        );
        assert_eq!(
            parse(&tokens[..3]),
            Err(SyntaxError::UnexpectedEof { open: 0 })
        );
    }
}
