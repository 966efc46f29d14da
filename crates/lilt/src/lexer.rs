//! Tokenizer for rule source text.
//!
//! `;` starts a comment that runs to the end of the line. Parentheses are
//! always tokens of their own; everything else is split on whitespace.

use std::fmt;

/// A lexical unit borrowed from the rule source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Open,
    Close,
    Text(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Open => "(",
            Token::Close => ")",
            Token::Text(text) => text,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split rule source into tokens.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();

    for line in source.lines() {
        let code = match line.find(';') {
            Some(comment) => &line[..comment],
            None => line,
        };

        let mut start: Option<usize> = None;
        for (i, ch) in code.char_indices() {
            match ch {
                '(' | ')' => {
                    if let Some(s) = start.take() {
                        tokens.push(Token::Text(&code[s..i]));
                    }
                    tokens.push(if ch == '(' { Token::Open } else { Token::Close });
                }
                c if c.is_whitespace() => {
                    if let Some(s) = start.take() {
                        tokens.push(Token::Text(&code[s..i]));
                    }
                }
                _ => {
                    start.get_or_insert(i);
                }
            }
        }
        if let Some(s) = start {
            tokens.push(Token::Text(&code[s..]));
        }
    }

    tokens
}
