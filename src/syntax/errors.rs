use super::tokenizer::{Position, Token};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{kind} at {position}")]
pub struct ParseError {
    pub position: Position,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn syntax_error<S: Into<String>>(position: Position, message: S) -> Self {
        Self {
            position,
            kind: ParseErrorKind::SyntaxError(message.into()),
        }
    }

    pub fn mismatch_token<S: AsRef<str>>(token: &Token, expected: S) -> Self {
        Self::syntax_error(
            token.position(),
            format!("Expected {}, but found {}", expected.as_ref(), token),
        )
    }

    pub fn invalid_character(token: &Token) -> Self {
        Self {
            position: token.position(),
            kind: ParseErrorKind::LexicalError(token.text().to_string()),
        }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self.kind, ParseErrorKind::LexicalError(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An invalid character in the source code.
    LexicalError(String),
    SyntaxError(String), // Generic error
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::LexicalError(c) => write!(f, "Lexical error: invalid character `{}`", c),
            ParseErrorKind::SyntaxError(message) => write!(f, "Syntax error: {}", message),
        }
    }
}
