//! Grammar errors reported by [`Tree::parse`](super::Tree::parse).

use thiserror::Error;

use super::unquote::UnquoteError;

/// Label prefixed to every error message unless a tree overrides it.
pub const DEFAULT_LABEL: &str = "das";

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("unexpected {found} in {context}")]
    UnexpectedToken {
        /// Rendering of the offending token.
        found: String,
        /// Grammar position, e.g. `"term"`.
        context: &'static str,
    },
    #[error("unexpected redirection direction {0:?}")]
    UnexpectedDirection(String),
    #[error("invalid oldfd in qualified redirection {0:?}")]
    InvalidOldFd(String),
    #[error("invalid newfd in qualified redirection {0:?}")]
    InvalidNewFd(String),
    #[error("{0}")]
    Unquote(#[from] UnquoteError),
    /// The lexer produced an error token.
    #[error("{0}")]
    Lexical(String),
    #[error("tree has already been parsed")]
    AlreadyParsed,
}

/// A grammar error, located by script name and line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label}: {parse_name}:{line}: {kind}")]
pub struct ParseError {
    pub label: String,
    pub parse_name: String,
    pub line: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(
        label: impl Into<String>,
        parse_name: impl Into<String>,
        line: usize,
        kind: ErrorKind,
    ) -> Self {
        Self {
            label: label.into(),
            parse_name: parse_name.into(),
            line,
            kind,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
