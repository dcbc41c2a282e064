use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub const fn dummy() -> Self {
        Self { line: 0, column: 0 }
    }

    pub fn with_offset(&self, offset: usize) -> Self {
        Self {
            line: self.line,
            column: self.column + offset,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 && self.column == 0 {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Failures that escape a compilation pass.
///
/// Unsupported color or value shapes are not errors: they pass through the
/// recolorer untouched and simply do not count as found. Only a malformed
/// source, a strict-palette miss, or an I/O failure at the storage boundary
/// reach the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error at {span}: {message}")]
    Parse { message: String, span: Span },

    #[error("color literal {literal} at {span} is not registered in the palette")]
    UnmappedColor { literal: String, span: Span },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        Self::Parse {
            message: message.into(),
            span,
        }
    }
}
