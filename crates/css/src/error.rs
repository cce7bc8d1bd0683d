//! CSS value and stylesheet error types
//!
//! These errors never escape the public conversion entry points; they are
//! turned into documented defaults plus a log diagnostic.

use std::fmt;
use thiserror::Error;

/// CSS parsing result type
pub type CssResult<T> = Result<T, CssError>;

/// Source location in stylesheet text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Byte offset from start
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    /// Compute the location of a byte offset within `input`
    pub fn from_offset(input: &str, offset: usize) -> Self {
        let offset = offset.min(input.len());
        let mut line = 1;
        let mut column = 1;
        for (i, c) in input.char_indices() {
            if i >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column, offset }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// CSS parsing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CssError {
    #[error("Unexpected end of input at {location}")]
    UnexpectedEof {
        location: SourceLocation,
    },

    #[error("Invalid selector '{selector}' at {location}")]
    InvalidSelector {
        selector: String,
        location: SourceLocation,
    },

    #[error("Invalid color '{color}'")]
    InvalidColor {
        color: String,
    },

    #[error("Invalid length '{value}'")]
    InvalidLength {
        value: String,
    },

    #[error("Invalid value '{value}' for property '{property}'")]
    InvalidValue {
        property: String,
        value: String,
    },

    #[error("Parse error: {message} at {location}")]
    ParseError {
        message: String,
        location: SourceLocation,
    },
}

impl CssError {
    /// Get the source location of this error, if it has one
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Self::UnexpectedEof { location } => Some(*location),
            Self::InvalidSelector { location, .. } => Some(*location),
            Self::ParseError { location, .. } => Some(*location),
            Self::InvalidColor { .. } | Self::InvalidLength { .. } | Self::InvalidValue { .. } => None,
        }
    }

    pub fn unexpected_eof(location: SourceLocation) -> Self {
        Self::UnexpectedEof { location }
    }

    pub fn invalid_color(color: impl Into<String>) -> Self {
        Self::InvalidColor { color: color.into() }
    }

    pub fn invalid_value(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue { property: property.into(), value: value.into() }
    }

    pub fn parse_error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::ParseError { message: message.into(), location }
    }
}

/// Failures reported by a resource loader
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed {
        path: String,
        message: String,
    },
}
