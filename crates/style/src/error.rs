//! Style engine error types

use thiserror::Error;

use tincture_css::CssError;

/// Style engine result type
pub type StyleResult<T> = Result<T, StyleError>;

/// Errors surfaced by the style engine
///
/// Author mistakes in stylesheet text are logged and skipped; only failures
/// reported by a host-supplied collaborator reach the caller.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Declaration parser failed: {source}")]
    DeclarationParser {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Css(#[from] CssError),
}

impl StyleError {
    pub fn declaration_parser(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::DeclarationParser { source: source.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StyleError::declaration_parser("unexpected token");
        assert_eq!(err.to_string(), "Declaration parser failed: unexpected token");

        let err: StyleError = CssError::invalid_color("#zz").into();
        assert_eq!(err.to_string(), "Invalid color '#zz'");
    }
}
