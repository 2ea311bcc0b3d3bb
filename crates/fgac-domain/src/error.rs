//! Domain error types for model compilation.

use thiserror::Error;

/// Errors raised while compiling a DSL model.
///
/// Every error is fatal to the compilation that produced it; no partial
/// model is returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Malformed top-level declaration (`schema`, `type` or `define` line).
    #[error("structural error at line {line}: {message}")]
    StructuralError { line: usize, message: String },

    /// Relation expression that does not reduce to a recognized form.
    #[error("expression syntax error at line {line}: {source}")]
    ExpressionSyntaxError {
        line: usize,
        #[source]
        source: ExpressionError,
    },
}

impl DomainError {
    pub(crate) fn structural(line: usize, message: impl Into<String>) -> Self {
        Self::StructuralError {
            line,
            message: message.into(),
        }
    }

    /// Returns the 1-based source line the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            Self::StructuralError { line, .. } | Self::ExpressionSyntaxError { line, .. } => *line,
        }
    }
}

/// Error produced by an expression or type-restriction parser.
///
/// Carries no line information; the structural parser attaches it when
/// wrapping into [`DomainError::ExpressionSyntaxError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} in '{expression}'")]
pub struct ExpressionError {
    /// The expression (or sub-expression) that failed.
    pub expression: String,
    /// What was wrong with it.
    pub message: String,
}

impl ExpressionError {
    pub fn new(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
