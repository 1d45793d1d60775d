//! Error taxonomy for schema resolution, translation and rendering.
//!
//! Every failure is raised synchronously while a statement is rendered and
//! propagates to the caller unchanged. A render either produces the complete
//! SQL text or fails as a whole.

use std::fmt;

/// Errors raised while compiling entity expressions to SQL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Invalid or ambiguous entity metadata.
    #[error("Schema error in {entity}: {message}")]
    Schema { entity: String, message: String },

    /// An expression node the translator has no rendering for.
    #[error("Unsupported expression `{expression}`: {reason}")]
    UnsupportedExpression { expression: String, reason: String },

    /// An operation the selected dialect cannot express.
    #[error("{operation} is not supported by the {dialect} dialect")]
    NotSupportedByDialect {
        dialect: &'static str,
        operation: String,
    },

    /// A value with no literal format in the selected dialect.
    #[error("No {dialect} literal format for {type_name} values")]
    UnknownLiteralType {
        dialect: &'static str,
        type_name: &'static str,
    },
}

impl CompileError {
    pub fn schema(entity: impl Into<String>, message: impl Into<String>) -> Self {
        CompileError::Schema {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Build an [`CompileError::UnsupportedExpression`] from the offending node.
    pub fn unsupported(expression: &impl fmt::Display, reason: impl Into<String>) -> Self {
        CompileError::UnsupportedExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_supported(dialect: &'static str, operation: impl Into<String>) -> Self {
        CompileError::NotSupportedByDialect {
            dialect,
            operation: operation.into(),
        }
    }

    pub fn unknown_literal(dialect: &'static str, type_name: &'static str) -> Self {
        CompileError::UnknownLiteralType { dialect, type_name }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
