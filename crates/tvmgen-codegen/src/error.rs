//! Codegen error types.
//!
//! Only unsupported source constructs are reported here. Broken generator
//! invariants (stack underflow, bad indices, unbalanced blocks) panic.

use thiserror::Error;
use tvmgen_types::{ErrorCode, Span, TvmError};

/// Errors that can occur during instruction emission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodegenError {
    /// A type or category combination the encoders do not implement.
    #[error("{message}")]
    Unsupported {
        span: Span,
        code: ErrorCode,
        message: String,
    },

    /// A function or event name the contract does not declare.
    #[error("unresolved symbol: {name}")]
    UnresolvedSymbol {
        span: Span,
        code: ErrorCode,
        name: String,
    },

    /// Two events share a name.
    #[error("duplicate event: {name}")]
    DuplicateEvent { span: Span, name: String },
}

impl CodegenError {
    pub fn unsupported(span: Span, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Unsupported {
            span,
            code,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Unsupported { span, .. }
            | Self::UnresolvedSymbol { span, .. }
            | Self::DuplicateEvent { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unsupported { code, .. } | Self::UnresolvedSymbol { code, .. } => *code,
            Self::DuplicateEvent { .. } => ErrorCode::DUPLICATE_EVENT,
        }
    }

    /// Convert into the serialisable diagnostic reported to the driver.
    pub fn to_diagnostic(&self, file: &str) -> TvmError {
        TvmError::new(file, self.code(), self.to_string(), self.span())
    }
}

/// Codegen result type alias.
pub type CodegenResult<T> = Result<T, CodegenError>;
