use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors stored before further ones are only counted.
pub const MAX_ERRORS: usize = 20;

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// A value category the encoders do not implement.
    Encoding,
    /// A key or value type a dictionary operation cannot take.
    Dictionary,
    /// Conversions and range checks.
    Conversion,
    /// Names that the contract metadata cannot resolve.
    Resolution,
}

/// Numeric error code (E100–E499).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Encoding errors (E100–E199) ──
    pub const UNSUPPORTED_ENCODING: Self = Self(100);
    pub const UNSUPPORTED_DECODING: Self = Self(101);
    pub const UNSUPPORTED_DEFAULT: Self = Self(102);

    // ── Dictionary errors (E200–E299) ──
    pub const UNSUPPORTED_VALUE_TYPE: Self = Self(200);
    pub const UNSUPPORTED_KEY_TYPE: Self = Self(201);

    // ── Conversion errors (E300–E399) ──
    pub const UNIMPLEMENTED_CAST: Self = Self(300);

    // ── Resolution errors (E400–E499) ──
    pub const UNKNOWN_EVENT: Self = Self(400);
    pub const UNKNOWN_FUNCTION: Self = Self(401);
    pub const DUPLICATE_EVENT: Self = Self(402);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Encoding,
            200..=299 => ErrorCategory::Dictionary,
            300..=399 => ErrorCategory::Conversion,
            400..=499 => ErrorCategory::Resolution,
            _ => ErrorCategory::Encoding,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured backend diagnostic.
///
/// This is the only user-facing error the code generator produces. Internal
/// invariant violations abort instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvmError {
    /// Source file name.
    pub file: String,
    pub code: ErrorCode,
    pub severity: Severity,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
}

impl TvmError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: Severity::Error,
            category: code.category(),
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for TvmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.file, self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for TvmError {}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding => write!(f, "encoding"),
            Self::Dictionary => write!(f, "dictionary"),
            Self::Conversion => write!(f, "conversion"),
            Self::Resolution => write!(f, "resolution"),
        }
    }
}

/// Aggregated diagnostics for one compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<TvmError>,
    pub warnings: Vec<TvmError>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl CompileErrors {
    /// Create an empty result (no errors).
    pub fn empty() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            total_errors: 0,
            total_warnings: 0,
        }
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: TvmError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Add a warning.
    pub fn push_warning(&mut self, warning: TvmError) {
        self.warnings.push(warning);
        self.total_warnings += 1;
    }
}

impl Default for CompileErrors {
    fn default() -> Self {
        Self::empty()
    }
}
