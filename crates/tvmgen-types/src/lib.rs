//! Shared types for the tvmgen backend.
//!
//! This crate defines the resolved type model, contract declarations,
//! source spans and diagnostics used by the code generator and the
//! contract-level compiler.

mod error;
mod span;
pub mod decl;
pub mod ty;

pub use decl::{
    AbiVersion, ContractDecl, DeclId, ElementaryTypeName, EventDecl, FunctionDecl, FunctionKind,
    Pragmas, VariableDecl,
};
pub use error::{CompileErrors, ErrorCategory, ErrorCode, Severity, TvmError, MAX_ERRORS};
pub use span::Span;
pub use ty::{Category, FunctionType, NumericInfo, StructMember, StructType, Type};

/// Result type used throughout the tvmgen backend.
pub type Result<T> = std::result::Result<T, TvmError>;
