//! tvmgen compiler: orchestrates contract-level code emission.
//!
//! ```text
//! ContractDecl → CompilerContext → function headers → c7_to_c4 → default state
//!              → return encoders → event encoders → CompiledContract
//! ```
//!
//! Function bodies are produced elsewhere, by an expression compiler driving
//! a [`tvmgen_codegen::StackPusher`]. This crate emits everything that only
//! depends on the contract's declarations.

pub mod compiler;
pub mod output;

pub use compiler::{compile, DEFAULT_STATE_MACRO};
pub use output::{CompileResult, CompiledContract};

use thiserror::Error;
use tvmgen_codegen::CodegenConfig;
use tvmgen_types::ContractDecl;

/// Malformed input handed to [`compile_json`].
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid contract declaration: {0}")]
    Contract(#[source] serde_json::Error),
    #[error("invalid codegen configuration: {0}")]
    Config(#[source] serde_json::Error),
}

/// Compile and always return a serialisable result, successful or not.
pub fn compile_to_result(contract: &ContractDecl, config: &CodegenConfig, file: &str) -> CompileResult {
    match compile(contract, config, file) {
        Ok(compiled) => CompileResult::success(compiled),
        Err(errors) => CompileResult::failure(errors),
    }
}

/// Compile a JSON contract declaration with an optional JSON configuration.
///
/// Configuration keys that are missing keep their defaults.
pub fn compile_json(
    contract_json: &str,
    config_json: Option<&str>,
    file: &str,
) -> Result<CompileResult, InputError> {
    let contract: ContractDecl = serde_json::from_str(contract_json).map_err(InputError::Contract)?;
    let config = match config_json {
        Some(json) => CodegenConfig::from_json(json).map_err(InputError::Config)?,
        None => CodegenConfig::default(),
    };
    log::debug!("compiling {} from {file}", contract.name);
    Ok(compile_to_result(&contract, &config, file))
}
