//! Compilation products.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tvmgen_types::CompileErrors;

/// Assembly text for one contract together with its selector tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledContract {
    pub name: String,
    /// Rendered assembly, one instruction or directive per line.
    pub code: String,
    /// Exported function name → 32-bit selector.
    pub functions: BTreeMap<String, u32>,
    /// Event name → 32-bit selector.
    pub events: BTreeMap<String, u32>,
}

impl CompiledContract {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Rendered lines without indentation or blank separators.
    pub fn instructions(&self) -> impl Iterator<Item = &str> {
        self.code
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// Outcome of a compilation in a shape that always serialises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileResult {
    pub success: bool,
    pub contract: Option<CompiledContract>,
    pub errors: CompileErrors,
}

impl CompileResult {
    pub fn success(contract: CompiledContract) -> Self {
        Self {
            success: true,
            contract: Some(contract),
            errors: CompileErrors::empty(),
        }
    }

    pub fn failure(errors: CompileErrors) -> Self {
        Self {
            success: false,
            contract: None,
            errors,
        }
    }
}
