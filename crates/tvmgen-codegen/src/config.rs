//! Code generator configuration.

use serde::{Deserialize, Serialize};

use crate::consts::SENDRAWMSG_DEFAULT_FLAG;

/// Options threaded into every [`StackPusher`](crate::StackPusher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Drop `PRINTSTR` debug output from generated code.
    pub without_logstr: bool,
    /// Flag pushed before `SENDRAWMSG` when the call site supplies none.
    pub sendrawmsg_default_flag: u8,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            without_logstr: false,
            sendrawmsg_default_flag: SENDRAWMSG_DEFAULT_FLAG,
        }
    }
}

impl CodegenConfig {
    /// Parse from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
