//! tvmgen code generator: lowers typed values into stack-machine
//! instructions and reference-linked cells.
//!
//! # Architecture
//!
//! Everything is emitted through one [`StackPusher`], which keeps a
//! symbolic [`StackModel`] in lockstep with an instruction log
//! ([`CodeLines`]). The encoders are layered on top of it:
//!
//! - [`dict`]: dictionary get/set with per-category value representation
//! - [`abi`]: call payloads, returns and events
//! - [`message`]: the internal message header and `SENDRAWMSG`
//! - [`structs`]: struct tuples to cells and back
//!
//! Cell capacity during serialisation is tracked by [`CellBudget`].
//! Contract metadata is read from an immutable [`CompilerContext`].
//!
//! ## Cells
//!
//! A cell holds at most 1023 bits and 4 references. Encoders keep one
//! reference free in every cell so the next cell of a chain can be linked.

pub mod abi;
pub mod cell_budget;
pub mod code_lines;
pub mod config;
pub mod consts;
pub mod context;
mod defaults;
pub mod dict;
pub mod error;
pub mod message;
pub mod pusher;
pub mod slices;
pub mod stack;
pub mod structs;

pub use abi::{FunctionSelector, ReasonOfOutboundMessage};
pub use cell_budget::{AbiTypeSize, CellBudget};
pub use code_lines::CodeLines;
pub use config::CodegenConfig;
pub use context::CompilerContext;
pub use dict::DictOperation;
pub use error::{CodegenError, CodegenResult};
pub use message::{MsgField, PushBody};
pub use pusher::{switch_selector_if_need, PushParam, PushValue, StackPusher};
pub use stack::StackModel;
pub use structs::StructCompiler;
