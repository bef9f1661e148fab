//! Target-format constants and instruction addressing limits.
//!
//! A cell holds at most 1023 data bits and 4 references:
//!
//! ```text
//! cell : [ data : 0..=1023 bits ][ refs : 0..=4 × ^cell ]
//! ```
//!
//! Serialisation chains cells by storing the continuation cell as the last
//! reference of its parent, so one reference is always kept free.

// ── Cell capacity ────────────────────────────────────────────────────────────

pub const CELL_BIT_LENGTH: i32 = 1023;
pub const CELL_MAX_REFS: i32 = 4;

// ── Runtime exception codes ──────────────────────────────────────────────────

/// Thrown by array reads past the stored length.
pub const ARRAY_INDEX_OUT_OF_RANGE: u32 = 50;

// ── Message sending ──────────────────────────────────────────────────────────

/// Flag pushed before `SENDRAWMSG` when the caller supplies none.
pub const SENDRAWMSG_DEFAULT_FLAG: u8 = 0;

// ── Addresses ────────────────────────────────────────────────────────────────

/// `addr_std$10 anycast:(Maybe Anycast) workchain_id:int8 address:bits256`
/// without anycast.
pub const STD_ADDRESS_BIT_LENGTH: u32 = 267;
/// Upper bound of any `MsgAddress` serialisation.
pub const ADDRESS_MAX_BIT_LENGTH: i32 = 591;
/// Hashed variable-length dictionary keys.
pub const HASHED_KEY_BIT_LENGTH: u32 = 256;

/// Four-bit length prefix followed by at most fifteen bytes.
pub const GRAMS_MAX_BIT_LENGTH: i32 = 4 + 16 * 8;

// ── Direct addressing limits ─────────────────────────────────────────────────
// Beyond these the operand goes on the stack and the `…VAR`/`…X` form is used.

/// `INDEX`, `SETINDEX`, `UNTUPLE`, `TUPLE`, `BLKDROP`.
pub const MAX_DIRECT_INDEX: usize = 15;
/// `GETGLOB`, `SETGLOB`.
pub const MAX_DIRECT_GLOB: usize = 31;
/// `PUSH sI`, `XCHG s0,sJ`.
pub const MAX_STACK_REF: usize = 255;
/// `INDEXVAR`, `SETINDEXVAR`, `GETGLOBVAR`.
pub const MAX_INDEX_VAR: usize = 254;
/// `BLKSWAP m, n` takes each operand in 1..=16.
pub const MAX_BLKSWAP_OPERAND: usize = 16;

// ── Persistent storage ───────────────────────────────────────────────────────

/// Global slot holding the owner public key.
pub const GLOB_PUBKEY: usize = 2;
/// Global slot holding the replay-protection timestamp.
pub const GLOB_TIMESTAMP: usize = 3;
/// Global slot holding the constructor flag.
pub const GLOB_CONSTRUCTOR_FLAG: usize = 6;
/// First global slot assigned to a state variable.
pub const FIRST_STATE_VAR_GLOB: usize = 10;

/// Persistent header stored ahead of the state variables:
/// pubkey (256) + optional timestamp (64) + constructor flag (1).
pub const C4_HEADER_BITS: i32 = 256 + 1;
pub const C4_TIMESTAMP_BITS: i32 = 64;

// ── Selector flags ───────────────────────────────────────────────────────────

pub const SELECTOR_RETURN_FLAG: u32 = 0x8000_0000;
pub const SELECTOR_EVENT_MASK: u32 = 0x7fff_ffff;
