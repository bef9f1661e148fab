//! Source-level value types as the backend sees them.
//!
//! [`Type`] is the resolved type handed over by the front end. The backend
//! never inspects types beyond their [`Category`] and a handful of layout
//! facts (bit width, signedness, struct members), so the model is small.

use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Type
// ══════════════════════════════════════════════════════════════════════════════

/// A resolved value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    // ── Fixed-width scalars ──
    /// `intN` / `uintN`, 1 ≤ N ≤ 256.
    Integer { bits: u16, signed: bool },
    Bool,
    /// `bytesN`, 1 ≤ N ≤ 32.
    FixedBytes { bytes: u8 },
    /// An enum with `members` variants.
    Enum { name: String, members: u32 },

    /// `varuintN` / `varintN`: a length header followed by up to N−1 bytes.
    VarInteger { max_bytes: u8, signed: bool },

    // ── Addresses ──
    Address,
    Contract { name: String },

    // ── Variable-length byte data ──
    Bytes,
    String,

    // ── Composites ──
    /// `T[]` for any `T` other than a byte: stored as `(length, dict)`.
    Array { element: Box<Type> },
    Struct(StructType),
    Mapping { key: Box<Type>, value: Box<Type> },
    /// `mapping(uint32 => varuint32)` with a dedicated surface type.
    ExtraCurrencyCollection,

    // ── Raw target values ──
    Cell,
    Slice,
    Builder,

    Function(FunctionType),
}

/// A struct type with its members in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructType {
    pub name: String,
    pub members: Vec<StructMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructMember {
    pub name: String,
    pub ty: Type,
}

/// A function type: parameter and return types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub params: Vec<Type>,
    pub returns: Vec<Type>,
}

// ══════════════════════════════════════════════════════════════════════════════
// Category
// ══════════════════════════════════════════════════════════════════════════════

/// The closed set of value categories every encoder dispatches on.
///
/// Adding a variant here is meant to break every `match` in the code
/// generator until the new category is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Integer, Bool, Enum, FixedBytes.
    Integral,
    VarInteger,
    /// Address, Contract.
    Address,
    /// Bytes, String.
    ByteArray,
    UsualArray,
    Struct,
    /// Mapping, ExtraCurrencyCollection.
    Mapping,
    Cell,
    Slice,
    Builder,
    Function,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Integral,
        Category::VarInteger,
        Category::Address,
        Category::ByteArray,
        Category::UsualArray,
        Category::Struct,
        Category::Mapping,
        Category::Cell,
        Category::Slice,
        Category::Builder,
        Category::Function,
    ];
}

/// Numeric layout of an integral value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericInfo {
    pub bits: u16,
    pub signed: bool,
}

impl Type {
    pub fn uint(bits: u16) -> Self {
        Type::Integer {
            bits,
            signed: false,
        }
    }

    pub fn int(bits: u16) -> Self {
        Type::Integer { bits, signed: true }
    }

    pub fn array_of(element: Type) -> Self {
        Type::Array {
            element: Box::new(element),
        }
    }

    pub fn mapping(key: Type, value: Type) -> Self {
        Type::Mapping {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// The unsigned variable-length integer used for currency amounts in
    /// extra-currency collections.
    pub fn varuint32() -> Self {
        Type::VarInteger {
            max_bytes: 32,
            signed: false,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Type::Integer { .. } | Type::Bool | Type::FixedBytes { .. } | Type::Enum { .. } => {
                Category::Integral
            }
            Type::VarInteger { .. } => Category::VarInteger,
            Type::Address | Type::Contract { .. } => Category::Address,
            Type::Bytes | Type::String => Category::ByteArray,
            Type::Array { .. } => Category::UsualArray,
            Type::Struct(_) => Category::Struct,
            Type::Mapping { .. } | Type::ExtraCurrencyCollection => Category::Mapping,
            Type::Cell => Category::Cell,
            Type::Slice => Category::Slice,
            Type::Builder => Category::Builder,
            Type::Function(_) => Category::Function,
        }
    }

    /// Bit width and signedness of an integral value.
    ///
    /// Bools are stored as a signed single bit (`-1` is true). Enums use the
    /// smallest whole number of bytes that holds their largest ordinal.
    pub fn numeric_info(&self) -> Option<NumericInfo> {
        match self {
            Type::Integer { bits, signed } => Some(NumericInfo {
                bits: *bits,
                signed: *signed,
            }),
            Type::Bool => Some(NumericInfo {
                bits: 1,
                signed: true,
            }),
            Type::FixedBytes { bytes } => Some(NumericInfo {
                bits: 8 * u16::from(*bytes),
                signed: false,
            }),
            Type::Enum { members, .. } => Some(NumericInfo {
                bits: bits_for_enum(*members),
                signed: false,
            }),
            _ => None,
        }
    }

    pub fn is_integral(&self) -> bool {
        self.category() == Category::Integral
    }

    pub fn is_byte_array(&self) -> bool {
        self.category() == Category::ByteArray
    }

    pub fn is_usual_array(&self) -> bool {
        self.category() == Category::UsualArray
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Type::Struct(st) => Some(st),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(ft) => Some(ft),
            _ => None,
        }
    }
}

fn bits_for_enum(members: u32) -> u16 {
    let mut max_ordinal = members.saturating_sub(1);
    let mut bytes = 0;
    loop {
        max_ordinal >>= 8;
        bytes += 1;
        if max_ordinal == 0 {
            return 8 * bytes;
        }
    }
}

impl StructType {
    pub fn new(name: impl Into<String>, members: Vec<StructMember>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }
}

impl StructMember {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl FunctionType {
    pub fn new(params: Vec<Type>, returns: Vec<Type>) -> Self {
        Self { params, returns }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Display
// ══════════════════════════════════════════════════════════════════════════════

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer { bits, signed } => {
                write!(f, "{}int{}", if *signed { "" } else { "u" }, bits)
            }
            Type::Bool => write!(f, "bool"),
            Type::FixedBytes { bytes } => write!(f, "bytes{bytes}"),
            Type::Enum { name, .. } => write!(f, "enum {name}"),
            Type::VarInteger { max_bytes, signed } => {
                write!(f, "var{}int{}", if *signed { "" } else { "u" }, max_bytes)
            }
            Type::Address => write!(f, "address"),
            Type::Contract { name } => write!(f, "contract {name}"),
            Type::Bytes => write!(f, "bytes"),
            Type::String => write!(f, "string"),
            Type::Array { element } => write!(f, "{element}[]"),
            Type::Struct(st) => write!(f, "struct {}", st.name),
            Type::Mapping { key, value } => write!(f, "mapping({key} => {value})"),
            Type::ExtraCurrencyCollection => write!(f, "ExtraCurrencyCollection"),
            Type::Cell => write!(f, "TvmCell"),
            Type::Slice => write!(f, "TvmSlice"),
            Type::Builder => write!(f, "TvmBuilder"),
            Type::Function(ft) => {
                write!(f, "function (")?;
                write_list(f, &ft.params)?;
                write!(f, ")")?;
                if !ft.returns.is_empty() {
                    write!(f, " returns (")?;
                    write_list(f, &ft.returns)?;
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}
