//! Capacity tracking for one serialisation session.
//!
//! A session (one function call payload, one outbound message, one struct
//! flattening) fills cells left to right. Each value reserves its maximum
//! serialised size; when the current cell cannot take it, a new cell is
//! opened and later chained into its parent by reference.

use tvmgen_types::{Category, Type};

use crate::consts::{ADDRESS_MAX_BIT_LENGTH, CELL_BIT_LENGTH, CELL_MAX_REFS};

/// Upper bound of a value's ABI serialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AbiTypeSize {
    pub max_bits: i32,
    pub max_refs: i32,
}

impl AbiTypeSize {
    pub fn new(max_bits: i32, max_refs: i32) -> Self {
        Self { max_bits, max_refs }
    }

    /// Maximum size of `ty`, or `None` for categories with no ABI layout.
    pub fn of(ty: &Type) -> Option<Self> {
        match ty.category() {
            Category::Integral => ty
                .numeric_info()
                .map(|info| Self::new(i32::from(info.bits), 0)),
            Category::VarInteger => match ty {
                Type::VarInteger { max_bytes, .. } => Some(Self::new(var_integer_bits(*max_bytes), 0)),
                _ => None,
            },
            Category::Address => Some(Self::new(ADDRESS_MAX_BIT_LENGTH, 0)),
            Category::ByteArray | Category::Cell => Some(Self::new(0, 1)),
            Category::UsualArray => Some(Self::new(33, 1)),
            Category::Mapping => Some(Self::new(1, 1)),
            Category::Struct => {
                let st = ty.as_struct()?;
                let mut total = Self::default();
                for member in &st.members {
                    let size = Self::of(&member.ty)?;
                    total.max_bits += size.max_bits;
                    total.max_refs += size.max_refs;
                }
                Some(total)
            }
            Category::Slice | Category::Builder | Category::Function => None,
        }
    }
}

/// `var_uint$_ {n:#} len:(#< n) value:(uint (len * 8))`.
fn var_integer_bits(max_bytes: u8) -> i32 {
    let n = u32::from(max_bytes.max(1));
    let len_bits = 32 - (n - 1).leading_zeros();
    len_bits as i32 + 8 * (n as i32 - 1)
}

/// Remaining capacity of the cell being filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBudget {
    rest_bits: i32,
    rest_refs: i32,
    spilled: usize,
}

impl CellBudget {
    /// A session whose first cell already holds `start_bits` header bits.
    pub fn new(start_bits: i32) -> Self {
        Self {
            rest_bits: CELL_BIT_LENGTH - start_bits,
            rest_refs: CELL_MAX_REFS,
            spilled: 0,
        }
    }

    /// Reserve room for a value of type `ty`; true if it opens a new cell.
    ///
    /// # Panics
    ///
    /// If `ty` has no fixed ABI size or needs more than one reference.
    /// Encoders reject such types before consulting the budget.
    pub fn need_new_cell(&mut self, ty: &Type) -> bool {
        let Some(size) = AbiTypeSize::of(ty) else {
            panic!("no ABI size for {ty}");
        };
        self.need_new_cell_for(size)
    }

    pub fn need_new_cell_for(&mut self, size: AbiTypeSize) -> bool {
        assert!(
            (0..=1).contains(&size.max_refs),
            "a single value takes at most one reference, got {}",
            size.max_refs
        );
        self.rest_bits -= size.max_bits;
        self.rest_refs -= size.max_refs;

        // One reference always stays free for chaining the next cell.
        if self.rest_bits < 0 || self.rest_refs == 0 {
            self.rest_bits = CELL_BIT_LENGTH - size.max_bits;
            self.rest_refs = CELL_MAX_REFS - size.max_refs;
            self.spilled += 1;
            log::trace!("cell budget spill #{}", self.spilled);
            return true;
        }
        false
    }

    /// Number of cells opened after the first one.
    pub fn spilled_count(&self) -> usize {
        self.spilled
    }

    pub fn rest_bits(&self) -> i32 {
        self.rest_bits
    }

    pub fn rest_refs(&self) -> i32 {
        self.rest_refs
    }

    /// Bits reserved in the current cell.
    pub fn used_bits(&self) -> i32 {
        CELL_BIT_LENGTH - self.rest_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvmgen_types::{FunctionType, StructMember, StructType};

    #[test]
    fn test_sizes() {
        assert_eq!(AbiTypeSize::of(&Type::uint(32)), Some(AbiTypeSize::new(32, 0)));
        assert_eq!(AbiTypeSize::of(&Type::Bool), Some(AbiTypeSize::new(1, 0)));
        assert_eq!(AbiTypeSize::of(&Type::Address), Some(AbiTypeSize::new(591, 0)));
        assert_eq!(AbiTypeSize::of(&Type::String), Some(AbiTypeSize::new(0, 1)));
        assert_eq!(
            AbiTypeSize::of(&Type::array_of(Type::uint(8))),
            Some(AbiTypeSize::new(33, 1))
        );
        assert_eq!(
            AbiTypeSize::of(&Type::ExtraCurrencyCollection),
            Some(AbiTypeSize::new(1, 1))
        );
        assert_eq!(AbiTypeSize::of(&Type::Slice), None);
        assert_eq!(AbiTypeSize::of(&Type::Function(FunctionType::default())), None);
    }

    #[test]
    fn test_var_integer_size() {
        assert_eq!(AbiTypeSize::of(&Type::varuint32()), Some(AbiTypeSize::new(253, 0)));
        let grams = Type::VarInteger {
            max_bytes: 16,
            signed: false,
        };
        assert_eq!(AbiTypeSize::of(&grams), Some(AbiTypeSize::new(124, 0)));
    }

    #[test]
    fn test_struct_size_sums_members() {
        let st = Type::Struct(StructType::new(
            "S",
            vec![
                StructMember::new("a", Type::uint(8)),
                StructMember::new("b", Type::Cell),
                StructMember::new("c", Type::Address),
            ],
        ));
        assert_eq!(AbiTypeSize::of(&st), Some(AbiTypeSize::new(599, 1)));
    }

    #[test]
    fn test_fits_in_first_cell() {
        let mut budget = CellBudget::new(32);
        assert!(!budget.need_new_cell(&Type::uint(32)));
        assert!(!budget.need_new_cell(&Type::Address));
        assert_eq!(budget.used_bits(), 655);
        assert_eq!(budget.spilled_count(), 0);
    }

    #[test]
    fn test_spill_on_bits() {
        let mut budget = CellBudget::new(0);
        assert!(!budget.need_new_cell(&Type::Address));
        assert!(budget.need_new_cell(&Type::Address));
        assert_eq!(budget.rest_bits(), 1023 - 591);
        assert_eq!(budget.spilled_count(), 1);
    }

    #[test]
    fn test_spill_keeps_one_ref_free() {
        let mut budget = CellBudget::new(0);
        assert!(!budget.need_new_cell(&Type::Cell));
        assert!(!budget.need_new_cell(&Type::Cell));
        assert!(!budget.need_new_cell(&Type::Cell));
        assert!(budget.need_new_cell(&Type::Cell));
        assert_eq!(budget.rest_refs(), 3);
    }

    #[test]
    #[should_panic(expected = "no ABI size")]
    fn test_slice_has_no_budget() {
        CellBudget::new(0).need_new_cell(&Type::Slice);
    }
}
