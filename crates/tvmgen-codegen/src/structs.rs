//! Struct layout: tuples on the stack, ABI-flattened cells in storage.
//!
//! A struct value lives on the stack as a tuple of its members. Serialised,
//! its members are laid out in declaration order with the same cell budget
//! rules as call parameters; nested structs are flattened into the parent's
//! session.

use tvmgen_types::{ErrorCode, Span, StructType, Type};

use crate::cell_budget::{AbiTypeSize, CellBudget};
use crate::consts::{CELL_BIT_LENGTH, CELL_MAX_REFS};
use crate::error::{CodegenError, CodegenResult};
use crate::pusher::StackPusher;

pub struct StructCompiler<'p, 'a> {
    pusher: &'p mut StackPusher<'a>,
    st: &'p StructType,
    span: Span,
}

impl<'p, 'a> StructCompiler<'p, 'a> {
    pub fn new(pusher: &'p mut StackPusher<'a>, st: &'p StructType, span: Span) -> Self {
        Self { pusher, st, span }
    }

    /// Whether the serialised struct fits a single dictionary leaf next to a
    /// key of `key_bits`, so it can be stored by value.
    pub fn is_compatible_with_sdk(key_bits: u32, st: &StructType) -> bool {
        let mut total = AbiTypeSize::default();
        for member in &st.members {
            let Some(size) = AbiTypeSize::of(&member.ty) else {
                return false;
            };
            total.max_bits += size.max_bits;
            total.max_refs += size.max_refs;
        }
        key_bits as i32 + total.max_bits <= CELL_BIT_LENGTH && total.max_refs < CELL_MAX_REFS
    }

    /// `tuple → builder`
    pub fn tuple_to_builder(&mut self) -> CodegenResult<()> {
        let p = &mut *self.pusher;
        p.push(1, "NEWC");
        p.push(0, "SWAP");
        let mut budget = CellBudget::new(0);
        p.encode_struct(self.st, &mut budget, self.span)?;
        for _ in 0..budget.spilled_count() {
            p.push(-1, "STBREFR");
        }
        Ok(())
    }

    /// `slice → tuple`
    pub fn convert_slice_to_tuple(&mut self) -> CodegenResult<()> {
        let mut budget = CellBudget::new(0);
        self.decode_members(self.st, &mut budget)?;
        self.pusher.push(-1, "DROP");
        self.pusher.tuple(self.st.members.len());
        Ok(())
    }

    /// `slice → members… slice'`
    fn decode_members(&mut self, st: &StructType, budget: &mut CellBudget) -> CodegenResult<()> {
        for member in &st.members {
            if let Type::Struct(nested) = &member.ty {
                let count = nested.members.len();
                self.decode_members(nested, budget)?;
                let p = &mut *self.pusher;
                p.block_swap(count, 1);
                p.tuple(count);
                p.exchange(0, 1);
                continue;
            }
            if AbiTypeSize::of(&member.ty).is_none() {
                return Err(CodegenError::unsupported(
                    self.span,
                    ErrorCode::UNSUPPORTED_DECODING,
                    format!("Unsupported type for decoding: {}", member.ty),
                ));
            }
            if budget.need_new_cell(&member.ty) {
                self.pusher.push(1, "LDREFRTOS");
                self.pusher.push(-1, "NIP");
            }
            self.pusher.load(&member.ty, self.span)?;
        }
        Ok(())
    }

    /// `→ tuple` (or `→ builder`)
    pub fn create_default_struct(&mut self, result_builder: bool) -> CodegenResult<()> {
        for member in &self.st.members {
            self.pusher.push_default_value(&member.ty, false)?;
        }
        self.pusher.tuple(self.st.members.len());
        if result_builder {
            self.tuple_to_builder()?;
        }
        Ok(())
    }

    /// `builder → builder'`: append every non-constant state variable, read
    /// from its global slot, after `start_bits` of header.
    pub fn state_vars_to_builder(pusher: &mut StackPusher<'a>, start_bits: i32) -> CodegenResult<()> {
        let ctx = pusher.ctx();
        let mut budget = CellBudget::new(start_bits);
        for var in ctx.not_constant_state_variables() {
            let mut push_var = |p: &mut StackPusher<'a>| -> CodegenResult<()> {
                p.get_glob_var(var.id);
                Ok(())
            };
            pusher.encode_parameter(&var.ty, &mut budget, &mut push_var, var.span)?;
        }
        for _ in 0..budget.spilled_count() {
            pusher.push(-1, "STBREFR");
        }
        Ok(())
    }
}
