//! ABI encoding of call payloads, returns and events.
//!
//! Values are appended to the builder on top of the stack. When the
//! [`CellBudget`] spills, a fresh builder is opened on top of the previous
//! one; once everything is stored the chain is sealed innermost first with
//! one `STBREFR` per spill.

use tvmgen_types::{Category, ErrorCode, Span, StructType, Type};

use crate::cell_budget::CellBudget;
use crate::consts::{SELECTOR_EVENT_MASK, SELECTOR_RETURN_FLAG};
use crate::error::{CodegenError, CodegenResult};
use crate::pusher::{
    store_integral_or_address, var_integer_op, PushParam, PushValue, StackPusher,
};

/// How the 32-bit selector is spelled in the payload header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionSelector {
    /// Resolved by the assembler from a `$name$` label.
    Named(String),
    Id(u32),
}

/// Why a payload is being built; decides the selector's top bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonOfOutboundMessage {
    FunctionReturnExternal,
    EmitEventExternal,
    RemoteCallInternal,
}

impl<'a> StackPusher<'a> {
    /// `builder… → builder…'`: append one value produced by `push_param`.
    pub fn encode_parameter(
        &mut self,
        ty: &Type,
        budget: &mut CellBudget,
        push_param: &mut PushValue<'_, 'a>,
        span: Span,
    ) -> CodegenResult<()> {
        let category = ty.category();
        if let Type::Struct(st) = ty {
            push_param(self)?;
            return self.encode_struct(st, budget, span);
        }
        if matches!(
            category,
            Category::Slice | Category::Builder | Category::Function
        ) {
            return Err(CodegenError::unsupported(
                span,
                ErrorCode::UNSUPPORTED_ENCODING,
                format!("Unsupported type for encoding: {ty}"),
            ));
        }

        if budget.need_new_cell(ty) {
            self.push(1, "NEWC");
        }

        push_param(self)?;
        match category {
            Category::Integral | Category::Address => {
                self.push(-1, &store_integral_or_address(ty, true));
            }
            Category::VarInteger => {
                self.push(-1, var_integer_op(ty, "STVARINT32", "STVARUINT32"));
            }
            Category::ByteArray | Category::Cell => self.push(-1, "STREFR"),
            Category::UsualArray => {
                self.push(1, "UNPAIR");
                self.exchange(0, 2);
                self.push(-1, "STU 32");
                self.push(-1, "STDICT");
            }
            Category::Mapping => {
                self.push(0, "SWAP");
                self.push(-1, "STDICT");
            }
            Category::Struct | Category::Slice | Category::Builder | Category::Function => {
                unreachable!("handled above")
            }
        }
        Ok(())
    }

    /// `builder → builder'`: append all parameters and seal the chain.
    pub fn encode_parameters(
        &mut self,
        types: &[Type],
        budget: &mut CellBudget,
        push_param: &mut PushParam<'_, 'a>,
        span: Span,
    ) -> CodegenResult<()> {
        for (idx, ty) in types.iter().enumerate() {
            let mut push_one = |p: &mut StackPusher<'a>| push_param(p, idx);
            self.encode_parameter(ty, budget, &mut push_one, span)?;
        }
        for _ in 0..budget.spilled_count() {
            self.push(-1, "STBREFR");
        }
        Ok(())
    }

    /// `builder… builder struct → builder…'`: flatten the members into the
    /// current session.
    pub fn encode_struct(
        &mut self,
        st: &StructType,
        budget: &mut CellBudget,
        span: Span,
    ) -> CodegenResult<()> {
        let base = self.stack_size() - 2;
        let member_count = st.members.len();
        self.untuple(member_count);
        self.block_swap(1, member_count);
        for (i, member) in st.members.iter().enumerate() {
            let mut push_member = |p: &mut StackPusher<'a>| -> CodegenResult<()> {
                let index = p.stack_size() - base - 1 - i;
                p.push_s(index);
                Ok(())
            };
            self.encode_parameter(&member.ty, budget, &mut push_member, span)?;
        }
        let builders = self.stack_size() - base - member_count;
        self.drop_under(builders, member_count);
        Ok(())
    }

    /// `→ builder`: a payload header followed by the parameters.
    ///
    /// Returns the exact bit length when everything fit one cell, `None`
    /// when the payload spilled into a chain.
    pub fn encode_function_and_params(
        &mut self,
        selector: &FunctionSelector,
        types: &[Type],
        push_param: &mut PushParam<'_, 'a>,
        reason: ReasonOfOutboundMessage,
        span: Span,
    ) -> CodegenResult<Option<u32>> {
        self.push(1, "NEWC");
        match selector {
            FunctionSelector::Named(name) => self.push(1, &format!("PUSHINT ${name}$")),
            FunctionSelector::Id(id) => self.push(1, &format!("PUSHINT {id}")),
        }
        match reason {
            ReasonOfOutboundMessage::FunctionReturnExternal => {
                self.push(1, &format!("PUSHINT {SELECTOR_RETURN_FLAG}"));
                self.push(-1, "OR");
            }
            ReasonOfOutboundMessage::EmitEventExternal => {
                self.push(1, &format!("PUSHINT {SELECTOR_EVENT_MASK}"));
                self.push(-1, "AND");
            }
            ReasonOfOutboundMessage::RemoteCallInternal => {}
        }
        self.push(-1, "STUR 32");

        let mut budget = CellBudget::new(32);
        self.encode_parameters(types, &mut budget, push_param, span)?;
        log::debug!(
            "encoded {:?} with {} parameter(s), {} spill(s)",
            selector,
            types.len(),
            budget.spilled_count()
        );

        if budget.spilled_count() == 0 {
            Ok(Some(budget.used_bits() as u32))
        } else {
            Ok(None)
        }
    }
}
