//! The code generation engine.
//!
//! [`StackPusher`] owns one [`StackModel`] and one [`CodeLines`]. Its only
//! primitive is [`StackPusher::push`]: append one instruction and apply its
//! declared stack effect in the same step. Every other operation here, and in
//! the dictionary, ABI and message encoders, is a sequence of such pushes.
//!
//! Continuation bodies are built by independent nested engines (see
//! [`StackPusher::nested`]) whose logs are spliced back with
//! [`StackPusher::push_cont`]. A nested engine's stack model never leaves it.

use tvmgen_types::{
    Category, DeclId, ElementaryTypeName, ErrorCode, FunctionType, Span, StructType, Type,
};

use crate::code_lines::CodeLines;
use crate::config::CodegenConfig;
use crate::consts::{
    C4_HEADER_BITS, C4_TIMESTAMP_BITS, GLOB_CONSTRUCTOR_FLAG, GLOB_PUBKEY, GLOB_TIMESTAMP,
    MAX_BLKSWAP_OPERAND, MAX_DIRECT_GLOB, MAX_DIRECT_INDEX, MAX_INDEX_VAR, MAX_STACK_REF,
};
use crate::context::CompilerContext;
use crate::error::{CodegenError, CodegenResult};
use crate::slices::{big_endian_to_decimal, binary_string_to_slice, literal_to_slice_address};
use crate::stack::StackModel;
use crate::structs::StructCompiler;

/// Pushes one value onto the engine it is given.
pub type PushValue<'f, 'a> = dyn FnMut(&mut StackPusher<'a>) -> CodegenResult<()> + 'f;

/// Pushes the value of the parameter with the given position.
pub type PushParam<'f, 'a> = dyn FnMut(&mut StackPusher<'a>, usize) -> CodegenResult<()> + 'f;

/// Zero address `addr_std` with workchain 0 and an all-zero account id.
const ZERO_ADDRESS_SLICE: &str =
    "PUSHSLICE x8000000000000000000000000000000000000000000000000000000000000000001_";

pub struct StackPusher<'a> {
    ctx: &'a CompilerContext,
    config: &'a CodegenConfig,
    stack: StackModel,
    code: CodeLines,
    /// Depth at each open inline continuation.
    cont_checkpoints: Vec<usize>,
}

// ══════════════════════════════════════════════════════════════════════════════
// Construction and the push primitive
// ══════════════════════════════════════════════════════════════════════════════

impl<'a> StackPusher<'a> {
    pub fn new(ctx: &'a CompilerContext, config: &'a CodegenConfig) -> Self {
        Self::with_stack_size(ctx, config, 0)
    }

    pub fn with_stack_size(
        ctx: &'a CompilerContext,
        config: &'a CodegenConfig,
        stack_size: usize,
    ) -> Self {
        Self {
            ctx,
            config,
            stack: StackModel::with_size(stack_size),
            code: CodeLines::new(),
            cont_checkpoints: Vec::new(),
        }
    }

    /// A fresh engine for a continuation body that starts with `stack_size`
    /// values it may consume.
    pub fn nested(&self, stack_size: usize) -> StackPusher<'a> {
        StackPusher::with_stack_size(self.ctx, self.config, stack_size)
    }

    pub fn ctx(&self) -> &'a CompilerContext {
        self.ctx
    }

    pub fn config(&self) -> &'a CodegenConfig {
        self.config
    }

    pub fn stack(&self) -> &StackModel {
        &self.stack
    }

    pub fn stack_size(&self) -> usize {
        self.stack.size()
    }

    pub fn code(&self) -> &CodeLines {
        &self.code
    }

    /// Finish the engine and hand back its log.
    ///
    /// # Panics
    ///
    /// If an inline continuation is still open.
    pub fn into_code(self) -> CodeLines {
        assert!(
            self.cont_checkpoints.is_empty(),
            "{} continuation(s) left open",
            self.cont_checkpoints.len()
        );
        self.code
    }

    /// Emit `text` and apply `diff` to the stack model.
    pub fn push(&mut self, diff: i32, text: &str) {
        self.code.push(text);
        self.stack.change(diff);
    }

    /// Emit several depth-neutral lines, one per line of `text`.
    pub fn push_lines(&mut self, text: &str) {
        for line in text.lines() {
            self.push(0, line);
        }
    }

    /// Splice another log in as depth-neutral instructions, re-indented
    /// under the current depth. Blank separators are kept.
    pub fn push_code(&mut self, code: &CodeLines) {
        self.code.append(code);
    }

    /// Bind a declaration to the top slot (see [`StackModel::add`]).
    pub fn bind(&mut self, decl: DeclId, allocated: bool) {
        self.stack.add(decl, allocated);
    }

    pub fn ensure_size(&self, expected: usize, location: &str) {
        self.stack.ensure_size(expected, location);
    }

    pub fn add_tabs(&mut self, n: usize) {
        self.code.add_tabs(n);
    }

    pub fn sub_tabs(&mut self, n: usize) {
        self.code.sub_tabs(n);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Indexed access
// ══════════════════════════════════════════════════════════════════════════════

impl<'a> StackPusher<'a> {
    pub fn push_int(&mut self, value: i64) {
        self.push(1, &format!("PUSHINT {value}"));
    }

    /// Copy the value at depth `i` to the top.
    pub fn push_s(&mut self, i: usize) {
        if i == 0 {
            self.push(1, "DUP");
        } else if i <= MAX_STACK_REF {
            self.push(1, &format!("PUSH S{i}"));
        } else {
            self.push_int(i as i64);
            self.push(0, "PICK");
        }
    }

    /// `tuple → tuple[i]`
    pub fn index(&mut self, i: usize) {
        if i <= MAX_DIRECT_INDEX {
            self.push(0, &format!("INDEX {i}"));
        } else {
            assert!(i <= MAX_INDEX_VAR, "tuple index {i} out of range");
            self.push_int(i as i64);
            self.push(-1, "INDEXVAR");
        }
    }

    /// `tuple value → tuple'`
    pub fn set_index(&mut self, i: usize) {
        if i <= MAX_DIRECT_INDEX {
            self.push(-1, &format!("SETINDEX {i}"));
        } else {
            assert!(i <= MAX_INDEX_VAR, "tuple index {i} out of range");
            self.push_int(i as i64);
            self.push(-2, "SETINDEXVAR");
        }
    }

    /// `tuple → v0 … v(n-1)`
    pub fn untuple(&mut self, n: usize) {
        if n <= MAX_DIRECT_INDEX {
            self.push(n as i32 - 1, &format!("UNTUPLE {n}"));
        } else {
            assert!(n <= MAX_STACK_REF, "cannot untuple {n} values");
            self.push_int(n as i64);
            self.push(n as i32 - 2, "UNTUPLEVAR");
        }
    }

    /// `v0 … v(n-1) → tuple`
    pub fn tuple(&mut self, n: usize) {
        if n <= MAX_DIRECT_INDEX {
            self.push(1 - n as i32, &format!("TUPLE {n}"));
        } else {
            assert!(n <= MAX_STACK_REF, "cannot build a tuple of {n} values");
            self.push_int(n as i64);
            self.push(-(n as i32), "TUPLEVAR");
        }
    }

    pub fn get_glob(&mut self, index: usize) {
        if index <= MAX_DIRECT_GLOB {
            self.push(1, &format!("GETGLOB {index}"));
        } else {
            assert!(index < MAX_STACK_REF, "global index {index} out of range");
            self.push_int(index as i64);
            self.push(0, "GETGLOBVAR");
        }
    }

    pub fn set_glob(&mut self, index: usize) {
        if index <= MAX_DIRECT_GLOB {
            self.push(-1, &format!("SETGLOB {index}"));
        } else {
            assert!(index < MAX_STACK_REF, "global index {index} out of range");
            self.push_int(index as i64);
            self.push(-2, "SETGLOBVAR");
        }
    }

    pub fn get_glob_var(&mut self, decl: DeclId) {
        let index = self.ctx.state_var_index(decl);
        self.get_glob(index);
    }

    pub fn set_glob_var(&mut self, decl: DeclId) {
        let index = self.ctx.state_var_index(decl);
        self.set_glob(index);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Reordering and removal
// ══════════════════════════════════════════════════════════════════════════════

impl<'a> StackPusher<'a> {
    /// Swap `s(i)` and `s(j)`, `i <= j`.
    pub fn exchange(&mut self, i: usize, j: usize) {
        assert!(i <= j, "exchange expects i <= j, got {i} and {j}");
        if i == j {
            return;
        }
        if i == 0 && j <= MAX_STACK_REF {
            if j == 1 {
                self.push(0, "SWAP");
            } else if j <= MAX_DIRECT_INDEX {
                self.push(0, &format!("XCHG s{j}"));
            } else {
                self.push(0, &format!("XCHG s0,s{j}"));
            }
        } else if 1 <= i && j <= MAX_DIRECT_INDEX {
            self.push(0, &format!("XCHG s{i},s{j}"));
        } else {
            assert!(j <= MAX_STACK_REF, "stack reference s{j} out of range");
            self.exchange(0, i);
            self.exchange(0, j);
            self.exchange(0, i);
        }
    }

    /// Reverse the `i` values starting at depth `j`.
    pub fn reverse(&mut self, i: usize, j: usize) {
        assert!(i >= 2, "reverse needs at least two values, got {i}");
        if i == 2 && j == 0 {
            self.push(0, "SWAP");
        } else if i == 3 && j == 0 {
            self.push(0, "XCHG s2");
        } else if i - 2 <= MAX_DIRECT_INDEX && j <= MAX_DIRECT_INDEX {
            self.push(0, &format!("REVERSE {i}, {j}"));
        } else {
            self.push_int(i as i64);
            self.push_int(j as i64);
            self.push(-2, "REVX");
        }
    }

    /// Move the `m` values below the top `n` values above them.
    pub fn block_swap(&mut self, m: usize, n: usize) {
        if m == 0 || n == 0 {
            return;
        }
        if m == 1 && n == 1 {
            self.exchange(0, 1);
        } else if m == 2 && n == 2 {
            self.push(0, "SWAP2");
        } else if m <= MAX_BLKSWAP_OPERAND && n <= MAX_BLKSWAP_OPERAND {
            self.push(0, &format!("BLKSWAP {m}, {n}"));
        } else {
            self.push_int(m as i64);
            self.push_int(n as i64);
            self.push(-2, "BLKSWX");
        }
    }

    pub fn drop(&mut self, n: usize) {
        match n {
            0 => {}
            1 => self.push(-1, "DROP"),
            2 => self.push(-2, "DROP2"),
            _ if n <= MAX_DIRECT_INDEX => self.push(-(n as i32), &format!("BLKDROP {n}")),
            _ => {
                self.push_int(n as i64);
                self.push(-(n as i32) - 1, "DROPX");
            }
        }
    }

    /// Remove the `dropped` values situated under the top `left` values.
    pub fn drop_under(&mut self, left: usize, dropped: usize) {
        if dropped == 0 {
            return;
        }
        if left == 0 {
            self.drop(dropped);
            return;
        }
        match (dropped, left) {
            (1, 1) => self.push(-1, "NIP"),
            (2, 1) => {
                self.push(-1, "NIP");
                self.push(-1, "NIP");
            }
            (d, 1) if d > 2 => {
                self.exchange(0, d);
                self.drop(d);
            }
            _ => {
                if dropped > MAX_DIRECT_INDEX || left > MAX_DIRECT_INDEX {
                    self.push_int(dropped as i64);
                    self.push_int(left as i64);
                    self.push(-2, "BLKSWX");
                } else {
                    self.block_swap(dropped, left);
                }
                self.drop(dropped);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Continuations, calls and branches
// ══════════════════════════════════════════════════════════════════════════════

impl<'a> StackPusher<'a> {
    /// Push a continuation built by a nested engine. Its body is opaque to
    /// this engine's model; only the continuation value itself is counted.
    pub fn push_cont(&mut self, cont: &CodeLines, comment: Option<&str>) {
        match comment {
            Some(comment) => self.push(0, &format!("PUSHCONT {{ ; {comment}")),
            None => self.push(0, "PUSHCONT {"),
        }
        self.code.add_tabs(1);
        self.code.append(cont);
        self.code.sub_tabs(1);
        log::trace!("spliced continuation of {} line(s)", cont.len());
        self.push(1, "}");
    }

    /// Open an inline continuation whose body runs on this engine's model.
    ///
    /// The body must leave the depth unchanged; [`Self::end_continuation`]
    /// checks that and then counts the continuation value.
    pub fn start_continuation(&mut self) {
        self.cont_checkpoints.push(self.stack.size());
        self.code.start_continuation();
    }

    pub fn end_continuation(&mut self) {
        let Some(checkpoint) = self.cont_checkpoints.pop() else {
            panic!("end_continuation without start_continuation");
        };
        self.stack.ensure_size(checkpoint, "end of inline continuation");
        self.code.sub_tabs(1);
        self.push(1, "}");
    }

    /// `flag then else → …`. `branch_diff` is the net effect of either
    /// branch on the values below the flag.
    pub fn if_else(&mut self, then_code: &CodeLines, else_code: &CodeLines, branch_diff: i32) {
        self.push_cont(then_code, None);
        self.push_cont(else_code, None);
        self.push(branch_diff - 3, "IFELSE");
    }

    pub fn if_then(&mut self, body: &CodeLines, branch_diff: i32) {
        self.push_cont(body, None);
        self.push(branch_diff - 2, "IF");
    }

    pub fn if_not(&mut self, body: &CodeLines, branch_diff: i32) {
        self.push_cont(body, None);
        self.push(branch_diff - 2, "IFNOT");
    }

    pub fn push_call(&mut self, name: &str, ft: &FunctionType) {
        let diff = ft.returns.len() as i32 - ft.params.len() as i32;
        self.push(diff, &format!("CALL ${name}$"));
    }

    pub fn push_private_function_or_macro_call(&mut self, delta: i32, name: &str) {
        self.push(delta, &format!("CALL ${name}$"));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Literals, directives and diagnostics output
// ══════════════════════════════════════════════════════════════════════════════

impl<'a> StackPusher<'a> {
    pub fn push_zero_address(&mut self) {
        self.push(1, ZERO_ADDRESS_SLICE);
    }

    /// Push `addr_std` for workchain 0 and the given account id.
    pub fn push_literal_address(&mut self, account: &[u8; 32]) {
        let bits = literal_to_slice_address(account);
        self.push(1, &format!("PUSHSLICE x{}", binary_string_to_slice(&bits)));
    }

    /// `PRINTSTR`, unless debug output is switched off.
    pub fn push_log(&mut self, text: &str) {
        if !self.config.without_logstr {
            self.push(0, &format!("PRINTSTR {text}"));
        }
    }

    pub fn generate_globl(&mut self, name: &str, public: bool) {
        self.push(0, &format!(".globl\t{name}"));
        if public {
            self.push(0, &format!(".public\t{name}"));
        }
        self.push(0, &format!(".type\t{name}, @function"));
    }

    pub fn generate_internal(&mut self, name: &str, id: u32) {
        self.push(0, &format!(".internal-alias :{name},        {id}"));
        self.push(0, &format!(".internal\t:{name}"));
    }

    pub fn generate_macro(&mut self, name: &str) {
        self.push(0, &format!(".macro {name}"));
    }

    /// Store the value on top into the bound parameter `decl`.
    ///
    /// Returns false when `decl` is not on this engine's stack.
    pub fn try_assign_param(&mut self, decl: DeclId) -> bool {
        if !self.stack.is_param(decl) {
            return false;
        }
        match self.stack.offset(decl) {
            0 => {}
            1 => self.push(-1, "NIP"),
            idx => self.push(-1, &format!("POP s{idx}")),
        }
        true
    }

    /// Range check for an explicit conversion to `target`.
    pub fn ensure_value_fits_type(
        &mut self,
        target: &ElementaryTypeName,
        span: Span,
    ) -> CodegenResult<()> {
        self.push(0, &format!(";; {target}"));
        match target {
            ElementaryTypeName::IntM(bits) => self.push(0, &format!("FITS {bits}")),
            ElementaryTypeName::UIntM(bits) => self.push(0, &format!("UFITS {bits}")),
            ElementaryTypeName::BytesM(bytes) => {
                self.push(0, &format!("UFITS {}", 8 * u16::from(*bytes)))
            }
            ElementaryTypeName::Int => self.push(0, "FITS 256"),
            ElementaryTypeName::UInt => self.push(0, "UFITS 256"),
            ElementaryTypeName::Bool => self.push(0, "FITS 1"),
            // Addresses are slices; nothing to check.
            ElementaryTypeName::Address => {}
            ElementaryTypeName::Other(_) => {
                return Err(CodegenError::unsupported(
                    span,
                    ErrorCode::UNIMPLEMENTED_CAST,
                    "Unimplemented casting",
                ))
            }
        }
        Ok(())
    }

    /// Push a string literal assigned to a fixed-bytes value as an integer.
    pub fn try_implicit_convert(&mut self, left: &Type, string_literal: Option<&str>) -> bool {
        match (left, string_literal) {
            (Type::FixedBytes { .. }, Some(literal)) => {
                let value = big_endian_to_decimal(literal.as_bytes());
                self.push(1, &format!("PUSHINT {value}"));
                true
            }
            _ => false,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Slice readers
// ══════════════════════════════════════════════════════════════════════════════

impl<'a> StackPusher<'a> {
    /// `slice → array slice'` (or `slice' array` without `direct_order`).
    pub fn load_array(&mut self, direct_order: bool) {
        self.push(1, "LDU 32");
        self.push(1, "LDDICT");
        self.push(0, "ROTREV");
        self.push(-1, "PAIR");
        if direct_order {
            self.exchange(0, 1);
        }
    }

    /// `slice → array`
    pub fn preload_array(&mut self) {
        self.push(1, "LDU 32");
        self.push(0, "PLDDICT");
        self.push(-1, "PAIR");
    }

    /// `slice → value slice'`
    pub fn load(&mut self, ty: &Type, span: Span) -> CodegenResult<()> {
        match ty.category() {
            Category::Integral => {
                let (cmd, bits) = numeric_op(ty, "LDI", "LDU");
                self.push(1, &format!("{cmd} {bits}"));
            }
            Category::VarInteger => self.push(1, var_integer_op(ty, "LDVARINT32", "LDVARUINT32")),
            Category::Address => self.push(1, "LDMSGADDR"),
            Category::ByteArray | Category::Cell => self.push(1, "LDREF"),
            Category::UsualArray => self.load_array(true),
            Category::Mapping => self.push(1, "LDDICT"),
            Category::Struct
            | Category::Slice
            | Category::Builder
            | Category::Function => {
                return Err(CodegenError::unsupported(
                    span,
                    ErrorCode::UNSUPPORTED_DECODING,
                    format!("Unsupported type for decoding: {ty}"),
                ))
            }
        }
        Ok(())
    }

    /// `slice → value`
    ///
    /// # Panics
    ///
    /// For categories that are never stored inline in a dictionary leaf.
    pub fn preload(&mut self, ty: &Type) {
        match ty.category() {
            Category::Integral => {
                let (cmd, bits) = numeric_op(ty, "PLDI", "PLDU");
                self.push(0, &format!("{cmd} {bits}"));
            }
            Category::UsualArray => self.preload_array(),
            Category::Mapping => self.push(0, "PLDDICT"),
            Category::VarInteger => {
                self.push(1, var_integer_op(ty, "LDVARINT32", "LDVARUINT32"));
                self.push(-1, "DROP");
            }
            Category::Address
            | Category::ByteArray
            | Category::Struct
            | Category::Cell
            | Category::Slice
            | Category::Builder
            | Category::Function => panic!("cannot preload a value of type {ty}"),
        }
    }
}

/// Pick the signed or unsigned spelling of a fixed-width instruction.
pub(crate) fn numeric_op(ty: &Type, signed: &'static str, unsigned: &'static str) -> (&'static str, u16) {
    let Some(info) = ty.numeric_info() else {
        panic!("{ty} is not an integral type");
    };
    (if info.signed { signed } else { unsigned }, info.bits)
}

pub(crate) fn var_integer_op(ty: &Type, signed: &'static str, unsigned: &'static str) -> &'static str {
    match ty {
        Type::VarInteger { signed: true, .. } => signed,
        _ => unsigned,
    }
}

/// Store instruction for an integral or address value.
///
/// `reversed` selects the `…R` form that expects the builder below the value.
pub(crate) fn store_integral_or_address(ty: &Type, reversed: bool) -> String {
    let suffix = if reversed { "R" } else { "" };
    match ty.category() {
        Category::Address => format!("STSLICE{suffix}"),
        _ => {
            let (cmd, bits) = numeric_op(ty, "STI", "STU");
            format!("{cmd}{suffix} {bits}")
        }
    }
}

pub(crate) fn expect_struct(ty: &Type) -> &StructType {
    match ty {
        Type::Struct(st) => st,
        other => panic!("{other} is not a struct"),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Contract storage
// ══════════════════════════════════════════════════════════════════════════════

impl<'a> StackPusher<'a> {
    /// Put the default value of every non-constant state variable into its
    /// global slot.
    pub fn reset_all_state_vars(&mut self) -> CodegenResult<()> {
        let ctx = self.ctx;
        self.push(0, ";; set default state vars");
        for var in ctx.not_constant_state_variables() {
            self.push_default_value(&var.ty, false)?;
            self.set_glob_var(var.id);
        }
        self.push(0, ";; end set default state vars");
        Ok(())
    }

    /// The `c7_to_c4` macro: serialise the persistent header and every state
    /// variable into the contract's data cell.
    pub fn generate_c7_to_c4_macro(&mut self) -> CodegenResult<()> {
        let ctx = self.ctx;
        self.push(0, ".macro\tc7_to_c4");
        self.get_glob(GLOB_PUBKEY);
        self.push(1, "NEWC");
        self.push(-1, "STU 256");
        let mut header_bits = C4_HEADER_BITS;
        if ctx.store_timestamp_in_c4() {
            self.get_glob(GLOB_TIMESTAMP);
            self.push(-1, "STUR 64");
            header_bits += C4_TIMESTAMP_BITS;
        }
        self.get_glob(GLOB_CONSTRUCTOR_FLAG);
        self.push(-1, "STUR 1");
        if !ctx.not_constant_state_variables().is_empty() {
            StructCompiler::state_vars_to_builder(self, header_bits)?;
        }
        self.push(0, "ENDC");
        self.push(-1, "POP C4");
        self.push(0, " ");
        Ok(())
    }
}

/// Prologue that switches the selector register for bodies calling private
/// functions.
pub fn switch_selector_if_need(has_private_call: bool) -> CodeLines {
    let mut code = CodeLines::new();
    if has_private_call {
        code.push("PUSHINT 1");
        code.push("CALL 1");
    }
    code
}
