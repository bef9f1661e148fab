//! Contract-wide code emission.
//!
//! Sections are emitted in a fixed order:
//! 1. Function headers: exported names and internal aliases
//! 2. The `c7_to_c4` storage macro
//! 3. The default-state macro
//! 4. Return encoders for public functions with results
//! 5. Event encoders
//!
//! Each section is built by its own [`StackPusher`] and spliced into the
//! contract log only when it compiled cleanly. Diagnostics from every section
//! are collected before the compilation is reported as failed.

use std::collections::BTreeMap;

use tvmgen_codegen::{
    CodeLines, CodegenConfig, CodegenResult, CompilerContext, FunctionSelector,
    ReasonOfOutboundMessage, StackPusher,
};
use tvmgen_types::{CompileErrors, ContractDecl, Span, Type};

use crate::output::CompiledContract;

/// Macro that stores the default of every state variable in its global.
pub const DEFAULT_STATE_MACRO: &str = "default_state";

// ══════════════════════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════════════════════

/// Compile the contract-level sections of `contract`.
///
/// `file` names the source in diagnostics.
pub fn compile(
    contract: &ContractDecl,
    config: &CodegenConfig,
    file: &str,
) -> Result<CompiledContract, CompileErrors> {
    let ctx = match CompilerContext::new(contract) {
        Ok(ctx) => ctx,
        Err(err) => {
            let mut errors = CompileErrors::empty();
            errors.push_error(err.to_diagnostic(file));
            return Err(errors);
        }
    };
    Compiler::new(&ctx, config, file).compile()
}

/// Name of the macro encoding the results of the exported function `name`.
pub fn return_encoder_name(name: &str) -> String {
    format!("encode_return_{name}")
}

pub fn event_encoder_name(event: &str) -> String {
    format!("encode_event_{event}")
}

// ══════════════════════════════════════════════════════════════════════════════
// Compiler
// ══════════════════════════════════════════════════════════════════════════════

struct Compiler<'a> {
    ctx: &'a CompilerContext,
    config: &'a CodegenConfig,
    file: &'a str,
    code: CodeLines,
    errors: CompileErrors,
    /// Exported function name → selector.
    functions: BTreeMap<String, u32>,
    /// Event name → selector.
    events: BTreeMap<String, u32>,
}

impl<'a> Compiler<'a> {
    fn new(ctx: &'a CompilerContext, config: &'a CodegenConfig, file: &'a str) -> Self {
        Self {
            ctx,
            config,
            file,
            code: CodeLines::new(),
            errors: CompileErrors::empty(),
            functions: BTreeMap::new(),
            events: BTreeMap::new(),
        }
    }

    fn compile(mut self) -> Result<CompiledContract, CompileErrors> {
        self.emit_function_headers();
        self.emit_section(0, 0, "c7_to_c4", |p| p.generate_c7_to_c4_macro());
        self.emit_section(0, 0, DEFAULT_STATE_MACRO, |p| {
            p.generate_macro(DEFAULT_STATE_MACRO);
            p.reset_all_state_vars()?;
            p.push(0, " ");
            Ok(())
        });
        self.emit_return_encoders();
        self.emit_event_encoders();

        if self.errors.has_errors() {
            log::debug!(
                "{}: {} error(s)",
                self.ctx.contract_name(),
                self.errors.total_errors
            );
            return Err(self.errors);
        }
        log::debug!(
            "{}: {} line(s), {} exported function(s), {} event(s)",
            self.ctx.contract_name(),
            self.code.len(),
            self.functions.len(),
            self.events.len()
        );
        Ok(CompiledContract {
            name: self.ctx.contract_name().to_string(),
            code: self.code.render(""),
            functions: self.functions,
            events: self.events,
        })
    }

    /// Run `emit` on a fresh engine holding `stack_size` values and splice
    /// its log in. The engine must finish with `expected` values.
    fn emit_section(
        &mut self,
        stack_size: usize,
        expected: usize,
        location: &str,
        emit: impl FnOnce(&mut StackPusher<'a>) -> CodegenResult<()>,
    ) {
        let mut pusher = StackPusher::with_stack_size(self.ctx, self.config, stack_size);
        match emit(&mut pusher) {
            Ok(()) => {
                pusher.ensure_size(expected, location);
                self.code.append(&pusher.into_code());
            }
            Err(err) => {
                log::debug!("{location}: {err}");
                self.errors.push_error(err.to_diagnostic(self.file));
            }
        }
    }

    // ── Sections ─────────────────────────────────────────────────────────

    fn emit_function_headers(&mut self) {
        let ctx = self.ctx;
        let mut exported = Vec::new();
        self.emit_section(0, 0, "function headers", |p| {
            for f in ctx.functions() {
                let id = ctx.function_id(f);
                if f.public {
                    let name = ctx.function_external_name(f);
                    p.generate_globl(&name, true);
                    exported.push((name, id));
                } else {
                    p.generate_internal(&ctx.function_internal_name(f), id);
                }
                p.push(0, " ");
            }
            Ok(())
        });
        self.functions.extend(exported);
    }

    fn emit_return_encoders(&mut self) {
        let ctx = self.ctx;
        for f in ctx
            .functions()
            .iter()
            .filter(|f| f.public && !f.returns.is_empty())
        {
            let name = return_encoder_name(&ctx.function_external_name(f));
            self.emit_encoder(
                &name,
                FunctionSelector::Id(ctx.function_id(f)),
                &f.returns,
                ReasonOfOutboundMessage::FunctionReturnExternal,
                f.span,
            );
        }
    }

    fn emit_event_encoders(&mut self) {
        let ctx = self.ctx;
        for event in ctx.events() {
            let id = ctx.event_id(event);
            self.emit_encoder(
                &event_encoder_name(&event.name),
                FunctionSelector::Id(id),
                &event.params,
                ReasonOfOutboundMessage::EmitEventExternal,
                event.span,
            );
            self.events.insert(event.name.clone(), id);
        }
    }

    /// `values → builder`: a macro serialising `types` behind `selector`.
    /// The first value is the deepest.
    fn emit_encoder(
        &mut self,
        name: &str,
        selector: FunctionSelector,
        types: &[Type],
        reason: ReasonOfOutboundMessage,
        span: Span,
    ) {
        let n = types.len();
        self.emit_section(n, 1, name, |p| {
            p.generate_macro(name);
            let mut push_param = |p: &mut StackPusher<'a>, idx: usize| -> CodegenResult<()> {
                // The payload builders sit above the values.
                let above = p.stack_size() - n;
                p.push_s(above + n - 1 - idx);
                Ok(())
            };
            let bits = p.encode_function_and_params(&selector, types, &mut push_param, reason, span)?;
            p.drop_under(1, n);
            match bits {
                Some(bits) => log::trace!("{name}: {bits} bit(s)"),
                None => log::trace!("{name}: spans several cells"),
            }
            p.push(0, " ");
            Ok(())
        });
    }
}
