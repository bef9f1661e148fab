//! Read-only contract metadata shared by every engine.
//!
//! Built once from a [`ContractDecl`] before any code is emitted. Nothing in
//! the code generator can mutate it afterwards; engines hold `&CompilerContext`.

use std::collections::{BTreeMap, HashMap};

use sha2::{Digest, Sha256};
use tvmgen_types::{
    AbiVersion, ContractDecl, DeclId, EventDecl, FunctionDecl, FunctionKind, Pragmas,
    VariableDecl,
};

use crate::consts::FIRST_STATE_VAR_GLOB;
use crate::error::{CodegenError, CodegenResult};

#[derive(Debug, Clone)]
pub struct CompilerContext {
    contract_name: String,
    pragmas: Pragmas,
    state_vars: Vec<VariableDecl>,
    state_var_index: HashMap<DeclId, usize>,
    functions: BTreeMap<String, FunctionDecl>,
    functions_list: Vec<FunctionDecl>,
    events: BTreeMap<String, EventDecl>,
    ignore_int_overflow: bool,
    have_set_dest_addr: bool,
    have_fallback: bool,
    have_receive: bool,
    have_on_bounce: bool,
    after_signature_check: Option<FunctionDecl>,
}

impl CompilerContext {
    pub fn new(contract: &ContractDecl) -> CodegenResult<Self> {
        let mut events = BTreeMap::new();
        for event in &contract.events {
            if events.insert(event.name.clone(), event.clone()).is_some() {
                return Err(CodegenError::DuplicateEvent {
                    span: event.span,
                    name: event.name.clone(),
                });
            }
        }

        let mut ignore_int_overflow = contract.pragmas.ignore_int_overflow;
        let mut have_set_dest_addr = false;
        let mut have_fallback = false;
        let mut have_receive = false;
        let mut have_on_bounce = false;
        for f in &contract.functions {
            ignore_int_overflow |= f.name == "tvm_ignore_integer_overflow";
            have_set_dest_addr |= f.name == "tvm_set_ext_dest_address";
            have_fallback |= f.kind == FunctionKind::Fallback;
            have_receive |= f.kind == FunctionKind::Receive;
            have_on_bounce |= f.name == "onBounce";
        }

        let mut functions = BTreeMap::new();
        let mut functions_list = Vec::new();
        for f in contract.functions.iter().filter(|f| !f.is_abstract) {
            if f.kind != FunctionKind::Constructor {
                functions.insert(f.name.clone(), f.clone());
            }
            if !is_tvm_intrinsic(&f.name) {
                functions_list.push(f.clone());
            }
        }

        let state_vars: Vec<VariableDecl> = contract
            .state_vars
            .iter()
            .filter(|v| !v.constant)
            .cloned()
            .collect();
        let state_var_index = state_vars
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id, FIRST_STATE_VAR_GLOB + i))
            .collect();

        let after_signature_check = contract
            .functions
            .iter()
            .find(|f| f.name == "afterSignatureCheck")
            .cloned();

        log::debug!(
            "context for {}: {} state vars, {} functions, {} events",
            contract.name,
            state_vars.len(),
            functions_list.len(),
            events.len()
        );

        Ok(Self {
            contract_name: contract.name.clone(),
            pragmas: contract.pragmas.clone(),
            state_vars,
            state_var_index,
            functions,
            functions_list,
            events,
            ignore_int_overflow,
            have_set_dest_addr,
            have_fallback,
            have_receive,
            have_on_bounce,
            after_signature_check,
        })
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn pragmas(&self) -> &Pragmas {
        &self.pragmas
    }

    /// Non-constant state variables in storage order.
    pub fn not_constant_state_variables(&self) -> &[VariableDecl] {
        &self.state_vars
    }

    /// Global slot of a state variable.
    ///
    /// # Panics
    ///
    /// If `decl` is not a non-constant state variable of this contract.
    pub fn state_var_index(&self, decl: DeclId) -> usize {
        match self.state_var_index.get(&decl) {
            Some(index) => *index,
            None => panic!("{decl} is not a state variable of {}", self.contract_name),
        }
    }

    pub fn local_function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.get(name)
    }

    /// Functions that get a body of their own, in declaration order.
    pub fn functions(&self) -> &[FunctionDecl] {
        &self.functions_list
    }

    pub fn event(&self, name: &str) -> Option<&EventDecl> {
        self.events.get(name)
    }

    /// Events ordered by name.
    pub fn events(&self) -> impl Iterator<Item = &EventDecl> {
        self.events.values()
    }

    pub fn have_time_in_abi_header(&self) -> bool {
        match self.pragmas.abi_version {
            AbiVersion::V1 => true,
            AbiVersion::V2 => self.pragmas.time || self.after_signature_check.is_none(),
        }
    }

    pub fn store_timestamp_in_c4(&self) -> bool {
        self.have_time_in_abi_header() && self.after_signature_check.is_none()
    }

    pub fn after_signature_check(&self) -> Option<&FunctionDecl> {
        self.after_signature_check.as_ref()
    }

    pub fn is_stdlib(&self) -> bool {
        self.contract_name == "stdlib"
    }

    pub fn have_set_dest_addr(&self) -> bool {
        self.have_set_dest_addr
    }

    pub fn have_fallback_function(&self) -> bool {
        self.have_fallback
    }

    pub fn have_receive_function(&self) -> bool {
        self.have_receive
    }

    pub fn have_on_bounce_handler(&self) -> bool {
        self.have_on_bounce
    }

    pub fn ignore_integer_overflow(&self) -> bool {
        self.ignore_int_overflow
    }

    pub fn function_internal_name(&self, f: &FunctionDecl) -> String {
        if self.is_stdlib() {
            return f.name.clone();
        }
        if f.name == "onCodeUpgrade" {
            return ":onCodeUpgrade".to_string();
        }
        format!("{}_internal", f.name)
    }

    /// Name under which a public function is exported.
    ///
    /// # Panics
    ///
    /// If `f` is not public.
    pub fn function_external_name(&self, f: &FunctionDecl) -> String {
        assert!(f.public, "expected public function: {}", f.name);
        match f.kind {
            FunctionKind::Constructor => "constructor".to_string(),
            FunctionKind::Fallback => "fallback".to_string(),
            FunctionKind::Regular | FunctionKind::Receive => f.name.clone(),
        }
    }

    /// 32-bit selector of a function: the leading bytes of
    /// `sha256(name(params)(returns)vN)`.
    pub fn function_id(&self, f: &FunctionDecl) -> u32 {
        self.selector_of(&f.abi_signature())
    }

    pub fn event_id(&self, event: &EventDecl) -> u32 {
        self.selector_of(&event.abi_signature())
    }

    fn selector_of(&self, signature: &str) -> u32 {
        let version = match self.pragmas.abi_version {
            AbiVersion::V1 => "v1",
            AbiVersion::V2 => "v2",
        };
        let digest = Sha256::digest(format!("{signature}{version}").as_bytes());
        u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
    }
}

fn is_tvm_intrinsic(name: &str) -> bool {
    name.starts_with("tvm_")
}
