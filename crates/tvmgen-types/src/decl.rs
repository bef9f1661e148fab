//! Contract declarations handed to the backend by the front end.
//!
//! These are already resolved: inheritance is flattened (state variables
//! appear in base-to-derived order) and every type is a [`Type`].

use crate::ty::{FunctionType, Type};
use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a declaration. Stack slots are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub u32);

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A state variable, parameter or local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub id: DeclId,
    pub name: String,
    pub ty: Type,
    #[serde(default)]
    pub constant: bool,
    #[serde(default)]
    pub span: Span,
}

impl VariableDecl {
    pub fn new(id: u32, name: impl Into<String>, ty: Type) -> Self {
        Self {
            id: DeclId(id),
            name: name.into(),
            ty,
            constant: false,
            span: Span::synthetic(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    #[default]
    Regular,
    Constructor,
    Fallback,
    Receive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<VariableDecl>,
    #[serde(default)]
    pub returns: Vec<Type>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub kind: FunctionKind,
    /// Declared without a body (abstract or interface member).
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub span: Span,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: Vec::new(),
            public: false,
            kind: FunctionKind::Regular,
            is_abstract: false,
            span: Span::synthetic(),
        }
    }

    pub fn function_type(&self) -> FunctionType {
        FunctionType::new(
            self.params.iter().map(|p| p.ty.clone()).collect(),
            self.returns.clone(),
        )
    }

    /// `name(param,types)(return,types)`, the text hashed into a selector.
    pub fn abi_signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.ty.to_string()).collect();
        let returns: Vec<String> = self.returns.iter().map(|t| t.to_string()).collect();
        format!("{}({})({})", self.name, params.join(","), returns.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Type>,
    #[serde(default)]
    pub span: Span,
}

impl EventDecl {
    pub fn abi_signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|t| t.to_string()).collect();
        format!("{}({})()", self.name, params.join(","))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbiVersion {
    V1,
    #[default]
    V2,
}

/// Pragma-derived contract flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pragmas {
    #[serde(default)]
    pub abi_version: AbiVersion,
    /// `pragma AbiHeader time`.
    #[serde(default)]
    pub time: bool,
    #[serde(default)]
    pub ignore_int_overflow: bool,
}

/// A contract with its inheritance chain already flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDecl {
    pub name: String,
    #[serde(default)]
    pub state_vars: Vec<VariableDecl>,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    #[serde(default)]
    pub events: Vec<EventDecl>,
    #[serde(default)]
    pub pragmas: Pragmas,
}

impl ContractDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state_vars: Vec::new(),
            functions: Vec::new(),
            events: Vec::new(),
            pragmas: Pragmas::default(),
        }
    }
}

/// Target of an explicit elementary conversion such as `uint8(x)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "width", rename_all = "snake_case")]
pub enum ElementaryTypeName {
    IntM(u16),
    UIntM(u16),
    BytesM(u8),
    Int,
    UInt,
    Address,
    Bool,
    Other(String),
}

impl fmt::Display for ElementaryTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntM(n) => write!(f, "int{n}"),
            Self::UIntM(n) => write!(f, "uint{n}"),
            Self::BytesM(n) => write!(f, "bytes{n}"),
            Self::Int => write!(f, "int"),
            Self::UInt => write!(f, "uint"),
            Self::Address => write!(f, "address"),
            Self::Bool => write!(f, "bool"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abi_signature() {
        let mut f = FunctionDecl::new("transfer");
        f.params = vec![
            VariableDecl::new(1, "dest", Type::Address),
            VariableDecl::new(2, "value", Type::uint(128)),
        ];
        f.returns = vec![Type::Bool];
        assert_eq!(f.abi_signature(), "transfer(address,uint128)(bool)");
        assert_eq!(f.function_type().params.len(), 2);
    }

    #[test]
    fn test_contract_from_json_with_defaults() {
        let json = r#"{
            "name": "Wallet",
            "state_vars": [
                { "id": 1, "name": "owner", "ty": { "kind": "address" } }
            ],
            "functions": [ { "name": "withdraw", "public": true } ],
            "pragmas": { "abi_version": "v1" }
        }"#;
        let contract: ContractDecl = serde_json::from_str(json).unwrap();
        assert_eq!(contract.state_vars[0].id, DeclId(1));
        assert!(!contract.state_vars[0].constant);
        assert_eq!(contract.functions[0].kind, FunctionKind::Regular);
        assert_eq!(contract.pragmas.abi_version, AbiVersion::V1);
        assert!(contract.events.is_empty());
    }

    #[test]
    fn test_elementary_type_name_display() {
        assert_eq!(ElementaryTypeName::UIntM(8).to_string(), "uint8");
        assert_eq!(ElementaryTypeName::BytesM(4).to_string(), "bytes4");
        assert_eq!(ElementaryTypeName::Other("string".into()).to_string(), "string");
    }
}
