//! Dictionary codec: key preparation, value representation, get and set.
//!
//! The stack model counts a dictionary lookup as producing two slots,
//! `value flag`, on both outcomes. The result policy then consumes the flag
//! and leaves exactly one value (two for [`DictOperation::Fetch`], one for
//! [`DictOperation::Exist`]).

use tvmgen_types::{Category, ErrorCode, Span, Type};

use crate::code_lines::CodeLines;
use crate::consts::{ARRAY_INDEX_OUT_OF_RANGE, HASHED_KEY_BIT_LENGTH, STD_ADDRESS_BIT_LENGTH};
use crate::error::{CodegenError, CodegenResult};
use crate::pusher::{expect_struct, store_integral_or_address, var_integer_op, StackPusher};
use crate::structs::StructCompiler;

/// What a lookup leaves on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictOperation {
    /// `m[k]`: the value, or the default when absent.
    GetFromMapping,
    /// `a[i]`: the value, throwing when the index is out of range.
    GetFromArray,
    /// `m.fetch(k)`: the found flag and the value (or a placeholder).
    Fetch,
    /// `m.exists(k)`: the found flag only.
    Exist,
}

// ══════════════════════════════════════════════════════════════════════════════
// Keys
// ══════════════════════════════════════════════════════════════════════════════

/// Bit length of a dictionary key of type `key`.
///
/// # Panics
///
/// If `key` cannot be a dictionary key.
pub fn length_of_dict_key(key: &Type) -> u32 {
    match key.category() {
        Category::Integral => match key.numeric_info() {
            Some(info) => u32::from(info.bits),
            None => panic!("{key} has no bit width"),
        },
        Category::Address => STD_ADDRESS_BIT_LENGTH,
        Category::ByteArray => HASHED_KEY_BIT_LENGTH,
        _ => panic!("{key} cannot be a dictionary key"),
    }
}

/// Key-kind letter of the `DICT{c}…` instructions.
///
/// Hashed keys are unsigned integers; addresses are looked up as slices.
pub fn dict_key_char(key: &Type) -> &'static str {
    match key.category() {
        Category::Integral => match key.numeric_info() {
            Some(info) if info.signed => "I",
            _ => "U",
        },
        Category::ByteArray => "U",
        _ => "",
    }
}

/// Key type used to index a container.
///
/// # Panics
///
/// If `container` is not indexable.
pub fn parse_index_type(container: &Type) -> Type {
    match container {
        Type::Array { .. } | Type::ExtraCurrencyCollection => Type::uint(32),
        Type::Mapping { key, .. } => (**key).clone(),
        other => panic!("{other} is not indexable"),
    }
}

impl<'a> StackPusher<'a> {
    /// `key dict → hkey dict`: variable-length keys are looked up by hash.
    pub fn prepare_key_for_dict_operations(&mut self, key: &Type) {
        if key.is_byte_array() {
            self.push(1, "PUSH s1");
            self.push(0, "HASHCU");
            self.push(-1, "POP s2");
        }
    }

    /// Hashed keys cannot be turned back into the original key.
    pub fn restore_key_after_dict_operations(&mut self, key: &Type, span: Span) -> CodegenResult<()> {
        if key.is_byte_array() {
            return Err(CodegenError::unsupported(
                span,
                ErrorCode::UNSUPPORTED_KEY_TYPE,
                format!("Unsupported for mapping key type: {key}"),
            ));
        }
        Ok(())
    }

    /// Bring the value on top into the form the set instruction stores.
    ///
    /// Returns true if the value is now a builder (stored with `…SETB`).
    pub fn prepare_value_for_dict_operations(
        &mut self,
        key: &Type,
        value: &Type,
        is_builder: bool,
        span: Span,
    ) -> CodegenResult<bool> {
        match value.category() {
            Category::Integral => {
                if !is_builder {
                    self.push(1, "NEWC");
                    self.push(-1, &store_integral_or_address(value, false));
                }
                Ok(true)
            }
            Category::Struct => {
                let st = expect_struct(value);
                if StructCompiler::is_compatible_with_sdk(length_of_dict_key(key), st) {
                    if !is_builder {
                        StructCompiler::new(self, st, span).tuple_to_builder()?;
                    }
                } else {
                    if !is_builder {
                        StructCompiler::new(self, st, span).tuple_to_builder()?;
                    }
                    self.push(1, "NEWC");
                    self.push(-1, "STBREF");
                }
                Ok(true)
            }
            Category::UsualArray => {
                if !is_builder {
                    self.push(1, "UNPAIR");
                    self.push(0, "SWAP");
                    self.push(1, "NEWC");
                    self.push(-1, "STU 32");
                    self.push(-1, "STDICT");
                }
                Ok(true)
            }
            Category::ByteArray | Category::Cell => {
                if is_builder {
                    self.push(0, "ENDC");
                }
                Ok(false)
            }
            Category::Mapping => {
                if !is_builder {
                    self.push(1, "NEWC");
                    self.push(-1, "STDICT");
                }
                Ok(true)
            }
            Category::VarInteger => {
                if !is_builder {
                    self.push(1, "NEWC");
                    self.push(0, "SWAP");
                    self.push(-1, var_integer_op(value, "STVARINT32", "STVARUINT32"));
                }
                Ok(true)
            }
            Category::Address | Category::Slice => Ok(is_builder),
            Category::Builder => Ok(true),
            Category::Function => Err(unsupported_value(value, span)),
        }
    }

    /// `value key dict → dict'`
    ///
    /// The value must already be in the form chosen by
    /// [`Self::prepare_value_for_dict_operations`].
    pub fn set_dict(
        &mut self,
        key: &Type,
        value: &Type,
        is_builder: bool,
        span: Span,
    ) -> CodegenResult<()> {
        let key_length = length_of_dict_key(key);
        let by_builder = format!("DICT{}SETB", dict_key_char(key));
        let by_slice = format!("DICT{}SET", dict_key_char(key));
        let by_ref = format!("DICT{}SETREF", dict_key_char(key));

        let cmd = match value.category() {
            Category::Address | Category::Slice => {
                if is_builder {
                    by_builder
                } else {
                    by_slice
                }
            }
            Category::Cell | Category::ByteArray => {
                assert!(!is_builder, "{value} is stored by reference, not as a builder");
                by_ref
            }
            Category::Struct => {
                if StructCompiler::is_compatible_with_sdk(key_length, expect_struct(value)) {
                    if is_builder {
                        by_builder
                    } else {
                        by_slice
                    }
                } else {
                    assert!(is_builder, "a by-reference struct must be prepared as a builder");
                    by_builder
                }
            }
            Category::Integral
            | Category::VarInteger
            | Category::UsualArray
            | Category::Mapping => {
                assert!(is_builder, "{value} must be prepared as a builder");
                by_builder
            }
            Category::Builder => by_builder,
            Category::Function => return Err(unsupported_value(value, span)),
        };

        self.push_int(i64::from(key_length));
        self.push(-3, &cmd);
        Ok(())
    }

    /// `key dict → result`, shaped by `op`.
    ///
    /// With `result_as_slice_for_struct` struct values are left as the
    /// serialised slice instead of being decoded into a tuple.
    pub fn get_from_dict(
        &mut self,
        key: &Type,
        value: &Type,
        span: Span,
        op: DictOperation,
        result_as_slice_for_struct: bool,
    ) -> CodegenResult<()> {
        let key_length = length_of_dict_key(key);
        let opcode = format!("DICT{}", dict_key_char(key));

        // Reject before anything reaches the log.
        if value.category() == Category::Function {
            return Err(unsupported_value(value, span));
        }

        self.prepare_key_for_dict_operations(key);
        self.push_int(i64::from(key_length));

        // Body run when a value was found, below a duplicated flag.
        let mut have_value = self.nested(2);
        have_value.push(0, "SWAP");

        match value.category() {
            Category::Cell | Category::ByteArray | Category::Address | Category::Slice => {
                let by_ref = matches!(value.category(), Category::Cell | Category::ByteArray);
                self.push(-1, &format!("{opcode}{}", if by_ref { "GETREF" } else { "GET" }));
                match op {
                    DictOperation::GetFromMapping => {
                        let default = self.default_dict_value(value, result_as_slice_for_struct)?;
                        self.if_not(&default, 0);
                    }
                    DictOperation::GetFromArray => self.throw_if_out_of_range(),
                    DictOperation::Fetch => self.fetch_value(value, have_value, false)?,
                    DictOperation::Exist => self.check_exist(),
                }
            }
            Category::Struct => {
                let st = expect_struct(value);
                if StructCompiler::is_compatible_with_sdk(key_length, st) {
                    self.push(-1, &format!("{opcode}GET"));
                    match op {
                        DictOperation::GetFromMapping => {
                            if result_as_slice_for_struct {
                                let default = self.default_dict_value(value, true)?;
                                self.if_not(&default, 0);
                            } else {
                                self.start_continuation();
                                StructCompiler::new(self, st, span).convert_slice_to_tuple()?;
                                self.end_continuation();

                                let mut fail = self.nested(0);
                                StructCompiler::new(&mut fail, st, span)
                                    .create_default_struct(false)?;
                                let fail = fail.into_code();
                                self.push_cont(&fail, None);
                                self.push(-3, "IFELSE");
                            }
                        }
                        DictOperation::GetFromArray => {
                            self.throw_if_out_of_range();
                            if !result_as_slice_for_struct {
                                StructCompiler::new(self, st, span).convert_slice_to_tuple()?;
                            }
                        }
                        DictOperation::Fetch => {
                            if !result_as_slice_for_struct {
                                StructCompiler::new(&mut have_value, st, span)
                                    .convert_slice_to_tuple()?;
                            }
                            self.fetch_value(value, have_value, result_as_slice_for_struct)?;
                        }
                        DictOperation::Exist => self.check_exist(),
                    }
                } else {
                    self.push(-1, &format!("{opcode}GETREF"));
                    match op {
                        DictOperation::GetFromMapping => {
                            let mut found = self.nested(1);
                            found.push(0, "CTOS");
                            if !result_as_slice_for_struct {
                                StructCompiler::new(&mut found, st, span)
                                    .convert_slice_to_tuple()?;
                            }
                            let found = found.into_code();
                            let default =
                                self.default_dict_value(value, result_as_slice_for_struct)?;
                            self.if_else(&found, &default, 0);
                        }
                        DictOperation::GetFromArray => {
                            self.throw_if_out_of_range();
                            self.push(0, "CTOS");
                            if !result_as_slice_for_struct {
                                StructCompiler::new(self, st, span).convert_slice_to_tuple()?;
                            }
                        }
                        DictOperation::Fetch => {
                            have_value.push(0, "CTOS");
                            if !result_as_slice_for_struct {
                                StructCompiler::new(&mut have_value, st, span)
                                    .convert_slice_to_tuple()?;
                            }
                            self.fetch_value(value, have_value, result_as_slice_for_struct)?;
                        }
                        DictOperation::Exist => self.check_exist(),
                    }
                }
            }
            Category::Integral
            | Category::UsualArray
            | Category::Mapping
            | Category::VarInteger
            | Category::Builder => {
                self.push(-1, &format!("{opcode}GET"));
                match op {
                    DictOperation::GetFromMapping => {
                        let mut found = self.nested(1);
                        found.preload_dict_value(value);
                        let found = found.into_code();
                        let default = self.default_dict_value(value, false)?;
                        self.if_else(&found, &default, 0);
                    }
                    DictOperation::GetFromArray => {
                        self.throw_if_out_of_range();
                        self.preload_dict_value(value);
                    }
                    DictOperation::Fetch => {
                        have_value.preload_dict_value(value);
                        self.fetch_value(value, have_value, false)?;
                    }
                    DictOperation::Exist => self.check_exist(),
                }
            }
            Category::Function => unreachable!("rejected above"),
        }
        Ok(())
    }

    /// `slice → value` for values stored inline in a leaf.
    fn preload_dict_value(&mut self, value: &Type) {
        if value.category() == Category::Builder {
            self.push(1, "NEWC");
            self.push(-1, "STSLICE");
        } else {
            self.preload(value);
        }
    }

    fn throw_if_out_of_range(&mut self) {
        self.push(-1, &format!("THROWIFNOT {ARRAY_INDEX_OUT_OF_RANGE}"));
    }

    /// Continuation pushing the value a missing key reads as.
    fn default_dict_value(&self, value: &Type, result_as_slice_for_struct: bool) -> CodegenResult<CodeLines> {
        let mut default = self.nested(0);
        if value.category() == Category::Struct && result_as_slice_for_struct {
            default.push_default_value(value, true)?;
            default.push(0, "ENDC");
            default.push(0, "CTOS");
        } else {
            default.push_default_value(value, false)?;
        }
        Ok(default.into_code())
    }

    /// `value flag → flag value`, with the default when not found.
    fn fetch_value(
        &mut self,
        value: &Type,
        have_value: StackPusher<'a>,
        result_as_slice_for_struct: bool,
    ) -> CodegenResult<()> {
        let no_value = self.default_dict_value(value, result_as_slice_for_struct)?;
        let have_value = have_value.into_code();
        self.push(1, "DUP");
        self.if_else(&have_value, &no_value, 0);
        Ok(())
    }

    /// `value flag → flag`
    fn check_exist(&mut self) {
        let mut nip = self.nested(2);
        nip.push(-1, "NIP");
        let nip = nip.into_code();
        self.push(1, "DUP");
        self.if_then(&nip, -1);
    }
}

fn unsupported_value(value: &Type, span: Span) -> CodegenError {
    CodegenError::unsupported(
        span,
        ErrorCode::UNSUPPORTED_VALUE_TYPE,
        format!("Unsupported value type: {value}"),
    )
}
