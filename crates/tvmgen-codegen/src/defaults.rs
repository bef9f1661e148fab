//! Default values per category.

use tvmgen_types::{Category, Span, Type};

use crate::error::CodegenResult;
use crate::pusher::{expect_struct, store_integral_or_address, var_integer_op, StackPusher};
use crate::structs::StructCompiler;

impl<'a> StackPusher<'a> {
    /// Push the default value of `ty`.
    ///
    /// With `result_builder` the value is left serialised in a fresh builder
    /// instead, ready to be stored as a dictionary leaf.
    ///
    /// # Panics
    ///
    /// If a builder is requested for a function value.
    pub fn push_default_value(&mut self, ty: &Type, result_builder: bool) -> CodegenResult<()> {
        match ty.category() {
            Category::Address => {
                self.push_zero_address();
                if result_builder {
                    self.push(1, "NEWC");
                    self.push(-1, "STSLICE");
                }
            }
            Category::Integral => {
                self.push(1, "PUSHINT 0");
                if result_builder {
                    self.push(1, "NEWC");
                    self.push(-1, &store_integral_or_address(ty, false));
                }
            }
            Category::VarInteger => {
                self.push(1, "PUSHINT 0");
                if result_builder {
                    self.push(1, "NEWC");
                    self.push(0, "SWAP");
                    self.push(-1, var_integer_op(ty, "STVARINT32", "STVARUINT32"));
                }
            }
            Category::ByteArray | Category::Cell => {
                self.push(1, "NEWC");
                if !result_builder {
                    self.push(0, "ENDC");
                }
            }
            Category::UsualArray => {
                if result_builder {
                    self.push(1, "NEWC");
                    self.push_int(33);
                    self.push(-1, "STZEROES");
                } else {
                    self.push_int(0);
                    self.push(1, "NEWDICT");
                    self.push(-1, "PAIR");
                }
            }
            Category::Mapping => {
                if result_builder {
                    self.push(1, "NEWC");
                    self.push(0, "STSLICECONST 0");
                } else {
                    self.push(1, "NEWDICT");
                }
            }
            Category::Struct => {
                StructCompiler::new(self, expect_struct(ty), Span::synthetic())
                    .create_default_struct(result_builder)?;
            }
            Category::Slice => {
                self.push(1, "PUSHSLICE x8_");
                if result_builder {
                    self.push(1, "NEWC");
                    self.push(-1, "STSLICE");
                }
            }
            Category::Builder => self.push(1, "NEWC"),
            Category::Function => {
                assert!(!result_builder, "function values cannot be serialised");
                let Some(ft) = ty.as_function() else {
                    panic!("{ty} has no function type");
                };
                let mut body = self.nested(ft.params.len());
                body.drop(ft.params.len());
                for ret in &ft.returns {
                    body.push_default_value(ret, false)?;
                }
                let body = body.into_code();
                self.push_cont(&body, None);
            }
        }
        Ok(())
    }
}
