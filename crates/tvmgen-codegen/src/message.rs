//! Internal outbound messages: the `int_msg_info` header and `SENDRAWMSG`.
//!
//! ```text
//! int_msg_info$0 ihr_disabled:Bool bounce:Bool bounced:Bool
//!                src:MsgAddress dest:MsgAddressInt
//!                value:CurrencyCollection ihr_fee:Grams fwd_fee:Grams
//!                created_lt:uint64 created_at:uint32
//! ```
//!
//! Fields known at compile time are accumulated as literal bits and flushed
//! with a single store right before the next runtime field.

use std::collections::{BTreeMap, BTreeSet};

use crate::consts::{ADDRESS_MAX_BIT_LENGTH, CELL_BIT_LENGTH, GRAMS_MAX_BIT_LENGTH};
use crate::error::CodegenResult;
use crate::pusher::{PushValue, StackPusher};
use crate::slices::binary_string_to_slice;

/// Pushes a message body builder; returns its exact bit length if known.
pub type PushBody<'f, 'a> = dyn FnMut(&mut StackPusher<'a>) -> CodegenResult<Option<u32>> + 'f;

/// Longest literal stored with `STSLICECONST`.
const MAX_SLICE_CONST_BITS: usize = 8 * 7 + 1;

/// Header fields in serialisation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MsgField {
    IhrDisabled,
    Bounce,
    Bounced,
    Src,
    Dest,
    Grams,
    Currency,
    IhrFee,
    FwdFee,
    CreatedLt,
    CreatedAt,
}

impl MsgField {
    pub const ALL: [MsgField; 11] = [
        MsgField::IhrDisabled,
        MsgField::Bounce,
        MsgField::Bounced,
        MsgField::Src,
        MsgField::Dest,
        MsgField::Grams,
        MsgField::Currency,
        MsgField::IhrFee,
        MsgField::FwdFee,
        MsgField::CreatedLt,
        MsgField::CreatedAt,
    ];

    /// Width of the field's all-zero default.
    pub fn default_bits(self) -> usize {
        match self {
            MsgField::IhrDisabled | MsgField::Bounce | MsgField::Bounced => 1,
            MsgField::Src | MsgField::Dest => 2,
            MsgField::Grams => 4,
            MsgField::Currency => 1,
            MsgField::IhrFee | MsgField::FwdFee => 4,
            MsgField::CreatedLt => 64,
            MsgField::CreatedAt => 32,
        }
    }
}

impl<'a> StackPusher<'a> {
    /// `fields… → fields… builder`, storing the header fields found on the
    /// stack (first field on top).
    ///
    /// Returns the literal bits not yet stored and the maximum size of the
    /// header including them.
    ///
    /// # Panics
    ///
    /// If a field is both constant and on the stack, if the destination is
    /// missing, or if a field that can only be a literal is on the stack.
    pub fn int_msg_info(
        &mut self,
        on_stack: &BTreeSet<MsgField>,
        const_params: &BTreeMap<MsgField, String>,
    ) -> (String, i32) {
        let mut bits = String::from("0");
        let mut max_bits: i32 = 0;
        self.push(1, "NEWC");
        for field in MsgField::ALL {
            assert!(
                !(const_params.contains_key(&field) && on_stack.contains(&field)),
                "{field:?} is both constant and on the stack"
            );
            if let Some(literal) = const_params.get(&field) {
                bits.push_str(literal);
            } else if !on_stack.contains(&field) {
                assert!(field != MsgField::Dest, "message destination must be set");
                bits.push_str(&"0".repeat(field.default_bits()));
            } else {
                max_bits += bits.len() as i32;
                self.append_to_builder(&bits);
                bits.clear();
                match field {
                    MsgField::Bounce => {
                        self.push(-1, "STI 1");
                        max_bits += 1;
                    }
                    MsgField::Dest => {
                        self.push(-1, "STSLICE");
                        max_bits += ADDRESS_MAX_BIT_LENGTH;
                    }
                    MsgField::Grams => {
                        self.exchange(0, 1);
                        self.push(-1, "STGRAMS");
                        max_bits += GRAMS_MAX_BIT_LENGTH;
                    }
                    MsgField::Currency => {
                        self.push(-1, "STDICT");
                        max_bits += 1;
                    }
                    other => panic!("{other:?} cannot be set at runtime"),
                }
            }
        }
        max_bits += bits.len() as i32;
        (bits, max_bits)
    }

    /// Store a literal bit string into the builder on top.
    pub fn append_to_builder(&mut self, bits: &str) {
        if bits.is_empty() {
            return;
        }
        if bits.bytes().all(|b| b == b'0') {
            self.stzeroes(bits.len());
            return;
        }
        let hex = binary_string_to_slice(bits);
        if hex.len() * 4 <= MAX_SLICE_CONST_BITS {
            self.push(0, &format!("STSLICECONST x{hex}"));
        } else {
            self.push(1, &format!("PUSHSLICE x{hex}"));
            self.push(-1, "STSLICER");
        }
    }

    pub fn stzeroes(&mut self, count: usize) {
        match count {
            0 => {}
            1 => self.push(0, "STSLICECONST 0"),
            _ => {
                self.push_int(count as i64);
                self.push(-1, "STZEROES");
            }
        }
    }

    pub fn stones(&mut self, count: usize) {
        match count {
            0 => {}
            1 => self.push(0, "STSLICECONST 1"),
            _ => {
                self.push_int(count as i64);
                self.push(-1, "STONES");
            }
        }
    }

    pub fn sendrawmsg(&mut self) {
        self.push(-2, "SENDRAWMSG");
    }

    /// Build and send an internal message.
    ///
    /// `exprs` push the runtime header fields; they run last field first so
    /// that the first field ends up on top. Without `push_body` the message
    /// has no body; without `push_flag` the configured default flag is used.
    pub fn send_int_msg(
        &mut self,
        exprs: &mut BTreeMap<MsgField, &mut PushValue<'_, 'a>>,
        const_params: &BTreeMap<MsgField, String>,
        push_body: Option<&mut PushBody<'_, 'a>>,
        push_flag: Option<&mut PushValue<'_, 'a>>,
    ) -> CodegenResult<()> {
        let mut on_stack = BTreeSet::new();
        for (field, push_value) in exprs.iter_mut().rev() {
            on_stack.insert(*field);
            (*push_value)(self)?;
        }
        let (bits, mut builder_size) = self.int_msg_info(&on_stack, const_params);

        match push_body {
            Some(push_body) => {
                // No StateInit.
                self.append_to_builder(&format!("{bits}0"));
                builder_size += 1;

                let body_size = push_body(self)?;
                self.exchange(0, 1);
                match body_size {
                    None => self.merge_body_at_runtime(),
                    Some(body) if body as i32 + builder_size <= CELL_BIT_LENGTH => {
                        self.stzeroes(1);
                        self.push(-1, "STB");
                    }
                    Some(_) => {
                        self.stones(1);
                        self.push(-1, "STBREF");
                    }
                }
            }
            // No StateInit and no body.
            None => self.append_to_builder(&format!("{bits}00")),
        }

        self.push(0, "ENDC");
        match push_flag {
            Some(push_flag) => push_flag(self)?,
            None => self.push_int(i64::from(self.config().sendrawmsg_default_flag)),
        }
        self.sendrawmsg();
        Ok(())
    }

    /// `body builder → builder'`: inline the body when the builder has room
    /// for it, otherwise store it by reference.
    fn merge_body_at_runtime(&mut self) {
        self.push(0, "; merge body and builder");
        self.push(1, "PUSH S1");
        self.push(0, "BBITS");
        self.push(1, "PUSH S1");
        self.push(0, "BREMBITS");
        self.push(-1, "GREATER");

        let mut by_ref = self.nested(2);
        by_ref.push(0, "STSLICECONST 1");
        by_ref.push(-1, "STBREF");
        let mut inline = self.nested(2);
        inline.push(0, "STSLICECONST 0");
        inline.push(-1, "STB");
        let (by_ref, inline) = (by_ref.into_code(), inline.into_code());
        self.if_else(&by_ref, &inline, -1);
    }
}
