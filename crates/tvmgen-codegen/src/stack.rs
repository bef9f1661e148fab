//! Symbolic model of the operand stack.
//!
//! The model tracks only depth plus the slot each named declaration was
//! bound to. Offsets are always computed against the current depth, so a
//! binding stays valid while values are pushed and popped above it.

use std::collections::HashMap;

use tvmgen_types::DeclId;

#[derive(Debug, Clone, Default)]
pub struct StackModel {
    size: usize,
    slots: HashMap<DeclId, usize>,
}

impl StackModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model that starts with `size` anonymous values already present.
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            slots: HashMap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Apply an instruction's stack effect.
    ///
    /// # Panics
    ///
    /// If the depth would become negative. That means some instruction was
    /// emitted with a wrong declared effect.
    pub fn change(&mut self, diff: i32) {
        let new_size = self.size as i64 + i64::from(diff);
        assert!(
            new_size >= 0,
            "stack underflow: size {} changed by {}",
            self.size,
            diff
        );
        self.size = new_size as usize;
    }

    /// Bind `decl` to a stack slot.
    ///
    /// With `allocated` the value is a fresh slot on top (depth grows by
    /// one); otherwise the value already on top is renamed.
    pub fn add(&mut self, decl: DeclId, allocated: bool) {
        assert!(
            !self.slots.contains_key(&decl),
            "declaration {decl} is already bound"
        );
        let slot = if allocated {
            self.size += 1;
            self.size - 1
        } else {
            assert!(self.size > 0, "cannot alias {decl} on an empty stack");
            self.size - 1
        };
        self.slots.insert(decl, slot);
    }

    pub fn is_param(&self, decl: DeclId) -> bool {
        self.slots.contains_key(&decl)
    }

    /// Distance of `decl` from the top of the stack (0 is the top).
    pub fn offset(&self, decl: DeclId) -> usize {
        self.offset_of_slot(self.slot_of(decl))
    }

    pub fn offset_of_slot(&self, slot: usize) -> usize {
        assert!(
            slot < self.size,
            "slot {slot} is below the current depth {}",
            self.size
        );
        self.size - 1 - slot
    }

    /// Raw slot index recorded when `decl` was bound.
    pub fn slot_of(&self, decl: DeclId) -> usize {
        match self.slots.get(&decl) {
            Some(slot) => *slot,
            None => panic!("declaration {decl} is not on the stack"),
        }
    }

    /// Checkpoint used where code paths rejoin.
    pub fn ensure_size(&self, expected: usize, location: &str) {
        assert!(
            expected == self.size,
            "stack: {} vs {} at {}",
            expected,
            self.size,
            location
        );
    }
}
