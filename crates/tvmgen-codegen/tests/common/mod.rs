//! A small symbolic interpreter for generated instruction listings.
//!
//! It covers only the instructions the code generator emits. Cells are
//! modelled bit by bit so that encoders and decoders can be checked against
//! each other; dictionaries are plain maps stored in a root cell.

#![allow(dead_code)]

use std::collections::BTreeMap;

use tvmgen_codegen::{CodeLines, CodegenConfig, CompilerContext, StackPusher};
use tvmgen_types::ContractDecl;

// ══════════════════════════════════════════════════════════════════════════════
// Values
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub bits: Vec<bool>,
    pub refs: Vec<Cell>,
    /// Set on dictionary root cells.
    pub dict: Option<BTreeMap<Vec<bool>, Cell>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub bits: Vec<bool>,
    pub refs: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i128),
    Null,
    Cell(Cell),
    Builder(Cell),
    Slice(Slice),
    Tuple(Vec<Value>),
    Cont(Vec<Instr>),
    /// Opaque marker value, used to track identities through shuffles.
    Tag(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    Op(String),
    Cont(Vec<Instr>),
}

impl Cell {
    pub fn into_slice(self) -> Slice {
        Slice {
            bits: self.bits,
            refs: self.refs,
        }
    }
}

impl Slice {
    fn take_bits(&mut self, n: usize) -> Vec<bool> {
        assert!(n <= self.bits.len(), "cell underflow: need {n} bits, have {}", self.bits.len());
        self.bits.drain(..n).collect()
    }

    fn take_ref(&mut self) -> Cell {
        assert!(!self.refs.is_empty(), "cell underflow: no references left");
        self.refs.remove(0)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Bits
// ══════════════════════════════════════════════════════════════════════════════

pub fn int_to_bits(value: i128, n: usize, signed: bool) -> Vec<bool> {
    if n < 127 {
        let (lo, hi) = if signed {
            (-(1i128 << (n.max(1) - 1)), 1i128 << (n.max(1) - 1))
        } else {
            (0, 1i128 << n)
        };
        assert!(lo <= value && value < hi, "{value} does not fit {n} bits");
    } else if !signed {
        assert!(value >= 0, "{value} does not fit unsigned {n} bits");
    }
    (0..n)
        .rev()
        .map(|i| if i >= 127 { value < 0 } else { (value >> i) & 1 == 1 })
        .collect()
}

pub fn bits_to_int(bits: &[bool], signed: bool) -> i128 {
    let mut acc: i128 = if signed && bits.first() == Some(&true) { -1 } else { 0 };
    for bit in bits {
        acc = acc.wrapping_shl(1) | i128::from(*bit);
    }
    acc
}

/// Parse `x…` hex with an optional completion tag.
pub fn slice_literal(hex: &str) -> Vec<bool> {
    let (digits, tagged) = match hex.strip_suffix('_') {
        Some(d) => (d, true),
        None => (hex, false),
    };
    let mut bits = Vec::new();
    for c in digits.chars() {
        let v = c.to_digit(16).unwrap_or_else(|| panic!("bad hex digit {c}"));
        for i in (0..4).rev() {
            bits.push((v >> i) & 1 == 1);
        }
    }
    if tagged {
        while bits.last() == Some(&false) {
            bits.pop();
        }
        bits.pop();
    }
    bits
}

// ══════════════════════════════════════════════════════════════════════════════
// Parsing
// ══════════════════════════════════════════════════════════════════════════════

pub fn parse(code: &CodeLines) -> Vec<Instr> {
    let lines = code.instructions();
    let mut pos = 0;
    let block = parse_block(&lines, &mut pos);
    assert_eq!(pos, lines.len(), "unbalanced continuation");
    block
}

fn parse_block(lines: &[&str], pos: &mut usize) -> Vec<Instr> {
    let mut out = Vec::new();
    while *pos < lines.len() {
        let line = lines[*pos].trim();
        *pos += 1;
        if line == "}" {
            return out;
        }
        if line.starts_with("PUSHCONT {") {
            out.push(Instr::Cont(parse_block(lines, pos)));
        } else {
            out.push(Instr::Op(line.to_string()));
        }
    }
    out
}

// ══════════════════════════════════════════════════════════════════════════════
// Machine
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct Vm {
    pub stack: Vec<Value>,
    pub globals: BTreeMap<usize, Value>,
    pub c4: Option<Cell>,
    /// Messages handed to `SENDRAWMSG`, with their flags.
    pub sent: Vec<(Cell, i128)>,
}

/// Runtime exception number.
pub type Exit = u32;

impl Vm {
    pub fn new(stack: Vec<Value>) -> Self {
        Self {
            stack,
            ..Self::default()
        }
    }

    pub fn run(&mut self, code: &CodeLines) -> Result<(), Exit> {
        let program = parse(code);
        self.exec(&program)
    }

    pub fn exec(&mut self, program: &[Instr]) -> Result<(), Exit> {
        for instr in program {
            match instr {
                Instr::Cont(body) => self.stack.push(Value::Cont(body.clone())),
                Instr::Op(op) => self.step(op)?,
            }
        }
        Ok(())
    }

    pub fn pop(&mut self) -> Value {
        self.stack.pop().expect("stack underflow")
    }

    pub fn pop_int(&mut self) -> i128 {
        match self.pop() {
            Value::Int(v) => v,
            other => panic!("expected integer, got {other:?}"),
        }
    }

    fn pop_usize(&mut self) -> usize {
        let v = self.pop_int();
        usize::try_from(v).unwrap_or_else(|_| panic!("bad count {v}"))
    }

    fn pop_builder(&mut self) -> Cell {
        match self.pop() {
            Value::Builder(b) => b,
            other => panic!("expected builder, got {other:?}"),
        }
    }

    fn pop_cell(&mut self) -> Cell {
        match self.pop() {
            Value::Cell(c) => c,
            other => panic!("expected cell, got {other:?}"),
        }
    }

    fn pop_slice(&mut self) -> Slice {
        match self.pop() {
            Value::Slice(s) => s,
            other => panic!("expected slice, got {other:?}"),
        }
    }

    fn pop_cont(&mut self) -> Vec<Instr> {
        match self.pop() {
            Value::Cont(c) => c,
            other => panic!("expected continuation, got {other:?}"),
        }
    }

    fn pop_tuple(&mut self) -> Vec<Value> {
        match self.pop() {
            Value::Tuple(t) => t,
            other => panic!("expected tuple, got {other:?}"),
        }
    }

    fn pop_dict(&mut self) -> BTreeMap<Vec<bool>, Cell> {
        match self.pop() {
            Value::Null => BTreeMap::new(),
            Value::Cell(Cell { dict: Some(d), .. }) => d,
            other => panic!("expected dictionary, got {other:?}"),
        }
    }

    fn push_dict(&mut self, dict: BTreeMap<Vec<bool>, Cell>) {
        if dict.is_empty() {
            self.stack.push(Value::Null);
        } else {
            self.stack.push(Value::Cell(Cell {
                dict: Some(dict),
                ..Cell::default()
            }));
        }
    }

    /// Stack index of `s(i)`.
    fn at(&self, i: usize) -> usize {
        assert!(i < self.stack.len(), "s{i} is below the stack ({} values)", self.stack.len());
        self.stack.len() - 1 - i
    }

    fn xchg(&mut self, i: usize, j: usize) {
        let (a, b) = (self.at(i), self.at(j));
        self.stack.swap(a, b);
    }

    fn flag(&mut self, b: bool) {
        self.stack.push(Value::Int(if b { -1 } else { 0 }));
    }

    fn store(b: &mut Cell, bits: &[bool]) {
        b.bits.extend_from_slice(bits);
        assert!(b.bits.len() <= 1023, "cell overflow: {} bits", b.bits.len());
    }

    fn store_ref(b: &mut Cell, c: Cell) {
        b.refs.push(c);
        assert!(b.refs.len() <= 4, "cell overflow: {} references", b.refs.len());
    }

    fn store_dict(b: &mut Cell, d: Value) {
        match d {
            Value::Null => Self::store(b, &[false]),
            Value::Cell(c) => {
                Self::store(b, &[true]);
                Self::store_ref(b, c);
            }
            other => panic!("expected dictionary, got {other:?}"),
        }
    }

    fn load_dict(s: &mut Slice) -> Value {
        if s.take_bits(1)[0] {
            Value::Cell(s.take_ref())
        } else {
            Value::Null
        }
    }

    fn load_msg_addr(s: &mut Slice) -> Slice {
        let tag = s.take_bits(2);
        let bits = match (tag[0], tag[1]) {
            (false, false) => tag,
            (true, false) => {
                let mut bits = tag;
                bits.extend(s.take_bits(1 + 8 + 256));
                bits
            }
            _ => panic!("unsupported address tag {tag:?}"),
        };
        Slice { bits, refs: vec![] }
    }

    fn var_uint_bits(value: i128, len_bits: usize) -> Vec<bool> {
        let bytes = if value == 0 { 0 } else { (128 - value.leading_zeros() as usize).div_ceil(8) };
        let mut bits = int_to_bits(bytes as i128, len_bits, false);
        bits.extend(int_to_bits(value, bytes * 8, false));
        bits
    }

    fn load_var_uint(s: &mut Slice, len_bits: usize) -> i128 {
        let len = bits_to_int(&s.take_bits(len_bits), false) as usize;
        bits_to_int(&s.take_bits(len * 8), false)
    }

    fn dict_key(&mut self, kind: &str, n: usize) -> Vec<bool> {
        match kind {
            "U" => int_to_bits(self.pop_int(), n, false),
            "I" => int_to_bits(self.pop_int(), n, true),
            _ => {
                let mut s = self.pop_slice();
                s.take_bits(n)
            }
        }
    }

    fn hash(cell: &Cell) -> i128 {
        let mut h: i128 = 17;
        for b in &cell.bits {
            h = h.wrapping_mul(31).wrapping_add(i128::from(*b)) & ((1 << 100) - 1);
        }
        h.wrapping_add(cell.refs.len() as i128)
    }

    fn step(&mut self, op: &str) -> Result<(), Exit> {
        if op.starts_with(';') || op.starts_with('.') || op.starts_with("PRINTSTR") {
            return Ok(());
        }
        let (name, arg) = match op.split_once(' ') {
            Some((n, a)) => (n, a.trim()),
            None => (op, ""),
        };
        let num = |a: &str| -> usize { a.trim().parse().unwrap_or_else(|_| panic!("bad operand in {op}")) };
        let sreg = |a: &str| -> usize {
            let a = a.trim();
            num(&a[1..])
        };

        match name {
            // ── Constants ──
            "PUSHINT" => {
                let v: i128 = arg.parse().unwrap_or_else(|_| panic!("bad literal in {op}"));
                self.stack.push(Value::Int(v));
            }
            "TRUE" => self.flag(true),
            "FALSE" => self.flag(false),
            "NULL" => self.stack.push(Value::Null),
            "NEWDICT" => self.stack.push(Value::Null),
            "NEWC" => self.stack.push(Value::Builder(Cell::default())),
            "PUSHSLICE" => {
                let bits = slice_literal(arg.trim_start_matches('x'));
                self.stack.push(Value::Slice(Slice { bits, refs: vec![] }));
            }

            // ── Stack ──
            "DUP" => {
                let v = self.stack[self.at(0)].clone();
                self.stack.push(v);
            }
            "PUSH" => {
                let i = sreg(arg);
                let v = self.stack[self.at(i)].clone();
                self.stack.push(v);
            }
            "PICK" => {
                let i = self.pop_usize();
                let v = self.stack[self.at(i)].clone();
                self.stack.push(v);
            }
            "POP" => {
                if arg == "C4" {
                    self.c4 = Some(self.pop_cell());
                } else {
                    let i = sreg(arg);
                    let v = self.pop();
                    let idx = self.at(i - 1);
                    self.stack[idx] = v;
                }
            }
            "SWAP" => self.xchg(0, 1),
            "XCHG" => match arg.split_once(',') {
                Some((a, b)) => self.xchg(sreg(a), sreg(b)),
                None => self.xchg(0, sreg(arg)),
            },
            "SWAP2" => {
                let len = self.stack.len();
                self.stack[len - 4..].rotate_left(2);
            }
            "ROTREV" => {
                let len = self.stack.len();
                self.stack[len - 3..].rotate_right(1);
            }
            "REVERSE" | "REVX" => {
                let (i, j) = if name == "REVX" {
                    let j = self.pop_usize();
                    (self.pop_usize(), j)
                } else {
                    let (a, b) = arg.split_once(',').expect("REVERSE i, j");
                    (num(a), num(b))
                };
                let hi = self.stack.len() - j;
                self.stack[hi - i..hi].reverse();
            }
            "BLKSWAP" | "BLKSWX" => {
                let (i, j) = if name == "BLKSWX" {
                    let j = self.pop_usize();
                    (self.pop_usize(), j)
                } else {
                    let (a, b) = arg.split_once(',').expect("BLKSWAP i, j");
                    (num(a), num(b))
                };
                let len = self.stack.len();
                self.stack[len - i - j..].rotate_left(i);
            }
            "DROP" => {
                self.pop();
            }
            "DROP2" => {
                self.pop();
                self.pop();
            }
            "BLKDROP" | "DROPX" => {
                let n = if name == "DROPX" { self.pop_usize() } else { num(arg) };
                let len = self.stack.len();
                assert!(n <= len, "stack underflow");
                self.stack.truncate(len - n);
            }
            "NIP" => {
                let v = self.pop();
                self.pop();
                self.stack.push(v);
            }

            // ── Tuples ──
            "TUPLE" | "TUPLEVAR" | "PAIR" => {
                let n = match name {
                    "PAIR" => 2,
                    "TUPLEVAR" => self.pop_usize(),
                    _ => num(arg),
                };
                let len = self.stack.len();
                let items = self.stack.split_off(len - n);
                self.stack.push(Value::Tuple(items));
            }
            "UNTUPLE" | "UNTUPLEVAR" | "UNPAIR" => {
                let n = match name {
                    "UNPAIR" => 2,
                    "UNTUPLEVAR" => self.pop_usize(),
                    _ => num(arg),
                };
                let items = self.pop_tuple();
                assert_eq!(items.len(), n, "untuple arity");
                self.stack.extend(items);
            }
            "INDEX" | "INDEXVAR" => {
                let i = if name == "INDEXVAR" { self.pop_usize() } else { num(arg) };
                let items = self.pop_tuple();
                self.stack.push(items[i].clone());
            }
            "SETINDEX" | "SETINDEXVAR" => {
                let i = if name == "SETINDEXVAR" { self.pop_usize() } else { num(arg) };
                let v = self.pop();
                let mut items = self.pop_tuple();
                items[i] = v;
                self.stack.push(Value::Tuple(items));
            }

            // ── Globals ──
            "GETGLOB" | "GETGLOBVAR" => {
                let i = if name == "GETGLOBVAR" { self.pop_usize() } else { num(arg) };
                let v = self.globals.get(&i).cloned().unwrap_or(Value::Null);
                self.stack.push(v);
            }
            "SETGLOB" | "SETGLOBVAR" => {
                let i = if name == "SETGLOBVAR" { self.pop_usize() } else { num(arg) };
                let v = self.pop();
                self.globals.insert(i, v);
            }

            // ── Arithmetic ──
            "OR" => {
                let y = self.pop_int();
                let x = self.pop_int();
                self.stack.push(Value::Int(x | y));
            }
            "AND" => {
                let y = self.pop_int();
                let x = self.pop_int();
                self.stack.push(Value::Int(x & y));
            }
            "GREATER" => {
                let y = self.pop_int();
                let x = self.pop_int();
                self.flag(x > y);
            }
            "FITS" | "UFITS" => {
                let v = self.pop_int();
                let n = num(arg);
                let ok = if name == "FITS" {
                    n >= 127 || (-(1i128 << (n - 1)) <= v && v < (1i128 << (n - 1)))
                } else {
                    v >= 0 && (n >= 127 || v < (1i128 << n))
                };
                if !ok {
                    return Err(4);
                }
                self.stack.push(Value::Int(v));
            }

            // ── Builders ──
            "STU" | "STI" => {
                let mut b = self.pop_builder();
                let x = self.pop_int();
                Self::store(&mut b, &int_to_bits(x, num(arg), name == "STI"));
                self.stack.push(Value::Builder(b));
            }
            "STUR" | "STIR" => {
                let x = self.pop_int();
                let mut b = self.pop_builder();
                Self::store(&mut b, &int_to_bits(x, num(arg), name == "STIR"));
                self.stack.push(Value::Builder(b));
            }
            "STSLICE" | "STSLICER" => {
                let (b, s) = if name == "STSLICE" {
                    let b = self.pop_builder();
                    (b, self.pop_slice())
                } else {
                    let s = self.pop_slice();
                    (self.pop_builder(), s)
                };
                let mut b = b;
                Self::store(&mut b, &s.bits);
                for r in s.refs {
                    Self::store_ref(&mut b, r);
                }
                self.stack.push(Value::Builder(b));
            }
            "STREF" | "STREFR" => {
                let (mut b, c) = if name == "STREF" {
                    let b = self.pop_builder();
                    (b, self.pop_cell())
                } else {
                    let c = self.pop_cell();
                    (self.pop_builder(), c)
                };
                Self::store_ref(&mut b, c);
                self.stack.push(Value::Builder(b));
            }
            "STBREF" | "STBREFR" => {
                let (mut b, inner) = if name == "STBREF" {
                    let b = self.pop_builder();
                    (b, self.pop_builder())
                } else {
                    let inner = self.pop_builder();
                    (self.pop_builder(), inner)
                };
                Self::store_ref(&mut b, inner);
                self.stack.push(Value::Builder(b));
            }
            "STB" => {
                let mut b = self.pop_builder();
                let inner = self.pop_builder();
                Self::store(&mut b, &inner.bits);
                for r in inner.refs {
                    Self::store_ref(&mut b, r);
                }
                self.stack.push(Value::Builder(b));
            }
            "STDICT" => {
                let mut b = self.pop_builder();
                let d = self.pop();
                Self::store_dict(&mut b, d);
                self.stack.push(Value::Builder(b));
            }
            "STGRAMS" | "STVARUINT32" => {
                let x = self.pop_int();
                let mut b = self.pop_builder();
                let len_bits = if name == "STGRAMS" { 4 } else { 5 };
                Self::store(&mut b, &Self::var_uint_bits(x, len_bits));
                self.stack.push(Value::Builder(b));
            }
            "STZEROES" | "STONES" => {
                let n = self.pop_usize();
                let mut b = self.pop_builder();
                Self::store(&mut b, &vec![name == "STONES"; n]);
                self.stack.push(Value::Builder(b));
            }
            "STSLICECONST" => {
                let mut b = self.pop_builder();
                let bits = match arg {
                    "0" => vec![false],
                    "1" => vec![true],
                    hex => slice_literal(hex.trim_start_matches('x')),
                };
                Self::store(&mut b, &bits);
                self.stack.push(Value::Builder(b));
            }
            "ENDC" => {
                let b = self.pop_builder();
                self.stack.push(Value::Cell(b));
            }
            "BBITS" => {
                let b = self.pop_builder();
                self.stack.push(Value::Int(b.bits.len() as i128));
            }
            "BREMBITS" => {
                let b = self.pop_builder();
                self.stack.push(Value::Int(1023 - b.bits.len() as i128));
            }

            // ── Slices ──
            "CTOS" => {
                let c = self.pop_cell();
                self.stack.push(Value::Slice(c.into_slice()));
            }
            "LDU" | "LDI" | "PLDU" | "PLDI" => {
                let mut s = self.pop_slice();
                let v = bits_to_int(&s.take_bits(num(arg)), name.ends_with('I'));
                self.stack.push(Value::Int(v));
                if !name.starts_with('P') {
                    self.stack.push(Value::Slice(s));
                }
            }
            "LDREF" => {
                let mut s = self.pop_slice();
                let c = s.take_ref();
                self.stack.push(Value::Cell(c));
                self.stack.push(Value::Slice(s));
            }
            "LDREFRTOS" => {
                let mut s = self.pop_slice();
                let c = s.take_ref();
                self.stack.push(Value::Slice(s));
                self.stack.push(Value::Slice(c.into_slice()));
            }
            "LDDICT" | "PLDDICT" => {
                let mut s = self.pop_slice();
                let d = Self::load_dict(&mut s);
                self.stack.push(d);
                if name == "LDDICT" {
                    self.stack.push(Value::Slice(s));
                }
            }
            "LDMSGADDR" => {
                let mut s = self.pop_slice();
                let a = Self::load_msg_addr(&mut s);
                self.stack.push(Value::Slice(a));
                self.stack.push(Value::Slice(s));
            }
            "LDVARUINT32" => {
                let mut s = self.pop_slice();
                let v = Self::load_var_uint(&mut s, 5);
                self.stack.push(Value::Int(v));
                self.stack.push(Value::Slice(s));
            }
            "HASHCU" => {
                let c = self.pop_cell();
                self.stack.push(Value::Int(Self::hash(&c)));
            }

            // ── Control flow ──
            "IF" | "IFNOT" => {
                let body = self.pop_cont();
                let f = self.pop_int();
                if (f != 0) == (name == "IF") {
                    self.exec(&body)?;
                }
            }
            "IFELSE" => {
                let else_body = self.pop_cont();
                let then_body = self.pop_cont();
                let f = self.pop_int();
                self.exec(if f != 0 { &then_body } else { &else_body })?;
            }
            "SENDRAWMSG" => {
                let flag = self.pop_int();
                let msg = self.pop_cell();
                self.sent.push((msg, flag));
            }
            "THROWIFNOT" => {
                if self.pop_int() == 0 {
                    return Err(num(arg) as Exit);
                }
            }

            // ── Dictionaries ──
            _ if name.starts_with("DICT") => self.dict_op(&name[4..])?,

            _ => panic!("simulator does not support `{op}`"),
        }
        Ok(())
    }

    fn dict_op(&mut self, rest: &str) -> Result<(), Exit> {
        let (kind, op) = match rest.as_bytes().first() {
            Some(b'U') | Some(b'I') => rest.split_at(1),
            _ => ("", rest),
        };
        let n = self.pop_usize();
        let mut dict = self.pop_dict();
        let key = self.dict_key(kind, n);
        match op {
            "GET" | "GETREF" => match dict.get(&key) {
                Some(leaf) => {
                    if op == "GETREF" {
                        let mut s = leaf.clone().into_slice();
                        let c = s.take_ref();
                        self.stack.push(Value::Cell(c));
                    } else {
                        self.stack.push(Value::Slice(leaf.clone().into_slice()));
                    }
                    self.flag(true);
                }
                None => self.flag(false),
            },
            "SET" | "SETB" | "SETREF" => {
                let leaf = match op {
                    "SET" => {
                        let s = self.pop_slice();
                        Cell {
                            bits: s.bits,
                            refs: s.refs,
                            dict: None,
                        }
                    }
                    "SETB" => self.pop_builder(),
                    _ => Cell {
                        refs: vec![self.pop_cell()],
                        ..Cell::default()
                    },
                };
                assert!(leaf.bits.len() + n <= 1023, "dictionary leaf overflow");
                dict.insert(key, leaf);
                self.push_dict(dict);
            }
            other => panic!("simulator does not support DICT{kind}{other}"),
        }
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Fixtures
// ══════════════════════════════════════════════════════════════════════════════

pub fn empty_contract() -> ContractDecl {
    ContractDecl::new("Test")
}

/// Run `f` against a fresh engine for `contract` and return its log and
/// final depth.
pub fn emit_with(
    contract: &ContractDecl,
    stack_size: usize,
    f: impl FnOnce(&mut StackPusher<'_>),
) -> (CodeLines, usize) {
    let ctx = CompilerContext::new(contract).expect("valid contract");
    let config = CodegenConfig::default();
    let mut p = StackPusher::with_stack_size(&ctx, &config, stack_size);
    f(&mut p);
    let size = p.stack_size();
    (p.into_code(), size)
}

pub fn emit(stack_size: usize, f: impl FnOnce(&mut StackPusher<'_>)) -> (CodeLines, usize) {
    emit_with(&empty_contract(), stack_size, f)
}

/// `addr_std` in workchain 0 with every account byte set to `fill`.
pub fn std_address(fill: u8) -> Value {
    let mut bits = vec![true, false, false];
    bits.extend(int_to_bits(0, 8, true));
    for _ in 0..32 {
        bits.extend(int_to_bits(i128::from(fill), 8, false));
    }
    Value::Slice(Slice { bits, refs: vec![] })
}

/// A data cell holding `text` as bytes.
pub fn text_cell(text: &str) -> Cell {
    let mut cell = Cell::default();
    for byte in text.bytes() {
        cell.bits.extend(int_to_bits(i128::from(byte), 8, false));
    }
    cell
}

pub fn tags(n: usize) -> Vec<Value> {
    (0..n).map(|i| Value::Tag(format!("v{i}"))).collect()
}
