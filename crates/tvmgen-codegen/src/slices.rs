//! Bit-string literals and their slice-constant spelling.
//!
//! Bit strings are `String`s of `'0'`/`'1'`. Slice constants are written in
//! hex; when the bit length is not a multiple of four a completion tag (a
//! single `1` followed by zeros) pads the last nibble and the constant gets
//! a trailing `_`.

/// Append the low `bit_len` bits of `value`, most significant first.
pub fn add_binary_number_to_string(s: &mut String, value: u128, bit_len: usize) {
    for i in (0..bit_len).rev() {
        let bit = if i < 128 { (value >> i) & 1 } else { 0 };
        s.push(if bit == 0 { '0' } else { '1' });
    }
}

/// Hex spelling of a bit string as used by `PUSHSLICE x…`/`STSLICECONST x…`.
pub fn binary_string_to_slice(bits: &str) -> String {
    let mut s = bits.to_string();
    let completion_tag = s.len() % 4 != 0;
    if completion_tag {
        s.push('1');
        while s.len() % 4 != 0 {
            s.push('0');
        }
    }
    let mut hex = String::with_capacity(s.len() / 4 + 1);
    for nibble in s.as_bytes().chunks(4) {
        let value = nibble
            .iter()
            .fold(0u32, |acc, b| (acc << 1) | u32::from(*b == b'1'));
        hex.push(char::from_digit(value, 16).unwrap_or('0'));
    }
    if completion_tag {
        hex.push('_');
    }
    hex
}

/// `Grams`: a 4-bit byte length followed by the value in that many bytes.
///
/// # Panics
///
/// If the value needs 120 bits or more.
pub fn grams_to_binary_string(value: u128) -> String {
    let bit_len = (128 - value.leading_zeros()) as usize;
    assert!(bit_len < 120, "gram value should fit 120 bit");
    let byte_len = bit_len.div_ceil(8);
    let mut s = String::new();
    add_binary_number_to_string(&mut s, byte_len as u128, 4);
    add_binary_number_to_string(&mut s, value, byte_len * 8);
    s
}

/// `addr_std$10 anycast:nothing workchain_id:0 address:bits256`.
pub fn literal_to_slice_address(account: &[u8; 32]) -> String {
    let mut s = String::with_capacity(267);
    s.push_str("10");
    s.push('0');
    s.push_str("00000000");
    for byte in account {
        add_binary_number_to_string(&mut s, u128::from(*byte), 8);
    }
    s
}

/// Decimal spelling of a big-endian unsigned integer of any width.
pub fn big_endian_to_decimal(bytes: &[u8]) -> String {
    let mut digits: Vec<u8> = vec![0];
    for byte in bytes {
        let mut carry = u32::from(*byte);
        for d in digits.iter_mut() {
            let v = u32::from(*d) * 256 + carry;
            *d = (v % 10) as u8;
            carry = v / 10;
        }
        while carry > 0 {
            digits.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    digits.iter().rev().map(|d| char::from(b'0' + d)).collect()
}
