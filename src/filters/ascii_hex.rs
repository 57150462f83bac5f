//! ASCIIHex encoding and decoding.
//!
//! Encoding writes two lowercase hex digits per byte followed by the `>` end marker.
//! Decoding strips whitespace, stops at the first `>`, pads an odd trailing nibble with
//! `0`, and yields an empty result when anything else is left that is not a hex digit.

use crate::error::Result;
use crate::filters::StreamFilter;

/// `ASCIIHexEncode`: bytes to lowercase hex pairs plus `>`.
pub struct AsciiHexEncoder;

impl StreamFilter for AsciiHexEncoder {
    fn apply(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(hex_encode(input))
    }

    fn name(&self) -> &'static str {
        "ASCIIHexEncode"
    }
}

/// `ASCIIHexDecode`: the inverse of [`AsciiHexEncoder`].
pub struct AsciiHexDecoder;

impl StreamFilter for AsciiHexDecoder {
    fn apply(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(hex_decode(input))
    }

    fn name(&self) -> &'static str {
        "ASCIIHexDecode"
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Hex-encode `input`, always appending the `>` terminator.
pub fn hex_encode(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len() * 2 + 1);
    for &byte in input {
        output.push(HEX_DIGITS[(byte >> 4) as usize]);
        output.push(HEX_DIGITS[(byte & 0x0f) as usize]);
    }
    output.push(b'>');
    output
}

/// Hex-decode `input`. Malformed input decodes to an empty vector, not an error.
pub fn hex_decode(input: &[u8]) -> Vec<u8> {
    let mut digits: Vec<u8> = input
        .iter()
        .copied()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if let Some(end) = digits.iter().position(|&c| c == b'>') {
        digits.truncate(end);
    }
    if digits.len() % 2 == 1 {
        digits.push(b'0');
    }
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Vec::new();
    }

    digits
        .chunks(2)
        .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
        .collect()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}
