//! ASCII85 (Adobe base-85) encoding and decoding.
//!
//! Four input bytes become five characters in the range `!`..=`u`; an all-zero group is
//! shortened to `z`. A trailing partial group of `n` bytes is written as `n + 1`
//! characters, and the output ends with the `~>` terminator.

use crate::error::{Error, Result};
use crate::filters::StreamFilter;

/// `ASCII85Encode` filter.
pub struct Ascii85Encoder;

impl StreamFilter for Ascii85Encoder {
    fn apply(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(ascii85_encode(input))
    }

    fn name(&self) -> &'static str {
        "ASCII85Encode"
    }
}

/// `ASCII85Decode` filter.
pub struct Ascii85Decoder;

impl StreamFilter for Ascii85Decoder {
    fn apply(&self, input: &[u8]) -> Result<Vec<u8>> {
        ascii85_decode(input)
    }

    fn name(&self) -> &'static str {
        "ASCII85Decode"
    }
}

/// Encode `input`, terminated with `~>`.
pub fn ascii85_encode(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len() * 5 / 4 + 7);

    for chunk in input.chunks(4) {
        let mut group = [0u8; 4];
        group[..chunk.len()].copy_from_slice(chunk);
        let value = u32::from_be_bytes(group);

        if chunk.len() == 4 && value == 0 {
            output.push(b'z');
            continue;
        }

        let mut digits = [0u8; 5];
        let mut rest = value;
        for slot in digits.iter_mut().rev() {
            *slot = (rest % 85) as u8 + b'!';
            rest /= 85;
        }
        output.extend_from_slice(&digits[..chunk.len() + 1]);
    }

    output.extend_from_slice(b"~>");
    output
}

/// Decode `input`. Whitespace is ignored, an optional `<~` prefix is skipped and
/// decoding stops at `~`.
pub fn ascii85_decode(input: &[u8]) -> Result<Vec<u8>> {
    let body = input.strip_prefix(b"<~").unwrap_or(input);
    let mut output = Vec::with_capacity(body.len() * 4 / 5);
    let mut acc: u64 = 0;
    let mut count = 0usize;

    for &byte in body {
        match byte {
            b'~' => break,
            b'z' if count == 0 => output.extend_from_slice(&[0, 0, 0, 0]),
            b'z' => {
                return Err(Error::invalid_argument(
                    "ASCII85Decode: 'z' inside a group",
                ));
            },
            b'!'..=b'u' => {
                acc = acc * 85 + u64::from(byte - b'!');
                count += 1;
                if count == 5 {
                    output.extend_from_slice(&group_bytes(acc)?);
                    acc = 0;
                    count = 0;
                }
            },
            _ if byte.is_ascii_whitespace() => {},
            _ => {
                return Err(Error::invalid_argument(format!(
                    "ASCII85Decode: invalid character '{}'",
                    byte as char
                )));
            },
        }
    }

    match count {
        0 => {},
        1 => {
            return Err(Error::invalid_argument(
                "ASCII85Decode: a final group needs at least 2 characters",
            ));
        },
        _ => {
            // pad with 'u' and keep count - 1 bytes
            for _ in count..5 {
                acc = acc * 85 + 84;
            }
            let bytes = group_bytes(acc)?;
            output.extend_from_slice(&bytes[..count - 1]);
        },
    }

    Ok(output)
}

fn group_bytes(value: u64) -> Result<[u8; 4]> {
    u32::try_from(value)
        .map(u32::to_be_bytes)
        .map_err(|_| Error::invalid_argument("ASCII85Decode: group value overflows 32 bits"))
}
