//! String encoding for literal strings `( ... )`.
//!
//! Text that fits in Latin-1 is written byte for byte. Anything containing a character
//! above U+00FF is re-encoded as UCS-2 big-endian. Document-level strings (the info
//! dictionary) carry the `FE FF` byte order mark, content-stream text does not.

use crate::error::{Error, Result};

/// Encode `text` as 8-bit bytes, switching to UCS-2BE when needed.
///
/// # Errors
///
/// Characters outside the Basic Multilingual Plane cannot be expressed in UCS-2.
///
/// # Examples
///
/// ```
/// use pdf_author::writer::to_8bit_stream;
///
/// assert_eq!(to_8bit_stream("caf\u{e9}", true).unwrap(), b"caf\xe9");
/// assert_eq!(to_8bit_stream("\u{20ac}", true).unwrap(), vec![0xfe, 0xff, 0x20, 0xac]);
/// assert_eq!(to_8bit_stream("\u{20ac}", false).unwrap(), vec![0x20, 0xac]);
/// ```
pub fn to_8bit_stream(text: &str, with_bom: bool) -> Result<Vec<u8>> {
    if text.chars().all(|c| (c as u32) <= 0xff) {
        return Ok(text.chars().map(|c| c as u32 as u8).collect());
    }

    let mut out = Vec::with_capacity(text.len() * 2 + 2);
    if with_bom {
        out.extend_from_slice(&[0xfe, 0xff]);
    }
    for (i, c) in text.chars().enumerate() {
        let code = c as u32;
        if code > 0xffff {
            return Err(Error::invalid_argument(format!(
                "Character at position {} of string '{}' exceeds 16bits. Cannot be encoded into UCS-2 BE",
                i, text
            )));
        }
        out.push((code >> 8) as u8);
        out.push((code & 0xff) as u8);
    }
    Ok(out)
}

/// Encode with [`to_8bit_stream`] and escape `\`, `(` and `)`.
pub fn pdf_escape(text: &str, with_bom: bool) -> Result<Vec<u8>> {
    let raw = to_8bit_stream(text, with_bom)?;
    Ok(escape_bytes(&raw))
}

pub(crate) fn escape_bytes(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    for &b in raw {
        if matches!(b, b'\\' | b'(' | b')') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_passes_through() {
        assert_eq!(to_8bit_stream("abc", false).unwrap(), b"abc");
        assert_eq!(to_8bit_stream("\u{ff}", true).unwrap(), vec![0xff]);
    }

    #[test]
    fn test_escape_parens_and_backslash() {
        assert_eq!(pdf_escape("a(b)c\\", true).unwrap(), b"a\\(b\\)c\\\\");
    }

    #[test]
    fn test_ucs2_bytes_are_escaped_too() {
        // U+0128 encodes to 0x01 0x28, and 0x28 is '('
        assert_eq!(pdf_escape("\u{128}", false).unwrap(), vec![0x01, b'\\', 0x28]);
    }

    #[test]
    fn test_astral_plane_rejected() {
        let err = to_8bit_stream("a\u{1F600}", false).unwrap_err();
        assert!(err.to_string().contains("position 1"));
    }
}
