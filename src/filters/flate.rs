//! FlateEncode via `flate2`.
//!
//! Output is zlib framed: a two-byte header, the raw deflate stream at level 6 and the
//! big-endian Adler-32 checksum of the input. Decoding is not offered; a document only
//! ever writes compressed streams.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::Result;
use crate::filters::StreamFilter;

/// Compression level used for every Flate stream.
pub const FLATE_LEVEL: u32 = 6;

/// `FlateEncode` filter.
pub struct FlateEncoder;

impl StreamFilter for FlateEncoder {
    fn apply(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(flate_encode(input)?)
    }

    fn name(&self) -> &'static str {
        "FlateEncode"
    }
}

/// Compress `data` into a zlib stream.
pub fn flate_encode(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(FLATE_LEVEL));
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    log::trace!("FlateEncode: {} -> {} bytes", data.len(), compressed.len());
    Ok(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_zlib_header_for_level_six() {
        let compressed = flate_encode(b"Man is distinguished").unwrap();
        assert_eq!(&compressed[..2], &[0x78, 0x9c]);
    }

    #[test]
    fn test_adler32_trailer_is_big_endian() {
        let compressed = flate_encode(b"Man is distinguished").unwrap();
        let tail = &compressed[compressed.len() - 4..];
        assert_eq!(tail, &[0x4c, 0x9c, 0x07, 0xad]);
    }

    #[test]
    fn test_round_trips_through_inflate() {
        let data = b"BT /F1 16 Tf (Hello) Tj ET\n".repeat(20);
        let compressed = flate_encode(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(inflate(&compressed), data);
    }

    #[test]
    fn test_empty_input_still_framed() {
        let compressed = flate_encode(b"").unwrap();
        assert_eq!(&compressed[..2], &[0x78, 0x9c]);
        assert!(inflate(&compressed).is_empty());
    }
}
