//! Integration tests for the stream filter pipeline.

use pdf_author::filters::{
    apply_filter_chain, ascii85_decode, ascii85_encode, hex_decode, hex_encode,
};
use pdf_author::Error;
use proptest::prelude::*;

#[test]
fn test_hex_encode_known_value() {
    assert_eq!(hex_encode(b"ab.cde"), b"61622e636465>");
}

#[test]
fn test_hex_decode_ignores_whitespace() {
    assert_eq!(hex_decode(b"61 62 2e6364 65"), b"ab.cde");
}

#[test]
fn test_ascii85_known_value() {
    assert_eq!(
        ascii85_encode(b"Man is distinguished"),
        b"9jqo^BlbD-BleB1DJ+*+F(f,q~>"
    );
}

#[test]
fn test_chain_reverses_filter_names() {
    let out = apply_filter_chain(b"hello", &["ASCIIHexEncode", "ASCII85Encode"]).unwrap();
    assert_eq!(out.reverse_chain_string(), "/ASCII85Decode /ASCIIHexDecode");

    let hex = ascii85_decode(&out.data).unwrap();
    assert_eq!(hex_decode(&hex), b"hello");
}

#[test]
fn test_unknown_filter() {
    let err = apply_filter_chain(b"x", &["LZWEncode"]).unwrap_err();
    assert!(matches!(err, Error::UnknownFilter(_)));
    assert_eq!(err.to_string(), "The filter: \"LZWEncode\" is not implemented");
}

#[test]
fn test_flate_output_is_zlib() {
    let out = apply_filter_chain(b"BT /F1 12 Tf ET", &["FlateEncode"]).unwrap();
    assert_eq!(out.reverse_chain_string(), "/FlateDecode");
    assert_eq!(out.data[0], 0x78);
}

proptest! {
    #[test]
    fn prop_hex_round_trip(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(hex_decode(&hex_encode(&data)), data);
    }

    #[test]
    fn prop_ascii85_round_trip(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(ascii85_decode(&ascii85_encode(&data)).unwrap(), data);
    }
}
