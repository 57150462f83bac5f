//! Stream filter pipeline.
//!
//! A filter chain is an ordered list of named byte transforms applied left to right.
//! While the chain runs, the inverse of every applied filter is collected; reversed, that
//! list is exactly what a reader must apply, so it becomes the stream's `/Filter` entry.
//!
//! Supported names (with or without a leading `/`):
//! - `ASCIIHexEncode` / `ASCIIHexDecode`
//! - `ASCII85Encode` / `ASCII85Decode`
//! - `FlateEncode` (there is no `FlateDecode` transform; asking for it is an error)

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

mod ascii85;
mod ascii_hex;
mod flate;

pub use ascii85::{ascii85_decode, ascii85_encode, Ascii85Decoder, Ascii85Encoder};
pub use ascii_hex::{hex_decode, hex_encode, AsciiHexDecoder, AsciiHexEncoder};
pub use flate::{flate_encode, FlateEncoder, FLATE_LEVEL};

/// A single byte transform in a filter chain.
pub trait StreamFilter {
    /// Transform the input.
    fn apply(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// The filter's name, e.g. `"FlateEncode"`.
    fn name(&self) -> &'static str;
}

/// Filter names understood by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Hex encode
    ASCIIHexEncode,
    /// Hex decode
    ASCIIHexDecode,
    /// Base-85 encode
    ASCII85Encode,
    /// Base-85 decode
    ASCII85Decode,
    /// zlib compress
    FlateEncode,
    /// zlib decompress (write-only pipeline: never applied)
    FlateDecode,
}

impl Filter {
    /// The name of the filter a reader applies to undo this one.
    pub fn inverse(self) -> Filter {
        match self {
            Filter::ASCIIHexEncode => Filter::ASCIIHexDecode,
            Filter::ASCIIHexDecode => Filter::ASCIIHexEncode,
            Filter::ASCII85Encode => Filter::ASCII85Decode,
            Filter::ASCII85Decode => Filter::ASCII85Encode,
            Filter::FlateEncode => Filter::FlateDecode,
            Filter::FlateDecode => Filter::FlateEncode,
        }
    }

    /// The bare name, without a leading slash.
    pub fn as_str(self) -> &'static str {
        match self {
            Filter::ASCIIHexEncode => "ASCIIHexEncode",
            Filter::ASCIIHexDecode => "ASCIIHexDecode",
            Filter::ASCII85Encode => "ASCII85Encode",
            Filter::ASCII85Decode => "ASCII85Decode",
            Filter::FlateEncode => "FlateEncode",
            Filter::FlateDecode => "FlateDecode",
        }
    }

    fn transform(self) -> Result<Box<dyn StreamFilter>> {
        match self {
            Filter::ASCIIHexEncode => Ok(Box::new(AsciiHexEncoder)),
            Filter::ASCIIHexDecode => Ok(Box::new(AsciiHexDecoder)),
            Filter::ASCII85Encode => Ok(Box::new(Ascii85Encoder)),
            Filter::ASCII85Decode => Ok(Box::new(Ascii85Decoder)),
            Filter::FlateEncode => Ok(Box::new(FlateEncoder)),
            Filter::FlateDecode => Err(Error::UnsupportedFilter(
                "FlateDecode is not implemented; streams are only ever compressed".to_string(),
            )),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.as_str())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.strip_prefix('/').unwrap_or(s) {
            "ASCIIHexEncode" => Ok(Filter::ASCIIHexEncode),
            "ASCIIHexDecode" => Ok(Filter::ASCIIHexDecode),
            "ASCII85Encode" => Ok(Filter::ASCII85Encode),
            "ASCII85Decode" => Ok(Filter::ASCII85Decode),
            "FlateEncode" => Ok(Filter::FlateEncode),
            "FlateDecode" => Ok(Filter::FlateDecode),
            _ => Err(Error::UnknownFilter(s.to_string())),
        }
    }
}

/// Result of running a filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutput {
    /// Transformed bytes
    pub data: Vec<u8>,
    /// Decode filters, in the order a reader applies them
    pub reverse_chain: Vec<Filter>,
}

impl FilterOutput {
    /// The reverse chain as written into a dictionary, e.g. `/FlateDecode /ASCIIHexDecode`.
    pub fn reverse_chain_string(&self) -> String {
        self.reverse_chain
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Parse a list of filter names.
pub fn parse_chain<S: AsRef<str>>(names: &[S]) -> Result<Vec<Filter>> {
    names.iter().map(|name| name.as_ref().parse()).collect()
}

/// Run `data` through `chain`, left to right.
///
/// # Errors
///
/// [`Error::UnknownFilter`] for a name the pipeline does not know (nothing is applied), or
/// [`Error::UnsupportedFilter`] for `FlateDecode`.
///
/// # Examples
///
/// ```
/// use pdf_author::filters::apply_filter_chain;
///
/// let out = apply_filter_chain(b"ab.cde", &["ASCIIHexEncode"]).unwrap();
/// assert_eq!(out.data, b"61622e636465>");
/// assert_eq!(out.reverse_chain_string(), "/ASCIIHexDecode");
/// ```
pub fn apply_filter_chain<S: AsRef<str>>(data: &[u8], chain: &[S]) -> Result<FilterOutput> {
    let filters = parse_chain(chain)?;
    apply_filters(data, &filters)
}

/// Typed variant of [`apply_filter_chain`].
pub fn apply_filters(data: &[u8], filters: &[Filter]) -> Result<FilterOutput> {
    let mut current = data.to_vec();
    let mut reverse_chain = Vec::with_capacity(filters.len());

    for filter in filters {
        current = filter.transform()?.apply(&current)?;
        reverse_chain.push(filter.inverse());
    }
    reverse_chain.reverse();

    Ok(FilterOutput {
        data: current,
        reverse_chain,
    })
}
