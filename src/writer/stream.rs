//! Stream object bodies: dictionary, filtered data, and the `Filter`/`DecodeParms` rules.

use crate::error::Result;
use crate::filters::{apply_filter_chain, Filter};

/// Which filters a stream is encoded with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamFilters {
    /// The document's filter chain
    #[default]
    DocumentDefault,
    /// Deflate only
    Deflate,
    /// An explicit chain of encode filter names
    Chain(Vec<String>),
}

/// Input to `Document::put_stream`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamOptions {
    /// Unfiltered stream data
    pub data: Vec<u8>,
    /// Filters to run
    pub filters: StreamFilters,
    /// Decode filters already applied to `data`, e.g. `/ASCIIHexDecode`
    pub already_applied_filters: Vec<String>,
    /// Write `/Length1` with the unfiltered length
    pub add_length1: bool,
    /// Dictionary entries written before `/Length`, as (key, value)
    pub additional_entries: Vec<(String, String)>,
}

impl StreamOptions {
    /// Options for `data` with the document filters.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Choose the filters.
    pub fn with_filters(mut self, filters: StreamFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Declare filters already applied to the data.
    pub fn with_already_applied<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.already_applied_filters = names.into_iter().map(Into::into).collect();
        self
    }

    /// Write `/Length1`.
    pub fn with_length1(mut self) -> Self {
        self.add_length1 = true;
        self
    }

    /// Add a dictionary entry.
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_entries.push((key.into(), value.into()));
        self
    }
}

/// Encode a stream into the lines written for it, from `<<` through `endstream`.
///
/// `Length` and the stream body are omitted for empty data. With more than one filter,
/// `Filter` becomes an array and a `DecodeParms` entry is padded with one `null` per
/// filter this call applied, so parameters stay aligned with their filter.
pub(crate) fn encode_stream(options: &StreamOptions, document_filters: &[String]) -> Result<Vec<Vec<u8>>> {
    let chain: Vec<String> = match &options.filters {
        StreamFilters::DocumentDefault => document_filters.to_vec(),
        StreamFilters::Deflate => vec![Filter::FlateEncode.as_str().to_string()],
        StreamFilters::Chain(names) => names.clone(),
    };
    let processed = apply_filter_chain(&options.data, &chain)?;

    let mut filter_names: Vec<String> = processed.reverse_chain.iter().map(ToString::to_string).collect();
    filter_names.extend(options.already_applied_filters.iter().map(|name| {
        if name.starts_with('/') {
            name.clone()
        } else {
            format!("/{}", name)
        }
    }));

    let mut entries = options.additional_entries.clone();
    if !processed.data.is_empty() {
        entries.push(("Length".into(), processed.data.len().to_string()));
        if options.add_length1 {
            entries.push(("Length1".into(), options.data.len().to_string()));
        }
    }

    match filter_names.len() {
        0 => {},
        1 => entries.push(("Filter".into(), filter_names.join(" "))),
        _ => {
            entries.push(("Filter".into(), format!("[{}]", filter_names.join(" "))));
            for (key, value) in entries.iter_mut() {
                if key == "DecodeParms" {
                    let mut parms = vec!["null".to_string(); processed.reverse_chain.len()];
                    parms.push(value.clone());
                    *value = format!("[{}]", parms.join(" "));
                }
            }
        },
    }

    let mut lines: Vec<Vec<u8>> = Vec::with_capacity(entries.len() + 5);
    lines.push(b"<<".to_vec());
    lines.extend(entries.iter().map(|(k, v)| format!("/{} {}", k, v).into_bytes()));
    lines.push(b">>".to_vec());
    if !processed.data.is_empty() {
        lines.push(b"stream".to_vec());
        lines.push(processed.data);
        lines.push(b"endstream".to_vec());
    }
    Ok(lines)
}
