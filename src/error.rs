//! Error types for document authoring.
//!
//! Every fallible operation in the crate returns [`Result`]. Errors are raised before any
//! shared document state (object counter, offsets, page list) is mutated, so a failed call
//! leaves the document exactly as it was.

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or serializing a document.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// A call violated its argument contract (bad unit, NaN geometry, unknown style, ...)
    #[error("{0}")]
    InvalidArgument(String),

    /// A filter name that the pipeline does not know
    #[error("The filter: \"{0}\" is not implemented")]
    UnknownFilter(String),

    /// A known filter asked to do something it is not built for (e.g. Flate decode)
    #[error("Unsupported filter operation: {0}")]
    UnsupportedFilter(String),

    /// Creation date that does not match the `D:YYYYMMDDHHmmSS+HH'mm'` form
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Color input that cannot be encoded
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Page lookup outside the document's page range
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// Font registry or text encoding failure
    #[error("Font error: {0}")]
    Font(String),

    /// Render target stack misuse
    #[error("Render target error: {0}")]
    RenderTarget(String),

    /// Failure reported by a plugin during installation
    #[error("Plugin error: {0}")]
    Plugin(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
