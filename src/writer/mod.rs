//! PDF authoring.
//!
//! A [`Document`] collects drawing operators per page and resources in registries, then
//! writes the whole file in one pass when [`Document::output`] is called.
//!
//! ## Architecture
//!
//! ```text
//! drawing / text / render targets
//!     ↓ (operator lines)
//! [Page] content buffers        [ResourceRegistry] fonts, gstates, patterns, forms
//!     ↓                              ↓
//! [Document::output] (pages → resources → info → catalog → xref → trailer)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```
//! use pdf_author::config::DocumentOptions;
//! use pdf_author::writer::{Document, PathStyle, TextOptions};
//!
//! let mut doc = Document::new(DocumentOptions::default()).unwrap();
//! doc.text("Hello, World!", 10.0, 10.0, &TextOptions::default()).unwrap();
//! doc.rect(10.0, 20.0, 50.0, 30.0, Some(PathStyle::Stroke), None).unwrap();
//! let bytes = doc.output().unwrap();
//! assert!(bytes.ends_with(b"%%EOF"));
//! ```

mod display;
mod document;
mod drawing;
mod escape;
mod font_manager;
mod graphics_state;
mod page;
mod pattern;
mod render_target;
mod resources;
mod serializer;
mod stream;
mod text;

pub use display::{LayoutMode, PageMode, ZoomMode};
pub use document::{
    Document, DocumentCore, DocumentProperties, Plugin, DEFAULT_LINE_WIDTH, DEFAULT_PDF_VERSION,
};
pub use drawing::{LineCapStyle, LineJoinStyle, PathStyle};
pub use escape::{pdf_escape, to_8bit_stream};
pub use font_manager::{
    standard_metrics, Font, FontLookupOptions, FontMetrics, FontRegistry, IDENTITY_H_ENCODING,
    WIN_ANSI_ENCODING,
};
pub use graphics_state::GState;
pub use page::{PageBox, PageBoxKind, PageContext, PageInfo};
pub use pattern::{
    interpolate_and_encode_rgb_stream, ColorStop, Pattern, PatternData, ShadingPattern,
    ShadingType, TilingPattern, SHADING_SAMPLES,
};
pub use render_target::FormObject;
pub use resources::{Registration, Resource, ResourceRegistry};
pub use stream::{StreamFilters, StreamOptions};
pub use text::{Baseline, RenderingMode, RotationDirection, TextAlign, TextOptions, WidthOptions};
