//! Configuration for new documents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest page dimension, in points.
pub const MAX_PAGE_DIMENSION: f64 = 14400.0;

/// Measurement unit for user-supplied coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    /// Points (1/72 in)
    Pt,
    /// Millimetres
    #[default]
    Mm,
    /// Centimetres
    Cm,
    /// Inches
    In,
    /// CSS pixels (1/96 in)
    Px,
    /// Picas
    Pc,
    /// Em (12 pt)
    Em,
    /// Ex (6 pt)
    Ex,
}

impl Unit {
    /// Points per unit.
    pub fn scale_factor(self) -> f64 {
        match self {
            Unit::Pt => 1.0,
            Unit::Mm => 72.0 / 25.4,
            Unit::Cm => 72.0 / 2.54,
            Unit::In => 72.0,
            Unit::Px => 72.0 / 96.0,
            Unit::Pc | Unit::Em => 12.0,
            Unit::Ex => 6.0,
        }
    }

    /// Short name, e.g. `mm`.
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Pt => "pt",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::In => "in",
            Unit::Px => "px",
            Unit::Pc => "pc",
            Unit::Em => "em",
            Unit::Ex => "ex",
        }
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pt" => Ok(Unit::Pt),
            "mm" => Ok(Unit::Mm),
            "cm" => Ok(Unit::Cm),
            "in" => Ok(Unit::In),
            "px" => Ok(Unit::Px),
            "pc" => Ok(Unit::Pc),
            "em" => Ok(Unit::Em),
            "ex" => Ok(Unit::Ex),
            _ => Err(Error::invalid_argument(format!("Invalid unit: {}", s))),
        }
    }
}

impl TryFrom<String> for Unit {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Unit> for String {
    fn from(value: Unit) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Orientation {
    /// Height at least width
    #[default]
    Portrait,
    /// Width at least height
    Landscape,
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "p" | "portrait" => Ok(Orientation::Portrait),
            "l" | "landscape" => Ok(Orientation::Landscape),
            _ => Err(Error::invalid_argument(format!(
                "Invalid orientation: {} (expected p, portrait, l or landscape)",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Orientation {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Orientation> for String {
    fn from(value: Orientation) -> Self {
        match value {
            Orientation::Portrait => "portrait".to_string(),
            Orientation::Landscape => "landscape".to_string(),
        }
    }
}

/// A page size: a named paper format or an explicit `[width, height]` in document units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageFormat {
    /// Paper name such as `a4` or `letter` (case-insensitive)
    Named(String),
    /// Width and height in document units
    Size([f64; 2]),
}

impl Default for PageFormat {
    fn default() -> Self {
        PageFormat::Named("a4".to_string())
    }
}

impl From<&str> for PageFormat {
    fn from(value: &str) -> Self {
        PageFormat::Named(value.to_string())
    }
}

impl From<[f64; 2]> for PageFormat {
    fn from(value: [f64; 2]) -> Self {
        PageFormat::Size(value)
    }
}

/// Size in points of a named paper format.
///
/// # Examples
///
/// ```
/// use pdf_author::config::paper_size;
///
/// assert_eq!(paper_size("A4"), Some((595.28, 841.89)));
/// assert_eq!(paper_size("napkin"), None);
/// ```
pub fn paper_size(name: &str) -> Option<(f64, f64)> {
    let size = match name.to_ascii_lowercase().as_str() {
        "a0" => (2383.94, 3370.39),
        "a1" => (1683.78, 2383.94),
        "a2" => (1190.55, 1683.78),
        "a3" => (841.89, 1190.55),
        "a4" => (595.28, 841.89),
        "a5" => (419.53, 595.28),
        "a6" => (297.64, 419.53),
        "a7" => (209.76, 297.64),
        "a8" => (147.4, 209.76),
        "a9" => (104.88, 147.4),
        "a10" => (73.7, 104.88),
        "b0" => (2834.65, 4008.19),
        "b1" => (2004.09, 2834.65),
        "b2" => (1417.32, 2004.09),
        "b3" => (1000.63, 1417.32),
        "b4" => (708.66, 1000.63),
        "b5" => (498.9, 708.66),
        "b6" => (354.33, 498.9),
        "b7" => (249.45, 354.33),
        "b8" => (175.75, 249.45),
        "b9" => (124.72, 175.75),
        "b10" => (87.87, 124.72),
        "c0" => (2599.37, 3676.54),
        "c1" => (1836.85, 2599.37),
        "c2" => (1298.27, 1836.85),
        "c3" => (918.43, 1298.27),
        "c4" => (649.13, 918.43),
        "c5" => (459.21, 649.13),
        "c6" => (323.15, 459.21),
        "c7" => (229.61, 323.15),
        "c8" => (161.57, 229.61),
        "c9" => (113.39, 161.57),
        "c10" => (79.37, 113.39),
        "dl" => (311.81, 623.62),
        "letter" => (612.0, 792.0),
        "government-letter" => (576.0, 756.0),
        "legal" => (612.0, 1008.0),
        "junior-legal" => (576.0, 360.0),
        "ledger" => (1224.0, 792.0),
        "tabloid" => (792.0, 1224.0),
        "credit-card" => (153.0, 243.0),
        _ => return None,
    };
    Some(size)
}

/// Options for a new document.
///
/// ```
/// use pdf_author::config::{DocumentOptions, Orientation, Unit};
///
/// let options = DocumentOptions::new()
///     .with_unit(Unit::Pt)
///     .with_orientation(Orientation::Landscape)
///     .with_compress(true);
/// assert_eq!(options.effective_filters(), vec!["FlateEncode".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentOptions {
    /// Orientation of the first page.
    pub orientation: Orientation,

    /// Unit for all coordinates passed to the document.
    pub unit: Unit,

    /// Format of the first page, and the fallback for unknown format names.
    pub format: PageFormat,

    /// Only write fonts that were drawn with.
    pub put_only_used_fonts: bool,

    /// Deflate every stream.
    pub compress: bool,

    /// Precision of emitted matrices; `None` keeps the default rounding.
    pub precision: Option<u32>,

    /// `/UserUnit` for every page.
    pub user_unit: f64,

    /// Line height as a multiple of the font size.
    pub line_height_factor: f64,

    /// Initial font size in points.
    pub font_size: f64,

    /// Explicit document filter chain. Overrides `compress`.
    pub filters: Option<Vec<String>>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentOptions {
    /// Create new options with defaults (portrait A4 in millimetres, uncompressed).
    pub fn new() -> Self {
        Self {
            orientation: Orientation::Portrait,
            unit: Unit::Mm,
            format: PageFormat::default(),
            put_only_used_fonts: false,
            compress: false,
            precision: None,
            user_unit: 1.0,
            line_height_factor: 1.15,
            font_size: 16.0,
            filters: None,
        }
    }

    /// Set the first page's orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the measurement unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Set the first page's format.
    pub fn with_format(mut self, format: impl Into<PageFormat>) -> Self {
        self.format = format.into();
        self
    }

    /// Only write fonts that are used.
    pub fn with_put_only_used_fonts(mut self, enable: bool) -> Self {
        self.put_only_used_fonts = enable;
        self
    }

    /// Enable stream compression.
    pub fn with_compress(mut self, enable: bool) -> Self {
        self.compress = enable;
        self
    }

    /// Set matrix precision.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Set `/UserUnit`.
    pub fn with_user_unit(mut self, user_unit: f64) -> Self {
        self.user_unit = user_unit;
        self
    }

    /// Set the line height factor.
    pub fn with_line_height_factor(mut self, factor: f64) -> Self {
        self.line_height_factor = factor;
        self
    }

    /// Set the initial font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set an explicit filter chain.
    pub fn with_filters<S: Into<String>>(mut self, filters: impl IntoIterator<Item = S>) -> Self {
        self.filters = Some(filters.into_iter().map(Into::into).collect());
        self
    }

    /// The filter chain applied to every stream: the explicit chain if given, otherwise
    /// `FlateEncode` when compressing, otherwise nothing.
    pub fn effective_filters(&self) -> Vec<String> {
        match &self.filters {
            Some(filters) => filters.clone(),
            None if self.compress => vec!["FlateEncode".to_string()],
            None => Vec::new(),
        }
    }

    /// Load options from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::invalid_argument(format!("Invalid document options: {}", e)))
    }

    /// Serialize options to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::invalid_argument(format!("Invalid document options: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DocumentOptions::default();
        assert_eq!(options.unit, Unit::Mm);
        assert_eq!(options.orientation, Orientation::Portrait);
        assert_eq!(options.format, PageFormat::Named("a4".into()));
        assert!(!options.compress);
        assert_eq!(options.user_unit, 1.0);
        assert!(options.effective_filters().is_empty());
    }

    #[test]
    fn test_unit_scale_factors() {
        assert_eq!(Unit::Pt.scale_factor(), 1.0);
        assert!((Unit::Mm.scale_factor() - 2.834645669).abs() < 1e-8);
        assert_eq!(Unit::Px.scale_factor(), 0.75);
        assert_eq!(Unit::Ex.scale_factor(), 6.0);
    }

    #[test]
    fn test_invalid_unit_message() {
        let err = "furlong".parse::<Unit>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid unit: furlong");
    }

    #[test]
    fn test_orientation_aliases() {
        assert_eq!("l".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert_eq!("Portrait".parse::<Orientation>().unwrap(), Orientation::Portrait);
        assert!("sideways".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_explicit_filters_override_compress() {
        let options = DocumentOptions::new()
            .with_compress(true)
            .with_filters(["ASCIIHexEncode"]);
        assert_eq!(options.effective_filters(), vec!["ASCIIHexEncode".to_string()]);
    }

    #[test]
    fn test_paper_sizes_are_case_insensitive() {
        assert_eq!(paper_size("Letter"), Some((612.0, 792.0)));
        assert_eq!(paper_size("credit-card"), Some((153.0, 243.0)));
    }
}
