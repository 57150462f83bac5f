//! Shading and tiling pattern resources.
//!
//! Shading patterns paint a gradient between two points (axial) or two circles (radial).
//! Their color stops are resampled into a type 0 sample function. Tiling patterns repeat a
//! recorded content stream cell; see `Document::tiling_pattern`.

use crate::error::{Error, Result};
use crate::geometry::Matrix;

use super::graphics_state::GState;

/// Samples written for a shading function.
pub const SHADING_SAMPLES: usize = 21;

/// A gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position in `[0, 1]`
    pub offset: f64,
    /// RGB, each 0-255
    pub color: [u8; 3],
}

impl ColorStop {
    /// A stop at `offset`.
    pub fn new(offset: f64, color: [u8; 3]) -> Self {
        Self { offset, color }
    }
}

/// `/ShadingType` of a shading pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingType {
    /// Between two points
    Axial = 2,
    /// Between two circles
    Radial = 3,
}

/// A gradient pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingPattern {
    /// Axial or radial
    pub shading_type: ShadingType,
    /// `[x1, y1, x2, y2]` for axial, `[x1, y1, r1, x2, y2, r2]` for radial
    pub coords: Vec<f64>,
    /// Color stops, ordered by offset
    pub colors: Vec<ColorStop>,
    /// Graphics state applied while painting
    pub gstate: Option<GState>,
    /// Pattern space to user space
    pub matrix: Option<Matrix>,
}

impl ShadingPattern {
    /// Axial shading from `(x1, y1)` to `(x2, y2)`.
    pub fn axial(coords: [f64; 4], colors: Vec<ColorStop>) -> Self {
        Self {
            shading_type: ShadingType::Axial,
            coords: coords.to_vec(),
            colors,
            gstate: None,
            matrix: None,
        }
    }

    /// Radial shading between circles `(x1, y1, r1)` and `(x2, y2, r2)`.
    pub fn radial(coords: [f64; 6], colors: Vec<ColorStop>) -> Self {
        Self {
            shading_type: ShadingType::Radial,
            coords: coords.to_vec(),
            colors,
            gstate: None,
            matrix: None,
        }
    }

    /// Attach a graphics state.
    pub fn with_gstate(mut self, gstate: GState) -> Self {
        self.gstate = Some(gstate);
        self
    }

    /// Attach a pattern matrix.
    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let expected = match self.shading_type {
            ShadingType::Axial => 4,
            ShadingType::Radial => 6,
        };
        if self.coords.len() != expected || self.coords.iter().any(|c| c.is_nan()) {
            return Err(Error::invalid_argument(format!(
                "Invalid arguments passed to add_shading_pattern: expected {} finite coordinates",
                expected
            )));
        }
        if self.colors.is_empty() {
            return Err(Error::invalid_argument(
                "Invalid arguments passed to add_shading_pattern: no color stops",
            ));
        }
        Ok(())
    }
}

/// A repeating pattern cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingPattern {
    /// Cell clip box `[x1, y1, x2, y2]`
    pub bounding_box: [f64; 4],
    /// Horizontal cell spacing
    pub x_step: f64,
    /// Vertical cell spacing
    pub y_step: f64,
    /// Graphics state applied while painting
    pub gstate: Option<GState>,
    /// Pattern space to user space
    pub matrix: Option<Matrix>,
    /// Recorded cell content
    pub stream: Vec<u8>,
    pub(crate) clone_index: usize,
}

impl TilingPattern {
    /// A pattern with an empty cell.
    pub fn new(bounding_box: [f64; 4], x_step: f64, y_step: f64) -> Self {
        Self {
            bounding_box,
            x_step,
            y_step,
            gstate: None,
            matrix: None,
            stream: Vec::new(),
            clone_index: 0,
        }
    }

    /// Attach a graphics state.
    pub fn with_gstate(mut self, gstate: GState) -> Self {
        self.gstate = Some(gstate);
        self
    }

    /// Attach a pattern matrix.
    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = Some(matrix);
        self
    }
}

/// A registered pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Gradient
    Shading(ShadingPattern),
    /// Repeating cell
    Tiling(TilingPattern),
}

impl Pattern {
    /// Resource name prefix: `Sh` for shadings, `P` for tilings.
    pub fn prefix(&self) -> &'static str {
        match self {
            Pattern::Shading(_) => "Sh",
            Pattern::Tiling(_) => "P",
        }
    }

    /// The pattern's graphics state.
    pub fn gstate(&self) -> Option<&GState> {
        match self {
            Pattern::Shading(p) => p.gstate.as_ref(),
            Pattern::Tiling(p) => p.gstate.as_ref(),
        }
    }
}

/// How a fill uses a pattern: which one, and with what transform and cell overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternData {
    /// Pattern key
    pub key: String,
    /// Transform applied at use
    pub matrix: Option<Matrix>,
    /// Tiling cell box override
    pub bounding_box: Option<[f64; 4]>,
    /// Tiling x step override
    pub x_step: Option<f64>,
    /// Tiling y step override
    pub y_step: Option<f64>,
}

impl PatternData {
    /// Use pattern `key` untransformed.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            matrix: None,
            bounding_box: None,
            x_step: None,
            y_step: None,
        }
    }

    /// Set the use transform.
    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Override the tiling cell.
    pub fn with_cell(mut self, bounding_box: [f64; 4], x_step: f64, y_step: f64) -> Self {
        self.bounding_box = Some(bounding_box);
        self.x_step = Some(x_step);
        self.y_step = Some(y_step);
        self
    }
}

/// Resample `colors` at `samples` evenly spaced positions and write them as lower-case
/// hex RGB triples.
///
/// Missing stops at offsets 0 and 1 are filled in with the nearest color.
pub fn interpolate_and_encode_rgb_stream(colors: &[ColorStop], samples: usize) -> String {
    let mut stops = colors.to_vec();
    let (Some(first), Some(last)) = (stops.first().copied(), stops.last().copied()) else {
        return String::new();
    };
    if first.offset != 0.0 {
        stops.insert(0, ColorStop::new(0.0, first.color));
    }
    if last.offset != 1.0 {
        stops.push(ColorStop::new(1.0, last.color));
    }

    let steps = samples.max(2) - 1;
    let mut out = String::with_capacity(samples * 6);
    let mut index = 0;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        while index + 2 < stops.len() && t > stops[index + 1].offset {
            index += 1;
        }
        let (a, b) = (stops[index], stops[index + 1]);
        let span = b.offset - a.offset;
        let d = if span == 0.0 { 0.0 } else { (t - a.offset) / span };
        for channel in 0..3 {
            let value = (1.0 - d) * f64::from(a.color[channel]) + d * f64::from(b.color[channel]);
            out.push_str(&format!("{:02x}", (value + 0.5).floor().clamp(0.0, 255.0) as u8));
        }
    }
    out
}
