//! Path painting, stroke state, graphics-state and pattern resources.
//!
//! Only the primitives other parts of the document depend on live here: rectangles,
//! straight lines, the persistent stroke parameters and pattern fills.

use std::str::FromStr;

use crate::color::{decode_color_string, encode_color_string, Color, ColorRole};
use crate::error::{Error, Result};
use crate::events::Event;
use crate::geometry::Matrix;
use crate::number::{f2, f2_compact, f3};

use super::document::Document;
use super::graphics_state::GState;
use super::pattern::{Pattern, PatternData, ShadingPattern, TilingPattern};
use super::resources::Registration;

/// How a path is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStyle {
    /// `S` (also `D`)
    #[default]
    Stroke,
    /// `f` (also `F`)
    Fill,
    /// `f*`
    FillEvenOdd,
    /// `B` (also `DF`, `FD`)
    FillStroke,
    /// `B*`
    FillStrokeEvenOdd,
    /// `n`: end the path without painting
    NoPaint,
}

impl PathStyle {
    /// The painting operator.
    pub fn operator(self) -> &'static str {
        match self {
            PathStyle::Stroke => "S",
            PathStyle::Fill => "f",
            PathStyle::FillEvenOdd => "f*",
            PathStyle::FillStroke => "B",
            PathStyle::FillStrokeEvenOdd => "B*",
            PathStyle::NoPaint => "n",
        }
    }

    /// Clipping operators used when the path is filled with a shading.
    pub fn clip_rule(self) -> &'static str {
        match self {
            PathStyle::Fill | PathStyle::NoPaint => "W n",
            PathStyle::FillEvenOdd => "W* n",
            PathStyle::FillStroke | PathStyle::Stroke => "W S",
            PathStyle::FillStrokeEvenOdd => "W* S",
        }
    }
}

impl FromStr for PathStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "S" | "D" => Ok(PathStyle::Stroke),
            "F" | "f" => Ok(PathStyle::Fill),
            "f*" => Ok(PathStyle::FillEvenOdd),
            "B" | "DF" | "FD" => Ok(PathStyle::FillStroke),
            "B*" => Ok(PathStyle::FillStrokeEvenOdd),
            "n" => Ok(PathStyle::NoPaint),
            _ => Err(Error::invalid_argument(format!("Invalid path style '{}'", s))),
        }
    }
}

// shared by caps and joins, so "bevel" is also cap style 2
fn cap_join_id(style: &str) -> Option<u8> {
    match style {
        "0" | "butt" | "but" | "miter" => Some(0),
        "1" | "round" | "rounded" | "circle" => Some(1),
        "2" | "projecting" | "project" | "square" | "bevel" => Some(2),
        _ => None,
    }
}

/// Line cap (`J`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCapStyle {
    /// 0
    #[default]
    Butt,
    /// 1
    Round,
    /// 2
    Square,
}

impl LineCapStyle {
    /// Operand of `J`.
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl FromStr for LineCapStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match cap_join_id(s) {
            Some(0) => Ok(LineCapStyle::Butt),
            Some(1) => Ok(LineCapStyle::Round),
            Some(_) => Ok(LineCapStyle::Square),
            None => Err(Error::invalid_argument(format!(
                "Line cap style of '{}' is not recognized. See LineCapStyle for valid styles",
                s
            ))),
        }
    }
}

/// Line join (`j`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoinStyle {
    /// 0
    #[default]
    Miter,
    /// 1
    Round,
    /// 2
    Bevel,
}

impl LineJoinStyle {
    /// Operand of `j`.
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl FromStr for LineJoinStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match cap_join_id(s) {
            Some(0) => Ok(LineJoinStyle::Miter),
            Some(1) => Ok(LineJoinStyle::Round),
            Some(_) => Ok(LineJoinStyle::Bevel),
            None => Err(Error::invalid_argument(format!(
                "Line join style of '{}' is not recognized. See LineJoinStyle for valid styles",
                s
            ))),
        }
    }
}

fn check_finite(call: &str, values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::invalid_argument(format!("Invalid arguments passed to {}", call)));
    }
    Ok(())
}

impl Document {
    /// Add a rectangle with its top-left corner at `(x, y)`.
    ///
    /// `style: None` leaves the path open for further construction. With a pattern, the
    /// rectangle is filled (or clipped) with it instead of painted with the fill color.
    pub fn rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        style: Option<PathStyle>,
        pattern: Option<PatternData>,
    ) -> Result<()> {
        check_finite("rect", &[x, y, w, h])?;
        let line = format!(
            "{} {} {} {} re",
            f2(self.scale(x))?,
            f2(self.vertical_coordinate(y))?,
            f2(self.scale(w))?,
            f2(self.scale(-h))?
        );
        self.out(line);
        self.put_style(style, pattern)
    }

    /// Stroke a straight line.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        check_finite("line", &[x1, y1, x2, y2])?;
        let start = format!("{} {} m", f3(self.scale(x1))?, f3(self.vertical_coordinate(y1))?);
        let end = format!("{} {} l", f3(self.scale(x2))?, f3(self.vertical_coordinate(y2))?);
        self.out(start);
        self.out(end);
        self.put_style(Some(PathStyle::Stroke), None)
    }

    /// Paint the current path.
    pub fn put_style(&mut self, style: Option<PathStyle>, pattern: Option<PatternData>) -> Result<()> {
        let Some(style) = style else {
            return Ok(());
        };
        match pattern {
            None => {
                if style != PathStyle::NoPaint {
                    self.out(style.operator());
                }
                Ok(())
            },
            Some(mut data) => {
                if data.matrix.is_none() {
                    data.matrix = Some(Matrix::with_precision(1.0, 0.0, 0.0, 1.0, 0.0, 0.0, self.precision));
                }
                self.fill_with_pattern(&data, style)
            },
        }
    }

    /// Fill the current path with a registered pattern.
    ///
    /// Tiling patterns cannot take a transform at the point of use, so a transformed use
    /// registers a clone carrying the combined matrix.
    pub fn fill_with_pattern(&mut self, data: &PatternData, style: PathStyle) -> Result<()> {
        let resource = self.patterns.get(&data.key).ok_or_else(|| {
            Error::invalid_argument(format!("Invalid argument passed to fill_with_pattern: unknown pattern '{}'", data.key))
        })?;
        let name = resource.name.clone();
        let pattern = resource.value.clone();

        match pattern {
            Pattern::Shading(shading) => {
                self.out("q");
                self.out(style.clip_rule());
                if let Some(gstate) = shading.gstate {
                    self.set_gstate(gstate)?;
                }
                let matrix = data.matrix.unwrap_or_else(Matrix::identity);
                self.out(format!("{} cm", matrix));
                self.out(format!("/{} sh", name));
                self.out("Q");
            },
            Pattern::Tiling(tiling) => {
                let page_height = self.current_page_height_pt() / self.scale_factor;
                let flip = Matrix::with_precision(1.0, 0.0, 0.0, -1.0, 0.0, page_height, self.precision);
                let mut name = name;
                if let Some(matrix) = data.matrix {
                    name = self.clone_pattern(data, matrix.multiply(&flip))?;
                }
                self.out("q");
                self.out("/Pattern cs");
                self.out(format!("/{} scn", name));
                if let Some(gstate) = tiling.gstate {
                    self.set_gstate(gstate)?;
                }
                self.out(style.operator());
                self.out("Q");
            },
        }
        Ok(())
    }

    /// Register a copy of tiling pattern `data.key` with the cell overrides of `data` and
    /// `matrix`, under the key `<key>$$<n>$$`.
    pub(crate) fn clone_pattern(&mut self, data: &PatternData, matrix: Matrix) -> Result<String> {
        let source = match self.patterns.get_mut(&data.key).map(|r| &mut r.value) {
            Some(Pattern::Tiling(source)) => {
                let snapshot = source.clone();
                source.clone_index += 1;
                snapshot
            },
            _ => {
                return Err(Error::invalid_argument(format!(
                    "Invalid argument passed to clone_pattern: '{}' is not a tiling pattern",
                    data.key
                )))
            },
        };

        let clone = TilingPattern {
            bounding_box: data.bounding_box.unwrap_or(source.bounding_box),
            x_step: data.x_step.unwrap_or(source.x_step),
            y_step: data.y_step.unwrap_or(source.y_step),
            gstate: source.gstate,
            matrix: Some(matrix),
            stream: source.stream,
            clone_index: 0,
        };
        let key = format!("{}$${}$$", data.key, source.clone_index);
        Ok(self.add_pattern(&key, Pattern::Tiling(clone)))
    }

    /// Register a shading pattern under `key` and return its resource name.
    pub fn add_shading_pattern(&mut self, key: &str, pattern: ShadingPattern) -> Result<String> {
        pattern.validate()?;
        Ok(self.add_pattern(key, Pattern::Shading(pattern)))
    }

    /// Register a pattern under `key` and return its resource name (`Sh<n>` or `P<n>`).
    /// A key that is already registered keeps its pattern.
    pub fn add_pattern(&mut self, key: &str, pattern: Pattern) -> String {
        let prefix = pattern.prefix();
        let registration = self.patterns.register(Some(key), pattern, prefix);
        let name = registration.name().to_string();
        if !matches!(registration, Registration::Existing(_)) {
            self.publish(&Event::AddPattern {
                key: key.to_string(),
                name: name.clone(),
            });
        }
        name
    }

    /// Register a graphics state and return its resource name. Equal states share a name.
    pub fn add_gstate(&mut self, key: Option<&str>, gstate: GState) -> String {
        let registration = self.gstates.register(key, gstate, "GS");
        let name = registration.name().to_string();
        if !matches!(registration, Registration::Existing(_)) {
            self.publish(&Event::AddGState {
                key: key.unwrap_or(&name).to_string(),
                name: name.clone(),
            });
        }
        name
    }

    /// Make `gstate` active, registering it if needed. Nothing is written when it is
    /// already the active state.
    pub fn set_gstate(&mut self, gstate: GState) -> Result<()> {
        let name = self.add_gstate(None, gstate);
        if self.active_gstate != Some(gstate) {
            self.out(format!("/{} gs", name));
            self.active_gstate = Some(gstate);
        }
        Ok(())
    }

    /// Make the graphics state registered under `key` active.
    pub fn set_gstate_by_key(&mut self, key: &str) -> Result<()> {
        let gstate = self
            .gstates
            .get(key)
            .map(|r| r.value)
            .ok_or_else(|| Error::invalid_argument(format!("Invalid argument passed to set_gstate: unknown key '{}'", key)))?;
        self.set_gstate(gstate)
    }

    /// Set the line width in document units. It carries over to new pages.
    pub fn set_line_width(&mut self, width: f64) -> Result<()> {
        check_finite("set_line_width", &[width])?;
        self.line_width = width;
        let line = format!("{} w", f2(self.scale(width))?);
        self.out(line);
        Ok(())
    }

    /// Line width in document units.
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Set the stroke color.
    pub fn set_draw_color(&mut self, color: impl Into<Color>) -> Result<()> {
        self.stroke_color = encode_color_string(&color.into(), ColorRole::Draw, 2)?;
        let stroke = self.stroke_color.clone();
        self.out(stroke);
        Ok(())
    }

    /// Stroke color as `#rrggbb`.
    pub fn draw_color(&self) -> String {
        decode_color_string(&self.stroke_color)
    }

    /// Set the fill color.
    pub fn set_fill_color(&mut self, color: impl Into<Color>) -> Result<()> {
        self.fill_color = encode_color_string(&color.into(), ColorRole::Fill, 2)?;
        let fill = self.fill_color.clone();
        self.out(fill);
        Ok(())
    }

    /// Fill color as `#rrggbb`.
    pub fn fill_color(&self) -> String {
        decode_color_string(&self.fill_color)
    }

    /// Set the line cap. Non-default caps carry over to new pages.
    pub fn set_line_cap(&mut self, style: LineCapStyle) {
        self.line_cap = style;
        self.out(format!("{} J", style.id()));
    }

    /// Set the line join. Non-default joins carry over to new pages.
    pub fn set_line_join(&mut self, style: LineJoinStyle) {
        self.line_join = style;
        self.out(format!("{} j", style.id()));
    }

    /// Set the miter limit in document units.
    pub fn set_miter_limit(&mut self, length: f64) -> Result<()> {
        if length.is_nan() {
            return Err(Error::invalid_argument("Invalid argument passed to set_miter_limit"));
        }
        let line = format!("{} M", f2_compact(self.scale(length))?);
        self.out(line);
        Ok(())
    }

    /// Set the dash pattern. An empty array draws solid lines.
    pub fn set_line_dash_pattern(&mut self, dashes: &[f64], phase: f64) -> Result<()> {
        check_finite("set_line_dash_pattern", &[phase])?;
        let dashes = dashes
            .iter()
            .map(|d| f3(self.scale(*d)))
            .collect::<Result<Vec<_>>>()?
            .join(" ");
        let line = format!("[{}] {} d", dashes, f3(self.scale(phase))?);
        self.out(line);
        Ok(())
    }

    /// Concatenate `matrix` to the current transformation.
    pub fn set_current_transformation_matrix(&mut self, matrix: &Matrix) {
        self.out(format!("{} cm", matrix));
    }
}
