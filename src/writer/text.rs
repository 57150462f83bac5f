//! Text objects and the active font.

use std::f64::consts::PI;

use indexmap::IndexMap;

use crate::color::{decode_color_string, encode_color_string, Color, ColorRole};
use crate::error::{Error, Result};
use crate::events::Event;
use crate::geometry::Matrix;
use crate::number::{f2, f3, js_number};

use super::document::Document;
use super::escape::pdf_escape;
use super::font_manager::{standard_metrics, Font, FontLookupOptions, IDENTITY_H_ENCODING};

/// Horizontal alignment relative to the `x` passed to [`Document::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// `x` is the left edge
    #[default]
    Left,
    /// `x` is the center
    Center,
    /// `x` is the right edge
    Right,
    /// Lines after the first are stretched to the maximum width with word spacing
    Justify,
}

/// What `y` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Baseline {
    /// The alphabetic baseline
    #[default]
    Alphabetic,
    /// Same as alphabetic
    Ideographic,
    /// Bottom of the line box
    Bottom,
    /// Top of the line box
    Top,
    /// Hanging baseline
    Hanging,
    /// Middle of the line box
    Middle,
}

impl Baseline {
    fn offset(self, height: f64, line_height_factor: f64) -> f64 {
        let descent = height * (line_height_factor - 1.0);
        match self {
            Baseline::Alphabetic | Baseline::Ideographic => 0.0,
            Baseline::Bottom => -descent,
            Baseline::Top => height - descent,
            Baseline::Hanging => height - 2.0 * descent,
            Baseline::Middle => height / 2.0 - descent,
        }
    }
}

/// Text rendering mode (`Tr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderingMode {
    /// 0
    Fill,
    /// 1
    Stroke,
    /// 2
    FillThenStroke,
    /// 3
    Invisible,
    /// 4
    FillAndAddForClipping,
    /// 5
    StrokeAndAddForClipping,
    /// 6
    FillThenStrokeAndAddForClipping,
    /// 7
    AddToPathForClipping,
}

impl RenderingMode {
    /// Operand of `Tr`.
    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Direction of a positive [`TextOptions::angle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationDirection {
    /// Clockwise
    Clockwise,
    /// Counter-clockwise
    #[default]
    CounterClockwise,
}

/// Options for [`Document::text`]. `None` fields use the document state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOptions {
    /// Alignment
    pub align: TextAlign,
    /// Vertical reference
    pub baseline: Baseline,
    /// Explicit rendering mode
    pub rendering_mode: Option<RenderingMode>,
    /// Rotation in degrees; ignored when `transform` is set
    pub angle: Option<f64>,
    /// Direction of `angle`
    pub rotation_direction: RotationDirection,
    /// Character spacing in document units
    pub char_space: Option<f64>,
    /// Leading as a multiple of the font size
    pub line_height_factor: Option<f64>,
    /// Text matrix for the first line; its translation is replaced by the position
    pub transform: Option<Matrix>,
    /// Reverse the characters of every line
    pub r2l: Option<bool>,
    /// Justification width in document units (default: page width)
    pub max_width: Option<f64>,
}

impl TextOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alignment.
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the baseline.
    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Set the rendering mode.
    pub fn rendering_mode(mut self, mode: RenderingMode) -> Self {
        self.rendering_mode = Some(mode);
        self
    }

    /// Rotate by `degrees`.
    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle = Some(degrees);
        self
    }

    /// Set the character spacing.
    pub fn char_space(mut self, char_space: f64) -> Self {
        self.char_space = Some(char_space);
        self
    }
}

/// Options for [`Document::string_unit_width`]. `None` fields use the document state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidthOptions {
    /// Font key
    pub font: Option<String>,
    /// Character spacing added after every glyph
    pub char_space: Option<f64>,
    /// Font size the spacing is measured against
    pub font_size: Option<f64>,
}

impl WidthOptions {
    /// Measure with `key` instead of the active font.
    pub fn font(mut self, key: impl Into<String>) -> Self {
        self.font = Some(key.into());
        self
    }

    /// Set the character spacing.
    pub fn char_space(mut self, char_space: f64) -> Self {
        self.char_space = Some(char_space);
        self
    }

    /// Set the font size.
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }
}

fn f2_value(value: f64) -> Result<f64> {
    f2(value)?
        .parse()
        .map_err(|_| Error::invalid_argument(format!("Invalid number {}", value)))
}

fn position(x: f64, y: f64, matrix: Option<&Matrix>) -> Result<String> {
    Ok(match matrix {
        Some(m) => format!("{} Tm\n", m.with_translation(f2_value(x)?, f2_value(y)?).join(" ")),
        None => format!("{} {} Td\n", f2(x)?, f2(y)?),
    })
}

impl Document {
    /// Write `text` at `(x, y)`. Line breaks (`\n`, `\r\n`, `\r`) start new lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_author::config::DocumentOptions;
    /// use pdf_author::writer::{Document, TextOptions};
    ///
    /// let mut doc = Document::new(DocumentOptions::default()).unwrap();
    /// doc.text("Hello\nworld", 10.0, 10.0, &TextOptions::default()).unwrap();
    /// ```
    pub fn text(&mut self, text: &str, x: f64, y: f64, options: &TextOptions) -> Result<()> {
        if text.is_empty() && !x.is_nan() && !y.is_nan() {
            return Ok(());
        }
        let lines: Vec<&str> = text.split("\r\n").flat_map(|l| l.split(['\r', '\n'])).collect();
        self.text_lines(&lines, x, y, options)
    }

    /// Write each entry of `lines` as its own line, with no further splitting.
    pub fn text_lines<S: AsRef<str>>(&mut self, lines: &[S], x: f64, y: f64, options: &TextOptions) -> Result<()> {
        if x.is_nan() || y.is_nan() {
            return Err(Error::invalid_argument(format!(
                "Invalid arguments passed to text: x = {}, y = {}",
                x, y
            )));
        }
        if lines.is_empty() {
            return Ok(());
        }

        let k = self.scale_factor;
        let size = self.active_font_size;
        let line_height = options.line_height_factor.unwrap_or(self.line_height_factor);
        let leading = size * line_height;
        let mut x = x;
        let y = y + options.baseline.offset(size / k, self.line_height_factor);

        let transform = match (options.transform, options.angle) {
            (Some(matrix), _) => Some(matrix),
            (None, Some(angle)) if angle != 0.0 => {
                let mut radians = angle * PI / 180.0;
                if options.rotation_direction == RotationDirection::Clockwise {
                    radians = -radians;
                }
                let (s, c) = radians.sin_cos();
                Some(Matrix::with_precision(
                    f2_value(c)?,
                    f2_value(s)?,
                    f2_value(-s)?,
                    f2_value(c)?,
                    0.0,
                    0.0,
                    self.precision,
                ))
            },
            _ => None,
        };

        let mut xtra = String::new();
        let char_space = options.char_space.filter(|c| *c != 0.0).or(self.char_space);
        if let Some(char_space) = char_space {
            xtra.push_str(&format!("{} Tc\n", f3(char_space * k)?));
            self.char_space = Some(self.char_space.unwrap_or(0.0));
        }

        let current = self.current_page;
        let page = self.page_mut(current)?;
        match options.rendering_mode {
            Some(mode) => {
                xtra.push_str(&format!("{} Tr\n", mode.id()));
                page.context.used_rendering_mode = Some(mode.id());
            },
            None if page.context.used_rendering_mode.is_some() => xtra.push_str("0 Tr\n"),
            None => {},
        }

        let lines: Vec<String> = lines.iter().map(|l| l.as_ref().to_string()).collect();
        let start = (x * k, self.vertical_coordinate(y));
        let mut word_spacing: Vec<Option<String>> = Vec::new();
        let placed: Option<Vec<(f64, f64)>> = match options.align {
            TextAlign::Left => None,
            TextAlign::Right | TextAlign::Center => {
                let divisor = if options.align == TextAlign::Right { 1.0 } else { 2.0 };
                let widths: Vec<f64> = lines.iter().map(|l| self.line_width_of(l)).collect();
                x -= widths[0] / divisor;
                let mut prev = 0.0;
                let mut positions = Vec::with_capacity(lines.len());
                for (i, width) in widths.iter().enumerate() {
                    if i == 0 {
                        positions.push((x * k, self.vertical_coordinate(y)));
                    } else {
                        positions.push(((prev - width) / divisor * k, -leading));
                    }
                    prev = *width;
                }
                Some(positions)
            },
            TextAlign::Justify => {
                let max_width = match options.max_width.filter(|w| *w > 0.0) {
                    Some(w) => w,
                    None => self.page_width(current)?,
                };
                let mut positions = Vec::with_capacity(lines.len());
                for (i, line) in lines.iter().enumerate() {
                    positions.push(if i == 0 { start } else { (0.0, -leading) });
                    let gaps = line.split(' ').count() - 1;
                    // a single word has no gaps to stretch
                    if i + 1 < lines.len() && gaps > 0 {
                        let spacing = (max_width - self.line_width_of(line)) / gaps as f64 * k;
                        word_spacing.push(Some(f2(spacing)?));
                    } else {
                        word_spacing.push(None);
                    }
                }
                Some(positions)
            },
        };

        let r2l = options.r2l.unwrap_or(self.r2l);
        let mut segments: Vec<Vec<u8>> = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let mut segment = Vec::new();
            if let Some(Some(spacing)) = word_spacing.get(i) {
                segment.extend_from_slice(format!("{} Tw\n", spacing).as_bytes());
            }
            let pos = match (&placed, i) {
                (None, 0) => Some(position(start.0, start.1, transform.as_ref())?),
                (None, _) => None,
                (Some(p), 0) => Some(position(p[0].0, p[0].1, transform.as_ref())?),
                (Some(p), _) => Some(position(p[i].0, p[i].1, None)?),
            };
            if let Some(pos) = pos {
                segment.extend_from_slice(pos.as_bytes());
            }
            let mut line = line.replace('\t', "        ");
            if r2l {
                line = line.chars().rev().collect();
            }
            segment.push(b'(');
            segment.extend(pdf_escape(&line, false)?);
            segment.push(b')');
            segments.push(segment);
        }
        let separator: &[u8] = if placed.is_none() { b" Tj\nT* " } else { b" Tj\n" };

        let mut content = format!(
            "BT\n/{} {} Tf\n{} TL\n{}\n{}",
            self.active_font_key,
            js_number(size),
            f2(leading)?,
            self.text_color,
            xtra
        )
        .into_bytes();
        content.extend(segments.join(separator));
        content.extend_from_slice(b" Tj\nET");

        self.out(content);
        let key = self.active_font_key.clone();
        self.fonts.mark_used(&key);
        Ok(())
    }

    fn line_width_of(&self, line: &str) -> f64 {
        let unit = self.char_widths_of(&self.active_font_key, line, false).iter().sum::<f64>();
        unit * self.active_font_size / self.scale_factor
    }

    fn char_widths_of(&self, key: &str, text: &str, do_kerning: bool) -> Vec<f64> {
        match self.fonts.get(key) {
            Some(Font { metrics: Some(metrics), .. }) => metrics.char_widths(text, do_kerning),
            Some(font) => standard_metrics(&font.post_script_name).char_widths(text, do_kerning),
            None => Vec::new(),
        }
    }

    /// Width of `text` in ems, kerning applied. Every glyph also advances by
    /// `char_space / font_size`.
    pub fn string_unit_width(&self, text: &str, options: &WidthOptions) -> f64 {
        let key = options.font.as_deref().unwrap_or(&self.active_font_key);
        let font_size = options.font_size.unwrap_or(self.active_font_size);
        let char_space = options.char_space.or(self.char_space).unwrap_or(0.0);
        let spacing = if font_size != 0.0 { char_space / font_size } else { 0.0 };
        self.char_widths_of(key, text, true)
            .iter()
            .map(|w| w + spacing)
            .sum()
    }

    /// Width of `text` in document units at the active font and size.
    pub fn text_width(&self, text: &str) -> f64 {
        self.string_unit_width(text, &WidthOptions::default()) * self.active_font_size
            / self.scale_factor
    }

    /// Set the text color.
    pub fn set_text_color(&mut self, color: impl Into<Color>) -> Result<()> {
        self.text_color = encode_color_string(&color.into(), ColorRole::Fill, 3)?;
        Ok(())
    }

    /// Text color as `#rrggbb`.
    pub fn text_color(&self) -> String {
        decode_color_string(&self.text_color)
    }

    /// Reverse the characters of every line by default.
    pub fn set_r2l(&mut self, value: bool) {
        self.r2l = value;
    }

    /// The default right-to-left flag.
    pub fn r2l(&self) -> bool {
        self.r2l
    }

    /// Set the default character spacing in document units.
    pub fn set_char_space(&mut self, char_space: f64) {
        self.char_space = Some(char_space);
    }

    /// The default character spacing, if one was set.
    pub fn char_space(&self) -> Option<f64> {
        self.char_space
    }

    // ---- fonts ----

    /// Register a font and return its new key. `encoding: None` means `Identity-H`.
    pub fn add_font(
        &mut self,
        post_script_name: &str,
        font_name: &str,
        font_style: &str,
        encoding: Option<&str>,
        is_standard: bool,
    ) -> String {
        let encoding = encoding.unwrap_or(IDENTITY_H_ENCODING);
        let key = self
            .fonts
            .add(post_script_name, font_name, font_style, Some(encoding), is_standard);
        log::debug!("font {} registered as {}", post_script_name, key);
        self.publish(&Event::AddFont { key: key.clone() });
        key
    }

    /// Resolve a font key. `None` for name or style takes it from the active font.
    pub fn font_key(&self, name: Option<&str>, style: Option<&str>, options: FontLookupOptions) -> Option<String> {
        let active = self.fonts.get(&self.active_font_key);
        let name = name.or(active.map(|f| f.font_name.as_str()))?;
        let style = style.or(active.map(|f| f.font_style.as_str()))?;
        self.fonts.lookup(name, style, options)
    }

    /// The font registered under `key`.
    pub fn font(&self, key: &str) -> Option<&Font> {
        self.fonts.get(key)
    }

    /// The active font.
    pub fn active_font(&self) -> Option<&Font> {
        self.fonts.get(&self.active_font_key)
    }

    /// Family → styles of all registered fonts.
    pub fn font_list(&self) -> IndexMap<String, Vec<String>> {
        self.fonts.font_list()
    }

    /// Make `name`/`style` the active font. An unmapped face falls back to Times with a
    /// warning.
    pub fn set_font(&mut self, name: &str, style: Option<&str>) -> Result<()> {
        let options = FontLookupOptions {
            disable_warning: false,
            ..FontLookupOptions::default()
        };
        self.active_font_key = self
            .font_key(Some(name), style, options)
            .ok_or_else(|| Error::Font(format!("no font found for '{}'", name)))?;
        Ok(())
    }

    /// Switch the style of the active font family.
    pub fn set_font_style(&mut self, style: &str) -> Result<()> {
        self.active_font_key = self
            .font_key(None, Some(style), FontLookupOptions::default())
            .ok_or_else(|| Error::Font(format!("no font found for style '{}'", style)))?;
        Ok(())
    }

    /// Set the font size in points.
    pub fn set_font_size(&mut self, size: f64) {
        self.active_font_size = size;
    }

    /// Font size in points.
    pub fn font_size(&self) -> f64 {
        self.active_font_size
    }
}
