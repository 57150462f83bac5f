//! Font inventory and metrics.
//!
//! Every font gets a document-unique resource key (`F1`, `F2`, ...) and is reachable
//! through a family → style → key map. The 14 standard fonts are registered when a
//! document is created, each under a lower-case family/style pair (`helvetica`/`bold`)
//! and under its PostScript name split at the dash (`Helvetica`/`Bold`).

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

/// Encoding written for the standard Latin fonts.
pub const WIN_ANSI_ENCODING: &str = "WinAnsiEncoding";

/// Encoding assumed for fonts added without one.
pub const IDENTITY_H_ENCODING: &str = "Identity-H";

/// Family used when a lookup finds nothing.
const FALLBACK_FAMILY: &str = "times";

/// (PostScript name, family, style, encoding), in key order `F1..F14`.
const STANDARD_FONTS: [(&str, &str, &str, Option<&str>); 14] = [
    ("Helvetica", "helvetica", "normal", Some(WIN_ANSI_ENCODING)),
    ("Helvetica-Bold", "helvetica", "bold", Some(WIN_ANSI_ENCODING)),
    ("Helvetica-Oblique", "helvetica", "italic", Some(WIN_ANSI_ENCODING)),
    ("Helvetica-BoldOblique", "helvetica", "bolditalic", Some(WIN_ANSI_ENCODING)),
    ("Courier", "courier", "normal", Some(WIN_ANSI_ENCODING)),
    ("Courier-Bold", "courier", "bold", Some(WIN_ANSI_ENCODING)),
    ("Courier-Oblique", "courier", "italic", Some(WIN_ANSI_ENCODING)),
    ("Courier-BoldOblique", "courier", "bolditalic", Some(WIN_ANSI_ENCODING)),
    ("Times-Roman", "times", "normal", Some(WIN_ANSI_ENCODING)),
    ("Times-Bold", "times", "bold", Some(WIN_ANSI_ENCODING)),
    ("Times-Italic", "times", "italic", Some(WIN_ANSI_ENCODING)),
    ("Times-BoldItalic", "times", "bolditalic", Some(WIN_ANSI_ENCODING)),
    ("ZapfDingbats", "zapfdingbats", "normal", None),
    ("Symbol", "symbol", "normal", None),
];

/// Glyph advance widths and kerning for one font.
///
/// Widths are stored in `1 / widths_fof` em units, so a standard font table (1000 units
/// per em) has `widths_fof = 1000`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Advance width per character code
    pub widths: HashMap<u32, f64>,
    /// Divisor for `widths`
    pub widths_fof: f64,
    /// Kerning adjustment, indexed by character then preceding character
    pub kerning: HashMap<u32, HashMap<u32, f64>>,
    /// Divisor for `kerning`
    pub kerning_fof: f64,
    /// Width used for characters missing from `widths`
    pub default_width: f64,
}

impl FontMetrics {
    /// Metrics from a width table. Characters without an entry use the width of code 0,
    /// or one full em when that is missing too.
    pub fn new(widths: HashMap<u32, f64>, widths_fof: f64) -> Self {
        let default_width = widths.get(&0).copied().unwrap_or(widths_fof);
        Self {
            widths,
            widths_fof,
            kerning: HashMap::new(),
            kerning_fof: 1.0,
            default_width,
        }
    }

    /// Every character the same width (1000 units per em).
    pub fn uniform(width: f64) -> Self {
        let mut metrics = Self::new(HashMap::new(), 1000.0);
        metrics.default_width = width;
        metrics
    }

    /// Metrics from a table of printable ASCII widths (codes 32 to 126) in 1000 units per
    /// em. Other characters use `default_width`.
    pub fn from_ascii_table(table: &[u16], default_width: f64) -> Self {
        let widths = table
            .iter()
            .enumerate()
            .map(|(i, w)| (32 + i as u32, f64::from(*w)))
            .collect();
        let mut metrics = Self::new(widths, 1000.0);
        metrics.default_width = default_width;
        metrics
    }

    /// Attach a kerning table.
    pub fn with_kerning(mut self, kerning: HashMap<u32, HashMap<u32, f64>>, fof: f64) -> Self {
        self.kerning = kerning;
        self.kerning_fof = fof;
        self
    }

    /// Width of each character of `text` in ems (at font size 1).
    pub fn char_widths(&self, text: &str, do_kerning: bool) -> Vec<f64> {
        let mut prior = 0u32;
        text.chars()
            .map(|c| {
                let code = c as u32;
                let kern = if do_kerning {
                    self.kerning
                        .get(&code)
                        .and_then(|row| row.get(&prior))
                        .map(|k| k / self.kerning_fof)
                        .unwrap_or(0.0)
                } else {
                    0.0
                };
                prior = code;
                let width = self.widths.get(&code).copied().unwrap_or(self.default_width);
                width / self.widths_fof + kern
            })
            .collect()
    }

    /// Width of `text` in ems, kerning applied.
    pub fn string_unit_width(&self, text: &str) -> f64 {
        self.char_widths(text, true).iter().sum()
    }
}

/// Metrics for one of the 14 standard fonts.
pub fn standard_metrics(post_script_name: &str) -> FontMetrics {
    match post_script_name {
        "Helvetica" | "Helvetica-Oblique" => FontMetrics::from_ascii_table(&HELVETICA, 556.0),
        "Helvetica-Bold" | "Helvetica-BoldOblique" => {
            FontMetrics::from_ascii_table(&HELVETICA_BOLD, 556.0)
        },
        "Times-Roman" => FontMetrics::from_ascii_table(&TIMES_ROMAN, 500.0),
        "Times-Bold" => FontMetrics::from_ascii_table(&TIMES_BOLD, 500.0),
        "Times-Italic" => FontMetrics::from_ascii_table(&TIMES_ITALIC, 500.0),
        "Times-BoldItalic" => FontMetrics::from_ascii_table(&TIMES_BOLD_ITALIC, 500.0),
        name if name.starts_with("Courier") => FontMetrics::uniform(600.0),
        _ => FontMetrics::uniform(500.0),
    }
}

/// A registered font.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Resource key (`F1`, ...)
    pub key: String,
    /// `/BaseFont` name
    pub post_script_name: String,
    /// Family name used for lookups
    pub font_name: String,
    /// Style name used for lookups
    pub font_style: String,
    /// `/Encoding`, if any
    pub encoding: Option<String>,
    /// One of the 14 standard fonts
    pub is_standard: bool,
    /// Widths for layout
    pub metrics: Option<FontMetrics>,
    /// Object number of the font dictionary, set during output
    pub object_number: Option<u32>,
    /// Set by an extension that writes the font dictionary itself
    pub is_already_put: bool,
}

/// Options for [`FontRegistry::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontLookupOptions {
    /// Return `None` instead of falling back to Times
    pub no_fallback: bool,
    /// Do not log unmapped faces
    pub disable_warning: bool,
}

impl Default for FontLookupOptions {
    fn default() -> Self {
        Self {
            no_fallback: false,
            disable_warning: true,
        }
    }
}

/// Fonts by key, plus the family/style lookup map and the set of fonts drawn with.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    fonts: IndexMap<String, Font>,
    map: IndexMap<String, IndexMap<String, String>>,
    used: IndexSet<String>,
}

impl FontRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the 14 standard fonts as `F1..F14`.
    pub fn with_standard_fonts() -> Self {
        let mut registry = Self::new();
        for (post_script_name, family, style, encoding) in STANDARD_FONTS {
            let key = registry.add(post_script_name, family, style, encoding, true);
            let (ps_family, ps_style) = post_script_name
                .split_once('-')
                .unwrap_or((post_script_name, ""));
            registry.alias(ps_family, ps_style, &key);
            if let Some(font) = registry.fonts.get_mut(&key) {
                font.metrics = Some(standard_metrics(post_script_name));
            }
        }
        registry
    }

    /// Register a font under a new key and return the key.
    pub fn add(
        &mut self,
        post_script_name: &str,
        font_name: &str,
        font_style: &str,
        encoding: Option<&str>,
        is_standard: bool,
    ) -> String {
        let key = format!("F{}", self.fonts.len() + 1);
        self.fonts.insert(
            key.clone(),
            Font {
                key: key.clone(),
                post_script_name: post_script_name.to_string(),
                font_name: font_name.to_string(),
                font_style: font_style.to_string(),
                encoding: encoding.map(str::to_string),
                is_standard,
                metrics: None,
                object_number: None,
                is_already_put: false,
            },
        );
        self.alias(font_name, font_style, &key);
        key
    }

    fn alias(&mut self, family: &str, style: &str, key: &str) {
        self.map
            .entry(family.to_string())
            .or_default()
            .insert(style.to_string(), key.to_string());
    }

    /// Font by key.
    pub fn get(&self, key: &str) -> Option<&Font> {
        self.fonts.get(key)
    }

    /// Mutable font by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Font> {
        self.fonts.get_mut(key)
    }

    /// Fonts in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Font> {
        self.fonts.values()
    }

    /// Number of fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// True when no font is registered.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Family → styles, in registration order.
    pub fn font_list(&self) -> IndexMap<String, Vec<String>> {
        self.map
            .iter()
            .map(|(family, styles)| (family.clone(), styles.keys().cloned().collect()))
            .collect()
    }

    /// Find the key for `name`/`style`.
    ///
    /// The lower-cased family is tried first, then the family as given. Unless
    /// `no_fallback` is set, an unmapped face resolves to Times in the same style, then
    /// to Times normal.
    pub fn lookup(&self, name: &str, style: &str, options: FontLookupOptions) -> Option<String> {
        let find = |family: &str| self.map.get(family).and_then(|styles| styles.get(style));

        let found = find(&name.to_lowercase()).or_else(|| find(name)).cloned();
        if found.is_some() {
            return found;
        }
        if !options.disable_warning {
            log::warn!(
                "Unable to look up font label for font '{}', '{}'. Refer to font_list() for available fonts.",
                name,
                style
            );
        }
        if options.no_fallback {
            return None;
        }
        let times = self.map.get(FALLBACK_FAMILY)?;
        times.get(style).or_else(|| times.get("normal")).cloned()
    }

    /// Record that `key` was drawn with.
    pub fn mark_used(&mut self, key: &str) {
        self.used.insert(key.to_string());
    }

    /// True if `key` was drawn with.
    pub fn is_used(&self, key: &str) -> bool {
        self.used.contains(key)
    }

    /// Forget the object numbers of the previous output. Fonts written by an extension
    /// keep theirs.
    pub(crate) fn clear_object_numbers(&mut self) {
        for font in self.fonts.values_mut().filter(|f| !f.is_already_put) {
            font.object_number = None;
        }
    }

    pub(crate) fn set_object_number(&mut self, key: &str, object_number: u32) {
        if let Some(font) = self.fonts.get_mut(key) {
            font.object_number = Some(object_number);
        }
    }
}

const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

const TIMES_BOLD_ITALIC: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
    333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
    500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
];
