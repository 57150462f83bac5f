//! Color-string encoding for content-stream color operators.
//!
//! A [`Color`] is turned into operands plus operator: `g`/`G` for gray, `rg`/`RG` for RGB
//! and `k`/`K` for CMYK. Lower-case operators set the fill (and text) color, upper-case
//! ones the stroke color. Gray and RGB channels are given on a 0-255 scale, CMYK on 0-1.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::number::round_to_precision;

/// Which color a color string sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    /// Stroke color (`G`, `RG`, `K`)
    Draw,
    /// Fill and text color (`g`, `rg`, `k`)
    Fill,
}

impl ColorRole {
    fn operators(self) -> [&'static str; 3] {
        match self {
            ColorRole::Draw => ["G", "RG", "K"],
            ColorRole::Fill => ["g", "rg", "k"],
        }
    }
}

/// A color as accepted by the drawing and text APIs.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// Gray level, 0-255
    Gray(f64),
    /// Red, green, blue, each 0-255
    Rgb(f64, f64, f64),
    /// RGB plus alpha; a fully transparent color is written as white
    Rgba(f64, f64, f64, f64),
    /// Cyan, magenta, yellow, black, each 0-1
    Cmyk(f64, f64, f64, f64),
    /// `#rgb`, `#rrggbb` or a CSS color name
    Hex(String),
    /// Pre-normalized operand strings, written verbatim: one (gray), three (RGB) or four
    /// (CMYK) channels
    Literal(Vec<String>),
}

impl FromStr for Color {
    type Err = Error;

    /// Parse `#rgb`, `#rrggbb`, a CSS color name, or a bare number taken as a gray operand.
    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with('#') {
            return Ok(Color::Hex(s.to_string()));
        }
        if let Some(hex) = named_color(s) {
            return Ok(Color::Hex(hex.to_string()));
        }
        let numeric = !s.is_empty()
            && s.chars().filter(|c| *c == '.').count() <= 1
            && s.chars().all(|c| c.is_ascii_digit() || c == '.');
        if numeric {
            return Ok(Color::Literal(vec![s.to_string()]));
        }
        Err(Error::InvalidColor(format!(
            "Invalid color \"{}\" passed to encode_color_string.",
            s
        )))
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| Color::Hex(s.to_string()))
    }
}

/// Encode `color` as a color operator string with `precision` fraction digits.
///
/// # Examples
///
/// ```
/// use pdf_author::color::{encode_color_string, Color, ColorRole};
///
/// assert_eq!(encode_color_string(&Color::Gray(0.0), ColorRole::Draw, 2).unwrap(), "0.00 G");
/// let red = Color::Hex("#ff0000".into());
/// assert_eq!(encode_color_string(&red, ColorRole::Fill, 3).unwrap(), "1.000 0.000 0.000 rg");
/// ```
pub fn encode_color_string(color: &Color, role: ColorRole, precision: usize) -> Result<String> {
    let [gray_op, rgb_op, cmyk_op] = role.operators();
    let num = |v: f64| round_to_precision(v, precision);

    match color {
        Color::Gray(level) => Ok(format!("{} {}", num(level / 255.0)?, gray_op)),
        Color::Rgb(r, g, b) => {
            if r == g && g == b {
                Ok(format!("{} {}", num(r / 255.0)?, gray_op))
            } else {
                Ok(format!(
                    "{} {} {} {}",
                    num(r / 255.0)?,
                    num(g / 255.0)?,
                    num(b / 255.0)?,
                    rgb_op
                ))
            }
        },
        Color::Rgba(r, g, b, a) => {
            if *a == 0.0 {
                Ok(format!("1.000 1.000 1.000 {}", rgb_op))
            } else {
                Ok(format!(
                    "{} {} {} {}",
                    num(r / 255.0)?,
                    num(g / 255.0)?,
                    num(b / 255.0)?,
                    rgb_op
                ))
            }
        },
        Color::Cmyk(c, m, y, k) => Ok(format!(
            "{} {} {} {} {}",
            num(*c)?,
            num(*m)?,
            num(*y)?,
            num(*k)?,
            cmyk_op
        )),
        Color::Hex(text) => {
            let (r, g, b) = parse_hex(text)?;
            encode_color_string(
                &Color::Rgb(f64::from(r), f64::from(g), f64::from(b)),
                role,
                precision,
            )
        },
        Color::Literal(channels) => match channels.as_slice() {
            [gray] => Ok(format!("{} {}", gray, gray_op)),
            [a, b, c] if a == b && b == c => Ok(format!("{} {}", a, gray_op)),
            [r, g, b] => Ok(format!("{} {} {} {}", r, g, b, rgb_op)),
            [c, m, y, k] => Ok(format!("{} {} {} {} {}", c, m, y, k, cmyk_op)),
            _ => Err(Error::InvalidColor(format!(
                "expected 1, 3 or 4 color channels, got {}",
                channels.len()
            ))),
        },
    }
}

/// Turn an encoded color string back into `#rrggbb`.
///
/// Gray and CMYK strings are converted to RGB first; unparsable channels read as 0.
pub fn decode_color_string(color: &str) -> String {
    let parts: Vec<&str> = color.split(' ').collect();

    let rgb = match parts.as_slice() {
        [gray, op] if *op == "g" || *op == "G" => {
            let v = value(gray);
            [v, v, v]
        },
        [c, m, y, k, op] if *op == "k" || *op == "K" => {
            let k = value(k);
            [
                (1.0 - value(c)) * (1.0 - k),
                (1.0 - value(m)) * (1.0 - k),
                (1.0 - value(y)) * (1.0 - k),
            ]
        },
        [r, g, b, ..] => [value(r), value(g), value(b)],
        _ => [0.0, 0.0, 0.0],
    };

    let mut out = String::from("#");
    for channel in rgb {
        let byte = (channel * 255.0).floor().clamp(0.0, 255.0) as u8;
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

fn value(channel: &str) -> f64 {
    channel.parse().unwrap_or(0.0)
}

fn parse_hex(text: &str) -> Result<(u8, u8, u8)> {
    let invalid = || {
        Error::InvalidColor(format!(
            "Invalid color \"{}\" passed to encode_color_string.",
            text
        ))
    };
    let digits = text.strip_prefix('#').ok_or_else(invalid)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid()),
    };
    let value = u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?;
    Ok((
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    ))
}

fn named_color(name: &str) -> Option<&'static str> {
    let hex = match name.to_ascii_lowercase().as_str() {
        "black" => "#000000",
        "white" => "#ffffff",
        "red" => "#ff0000",
        "lime" => "#00ff00",
        "green" => "#008000",
        "blue" => "#0000ff",
        "yellow" => "#ffff00",
        "cyan" | "aqua" => "#00ffff",
        "magenta" | "fuchsia" => "#ff00ff",
        "gray" | "grey" => "#808080",
        "silver" => "#c0c0c0",
        "maroon" => "#800000",
        "olive" => "#808000",
        "purple" => "#800080",
        "teal" => "#008080",
        "navy" => "#000080",
        "orange" => "#ffa500",
        _ => return None,
    };
    Some(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_operators_by_role() {
        assert_eq!(
            encode_color_string(&Color::Gray(255.0), ColorRole::Fill, 2).unwrap(),
            "1.00 g"
        );
        assert_eq!(
            encode_color_string(&Color::Gray(0.0), ColorRole::Draw, 3).unwrap(),
            "0.000 G"
        );
    }

    #[test]
    fn test_equal_rgb_channels_collapse_to_gray() {
        let out = encode_color_string(&Color::Rgb(51.0, 51.0, 51.0), ColorRole::Draw, 2).unwrap();
        assert_eq!(out, "0.20 G");
    }

    #[test]
    fn test_rgb() {
        let out = encode_color_string(&Color::Rgb(255.0, 0.0, 51.0), ColorRole::Fill, 2).unwrap();
        assert_eq!(out, "1.00 0.00 0.20 rg");
    }

    #[test]
    fn test_short_hex_is_expanded() {
        let out = encode_color_string(&Color::Hex("#f00".into()), ColorRole::Draw, 2).unwrap();
        assert_eq!(out, "1.00 0.00 0.00 RG");
    }

    #[test]
    fn test_cmyk_is_not_divided() {
        let out =
            encode_color_string(&Color::Cmyk(0.1, 0.2, 0.3, 0.4), ColorRole::Fill, 2).unwrap();
        assert_eq!(out, "0.10 0.20 0.30 0.40 k");
    }

    #[test]
    fn test_transparent_rgba_is_white() {
        let out =
            encode_color_string(&Color::Rgba(10.0, 20.0, 30.0, 0.0), ColorRole::Fill, 2).unwrap();
        assert_eq!(out, "1.000 1.000 1.000 rg");
    }

    #[test]
    fn test_parse_named_numeric_and_invalid() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::Hex("#ff0000".into()));
        assert_eq!("0.5".parse::<Color>().unwrap(), Color::Literal(vec!["0.5".into()]));
        let err = "notacolor".parse::<Color>().unwrap_err();
        assert!(err.to_string().contains("\"notacolor\""));
    }

    #[test]
    fn test_literal_channels() {
        let lit = Color::Literal(vec!["0.5".into()]);
        assert_eq!(encode_color_string(&lit, ColorRole::Fill, 2).unwrap(), "0.5 g");
        let bad = Color::Literal(vec!["1".into(), "0".into()]);
        assert!(encode_color_string(&bad, ColorRole::Fill, 2).is_err());
    }

    #[test]
    fn test_invalid_hex() {
        assert!(encode_color_string(&Color::Hex("#12".into()), ColorRole::Fill, 2).is_err());
        assert!(encode_color_string(&Color::Hex("#gggggg".into()), ColorRole::Fill, 2).is_err());
    }

    #[test]
    fn test_decode_color_string() {
        assert_eq!(decode_color_string("0 g"), "#000000");
        assert_eq!(decode_color_string("1.000 0.000 0.000 rg"), "#ff0000");
        assert_eq!(decode_color_string("0 0 0 1 k"), "#000000");
        assert_eq!(decode_color_string("0 1 1 0 K"), "#ff0000");
    }
}
