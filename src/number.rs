//! Precision-bounded number formatting for content streams and dictionaries.
//!
//! Every number written into a document goes through one of these helpers so that the
//! same value always serializes to the same bytes.

use crate::error::{Error, Result};

/// Round `number` to `precision` decimal places and render it with exactly that many
/// fraction digits.
///
/// Precisions of 16 and above are "high precision": trailing zeros are stripped (a whole
/// number keeps its trailing dot, e.g. `1.`).
///
/// # Examples
///
/// ```
/// use pdf_author::number::round_to_precision;
///
/// assert_eq!(round_to_precision(1.005, 1).unwrap(), "1.0");
/// assert_eq!(round_to_precision(0.5, 16).unwrap(), "0.5");
/// assert!(round_to_precision(f64::NAN, 2).is_err());
/// assert!(round_to_precision(f64::INFINITY, 2).is_err());
/// ```
pub fn round_to_precision(number: f64, precision: usize) -> Result<String> {
    if !number.is_finite() {
        return Err(Error::invalid_argument(format!(
            "Invalid argument passed to round_to_precision: {}",
            number
        )));
    }
    let fixed = format!("{:.*}", precision, number);
    if precision >= 16 {
        Ok(fixed.trim_end_matches('0').to_string())
    } else {
        Ok(fixed)
    }
}

/// Two-decimal rendering used for coordinates and sizes.
pub fn f2(number: f64) -> Result<String> {
    round_to_precision(number, 2)
}

/// Three-decimal rendering used for text colors and character spacing.
pub fn f3(number: f64) -> Result<String> {
    round_to_precision(number, 3)
}

/// High-precision rendering (16 digits, trailing zeros stripped).
pub fn hpf(number: f64) -> Result<String> {
    round_to_precision(number, 16)
}

/// `f2` parsed back and printed in shortest form, so `0.00` becomes `0` and `12.50`
/// becomes `12.5`.
pub fn f2_compact(number: f64) -> Result<String> {
    let fixed = f2(number)?;
    Ok(fixed
        .parse::<f64>()
        .map(js_number)
        .unwrap_or(fixed))
}

/// Shortest round-trip rendering of a number, with negative zero printed as `0`.
pub fn js_number(number: f64) -> String {
    if number == 0.0 {
        "0".to_string()
    } else {
        format!("{}", number)
    }
}

/// Half-up rounding to `digits` decimals (`Math.round` semantics: ties go toward
/// positive infinity).
pub fn round_half_up(number: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    let rounded = (number * factor + 0.5).floor() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f2_pads_fraction() {
        assert_eq!(f2(3.0).unwrap(), "3.00");
        assert_eq!(f2(0.5669).unwrap(), "0.57");
        assert_eq!(f2(-12.345678).unwrap(), "-12.35");
    }

    #[test]
    fn test_f3() {
        assert_eq!(f3(0.0).unwrap(), "0.000");
        assert_eq!(f3(1.0 / 3.0).unwrap(), "0.333");
    }

    #[test]
    fn test_hpf_strips_trailing_zeros() {
        assert_eq!(hpf(0.1).unwrap(), "0.1");
        assert_eq!(hpf(12.25).unwrap(), "12.25");
        // whole numbers keep the dot
        assert_eq!(hpf(1.0).unwrap(), "1.");
    }

    #[test]
    fn test_non_finite_is_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(f2(value).is_err());
            assert!(f3(value).is_err());
            assert!(hpf(value).is_err());
        }
        assert!(matches!(f2(f64::INFINITY), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_f2_compact() {
        assert_eq!(f2_compact(0.0).unwrap(), "0");
        assert_eq!(f2_compact(595.2755905511812).unwrap(), "595.28");
        assert_eq!(f2_compact(12.5).unwrap(), "12.5");
    }

    #[test]
    fn test_js_number() {
        assert_eq!(js_number(16.0), "16");
        assert_eq!(js_number(-0.0), "0");
        assert_eq!(js_number(0.25), "0.25");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(-2.5, 0), -2.0);
        assert_eq!(round_half_up(0.123456, 5), 0.12346);
        assert_eq!(round_half_up(-0.000001, 5), 0.0);
    }
}
