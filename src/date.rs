//! Document creation dates in the `D:YYYYMMDDHHmmSS+HH'mm'` form.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    /// Years 1970-2037, timezone hours -11..+14.
    static ref PDF_DATE: Regex = Regex::new(
        r"^D:(20[0-2][0-9]|203[0-7]|19[7-9][0-9])(0[0-9]|1[0-2])([0-2][0-9]|3[0-1])(0[0-9]|1[0-9]|2[0-3])(0[0-9]|[1-5][0-9])(0[0-9]|[1-5][0-9])(\+0[0-9]|\+1[0-4]|-0[0-9]|-1[0-1])'(0[0-9]|[1-5][0-9])'?$"
    )
    .expect("creation date pattern is valid");
}

/// Input accepted by `Document::set_creation_date`.
#[derive(Debug, Clone, PartialEq)]
pub enum CreationDate {
    /// The current local time
    Now,
    /// A date-time with a known UTC offset
    DateTime(DateTime<chrono::FixedOffset>),
    /// An already formatted `D:` string; validated before use
    Pdf(String),
}

impl<Tz: TimeZone> From<DateTime<Tz>> for CreationDate {
    fn from(value: DateTime<Tz>) -> Self {
        CreationDate::DateTime(value.fixed_offset())
    }
}

impl From<&str> for CreationDate {
    fn from(value: &str) -> Self {
        CreationDate::Pdf(value.to_string())
    }
}

/// Format a date-time as a PDF date string.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use pdf_author::date::to_pdf_date;
///
/// let tz = FixedOffset::east_opt(2 * 3600).unwrap();
/// let dt = tz.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(to_pdf_date(&dt), "D:20240309140507+02'00'");
/// ```
pub fn to_pdf_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let offset_minutes = date.offset().fix().local_minus_utc() / 60;
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let abs = offset_minutes.abs();
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{}{:02}'{:02}'",
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        sign,
        abs / 60,
        abs % 60
    )
}

/// Check a PDF date string against the accepted pattern.
pub fn is_valid_pdf_date(value: &str) -> bool {
    PDF_DATE.is_match(value)
}

/// Resolve a [`CreationDate`] to its string form.
pub fn resolve_creation_date(input: &CreationDate) -> Result<String> {
    match input {
        CreationDate::Now => Ok(to_pdf_date(&chrono::Local::now())),
        CreationDate::DateTime(dt) => Ok(to_pdf_date(dt)),
        CreationDate::Pdf(text) if is_valid_pdf_date(text) => Ok(text.clone()),
        CreationDate::Pdf(text) => Err(Error::InvalidDate(format!(
            "Invalid argument passed to set_creation_date: {:?}",
            text
        ))),
    }
}

/// Parse the date and time fields of a PDF date string; the timezone is ignored.
pub fn parse_pdf_date(value: &str) -> Result<NaiveDateTime> {
    let invalid = || Error::InvalidDate(format!("not a PDF date: {:?}", value));
    let caps = PDF_DATE.captures(value).ok_or_else(invalid)?;
    let field = |i: usize| -> Result<u32> {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(invalid)
    };
    let year = field(1)? as i32;
    NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)
        .and_then(|d| d.and_hms_opt(field(4).ok()?, field(5).ok()?, field(6).ok()?))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_negative_offset() {
        let tz = FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap();
        let dt = tz.with_ymd_and_hms(1999, 12, 31, 23, 59, 58).unwrap();
        assert_eq!(to_pdf_date(&dt), "D:19991231235958-05'30'");
    }

    #[test]
    fn test_utc_offset_is_plus_zero() {
        let dt = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(to_pdf_date(&dt), "D:20200102030405+00'00'");
    }

    #[test]
    fn test_pattern_accepts_and_rejects() {
        assert!(is_valid_pdf_date("D:20201010101010+01'00'"));
        assert!(is_valid_pdf_date("D:20201010101010-11'00"));
        assert!(!is_valid_pdf_date("D:20381010101010+01'00'"));
        assert!(!is_valid_pdf_date("D:20201010101010+15'00'"));
        assert!(!is_valid_pdf_date("2020-10-10"));
    }

    #[test]
    fn test_resolve_rejects_malformed_string() {
        let err = resolve_creation_date(&CreationDate::from("yesterday")).unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
    }

    #[test]
    fn test_resolve_now_is_valid() {
        let now = resolve_creation_date(&CreationDate::Now).unwrap();
        assert!(is_valid_pdf_date(&now), "{}", now);
    }

    #[test]
    fn test_parse_pdf_date() {
        let dt = parse_pdf_date("D:20240309140507+02'00'").unwrap();
        assert_eq!(dt.to_string(), "2024-03-09 14:05:07");
    }

    #[test]
    fn test_parse_rejects_impossible_day() {
        // the pattern allows day 31 in any month
        assert!(parse_pdf_date("D:20240231000000+00'00'").is_err());
    }
}
