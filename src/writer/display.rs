//! Viewer preferences written into the catalog: initial zoom, page layout and page mode.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::number::f2;

lazy_static! {
    static ref PERCENT: Regex = Regex::new(r"^(\d*\.?\d*)%$").expect("percent pattern is valid");
}

/// Initial zoom (`/OpenAction` destination).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ZoomMode {
    /// Fit the page width
    #[default]
    FullWidth,
    /// Fit the page height
    FullHeight,
    /// Fit the whole page
    FullPage,
    /// Actual size
    Original,
    /// Zoom factor, `2.0` is 200%
    Factor(f64),
    /// Zoom percentage
    Percent(f64),
}

impl ZoomMode {
    /// Destination operands following the page reference.
    pub(crate) fn destination(&self) -> Result<String> {
        Ok(match self {
            ZoomMode::FullWidth => "/FitH null".to_string(),
            ZoomMode::FullHeight => "/FitV null".to_string(),
            ZoomMode::FullPage => "/Fit".to_string(),
            ZoomMode::Original => "/XYZ null null 1".to_string(),
            ZoomMode::Factor(z) => format!("/XYZ null null {}", f2(*z)?),
            ZoomMode::Percent(p) => format!("/XYZ null null {}", f2(p / 100.0)?),
        })
    }
}

impl FromStr for ZoomMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let unrecognized = || {
            Error::invalid_argument(format!(
                "zoom must be Integer (e.g. 2), a percentage Value (e.g. 300%) or fullwidth, fullheight, fullpage, original. \"{}\" is not recognized.",
                s
            ))
        };

        if let Some(caps) = PERCENT.captures(s) {
            let value = caps[1].parse::<f64>().map_err(|_| unrecognized())?;
            return Ok(ZoomMode::Percent(value));
        }
        let numeric = s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
        if let (true, Ok(value)) = (numeric, s.parse::<f64>()) {
            return Ok(ZoomMode::Factor(value));
        }
        match s {
            "fullwidth" => Ok(ZoomMode::FullWidth),
            "fullheight" => Ok(ZoomMode::FullHeight),
            "fullpage" => Ok(ZoomMode::FullPage),
            "original" => Ok(ZoomMode::Original),
            _ => Err(unrecognized()),
        }
    }
}

/// Page arrangement (`/PageLayout`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// One column, scrolling
    #[default]
    Continuous,
    /// One page at a time
    Single,
    /// Two columns, odd pages left
    TwoLeft,
    /// Two columns, odd pages right
    TwoRight,
}

impl LayoutMode {
    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            LayoutMode::Continuous => "OneColumn",
            LayoutMode::Single => "SinglePage",
            LayoutMode::TwoLeft => "TwoColumnLeft",
            LayoutMode::TwoRight => "TwoColumnRight",
        }
    }
}

impl FromStr for LayoutMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "continuous" => Ok(LayoutMode::Continuous),
            "single" => Ok(LayoutMode::Single),
            "two" | "twoleft" => Ok(LayoutMode::TwoLeft),
            "tworight" => Ok(LayoutMode::TwoRight),
            _ => Err(Error::invalid_argument(format!(
                "Layout mode must be one of continuous, single, twoleft, tworight. \"{}\" is not recognized.",
                s
            ))),
        }
    }
}

/// Panels shown on open (`/PageMode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// No outline or thumbnails
    UseNone,
    /// Outline panel
    UseOutlines,
    /// Thumbnail panel
    UseThumbs,
    /// Full screen
    FullScreen,
}

impl fmt::Display for PageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageMode::UseNone => "UseNone",
            PageMode::UseOutlines => "UseOutlines",
            PageMode::UseThumbs => "UseThumbs",
            PageMode::FullScreen => "FullScreen",
        };
        f.write_str(name)
    }
}

impl FromStr for PageMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "UseNone" => Ok(PageMode::UseNone),
            "UseOutlines" => Ok(PageMode::UseOutlines),
            "UseThumbs" => Ok(PageMode::UseThumbs),
            "FullScreen" => Ok(PageMode::FullScreen),
            _ => Err(Error::invalid_argument(format!(
                "Page mode must be one of UseNone, UseOutlines, UseThumbs, or FullScreen. \"{}\" is not recognized.",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_parsing() {
        assert_eq!("fullpage".parse::<ZoomMode>().unwrap(), ZoomMode::FullPage);
        assert_eq!("2".parse::<ZoomMode>().unwrap(), ZoomMode::Factor(2.0));
        assert_eq!("300%".parse::<ZoomMode>().unwrap(), ZoomMode::Percent(300.0));
        let err = "huge".parse::<ZoomMode>().unwrap_err();
        assert!(err.to_string().contains("\"huge\" is not recognized"));
    }

    #[test]
    fn test_zoom_destinations() {
        assert_eq!(ZoomMode::default().destination().unwrap(), "/FitH null");
        assert_eq!(ZoomMode::Percent(150.0).destination().unwrap(), "/XYZ null null 1.50");
        assert_eq!(ZoomMode::Factor(2.0).destination().unwrap(), "/XYZ null null 2.00");
    }

    #[test]
    fn test_layout_alias() {
        assert_eq!("two".parse::<LayoutMode>().unwrap(), LayoutMode::TwoLeft);
        assert_eq!(LayoutMode::TwoRight.pdf_name(), "TwoColumnRight");
        assert!("grid".parse::<LayoutMode>().is_err());
    }

    #[test]
    fn test_page_mode_error_lists_valid_values() {
        let err = "Sideways".parse::<PageMode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Page mode must be one of UseNone, UseOutlines, UseThumbs, or FullScreen. \"Sideways\" is not recognized."
        );
        assert_eq!(PageMode::UseThumbs.to_string(), "UseThumbs");
    }
}
