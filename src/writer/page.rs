//! Pages: content lines plus the page-tree metadata written at output time.

use crate::config::{paper_size, Orientation, PageFormat, MAX_PAGE_DIMENSION};
use crate::error::{Error, Result};
use crate::number::{f2, f2_compact};

/// A page boundary rectangle in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    /// Lower-left x
    pub bottom_left_x: f64,
    /// Lower-left y
    pub bottom_left_y: f64,
    /// Upper-right x
    pub top_right_x: f64,
    /// Upper-right y
    pub top_right_y: f64,
}

impl PageBox {
    /// A box anchored at the origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self::from_corners(0.0, 0.0, width, height)
    }

    /// A box from its two corners.
    pub fn from_corners(
        bottom_left_x: f64,
        bottom_left_y: f64,
        top_right_x: f64,
        top_right_y: f64,
    ) -> Self {
        Self {
            bottom_left_x,
            bottom_left_y,
            top_right_x,
            top_right_y,
        }
    }

    /// Width in points.
    pub fn width(&self) -> f64 {
        self.top_right_x - self.bottom_left_x
    }

    /// Height in points.
    pub fn height(&self) -> f64 {
        self.top_right_y - self.bottom_left_y
    }

    // MediaBox prints its origin in shortest form, the other boxes keep two decimals.
    pub(crate) fn to_array(&self, compact_origin: bool) -> Result<String> {
        let origin = if compact_origin { f2_compact } else { f2 };
        Ok(format!(
            "[{} {} {} {}]",
            origin(self.bottom_left_x)?,
            origin(self.bottom_left_y)?,
            f2(self.top_right_x)?,
            f2(self.top_right_y)?
        ))
    }
}

/// Optional page boundaries besides the media box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBoxKind {
    /// `/CropBox`
    Crop,
    /// `/BleedBox`
    Bleed,
    /// `/TrimBox`
    Trim,
    /// `/ArtBox`
    Art,
}

impl PageBoxKind {
    pub(crate) fn key(self) -> &'static str {
        match self {
            PageBoxKind::Crop => "CropBox",
            PageBoxKind::Bleed => "BleedBox",
            PageBoxKind::Trim => "TrimBox",
            PageBoxKind::Art => "ArtBox",
        }
    }
}

/// Page-tree data of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    /// Page dictionary object number, assigned during output
    pub obj_id: u32,
    /// Content stream object number, assigned during output
    pub contents_obj_id: u32,
    /// `/UserUnit`
    pub user_unit: f64,
    /// `/MediaBox`
    pub media_box: PageBox,
    /// `/CropBox`
    pub crop_box: Option<PageBox>,
    /// `/BleedBox`
    pub bleed_box: Option<PageBox>,
    /// `/TrimBox`
    pub trim_box: Option<PageBox>,
    /// `/ArtBox`
    pub art_box: Option<PageBox>,
    /// Annotation object numbers for `/Annots`
    pub annotations: Vec<u32>,
    /// Last text rendering mode set explicitly on this page
    pub used_rendering_mode: Option<u8>,
}

impl PageContext {
    /// Context for a `width` x `height` point page.
    pub fn new(width: f64, height: f64, user_unit: f64) -> Self {
        Self {
            obj_id: 0,
            contents_obj_id: 0,
            user_unit,
            media_box: PageBox::new(width, height),
            crop_box: None,
            bleed_box: None,
            trim_box: None,
            art_box: None,
            annotations: Vec::new(),
            used_rendering_mode: None,
        }
    }

    /// The optional box of `kind`.
    pub fn page_box(&self, kind: PageBoxKind) -> Option<PageBox> {
        match kind {
            PageBoxKind::Crop => self.crop_box,
            PageBoxKind::Bleed => self.bleed_box,
            PageBoxKind::Trim => self.trim_box,
            PageBoxKind::Art => self.art_box,
        }
    }

    pub(crate) fn set_page_box(&mut self, kind: PageBoxKind, value: Option<PageBox>) {
        match kind {
            PageBoxKind::Crop => self.crop_box = value,
            PageBoxKind::Bleed => self.bleed_box = value,
            PageBoxKind::Trim => self.trim_box = value,
            PageBoxKind::Art => self.art_box = value,
        }
    }
}

/// Page lookup result.
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    /// Page dictionary object number (0 before the first output)
    pub obj_id: u32,
    /// 1-based page number
    pub page_number: usize,
    /// Snapshot of the page's context
    pub context: PageContext,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Page {
    pub(crate) content: Vec<Vec<u8>>,
    pub(crate) context: PageContext,
}

impl Page {
    pub(crate) fn new(width: f64, height: f64, user_unit: f64) -> Self {
        Self {
            content: Vec::new(),
            context: PageContext::new(width, height, user_unit),
        }
    }

    pub(crate) fn content_bytes(&self) -> Vec<u8> {
        self.content.join(&b'\n')
    }
}

/// Resolve a page format to point dimensions, oriented and clamped.
///
/// Named formats are looked up case-insensitively; an unknown name falls back to
/// `fallback`. Explicit sizes are in document units and get multiplied by `scale_factor`.
pub(crate) fn page_dimensions(
    format: &PageFormat,
    orientation: Orientation,
    scale_factor: f64,
    fallback: (f64, f64),
) -> Result<(f64, f64)> {
    let (mut width, mut height) = match format {
        PageFormat::Named(name) => paper_size(name).unwrap_or_else(|| {
            log::warn!("Unknown page format '{}', using the document default", name);
            fallback
        }),
        PageFormat::Size([w, h]) => (w * scale_factor, h * scale_factor),
    };

    if width.is_nan() || height.is_nan() {
        return Err(Error::invalid_argument(
            "Invalid arguments passed to add_page: page size is NaN",
        ));
    }

    if width > MAX_PAGE_DIMENSION || height > MAX_PAGE_DIMENSION {
        log::warn!(
            "A page in a PDF can not be wider or taller than {} userUnit. Limiting the width/height to {}",
            MAX_PAGE_DIMENSION,
            MAX_PAGE_DIMENSION
        );
        width = width.min(MAX_PAGE_DIMENSION);
        height = height.min(MAX_PAGE_DIMENSION);
    }

    let swap = match orientation {
        Orientation::Landscape => height > width,
        Orientation::Portrait => width > height,
    };
    if swap {
        std::mem::swap(&mut width, &mut height);
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const A4: (f64, f64) = (595.28, 841.89);

    #[test]
    fn test_named_format_portrait_and_landscape() {
        let p = page_dimensions(&"a4".into(), Orientation::Portrait, 1.0, A4).unwrap();
        assert_eq!(p, (595.28, 841.89));
        let l = page_dimensions(&"A4".into(), Orientation::Landscape, 1.0, A4).unwrap();
        assert_eq!(l, (841.89, 595.28));
    }

    #[test]
    fn test_explicit_size_is_scaled() {
        let (w, h) = page_dimensions(&[10.0, 20.0].into(), Orientation::Portrait, 2.0, A4).unwrap();
        assert_eq!((w, h), (20.0, 40.0));
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let dims = page_dimensions(&"napkin".into(), Orientation::Portrait, 1.0, A4).unwrap();
        assert_eq!(dims, A4);
    }

    #[test]
    fn test_clamped_to_ceiling() {
        let dims =
            page_dimensions(&[20000.0, 100.0].into(), Orientation::Landscape, 1.0, A4).unwrap();
        assert_eq!(dims, (14400.0, 100.0));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(page_dimensions(&[f64::NAN, 1.0].into(), Orientation::Portrait, 1.0, A4).is_err());
    }

    #[test]
    fn test_media_box_array() {
        let b = PageBox::new(595.28, 841.89);
        assert_eq!(b.to_array(true).unwrap(), "[0 0 595.28 841.89]");
        assert_eq!(b.to_array(false).unwrap(), "[0.00 0.00 595.28 841.89]");
    }

    #[test]
    fn test_content_joined_with_newlines() {
        let mut page = Page::new(10.0, 10.0, 1.0);
        page.content.push(b"q".to_vec());
        page.content.push(b"Q".to_vec());
        assert_eq!(page.content_bytes(), b"q\nQ");
    }
}
