//! Extended graphics state (ExtGState) resources for transparency.
//!
//! # Example
//!
//! ```
//! use pdf_author::writer::GState;
//!
//! let gs = GState::new().opacity(0.5).stroke_opacity(0.8);
//! assert_eq!(gs.fill_alpha(), Some(0.5));
//! ```

use crate::error::Result;
use crate::number::f2;

/// An ExtGState dictionary. Two states are the same resource when their values match.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GState {
    /// Fill alpha (`/ca`), 0.0 to 1.0
    opacity: Option<f64>,
    /// Stroke alpha (`/CA`), 0.0 to 1.0
    stroke_opacity: Option<f64>,
}

impl GState {
    /// An empty graphics state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fill alpha.
    pub fn opacity(mut self, alpha: f64) -> Self {
        self.opacity = Some(alpha);
        self
    }

    /// Set the stroke alpha.
    pub fn stroke_opacity(mut self, alpha: f64) -> Self {
        self.stroke_opacity = Some(alpha);
        self
    }

    /// Fill alpha, if set.
    pub fn fill_alpha(&self) -> Option<f64> {
        self.opacity
    }

    /// Stroke alpha, if set.
    pub fn stroke_alpha(&self) -> Option<f64> {
        self.stroke_opacity
    }

    /// Dictionary body lines, between `<<` and `>>`.
    pub(crate) fn entries(&self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        if let Some(ca) = self.opacity {
            lines.push(format!("/ca {}", f2(ca)?));
        }
        if let Some(ca) = self.stroke_opacity {
            lines.push(format!("/CA {}", f2(ca)?));
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries() {
        let gs = GState::new().opacity(0.5).stroke_opacity(1.0);
        assert_eq!(gs.entries().unwrap(), vec!["/ca 0.50", "/CA 1.00"]);
        assert!(GState::new().entries().unwrap().is_empty());
    }

    #[test]
    fn test_equality_by_value() {
        assert_eq!(GState::new().opacity(0.2), GState::new().opacity(0.2));
        assert_ne!(GState::new().opacity(0.2), GState::new().stroke_opacity(0.2));
    }
}
