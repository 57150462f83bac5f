//! 2D affine transforms.
//!
//! ```text
//! | sx  shy 0 |
//! | shx sy  0 |
//! | tx  ty  1 |
//! ```
//!
//! Transforms compose right-handed, `v' = v * m1 * m2`, as in content-stream `cm`
//! operators.

use std::fmt;

use crate::number::{hpf, js_number, round_half_up};

/// Precision at and above which components are neither rounded on construction nor
/// when displayed.
const HIGH_PRECISION: u32 = 16;
/// Decimals kept for stored components.
const STORED_DIGITS: i32 = 5;
/// Decimals used by `Display` when the matrix has no precision of its own.
const DEFAULT_DISPLAY_PRECISION: u32 = 5;

/// An affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    sx: f64,
    shy: f64,
    shx: f64,
    sy: f64,
    tx: f64,
    ty: f64,
    precision: Option<u32>,
}

/// Result of [`Matrix::decompose`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposition {
    /// Pure scale
    pub scale: Matrix,
    /// Pure translation
    pub translate: Matrix,
    /// Pure rotation
    pub rotate: Matrix,
    /// Pure horizontal skew
    pub skew: Matrix,
}

impl Matrix {
    /// Create a transform; components are rounded to five decimals.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_author::geometry::Matrix;
    ///
    /// let m = Matrix::new(1.0, 0.0, 0.0, 1.0, 10.123456, 0.0);
    /// assert_eq!(m.tx(), 10.12346);
    /// assert_eq!(m.to_string(), "1 0 0 1 10.12346 0");
    /// ```
    pub fn new(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self::with_precision(sx, shy, shx, sy, tx, ty, None)
    }

    /// Create a transform carrying its own display precision. A precision of 16 or more
    /// keeps components unrounded.
    pub fn with_precision(
        sx: f64,
        shy: f64,
        shx: f64,
        sy: f64,
        tx: f64,
        ty: f64,
        precision: Option<u32>,
    ) -> Self {
        let keep = |v: f64| -> f64 {
            let v = if v.is_nan() { 0.0 } else { v };
            match precision {
                Some(p) if p >= HIGH_PRECISION => v,
                _ => round_half_up(v, STORED_DIGITS),
            }
        };
        Self {
            sx: keep(sx),
            shy: keep(shy),
            shx: keep(shx),
            sy: keep(sy),
            tx: keep(tx),
            ty: keep(ty),
            precision,
        }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// A pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Horizontal scale.
    pub fn sx(&self) -> f64 {
        self.sx
    }

    /// Vertical shear.
    pub fn shy(&self) -> f64 {
        self.shy
    }

    /// Horizontal shear.
    pub fn shx(&self) -> f64 {
        self.shx
    }

    /// Vertical scale.
    pub fn sy(&self) -> f64 {
        self.sy
    }

    /// Horizontal translation.
    pub fn tx(&self) -> f64 {
        self.tx
    }

    /// Vertical translation.
    pub fn ty(&self) -> f64 {
        self.ty
    }

    /// Display precision, if one was set.
    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    /// Copy with a new translation, keeping the linear part.
    pub fn with_translation(&self, tx: f64, ty: f64) -> Self {
        Self::with_precision(
            self.sx,
            self.shy,
            self.shx,
            self.sy,
            tx,
            ty,
            self.precision,
        )
    }

    /// The six components in `[sx, shy, shx, sy, tx, ty]` order.
    pub fn components(&self) -> [f64; 6] {
        [self.sx, self.shy, self.shx, self.sy, self.tx, self.ty]
    }

    /// Stored components joined with `separator`, without display rounding.
    pub fn join(&self, separator: &str) -> String {
        self.components()
            .iter()
            .map(|v| js_number(*v))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// `self * other`: apply `self` first, then `other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let sx = other.sx * self.sx + other.shy * self.shx;
        let shy = other.sx * self.shy + other.shy * self.sy;
        let shx = other.shx * self.sx + other.sy * self.shx;
        let sy = other.shx * self.shy + other.sy * self.sy;
        let tx = other.tx * self.sx + other.ty * self.shx + self.tx;
        let ty = other.tx * self.shy + other.ty * self.sy + self.ty;

        Matrix::with_precision(sx, shy, shx, sy, tx, ty, self.precision)
    }

    /// The inverse transform, or `None` when the matrix is singular.
    pub fn inversed(&self) -> Option<Matrix> {
        let det = self.sx * self.sy - self.shy * self.shx;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let quot = 1.0 / det;

        let a = self.sy * quot;
        let b = -self.shy * quot;
        let c = -self.shx * quot;
        let d = self.sx * quot;
        let e = -a * self.tx - c * self.ty;
        let f = -b * self.tx - d * self.ty;

        Some(Matrix::with_precision(a, b, c, d, e, f, self.precision))
    }

    /// Split into scale, translation, rotation and skew parts.
    pub fn decompose(&self) -> Decomposition {
        let (mut a, mut b, mut c, mut d) = (self.sx, self.shy, self.shx, self.sy);

        let mut scale_x = (a * a + b * b).sqrt();
        a /= scale_x;
        b /= scale_x;

        let mut shear = a * c + b * d;
        c -= a * shear;
        d -= b * shear;

        let scale_y = (c * c + d * d).sqrt();
        c /= scale_y;
        d /= scale_y;
        shear /= scale_y;

        if a * d < b * c {
            a = -a;
            b = -b;
            shear = -shear;
            scale_x = -scale_x;
        }

        let p = self.precision;
        Decomposition {
            scale: Matrix::with_precision(scale_x, 0.0, 0.0, scale_y, 0.0, 0.0, p),
            translate: Matrix::with_precision(1.0, 0.0, 0.0, 1.0, self.tx, self.ty, p),
            rotate: Matrix::with_precision(a, b, -b, a, 0.0, 0.0, p),
            skew: Matrix::with_precision(1.0, 0.0, shear, 1.0, 0.0, 0.0, p),
        }
    }

    /// Render with an explicit number of decimals.
    pub fn to_string_with_precision(&self, precision: u32) -> String {
        let render = |v: f64| -> String {
            if precision >= HIGH_PRECISION {
                hpf(v).unwrap_or_else(|_| js_number(v))
            } else {
                js_number(round_half_up(v, precision as i32))
            }
        };
        self.components()
            .iter()
            .map(|v| render(*v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self
            .precision
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_DISPLAY_PRECISION);
        f.write_str(&self.to_string_with_precision(precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(Matrix::identity().to_string(), "1 0 0 1 0 0");
        assert_eq!(Matrix::default(), Matrix::identity());
    }

    #[test]
    fn test_multiply_translations_add() {
        let a = Matrix::translation(10.0, 5.0);
        let b = Matrix::translation(-3.0, 2.0);
        let m = a.multiply(&b);
        assert_eq!(m.tx(), 7.0);
        assert_eq!(m.ty(), 7.0);
    }

    #[test]
    fn test_multiply_scale_then_translate() {
        let scale = Matrix::new(2.0, 0.0, 0.0, 3.0, 0.0, 0.0);
        let shift = Matrix::translation(1.0, 1.0);
        // other's translation is mapped through self's linear part
        let m = scale.multiply(&shift);
        assert_eq!(m.components(), [2.0, 0.0, 0.0, 3.0, 2.0, 3.0]);
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Matrix::new(2.0, 0.5, -0.25, 1.5, 12.0, -7.0);
        let inv = m.inversed().unwrap();
        let id = m.multiply(&inv);
        for (got, want) in id.components().iter().zip([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]) {
            assert!(approx(*got, want), "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Matrix::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0).inversed().is_none());
    }

    #[test]
    fn test_decompose_rotation_and_scale() {
        let angle = std::f64::consts::FRAC_PI_6;
        let (s, c) = angle.sin_cos();
        let m = Matrix::new(2.0 * c, 2.0 * s, -3.0 * s, 3.0 * c, 4.0, 5.0);
        let parts = m.decompose();
        assert!(approx(parts.scale.sx(), 2.0));
        assert!(approx(parts.scale.sy(), 3.0));
        assert!(approx(parts.rotate.sx(), c));
        assert!(approx(parts.rotate.shy(), s));
        assert_eq!(parts.translate.tx(), 4.0);
        assert_eq!(parts.translate.ty(), 5.0);
        assert!(approx(parts.skew.shx(), 0.0));
    }

    #[test]
    fn test_display_uses_own_precision() {
        let m = Matrix::with_precision(1.0, 0.0, 0.0, 1.0, 1.23456, 0.0, Some(2));
        assert_eq!(m.to_string(), "1 0 0 1 1.23 0");
    }

    #[test]
    fn test_high_precision_display() {
        let m = Matrix::with_precision(0.5, 0.0, 0.0, 1.0, 0.0, 0.0, Some(16));
        assert_eq!(m.to_string(), "0.5 0. 0. 1. 0. 0.");
    }

    #[test]
    fn test_display_normalizes_negative_zero() {
        let m = Matrix::new(1.0, -0.0, 0.0, -1.0, 0.0, -0.000001);
        assert_eq!(m.to_string(), "1 0 0 -1 0 0");
    }

    #[test]
    fn test_join_uses_stored_values() {
        let m = Matrix::new(1.0, 0.0, 0.0, 1.0, 28.35, 813.54);
        assert_eq!(m.join(" "), "1 0 0 1 28.35 813.54");
    }
}
