//! Affine transforms for coordinate-space changes.
//!
//! [`Matrix`] carries the transforms used by pages, form objects and patterns.

mod matrix;

pub use matrix::{Decomposition, Matrix};
