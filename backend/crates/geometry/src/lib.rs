//! Geometry Crate - 2-D affine transform kernel
//!
//! Small, allocation-light helpers used by the image resizing and cropping
//! endpoints:
//! - [`matrix`] - row-major matrix product and 3×3 determinant
//! - [`affine`] - 4×4 homogeneous affine transforms and their inverse
//! - [`ratio`] - aspect ratio of a transformed rectangle
//! - [`gcd`] - Euclid's greatest common divisor
//!
//! Every function is pure. Invalid input is reported as a [`GeometryError`]
//! before any arithmetic happens, so no `Inf`/`NaN` ever leaves the crate
//! because of a singular or malformed matrix.

pub mod affine;
pub mod error;
pub mod gcd;
pub mod matrix;
pub mod ratio;

pub use affine::{AffineTransform, inverse_affine};
pub use error::{GeometryError, GeometryResult};
pub use gcd::gcd;
pub use matrix::{Matrix, det3, mat_mult};
pub use ratio::{AspectRatio, Rectangle, ratio, reduce_ratio};

// Re-export kernel error types so callers can convert at the boundary
pub use kernel::error::{app_error::AppError, kind::ErrorKind};

#[cfg(test)]
mod tests;
