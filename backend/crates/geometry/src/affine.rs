//! 2-D affine transforms in 4×4 homogeneous form.
//!
//! Layout (row-major):
//! ```text
//! | l0  l1  l2  tx |
//! | l3  l4  l5  ty |
//! | l6  l7  l8  tz |
//! | 0   0   0   1  |
//! ```
//! The upper-left 3×3 block is the linear part, column 3 of the first three
//! rows the translation. The bottom row is assumed, never checked on input.

use crate::error::{GeometryError, GeometryResult};
use crate::matrix::{det3, mat_mult};

/// Relative singularity cutoff.
///
/// The linear block is treated as singular when `|det|` falls below this
/// fraction of the product of its row lengths. That product bounds `|det|`
/// (Hadamard), so the test does not depend on the transform's scale.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Row-major positions of the 3×3 linear block inside a 4×4 transform.
const LINEAR: [usize; 9] = [0, 1, 2, 4, 5, 6, 8, 9, 10];
/// Row-major positions of the translation vector.
const TRANSLATION: [usize; 3] = [3, 7, 11];

/// Invert a 4×4 affine transform with the adjugate method.
///
/// The inverse translation is back-substituted as `-(L⁻¹ · t)`; the bottom
/// row of the result is always `[0, 0, 0, 1]`.
///
/// ## Errors
/// [`GeometryError::SingularMatrix`] when the linear block's determinant is
/// zero, not finite, or below [`SINGULAR_EPSILON`] relative to the block's
/// row lengths. Nothing is divided in that case.
pub fn inverse_affine(m: &[f64; 16]) -> GeometryResult<[f64; 16]> {
    let l: [f64; 9] = LINEAR.map(|idx| m[idx]);

    let det = det3(&l);
    if det == 0.0 || !det.is_finite() || det.abs() < SINGULAR_EPSILON * row_length_product(&l) {
        tracing::warn!(determinant = det, "Refusing to invert singular affine transform");
        return Err(GeometryError::SingularMatrix { determinant: det });
    }
    let inv = 1.0 / det;

    let [a, b, c, d, e, f, g, h, i] = l;
    let l_inv = [
        (e * i - f * h) * inv,
        (c * h - b * i) * inv,
        (b * f - c * e) * inv,
        (f * g - d * i) * inv,
        (a * i - c * g) * inv,
        (c * d - a * f) * inv,
        (d * h - e * g) * inv,
        (b * g - a * h) * inv,
        (a * e - b * d) * inv,
    ];

    let t = TRANSLATION.map(|idx| m[idx]);
    let t_inv = mat_mult(&l_inv, 3, &t, 1)?;

    let mut out = [0.0; 16];
    for (dst, value) in LINEAR.iter().zip(l_inv) {
        out[*dst] = value;
    }
    for (dst, value) in TRANSLATION.iter().zip(t_inv) {
        out[*dst] = -value;
    }
    out[15] = 1.0;

    tracing::debug!(determinant = det, "Inverted affine transform");
    Ok(out)
}

fn row_length_product(l: &[f64; 9]) -> f64 {
    l.chunks_exact(3)
        .map(|row| row.iter().map(|v| v * v).sum::<f64>().sqrt())
        .product()
}

/// Homogeneous column vector used to push a 2-D point through a transform.
///
/// Both trailing components are `1`, so column 2 of the transform contributes
/// to the result exactly like the translation column does. Transforms built
/// by this module keep column 2 zero in the first two rows, which makes the
/// convention invisible for them.
pub fn homogeneous_point(x: f64, y: f64) -> [f64; 4] {
    [x, y, 1.0, 1.0]
}

/// A 4×4 homogeneous affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform([f64; 16]);

impl AffineTransform {
    pub const fn new(m: [f64; 16]) -> Self {
        Self(m)
    }

    pub const fn identity() -> Self {
        Self([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Scale by `(sx, sy)`, then translate by `(tx, ty)`.
    pub const fn from_scale_translate(sx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self([
            sx, 0.0, 0.0, tx, //
            0.0, sy, 0.0, ty, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Counter-clockwise rotation about the origin.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self([
            cos, -sin, 0.0, 0.0, //
            sin, cos, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub const fn as_array(&self) -> &[f64; 16] {
        &self.0
    }

    pub const fn to_array(self) -> [f64; 16] {
        self.0
    }

    pub fn translation(&self) -> (f64, f64) {
        (self.0[3], self.0[7])
    }

    pub fn determinant(&self) -> f64 {
        det3(&LINEAR.map(|idx| self.0[idx]))
    }

    /// See [`inverse_affine`].
    pub fn inverse(&self) -> GeometryResult<Self> {
        inverse_affine(&self.0).map(Self)
    }

    /// Transform applying `self` first and `next` second (`next · self`).
    pub fn then(&self, next: &AffineTransform) -> GeometryResult<Self> {
        let product = mat_mult(&next.0, 4, &self.0, 4)?;
        let len = product.len();
        let m: [f64; 16] = product
            .try_into()
            .map_err(|_| GeometryError::MalformedMatrix { len, width: 4 })?;
        Ok(Self(m))
    }

    /// Map a point, using [`homogeneous_point`].
    pub fn apply(&self, x: f64, y: f64) -> GeometryResult<(f64, f64)> {
        let p = mat_mult(&self.0, 4, &homogeneous_point(x, y), 1)?;
        Ok((p[0], p[1]))
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 16]> for AffineTransform {
    fn from(m: [f64; 16]) -> Self {
        Self(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SAMPLE: [f64; 16] = [
        -1.0, 1.0, -8.0, 0.0, //
        1.0, -2.0, 0.0, 0.0, //
        3.0, 1.0, -3.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    #[test]
    fn test_inverse_known_values() {
        let expected = [
            -0.10169, 0.08475, 0.27119, 0.0, //
            -0.05085, -0.45763, 0.13559, 0.0, //
            -0.11864, -0.0678, -0.01695, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ];

        let inv = inverse_affine(&SAMPLE).unwrap();
        for (idx, (actual, want)) in inv.iter().zip(expected).enumerate() {
            let rounded = (actual * 100000.0).round() / 100000.0;
            assert_eq!(rounded, want, "unexpected value at position {idx}");
        }
    }

    #[test]
    fn test_inverse_translation_back_substitution() {
        let m = AffineTransform::from_scale_translate(2.0, 4.0, 10.0, -8.0);
        let inv = m.inverse().unwrap();
        let expected = AffineTransform::from_scale_translate(0.5, 0.25, -5.0, 2.0);
        for (actual, want) in inv.as_array().iter().zip(expected.as_array()) {
            assert_abs_diff_eq!(*actual, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inverse_bottom_row_is_constructed() {
        // Garbage in the bottom row must not leak into the result.
        let mut m = SAMPLE;
        m[12] = 5.0;
        m[13] = 6.0;
        m[14] = 7.0;
        m[15] = 8.0;
        let inv = inverse_affine(&m).unwrap();
        assert_eq!(&inv[12..], &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_inverse_singular() {
        let m = [
            1.0, 2.0, 3.0, 4.0, //
            2.0, 4.0, 6.0, 5.0, //
            7.0, 8.0, 9.0, 6.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        let err = inverse_affine(&m).unwrap_err();
        assert!(matches!(err, GeometryError::SingularMatrix { .. }));
    }

    #[test]
    fn test_inverse_zero_matrix() {
        let err = AffineTransform::new([0.0; 16]).inverse().unwrap_err();
        assert_eq!(err, GeometryError::SingularMatrix { determinant: 0.0 });
    }

    #[test]
    fn test_inverse_near_singular() {
        // Second row is twice the first, plus a nudge far below the cutoff.
        let m = [
            1.0, 2.0, 3.0, 0.0, //
            2.0, 4.0, 6.0 + 1e-14, 0.0, //
            7.0, 8.0, 9.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        assert!(matches!(
            inverse_affine(&m),
            Err(GeometryError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_inverse_small_scale() {
        // det = 1e-14 is tiny in absolute terms but the block is well conditioned.
        let m = AffineTransform::from_scale_translate(1e-7, 1e-7, 3.0, -4.0);
        let inv = m.inverse().unwrap();
        let expected = AffineTransform::from_scale_translate(1e7, 1e7, -3e7, 4e7);
        for (actual, want) in inv.as_array().iter().zip(expected.as_array()) {
            assert_abs_diff_eq!(*actual, *want, epsilon = 1e-6 * want.abs().max(1.0));
        }

        let tiny = AffineTransform::from_scale_translate(1e-30, 1e-30, 0.0, 0.0);
        let (x, y) = tiny.inverse().unwrap().apply(1e-30, 2e-30).unwrap();
        assert_abs_diff_eq!(x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_then_composes_in_order() {
        let scale = AffineTransform::from_scale_translate(2.0, 2.0, 0.0, 0.0);
        let shift = AffineTransform::from_scale_translate(1.0, 1.0, 10.0, 0.0);

        // Scale first, then shift.
        let combined = scale.then(&shift).unwrap();
        assert_eq!(combined.apply(3.0, 4.0).unwrap(), (16.0, 8.0));

        // Shift first, then scale.
        let combined = shift.then(&scale).unwrap();
        assert_eq!(combined.apply(3.0, 4.0).unwrap(), (26.0, 8.0));
    }

    #[test]
    fn test_apply_uses_translation() {
        let m = AffineTransform::from_scale_translate(0.5, 1.0, 960.0, 0.0);
        assert_eq!(m.apply(1920.0, 1080.0).unwrap(), (1920.0, 1080.0));
        assert_eq!(m.apply(0.0, 0.0).unwrap(), (960.0, 0.0));
        assert_eq!(m.translation(), (960.0, 0.0));
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let m = AffineTransform::rotation(std::f64::consts::FRAC_PI_2);
        let (x, y) = m.apply(1.0, 0.0).unwrap();
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = 1e-12);
    }
}
