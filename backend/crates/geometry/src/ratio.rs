//! Aspect ratio of a transformed rectangle.

use serde::{Deserialize, Serialize};

use crate::affine::{AffineTransform, homogeneous_point};
use crate::error::{GeometryError, GeometryResult};
use crate::gcd::gcd;
use crate::matrix::mat_mult;

const TRANSFORM_LEN: usize = 16;

/// Reduced and raw size of the bounding box of a transformed rectangle.
///
/// `width / height` is in lowest terms, except for a box collapsed to a
/// point, which reports `0 / 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: i64,
    pub height: i64,
    pub raw_width: i64,
    pub raw_height: i64,
}

impl AspectRatio {
    pub fn as_tuple(&self) -> (i64, i64, i64, i64) {
        (self.width, self.height, self.raw_width, self.raw_height)
    }
}

/// A `width × height` rectangle anchored at the origin. Both sides are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    width: i64,
    height: i64,
}

impl Rectangle {
    pub fn new(width: i64, height: i64) -> GeometryResult<Self> {
        if width < 1 || height < 1 {
            tracing::warn!(width, height, "Rejected rectangle with non-positive side");
            return Err(GeometryError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    /// Corners in the order top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [[f64; 4]; 4] {
        let w = self.width as f64;
        let h = self.height as f64;
        [
            homogeneous_point(0.0, 0.0),
            homogeneous_point(w, 0.0),
            homogeneous_point(0.0, h),
            homogeneous_point(w, h),
        ]
    }

    pub fn aspect_ratio(&self, transform: &AffineTransform) -> GeometryResult<AspectRatio> {
        bounding_ratio(self, transform.as_array())
    }
}

/// Aspect ratio of the `width × height` rectangle after `transform`.
///
/// `transform` is a flat row-major 4×4 buffer. Any other length fails with
/// [`GeometryError::MalformedMatrix`] after the size has been validated.
///
/// ## Examples
/// ```rust
/// use geometry::affine::AffineTransform;
/// use geometry::ratio::ratio;
///
/// let r = ratio(1920, 1080, AffineTransform::identity().as_array()).unwrap();
/// assert_eq!(r.as_tuple(), (16, 9, 1920, 1080));
/// ```
pub fn ratio(width: i64, height: i64, transform: &[f64]) -> GeometryResult<AspectRatio> {
    let rect = Rectangle::new(width, height)?;
    if transform.len() != TRANSFORM_LEN {
        tracing::warn!(len = transform.len(), "Rejected transform that is not 4×4");
        return Err(GeometryError::MalformedMatrix {
            len: transform.len(),
            width: 4,
        });
    }
    bounding_ratio(&rect, transform)
}

/// [`ratio`] for an already typed transform.
pub fn reduce_ratio(
    width: i64,
    height: i64,
    transform: &AffineTransform,
) -> GeometryResult<AspectRatio> {
    ratio(width, height, transform.as_array())
}

fn bounding_ratio(rect: &Rectangle, transform: &[f64]) -> GeometryResult<AspectRatio> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for corner in rect.corners() {
        let p = mat_mult(transform, 4, &corner, 1)?;
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }

    let raw_width = (max_x - min_x).round().abs() as i64;
    let raw_height = (max_y - min_y).round().abs() as i64;

    let divisor = match gcd(raw_width, raw_height) {
        0 => 1,
        g => g,
    };

    let result = AspectRatio {
        width: raw_width / divisor,
        height: raw_height / divisor,
        raw_width,
        raw_height,
    };

    tracing::debug!(
        width = rect.width,
        height = rect.height,
        reduced_width = result.width,
        reduced_height = result.height,
        raw_width,
        raw_height,
        "Computed aspect ratio"
    );

    Ok(result)
}
