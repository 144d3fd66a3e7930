//! Row-major matrices of `f64` values.
//!
//! A matrix is a flat buffer plus a column count:
//! ```text
//! | data[0]      data[1]        ... data[cols-1]   |
//! | data[cols]   data[cols+1]   ... data[2*cols-1] |
//! | ...                                            |
//! ```
//! [`mat_mult`] works on raw buffers and validates shapes on every call;
//! [`Matrix`] validates once at construction.

use crate::error::{GeometryError, GeometryResult};

/// Product `A · B` of two flat row-major matrices.
///
/// `A` is `(a.len() / width_a) × width_a`, `B` is `(b.len() / width_b) × width_b`.
/// The result is `rows(A) × width_b`.
///
/// ## Errors
/// * [`GeometryError::MalformedMatrix`] - a width is zero or does not divide
///   its buffer length
/// * [`GeometryError::DimensionMismatch`] - `width_a != rows(B)`
///
/// ## Examples
/// ```rust
/// use geometry::matrix::mat_mult;
///
/// let a = [1.0, 2.0, 3.0, 4.0];
/// let b = [5.0, 6.0];
/// assert_eq!(mat_mult(&a, 2, &b, 1).unwrap(), vec![17.0, 39.0]);
/// ```
pub fn mat_mult(a: &[f64], width_a: usize, b: &[f64], width_b: usize) -> GeometryResult<Vec<f64>> {
    if width_a == 0 {
        return Err(GeometryError::MalformedMatrix {
            len: a.len(),
            width: width_a,
        });
    }
    if width_b == 0 {
        return Err(GeometryError::MalformedMatrix {
            len: b.len(),
            width: width_b,
        });
    }

    let rows_a = a.len() / width_a;
    let rows_b = b.len() / width_b;

    if width_a != rows_b {
        return Err(GeometryError::DimensionMismatch {
            left_cols: width_a,
            right_rows: rows_b,
        });
    }
    if a.len() % width_a != 0 {
        return Err(GeometryError::MalformedMatrix {
            len: a.len(),
            width: width_a,
        });
    }
    if b.len() % width_b != 0 {
        return Err(GeometryError::MalformedMatrix {
            len: b.len(),
            width: width_b,
        });
    }

    let mut c = vec![0.0; rows_a * width_b];

    // Reduction index `j` ascending; reordering changes rounding.
    for i in 0..rows_a {
        for k in 0..width_b {
            for j in 0..width_a {
                c[i * width_b + k] += a[i * width_a + j] * b[j * width_b + k];
            }
        }
    }

    Ok(c)
}

/// Determinant of a row-major 3×3 matrix `[a, b, c, d, e, f, g, h, i]`.
///
/// Returns `0.0` for singular matrices; it is up to the caller to treat that
/// as an error.
pub fn det3(m: &[f64; 9]) -> f64 {
    let [a, b, c, d, e, f, g, h, i] = *m;
    (a * e * i + b * f * g + c * d * h) - (g * e * c + h * f * a + i * d * b)
}

/// Shape-checked row-major matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Wrap `data` as a matrix with `cols` columns.
    pub fn new(data: Vec<f64>, cols: usize) -> GeometryResult<Self> {
        if cols == 0 || data.len() % cols != 0 {
            return Err(GeometryError::MalformedMatrix {
                len: data.len(),
                width: cols,
            });
        }
        let rows = data.len() / cols;
        Ok(Self { data, rows, cols })
    }

    /// Single-column matrix.
    pub fn column(data: Vec<f64>) -> Self {
        let rows = data.len();
        Self {
            data,
            rows,
            cols: 1,
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self {
            data,
            rows: n,
            // Keep `cols` non-zero so the empty identity stays a valid 0×1 shape.
            cols: n.max(1),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// `self · rhs`. Only [`GeometryError::DimensionMismatch`] can occur.
    pub fn product(&self, rhs: &Matrix) -> GeometryResult<Matrix> {
        let data = mat_mult(&self.data, self.cols, &rhs.data, rhs.cols)?;
        Ok(Matrix {
            data,
            rows: self.rows,
            cols: rhs.cols,
        })
    }
}
