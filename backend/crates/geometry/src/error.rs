//! Geometry Error Types
//!
//! Every variant is a deterministic function of the input: nothing here is
//! transient, so none of them is worth retrying.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type GeometryResult<T> = Result<T, GeometryError>;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// Flat buffer length is not a multiple of the declared width
    /// (or the width is zero).
    #[error("matrix of {len} elements is not valid for width {width}")]
    MalformedMatrix { len: usize, width: usize },

    /// Columns of the left operand differ from rows of the right operand.
    #[error(
        "cols of the first matrix ({left_cols}) must match the rows of the second matrix ({right_rows})"
    )]
    DimensionMismatch { left_cols: usize, right_rows: usize },

    /// Linear block of an affine transform cannot be inverted.
    #[error("matrix is singular (determinant {determinant})")]
    SingularMatrix { determinant: f64 },

    /// Rectangle side below 1.
    #[error("invalid dimensions {width}x{height}; width and height must be at least 1")]
    InvalidDimensions { width: i64, height: i64 },
}

impl GeometryError {
    /// Stable code sent to HTTP clients.
    pub fn code(&self) -> &'static str {
        match self {
            GeometryError::MalformedMatrix { .. } => "ERR_MALFORMED_MATRIX",
            GeometryError::DimensionMismatch { .. } => "ERR_DIMENSION_MISMATCH",
            GeometryError::SingularMatrix { .. } => "ERR_SINGULAR_MATRIX",
            GeometryError::InvalidDimensions { .. } => "ERR_INVALID_DIMENSIONS",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GeometryError::InvalidDimensions { .. } => ErrorKind::BadRequest,
            GeometryError::MalformedMatrix { .. }
            | GeometryError::DimensionMismatch { .. }
            | GeometryError::SingularMatrix { .. } => ErrorKind::UnprocessableEntity,
        }
    }
}

impl From<GeometryError> for AppError {
    fn from(err: GeometryError) -> Self {
        AppError::new(err.kind(), err.to_string())
            .with_code(err.code())
            .with_source(err)
    }
}
