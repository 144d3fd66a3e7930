//! `From` impls that turn request-parsing failures into [`AppError`].
//!
//! Domain crates convert their own error enums next to the enum definition.
//! The HTTP conversion lives in [`crate::response`] behind the `axum` feature.

use std::num::{ParseFloatError, ParseIntError};

use super::app_error::AppError;
use crate::id::IdParseError;

/// Query parameters such as `width` and `height`
impl From<ParseIntError> for AppError {
    fn from(err: ParseIntError) -> Self {
        AppError::bad_request(format!("expected an integer: {err}")).with_source(err)
    }
}

/// Matrix entries sent as text
impl From<ParseFloatError> for AppError {
    fn from(err: ParseFloatError) -> Self {
        AppError::bad_request(format!("expected a number: {err}")).with_source(err)
    }
}

impl From<IdParseError> for AppError {
    fn from(err: IdParseError) -> Self {
        AppError::bad_request(err.to_string())
            .with_code("ERR_INVALID_ID")
            .with_source(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Syntax | serde_json::error::Category::Data => {
                AppError::invalid_data(format!("malformed JSON: {err}")).with_source(err)
            }
            serde_json::error::Category::Eof => {
                AppError::bad_request("truncated JSON body").with_source(err)
            }
            serde_json::error::Category::Io => {
                AppError::internal("JSON encoding failed").with_source(err)
            }
        }
    }
}
