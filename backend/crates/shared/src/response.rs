//! Response writers
//!
//! JSON and error responses shared by every HTTP surface. Error bodies always
//! carry a machine-readable `error` code:
//!
//! ```json
//! { "error": "ERR_SINGULAR_MATRIX", "status": 422, "detail": "..." }
//! ```

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::app_error::AppError;
use crate::error::kind::ErrorKind;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

/// Serialize `body` as JSON and send it with `status`.
///
/// A body that fails to serialize turns into a plain 500 error response.
pub fn write_json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response body");
            write_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::InternalServerError.default_code(),
            )
        }
    }
}

/// Send `{"error": code, "status": status}`.
pub fn write_error(status: StatusCode, code: &str) -> Response {
    let body = ErrorBody {
        error: code,
        status: status.as_u16(),
        detail: None,
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal details stay in the logs.
        let detail = if self.is_server_error() {
            None
        } else {
            Some(self.message())
        };

        let body = ErrorBody {
            error: self.code(),
            status: status.as_u16(),
            detail,
        };
        (status, Json(body)).into_response()
    }
}
