//! Shared Kernel - Crate-crossing minimal core
//!
//! This crate contains the vocabulary every other crate agrees on:
//! - The unified [`AppError`](error::app_error::AppError) and its [`ErrorKind`](error::kind::ErrorKind)
//! - Typed ID wrappers ([`id::SessionId`])
//! - JSON / error response writers (`axum` feature)

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
#[cfg(feature = "axum")]
pub mod response;
