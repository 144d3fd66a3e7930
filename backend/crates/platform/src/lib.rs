//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, hex)
//! - Session cookie handling
//! - Server-side session storage
//! - Message signing (HMAC and RSA-PSS)
//! - HTTP middleware (CORS, request logging, request start time)

pub mod cookie;
pub mod crypto;
pub mod middleware;
pub mod session;
pub mod signer;

pub use cookie::{CookieConfig, SameSite};
pub use middleware::{CorsConfig, RequestStart, TraceConfig, standard_layers};
pub use session::{MemorySessionStore, SessionConfig, SessionError, SessionResult, SessionStore};
pub use signer::{HmacSigner, RsaSigner, RsaVerifier, SignatureError, SignatureVerifier, Signer};
