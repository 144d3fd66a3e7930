//! Message Signing
//!
//! [`Signer`] is the capability handlers depend on. Two backends:
//! - [`HmacSigner`] - shared-secret HMAC-SHA256
//! - [`RsaSigner`] - RSA-PSS over SHA-256, verifiable by anyone holding the
//!   public key ([`RsaVerifier`])
//!
//! Signatures travel as lowercase hex.

mod hmac_signer;
mod rsa_signer;

pub use hmac_signer::{HmacSigner, KEY_LEN};
pub use rsa_signer::{DEFAULT_KEY_BITS, RsaSigner, RsaVerifier};

use kernel::error::app_error::AppError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Signature is not valid hex")]
    Encoding,

    #[error("Signature does not match the message")]
    Mismatch,

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Invalid key: {0}")]
    Key(String),
}

impl From<SignatureError> for AppError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::Encoding | SignatureError::Mismatch => {
                AppError::forbidden(err.to_string()).with_source(err)
            }
            SignatureError::Signing(_) | SignatureError::Key(_) => {
                tracing::error!(error = %err, "Signer failure");
                AppError::internal(err.to_string()).with_source(err)
            }
        }
    }
}

/// Check signatures produced by a [`Signer`].
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, message: &[u8], signature: &str) -> Result<(), SignatureError>;
}

/// Sign and verify messages.
pub trait Signer: SignatureVerifier {
    /// Hex-encoded signature of `message`.
    fn sign(&self, message: &[u8]) -> Result<String, SignatureError>;
}
