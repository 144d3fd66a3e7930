use std::fmt;

use hmac::Mac;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{SignatureError, SignatureVerifier, Signer};
use crate::crypto::{from_hex, hmac_sha256, keyed_mac, random_bytes, to_hex};

pub const KEY_LEN: usize = 32;

/// HMAC-SHA256 signer with a named 32-byte key.
///
/// The key is wiped from memory on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HmacSigner {
    name: String,
    key: [u8; KEY_LEN],
}

impl HmacSigner {
    pub fn new(name: impl Into<String>, key: [u8; KEY_LEN]) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }

    /// Create a signer with a fresh random key (for development and tests)
    pub fn generate(name: impl Into<String>) -> Self {
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&random_bytes(KEY_LEN));
        let signer = Self::new(name, key);
        key.zeroize();
        signer
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("name", &self.name)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl Signer for HmacSigner {
    fn sign(&self, message: &[u8]) -> Result<String, SignatureError> {
        Ok(to_hex(&hmac_sha256(&self.key, message)))
    }
}

impl SignatureVerifier for HmacSigner {
    fn verify(&self, message: &[u8], signature: &str) -> Result<(), SignatureError> {
        let given = from_hex(signature).map_err(|_| SignatureError::Encoding)?;

        let mut mac = keyed_mac(&self.key);
        mac.update(message);
        mac.verify_slice(&given).map_err(|_| {
            tracing::debug!(signer = %self.name, "Signature mismatch");
            SignatureError::Mismatch
        })
    }
}
