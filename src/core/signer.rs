//! HMAC-SHA256 signature creation and verification for metrics

use crate::core::metrics::HashHolder;
use crate::utils::error::{MetricsError, Result};
use hmac::{Hmac, Mac};
use parking_lot::Mutex;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs metrics with a shared secret.
///
/// One MAC instance is reused for every call; it is reset after each use.
pub struct Signer {
    mac: Option<Mutex<HmacSha256>>,
}

impl Signer {
    /// Create a signer. An empty key yields a signer that refuses to sign.
    pub fn new(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Ok(Self { mac: None });
        }

        let mac = <HmacSha256 as Mac>::new_from_slice(key.as_bytes())
            .map_err(|e| MetricsError::config(format!("Invalid HMAC key: {}", e)))?;

        Ok(Self {
            mac: Some(Mutex::new(mac)),
        })
    }

    /// Signer without a key
    pub fn disabled() -> Self {
        Self { mac: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.mac.is_some()
    }

    pub fn sign<H: HashHolder>(&self, holder: &H) -> Result<Vec<u8>> {
        let mac = self.mac.as_ref().ok_or(MetricsError::MissingKey)?;
        let mut guard = mac.lock();
        Ok(holder.get_hash(&mut *guard))
    }

    pub fn sign_hex<H: HashHolder>(&self, holder: &H) -> Result<String> {
        self.sign(holder).map(hex::encode)
    }

    /// Verify a hex signature. A mismatch is `Ok(false)`, bad hex is an error.
    pub fn check_sign<H: HashHolder>(&self, holder: &H, signature: &str) -> Result<bool> {
        let supplied = hex::decode(signature)?;
        let expected = self.sign(holder)?;
        Ok(constant_time_eq(&expected, &supplied))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Constant-time byte comparison
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.iter().zip(b.iter()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
