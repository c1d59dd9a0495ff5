//! Symmetric HMAC key records for HS256, HS384, and HS512.

use std::fmt;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};

/// Type URI under which HMAC keys are persisted.
pub const JWT_HMAC_KEY_TYPE_URL: &str = "type.signet.dev/jwt.JwtHmacKey";

/// Parameters for generating a new HMAC key.
#[derive(Debug, Clone, Copy)]
pub struct JwtHmacKeyFormat {
    pub algorithm: Algorithm,
    /// Key size in bytes. Must meet the per-algorithm floor.
    pub key_size: usize,
}

impl JwtHmacKeyFormat {
    /// Check the format against the per-algorithm key-size floor.
    pub fn validate(&self) -> JwtResult<()> {
        if !self.algorithm.is_symmetric() {
            return Err(JwtError::unsupported_algorithm(self.algorithm.name()));
        }
        let min = self.algorithm.min_hmac_key_size();
        if self.key_size < min {
            return Err(JwtError::invalid_key(&format!(
                "HMAC key for {} must be at least {} bytes, got {}",
                self.algorithm, min, self.key_size
            )));
        }
        Ok(())
    }
}

/// An HMAC key bound to one of the HS* algorithms.
#[derive(Clone)]
pub struct JwtHmacKey {
    version: u32,
    algorithm: Algorithm,
    key_value: Zeroizing<Vec<u8>>,
    custom_kid: Option<String>,
}

impl JwtHmacKey {
    /// Wrap existing key material.
    ///
    /// # Errors
    /// Rejects non-HMAC algorithms and undersized keys.
    pub fn new(algorithm: Algorithm, key_value: Vec<u8>) -> JwtResult<Self> {
        let key = Self {
            version: 0,
            algorithm,
            key_value: Zeroizing::new(key_value),
            custom_kid: None,
        };
        key.validate()?;
        Ok(key)
    }

    /// Generate a fresh random key of exactly `format.key_size` bytes.
    pub fn generate(
        format: &JwtHmacKeyFormat,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> JwtResult<Self> {
        format.validate()?;
        let mut key_value = vec![0u8; format.key_size];
        rng.fill_bytes(&mut key_value);
        Self::new(format.algorithm, key_value)
    }

    /// Attach a producer-chosen `kid` value to this key.
    #[must_use]
    pub fn with_custom_kid(mut self, custom_kid: impl Into<String>) -> Self {
        self.custom_kid = Some(custom_kid.into());
        self
    }

    /// Check version, algorithm, and size constraints.
    pub fn validate(&self) -> JwtResult<()> {
        if self.version != 0 {
            return Err(JwtError::invalid_key("only version 0 keys are supported"));
        }
        JwtHmacKeyFormat {
            algorithm: self.algorithm,
            key_size: self.key_value.len(),
        }
        .validate()
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[must_use]
    pub fn key_value(&self) -> &[u8] {
        &self.key_value
    }

    #[must_use]
    pub fn custom_kid(&self) -> Option<&str> {
        self.custom_kid.as_deref()
    }
}

impl fmt::Debug for JwtHmacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtHmacKey")
            .field("version", &self.version)
            .field("algorithm", &self.algorithm)
            .field("key_value", &format_args!("[{} bytes]", self.key_value.len()))
            .field("custom_kid", &self.custom_kid)
            .finish()
    }
}

/// Key derivation is not supported for JWT keys.
///
/// # Errors
/// Always returns `JwtError::Unimplemented`.
pub fn derive_key(_format: &JwtHmacKeyFormat, _salt: &[u8]) -> JwtResult<JwtHmacKey> {
    Err(JwtError::Unimplemented("derive_key"))
}
