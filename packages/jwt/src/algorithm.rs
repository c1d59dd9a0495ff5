//! Supported JWT algorithms and their per-algorithm parameters.

use std::fmt;

use crate::error::{JwtError, JwtResult};

/// Signature scheme backing an [`Algorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// HMAC over SHA-2
    Hmac,
    /// ECDSA over a NIST curve, IEEE P1363 (fixed-size `r || s`) encoding
    EcdsaP1363,
    /// RSASSA-PKCS1 v1.5
    RsaPkcs1,
    /// RSASSA-PSS, salt length equal to the digest length
    RsaPss,
}

/// JWT signing and MAC algorithms.
///
/// The variant name doubles as the `alg` header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    HS256,
    HS384,
    HS512,
    ES256,
    ES384,
    ES512,
    RS256,
    RS384,
    RS512,
    PS256,
    PS384,
    PS512,
}

impl Algorithm {
    /// Canonical `alg` header value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::PS256 => "PS256",
            Algorithm::PS384 => "PS384",
            Algorithm::PS512 => "PS512",
        }
    }

    /// Parse an `alg` header value.
    ///
    /// # Errors
    /// Returns `JwtError::UnsupportedAlgorithm` for anything outside the
    /// supported set. `none` is rejected here, before any key lookup.
    pub fn from_name(name: &str) -> JwtResult<Self> {
        match name {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            "ES256" => Ok(Algorithm::ES256),
            "ES384" => Ok(Algorithm::ES384),
            "ES512" => Ok(Algorithm::ES512),
            "RS256" => Ok(Algorithm::RS256),
            "RS384" => Ok(Algorithm::RS384),
            "RS512" => Ok(Algorithm::RS512),
            "PS256" => Ok(Algorithm::PS256),
            "PS384" => Ok(Algorithm::PS384),
            "PS512" => Ok(Algorithm::PS512),
            "none" => Err(JwtError::unsupported_algorithm("alg none is rejected")),
            other => Err(JwtError::unsupported_algorithm(other)),
        }
    }

    /// Scheme used to produce and verify signatures.
    #[must_use]
    pub const fn scheme(self) -> SignatureScheme {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => SignatureScheme::Hmac,
            Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512 => SignatureScheme::EcdsaP1363,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => SignatureScheme::RsaPkcs1,
            Algorithm::PS256 | Algorithm::PS384 | Algorithm::PS512 => SignatureScheme::RsaPss,
        }
    }

    /// Digest output size in bytes.
    #[must_use]
    pub const fn digest_size(self) -> usize {
        match self {
            Algorithm::HS256 | Algorithm::ES256 | Algorithm::RS256 | Algorithm::PS256 => 32,
            Algorithm::HS384 | Algorithm::ES384 | Algorithm::RS384 | Algorithm::PS384 => 48,
            Algorithm::HS512 | Algorithm::ES512 | Algorithm::RS512 | Algorithm::PS512 => 64,
        }
    }

    /// Minimum HMAC key size in bytes. Equals the digest size, never below
    /// 32 for HS256.
    #[must_use]
    pub const fn min_hmac_key_size(self) -> usize {
        self.digest_size()
    }

    /// Minimum RSA modulus size in bits for RS*/PS* algorithms.
    #[must_use]
    pub const fn min_rsa_modulus_bits(self) -> usize {
        match self {
            Algorithm::RS256 | Algorithm::PS256 => 2048,
            Algorithm::RS384 | Algorithm::PS384 => 3072,
            _ => 4096,
        }
    }

    /// ECDSA field element size in bytes for ES* algorithms.
    #[must_use]
    pub const fn ec_field_size(self) -> usize {
        match self {
            Algorithm::ES256 => 32,
            Algorithm::ES384 => 48,
            _ => 66,
        }
    }

    /// Whether the algorithm uses a symmetric key.
    #[must_use]
    pub const fn is_symmetric(self) -> bool {
        matches!(self.scheme(), SignatureScheme::Hmac)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for alg in [
            Algorithm::HS256,
            Algorithm::HS384,
            Algorithm::HS512,
            Algorithm::ES256,
            Algorithm::ES384,
            Algorithm::ES512,
            Algorithm::RS256,
            Algorithm::RS384,
            Algorithm::RS512,
            Algorithm::PS256,
            Algorithm::PS384,
            Algorithm::PS512,
        ] {
            assert_eq!(Algorithm::from_name(alg.name()).expect("known name"), alg);
        }
    }

    #[test]
    fn test_alg_none_is_rejected() {
        assert!(Algorithm::from_name("none").is_err());
        assert!(Algorithm::from_name("None").is_err());
        assert!(Algorithm::from_name("").is_err());
    }

    #[test]
    fn test_hmac_minimums_track_digest_size() {
        assert_eq!(Algorithm::HS256.min_hmac_key_size(), 32);
        assert_eq!(Algorithm::HS384.min_hmac_key_size(), 48);
        assert_eq!(Algorithm::HS512.min_hmac_key_size(), 64);
    }
}
