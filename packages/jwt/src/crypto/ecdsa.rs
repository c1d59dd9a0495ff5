//! ECDSA engines over the NIST curves.
//!
//! Signatures use the IEEE P1363 encoding (fixed-size `r || s`), which is
//! what the `alg` values ES256/ES384/ES512 require on the wire.

use std::fmt;

use p256::ecdsa::signature::{Signer as _, Verifier as _};

use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};

pub(crate) enum EcdsaSigner {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    P521(p521::ecdsa::SigningKey),
}

impl fmt::Debug for EcdsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            Self::P256(_) => "P256",
            Self::P384(_) => "P384",
            Self::P521(_) => "P521",
        };
        f.debug_tuple("EcdsaSigner").field(&variant).finish()
    }
}

impl EcdsaSigner {
    /// Bind a raw private scalar to an ES* algorithm.
    pub(crate) fn from_scalar(algorithm: Algorithm, scalar: &[u8]) -> JwtResult<Self> {
        match algorithm {
            Algorithm::ES256 => p256::ecdsa::SigningKey::from_slice(scalar)
                .map(Self::P256)
                .map_err(|e| JwtError::invalid_key(&format!("invalid P-256 private key: {e}"))),
            Algorithm::ES384 => p384::ecdsa::SigningKey::from_slice(scalar)
                .map(Self::P384)
                .map_err(|e| JwtError::invalid_key(&format!("invalid P-384 private key: {e}"))),
            Algorithm::ES512 => p521::ecdsa::SigningKey::from_slice(scalar)
                .map(Self::P521)
                .map_err(|e| JwtError::invalid_key(&format!("invalid P-521 private key: {e}"))),
            _ => Err(JwtError::unsupported_algorithm(algorithm.name())),
        }
    }

    pub(crate) fn sign(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::P256(key) => {
                let signature: p256::ecdsa::Signature = key.sign(data);
                signature.to_bytes().to_vec()
            }
            Self::P384(key) => {
                let signature: p384::ecdsa::Signature = key.sign(data);
                signature.to_bytes().to_vec()
            }
            Self::P521(key) => {
                let signature: p521::ecdsa::Signature = key.sign(data);
                signature.to_bytes().to_vec()
            }
        }
    }
}

pub(crate) enum EcdsaVerifier {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
    P521(p521::ecdsa::VerifyingKey),
}

impl fmt::Debug for EcdsaVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            Self::P256(_) => "P256",
            Self::P384(_) => "P384",
            Self::P521(_) => "P521",
        };
        f.debug_tuple("EcdsaVerifier").field(&variant).finish()
    }
}

impl EcdsaVerifier {
    /// Bind affine public-key coordinates to an ES* algorithm.
    pub(crate) fn from_coordinates(algorithm: Algorithm, x: &[u8], y: &[u8]) -> JwtResult<Self> {
        let field_size = algorithm.ec_field_size();
        if x.len() != field_size || y.len() != field_size {
            return Err(JwtError::invalid_key("invalid EC coordinate length"));
        }
        match algorithm {
            Algorithm::ES256 => {
                let point = p256::EncodedPoint::from_affine_coordinates(
                    p256::FieldBytes::from_slice(x),
                    p256::FieldBytes::from_slice(y),
                    false,
                );
                p256::ecdsa::VerifyingKey::from_encoded_point(&point)
                    .map(Self::P256)
                    .map_err(|e| JwtError::invalid_key(&format!("invalid P-256 public key: {e}")))
            }
            Algorithm::ES384 => {
                let point = p384::EncodedPoint::from_affine_coordinates(
                    p384::FieldBytes::from_slice(x),
                    p384::FieldBytes::from_slice(y),
                    false,
                );
                p384::ecdsa::VerifyingKey::from_encoded_point(&point)
                    .map(Self::P384)
                    .map_err(|e| JwtError::invalid_key(&format!("invalid P-384 public key: {e}")))
            }
            Algorithm::ES512 => {
                let point = p521::EncodedPoint::from_affine_coordinates(
                    p521::FieldBytes::from_slice(x),
                    p521::FieldBytes::from_slice(y),
                    false,
                );
                p521::ecdsa::VerifyingKey::from_encoded_point(&point)
                    .map(Self::P521)
                    .map_err(|e| JwtError::invalid_key(&format!("invalid P-521 public key: {e}")))
            }
            _ => Err(JwtError::unsupported_algorithm(algorithm.name())),
        }
    }

    pub(crate) fn verify(&self, signature: &[u8], data: &[u8]) -> JwtResult<()> {
        match self {
            Self::P256(key) => {
                let signature = p256::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| JwtError::SignatureMismatch)?;
                key.verify(data, &signature)
                    .map_err(|_| JwtError::SignatureMismatch)
            }
            Self::P384(key) => {
                let signature = p384::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| JwtError::SignatureMismatch)?;
                key.verify(data, &signature)
                    .map_err(|_| JwtError::SignatureMismatch)
            }
            Self::P521(key) => {
                let signature = p521::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| JwtError::SignatureMismatch)?;
                key.verify(data, &signature)
                    .map_err(|_| JwtError::SignatureMismatch)
            }
        }
    }
}
