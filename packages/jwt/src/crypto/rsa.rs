//! RSA signature engines: RSASSA-PKCS1 v1.5 (RS*) and RSASSA-PSS (PS*).
//!
//! PSS signing uses a salt of the digest length, per the JWA requirements
//! for the PS* algorithms.

use rsa::pkcs1v15;
use rsa::pss;
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer as _, Verifier as _};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};

/// Rebuild a private key from its big-endian component bytes.
pub(crate) fn private_key_from_components(
    n: &[u8],
    e: &[u8],
    d: &[u8],
    p: &[u8],
    q: &[u8],
) -> JwtResult<RsaPrivateKey> {
    RsaPrivateKey::from_components(
        BigUint::from_bytes_be(n),
        BigUint::from_bytes_be(e),
        BigUint::from_bytes_be(d),
        vec![BigUint::from_bytes_be(p), BigUint::from_bytes_be(q)],
    )
    .map_err(|e| JwtError::invalid_key(&format!("invalid RSA private key: {e}")))
}

/// Rebuild a public key from its big-endian component bytes.
pub(crate) fn public_key_from_components(n: &[u8], e: &[u8]) -> JwtResult<RsaPublicKey> {
    RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))
        .map_err(|e| JwtError::invalid_key(&format!("invalid RSA public key: {e}")))
}

#[derive(Debug)]
pub(crate) enum RsaSigner {
    Pkcs1Sha256(pkcs1v15::SigningKey<Sha256>),
    Pkcs1Sha384(pkcs1v15::SigningKey<Sha384>),
    Pkcs1Sha512(pkcs1v15::SigningKey<Sha512>),
    PssSha256(pss::BlindedSigningKey<Sha256>),
    PssSha384(pss::BlindedSigningKey<Sha384>),
    PssSha512(pss::BlindedSigningKey<Sha512>),
}

impl RsaSigner {
    pub(crate) fn new(algorithm: Algorithm, private_key: RsaPrivateKey) -> JwtResult<Self> {
        Ok(match algorithm {
            Algorithm::RS256 => Self::Pkcs1Sha256(pkcs1v15::SigningKey::new(private_key)),
            Algorithm::RS384 => Self::Pkcs1Sha384(pkcs1v15::SigningKey::new(private_key)),
            Algorithm::RS512 => Self::Pkcs1Sha512(pkcs1v15::SigningKey::new(private_key)),
            Algorithm::PS256 => Self::PssSha256(pss::BlindedSigningKey::new(private_key)),
            Algorithm::PS384 => Self::PssSha384(pss::BlindedSigningKey::new(private_key)),
            Algorithm::PS512 => Self::PssSha512(pss::BlindedSigningKey::new(private_key)),
            _ => return Err(JwtError::unsupported_algorithm(algorithm.name())),
        })
    }

    pub(crate) fn sign(&self, data: &[u8]) -> JwtResult<Vec<u8>> {
        let mut rng = rand::thread_rng();
        let signature = match self {
            Self::Pkcs1Sha256(key) => key.try_sign(data).map(|s| s.to_vec()),
            Self::Pkcs1Sha384(key) => key.try_sign(data).map(|s| s.to_vec()),
            Self::Pkcs1Sha512(key) => key.try_sign(data).map(|s| s.to_vec()),
            Self::PssSha256(key) => key.try_sign_with_rng(&mut rng, data).map(|s| s.to_vec()),
            Self::PssSha384(key) => key.try_sign_with_rng(&mut rng, data).map(|s| s.to_vec()),
            Self::PssSha512(key) => key.try_sign_with_rng(&mut rng, data).map(|s| s.to_vec()),
        };
        signature.map_err(|e| JwtError::internal(&format!("RSA signing failed: {e}")))
    }
}

#[derive(Debug)]
pub(crate) enum RsaVerifier {
    Pkcs1Sha256(pkcs1v15::VerifyingKey<Sha256>),
    Pkcs1Sha384(pkcs1v15::VerifyingKey<Sha384>),
    Pkcs1Sha512(pkcs1v15::VerifyingKey<Sha512>),
    PssSha256(pss::VerifyingKey<Sha256>),
    PssSha384(pss::VerifyingKey<Sha384>),
    PssSha512(pss::VerifyingKey<Sha512>),
}

impl RsaVerifier {
    pub(crate) fn new(algorithm: Algorithm, public_key: RsaPublicKey) -> JwtResult<Self> {
        Ok(match algorithm {
            Algorithm::RS256 => Self::Pkcs1Sha256(pkcs1v15::VerifyingKey::new(public_key)),
            Algorithm::RS384 => Self::Pkcs1Sha384(pkcs1v15::VerifyingKey::new(public_key)),
            Algorithm::RS512 => Self::Pkcs1Sha512(pkcs1v15::VerifyingKey::new(public_key)),
            Algorithm::PS256 => Self::PssSha256(pss::VerifyingKey::new(public_key)),
            Algorithm::PS384 => Self::PssSha384(pss::VerifyingKey::new(public_key)),
            Algorithm::PS512 => Self::PssSha512(pss::VerifyingKey::new(public_key)),
            _ => return Err(JwtError::unsupported_algorithm(algorithm.name())),
        })
    }

    pub(crate) fn verify(&self, signature: &[u8], data: &[u8]) -> JwtResult<()> {
        match self {
            Self::Pkcs1Sha256(key) => {
                let signature = pkcs1v15::Signature::try_from(signature)
                    .map_err(|_| JwtError::SignatureMismatch)?;
                key.verify(data, &signature)
                    .map_err(|_| JwtError::SignatureMismatch)
            }
            Self::Pkcs1Sha384(key) => {
                let signature = pkcs1v15::Signature::try_from(signature)
                    .map_err(|_| JwtError::SignatureMismatch)?;
                key.verify(data, &signature)
                    .map_err(|_| JwtError::SignatureMismatch)
            }
            Self::Pkcs1Sha512(key) => {
                let signature = pkcs1v15::Signature::try_from(signature)
                    .map_err(|_| JwtError::SignatureMismatch)?;
                key.verify(data, &signature)
                    .map_err(|_| JwtError::SignatureMismatch)
            }
            Self::PssSha256(key) => {
                let signature = pss::Signature::try_from(signature)
                    .map_err(|_| JwtError::SignatureMismatch)?;
                key.verify(data, &signature)
                    .map_err(|_| JwtError::SignatureMismatch)
            }
            Self::PssSha384(key) => {
                let signature = pss::Signature::try_from(signature)
                    .map_err(|_| JwtError::SignatureMismatch)?;
                key.verify(data, &signature)
                    .map_err(|_| JwtError::SignatureMismatch)
            }
            Self::PssSha512(key) => {
                let signature = pss::Signature::try_from(signature)
                    .map_err(|_| JwtError::SignatureMismatch)?;
                key.verify(data, &signature)
                    .map_err(|_| JwtError::SignatureMismatch)
            }
        }
    }
}
