//! HMAC-SHA engines for HS256, HS384, and HS512.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use super::constant_time_eq;
use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

fn tag_sha256(key: &[u8], data: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|_| JwtError::invalid_key("invalid HMAC key"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn tag_sha384(key: &[u8], data: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = HmacSha384::new_from_slice(key)
        .map_err(|_| JwtError::invalid_key("invalid HMAC key"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn tag_sha512(key: &[u8], data: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|_| JwtError::invalid_key("invalid HMAC key"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// An HMAC key bound to one of the HS* algorithms.
#[derive(Debug)]
pub(crate) struct MacEngine {
    algorithm: Algorithm,
    key: Zeroizing<Vec<u8>>,
}

impl MacEngine {
    pub(crate) fn new(algorithm: Algorithm, key: &[u8]) -> JwtResult<Self> {
        if !algorithm.is_symmetric() {
            return Err(JwtError::unsupported_algorithm(algorithm.name()));
        }
        Ok(Self {
            algorithm,
            key: Zeroizing::new(key.to_vec()),
        })
    }

    pub(crate) fn compute(&self, data: &[u8]) -> JwtResult<Vec<u8>> {
        match self.algorithm {
            Algorithm::HS256 => tag_sha256(&self.key, data),
            Algorithm::HS384 => tag_sha384(&self.key, data),
            Algorithm::HS512 => tag_sha512(&self.key, data),
            _ => Err(JwtError::internal("MAC engine holds a non-HMAC algorithm")),
        }
    }

    pub(crate) fn verify(&self, tag: &[u8], data: &[u8]) -> JwtResult<()> {
        let expected = self.compute(data)?;
        if constant_time_eq(tag, &expected) {
            Ok(())
        } else {
            Err(JwtError::SignatureMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_sizes_match_the_digest() {
        let key = [7u8; 64];
        for (algorithm, size) in [
            (Algorithm::HS256, 32),
            (Algorithm::HS384, 48),
            (Algorithm::HS512, 64),
        ] {
            let engine = MacEngine::new(algorithm, &key).expect("engine");
            let tag = engine.compute(b"data").expect("tag");
            assert_eq!(tag.len(), size);
            assert!(engine.verify(&tag, b"data").is_ok());
            assert!(engine.verify(&tag, b"other").is_err());
        }
    }

    #[test]
    fn test_asymmetric_algorithms_are_rejected() {
        assert!(MacEngine::new(Algorithm::ES256, &[0u8; 32]).is_err());
    }
}
