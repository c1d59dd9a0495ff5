//! The JWT MAC primitive.

use crate::algorithm::Algorithm;
use crate::claims::{RawJwt, VerifiedJwt};
use crate::crypto::hmac::MacEngine;
use crate::error::JwtResult;
use crate::keys::JwtHmacKey;
use crate::validator::Validator;

/// An HMAC key bound to an HS* algorithm and a kid policy.
#[derive(Debug)]
pub struct JwtHmac {
    engine: MacEngine,
    algorithm: Algorithm,
    custom_kid: Option<String>,
}

impl JwtHmac {
    /// Bind a validated HMAC key.
    pub fn new(key: &JwtHmacKey) -> JwtResult<Self> {
        key.validate()?;
        Ok(Self {
            engine: MacEngine::new(key.algorithm(), key.key_value())?,
            algorithm: key.algorithm(),
            custom_kid: key.custom_kid().map(str::to_string),
        })
    }

    /// MAC the claim set and emit the compact token.
    pub fn compute_and_encode(&self, raw_jwt: &RawJwt) -> JwtResult<String> {
        self.compute_and_encode_with_kid(raw_jwt, None)
    }

    /// Like [`compute_and_encode`], with a keyset-supplied kid.
    ///
    /// # Errors
    /// Fails when the key carries a `custom_kid` and `kid` is also given.
    ///
    /// [`compute_and_encode`]: JwtHmac::compute_and_encode
    pub fn compute_and_encode_with_kid(
        &self,
        raw_jwt: &RawJwt,
        kid: Option<&str>,
    ) -> JwtResult<String> {
        super::sign_and_encode(
            self.algorithm,
            self.custom_kid.as_deref(),
            raw_jwt,
            kid,
            |data| self.engine.compute(data),
        )
    }

    /// Check the MAC, decode the claims, and apply the validator.
    pub fn verify_and_decode(
        &self,
        compact: &str,
        validator: &Validator,
    ) -> JwtResult<VerifiedJwt> {
        self.verify_and_decode_with_kid(compact, validator, None)
    }

    pub(crate) fn verify_and_decode_with_kid(
        &self,
        compact: &str,
        validator: &Validator,
        expected_kid: Option<&str>,
    ) -> JwtResult<VerifiedJwt> {
        super::verify_and_decode(
            self.algorithm,
            self.custom_kid.as_deref(),
            compact,
            validator,
            expected_kid,
            |signature, data| self.engine.verify(signature, data),
        )
    }

    pub(crate) fn custom_kid(&self) -> Option<&str> {
        self.custom_kid.as_deref()
    }
}
