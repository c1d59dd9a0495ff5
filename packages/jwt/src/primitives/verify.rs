//! The JWT verifying primitive for asymmetric algorithms.

use crate::algorithm::Algorithm;
use crate::claims::VerifiedJwt;
use crate::crypto::ecdsa::EcdsaVerifier;
use crate::crypto::rsa::{self, RsaVerifier};
use crate::error::JwtResult;
use crate::keys::JwtPublicKey;
use crate::validator::Validator;

#[derive(Debug)]
enum VerifierEngine {
    Ecdsa(EcdsaVerifier),
    Rsa(RsaVerifier),
}

/// A public key bound to an ES*/RS*/PS* algorithm and a kid policy.
#[derive(Debug)]
pub struct JwtVerifier {
    engine: VerifierEngine,
    algorithm: Algorithm,
    custom_kid: Option<String>,
}

impl JwtVerifier {
    /// Bind a validated public key.
    pub fn new(key: &JwtPublicKey) -> JwtResult<Self> {
        key.validate()?;
        let engine = match key {
            JwtPublicKey::Ecdsa(key) => VerifierEngine::Ecdsa(EcdsaVerifier::from_coordinates(
                key.algorithm(),
                key.x(),
                key.y(),
            )?),
            JwtPublicKey::RsaPkcs1(key) => VerifierEngine::Rsa(RsaVerifier::new(
                key.algorithm(),
                rsa::public_key_from_components(key.modulus(), key.public_exponent())?,
            )?),
            JwtPublicKey::RsaPss(key) => VerifierEngine::Rsa(RsaVerifier::new(
                key.algorithm(),
                rsa::public_key_from_components(key.modulus(), key.public_exponent())?,
            )?),
        };
        Ok(Self {
            engine,
            algorithm: key.algorithm(),
            custom_kid: key.custom_kid().map(str::to_string),
        })
    }

    /// Check the signature, decode the claims, and apply the validator.
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
            |signature, data| match &self.engine {
                VerifierEngine::Ecdsa(verifier) => verifier.verify(signature, data),
                VerifierEngine::Rsa(verifier) => verifier.verify(signature, data),
            },
        )
    }

    pub(crate) fn custom_kid(&self) -> Option<&str> {
        self.custom_kid.as_deref()
    }
}
