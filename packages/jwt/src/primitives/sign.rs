//! The JWT signing primitive for asymmetric algorithms.

use crate::algorithm::Algorithm;
use crate::claims::RawJwt;
use crate::crypto::ecdsa::EcdsaSigner;
use crate::crypto::rsa::{self, RsaSigner};
use crate::error::JwtResult;
use crate::keys::JwtPrivateKey;

#[derive(Debug)]
enum SignerEngine {
    Ecdsa(EcdsaSigner),
    Rsa(RsaSigner),
}

/// A private key bound to an ES*/RS*/PS* algorithm and a kid policy.
#[derive(Debug)]
pub struct JwtSigner {
    engine: SignerEngine,
    algorithm: Algorithm,
    custom_kid: Option<String>,
}

impl JwtSigner {
    /// Bind a validated private key.
    pub fn new(key: &JwtPrivateKey) -> JwtResult<Self> {
        key.validate()?;
        let engine = match key {
            JwtPrivateKey::Ecdsa(key) => SignerEngine::Ecdsa(EcdsaSigner::from_scalar(
                key.algorithm(),
                key.key_value(),
            )?),
            JwtPrivateKey::RsaPkcs1(key) => SignerEngine::Rsa(RsaSigner::new(
                key.algorithm(),
                rsa::private_key_from_components(
                    key.public_key().modulus(),
                    key.public_key().public_exponent(),
                    key.private_exponent(),
                    key.prime_p(),
                    key.prime_q(),
                )?,
            )?),
            JwtPrivateKey::RsaPss(key) => SignerEngine::Rsa(RsaSigner::new(
                key.algorithm(),
                rsa::private_key_from_components(
                    key.public_key().modulus(),
                    key.public_key().public_exponent(),
                    key.private_exponent(),
                    key.prime_p(),
                    key.prime_q(),
                )?,
            )?),
        };
        Ok(Self {
            engine,
            algorithm: key.algorithm(),
            custom_kid: key.custom_kid().map(str::to_string),
        })
    }

    /// Sign the claim set and emit the compact token.
    pub fn sign_and_encode(&self, raw_jwt: &RawJwt) -> JwtResult<String> {
        self.sign_and_encode_with_kid(raw_jwt, None)
    }

    /// Like [`sign_and_encode`], with a keyset-supplied kid.
    ///
    /// # Errors
    /// Fails when the key carries a `custom_kid` and `kid` is also given.
    ///
    /// [`sign_and_encode`]: JwtSigner::sign_and_encode
    pub fn sign_and_encode_with_kid(
        &self,
        raw_jwt: &RawJwt,
        kid: Option<&str>,
    ) -> JwtResult<String> {
        super::sign_and_encode(
            self.algorithm,
            self.custom_kid.as_deref(),
            raw_jwt,
            kid,
            |data| match &self.engine {
                SignerEngine::Ecdsa(signer) => Ok(signer.sign(data)),
                SignerEngine::Rsa(signer) => signer.sign(data),
            },
        )
    }

    pub(crate) fn custom_kid(&self) -> Option<&str> {
        self.custom_kid.as_deref()
    }
}
