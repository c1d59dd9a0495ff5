//! Per-algorithm key records: formats, generation, validation, and the
//! public projection of private keys.

pub mod ecdsa;
pub mod hmac;
pub mod rsa;

pub use ecdsa::{JwtEcdsaKeyFormat, JwtEcdsaPrivateKey, JwtEcdsaPublicKey};
pub use hmac::{JwtHmacKey, JwtHmacKeyFormat};
pub use rsa::{
    JwtRsaSsaPkcs1KeyFormat, JwtRsaSsaPkcs1PrivateKey, JwtRsaSsaPkcs1PublicKey,
    JwtRsaSsaPssKeyFormat, JwtRsaSsaPssPrivateKey, JwtRsaSsaPssPublicKey,
};

use crate::algorithm::Algorithm;
use crate::error::JwtResult;

/// A private key record accepted by the signing primitive.
#[derive(Debug, Clone)]
pub enum JwtPrivateKey {
    Ecdsa(JwtEcdsaPrivateKey),
    RsaPkcs1(JwtRsaSsaPkcs1PrivateKey),
    RsaPss(JwtRsaSsaPssPrivateKey),
}

impl JwtPrivateKey {
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Ecdsa(key) => key.algorithm(),
            Self::RsaPkcs1(key) => key.algorithm(),
            Self::RsaPss(key) => key.algorithm(),
        }
    }

    #[must_use]
    pub fn custom_kid(&self) -> Option<&str> {
        match self {
            Self::Ecdsa(key) => key.custom_kid(),
            Self::RsaPkcs1(key) => key.custom_kid(),
            Self::RsaPss(key) => key.custom_kid(),
        }
    }

    pub fn validate(&self) -> JwtResult<()> {
        match self {
            Self::Ecdsa(key) => key.validate(),
            Self::RsaPkcs1(key) => key.validate(),
            Self::RsaPss(key) => key.validate(),
        }
    }

    /// Project out the public material.
    #[must_use]
    pub fn public_key(&self) -> JwtPublicKey {
        match self {
            Self::Ecdsa(key) => JwtPublicKey::Ecdsa(key.public_key().clone()),
            Self::RsaPkcs1(key) => JwtPublicKey::RsaPkcs1(key.public_key().clone()),
            Self::RsaPss(key) => JwtPublicKey::RsaPss(key.public_key().clone()),
        }
    }
}

impl From<JwtEcdsaPrivateKey> for JwtPrivateKey {
    fn from(key: JwtEcdsaPrivateKey) -> Self {
        Self::Ecdsa(key)
    }
}

impl From<JwtRsaSsaPkcs1PrivateKey> for JwtPrivateKey {
    fn from(key: JwtRsaSsaPkcs1PrivateKey) -> Self {
        Self::RsaPkcs1(key)
    }
}

impl From<JwtRsaSsaPssPrivateKey> for JwtPrivateKey {
    fn from(key: JwtRsaSsaPssPrivateKey) -> Self {
        Self::RsaPss(key)
    }
}

/// A public key record accepted by the verifying primitive.
#[derive(Debug, Clone)]
pub enum JwtPublicKey {
    Ecdsa(JwtEcdsaPublicKey),
    RsaPkcs1(JwtRsaSsaPkcs1PublicKey),
    RsaPss(JwtRsaSsaPssPublicKey),
}

impl JwtPublicKey {
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Ecdsa(key) => key.algorithm(),
            Self::RsaPkcs1(key) => key.algorithm(),
            Self::RsaPss(key) => key.algorithm(),
        }
    }

    #[must_use]
    pub fn custom_kid(&self) -> Option<&str> {
        match self {
            Self::Ecdsa(key) => key.custom_kid(),
            Self::RsaPkcs1(key) => key.custom_kid(),
            Self::RsaPss(key) => key.custom_kid(),
        }
    }

    pub fn validate(&self) -> JwtResult<()> {
        match self {
            Self::Ecdsa(key) => key.validate(),
            Self::RsaPkcs1(key) => key.validate(),
            Self::RsaPss(key) => key.validate(),
        }
    }
}

impl From<JwtEcdsaPublicKey> for JwtPublicKey {
    fn from(key: JwtEcdsaPublicKey) -> Self {
        Self::Ecdsa(key)
    }
}

impl From<JwtRsaSsaPkcs1PublicKey> for JwtPublicKey {
    fn from(key: JwtRsaSsaPkcs1PublicKey) -> Self {
        Self::RsaPkcs1(key)
    }
}

impl From<JwtRsaSsaPssPublicKey> for JwtPublicKey {
    fn from(key: JwtRsaSsaPssPublicKey) -> Self {
        Self::RsaPss(key)
    }
}
