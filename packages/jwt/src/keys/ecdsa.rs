//! ECDSA key records for ES256, ES384, and ES512.

use std::fmt;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::algorithm::{Algorithm, SignatureScheme};
use crate::error::{JwtError, JwtResult};

/// Type URI under which ECDSA private keys are persisted.
pub const JWT_ECDSA_PRIVATE_KEY_TYPE_URL: &str = "type.signet.dev/jwt.JwtEcdsaPrivateKey";
/// Type URI under which ECDSA public keys are persisted.
pub const JWT_ECDSA_PUBLIC_KEY_TYPE_URL: &str = "type.signet.dev/jwt.JwtEcdsaPublicKey";

/// Parameters for generating a new ECDSA key pair. The curve follows from
/// the algorithm.
#[derive(Debug, Clone, Copy)]
pub struct JwtEcdsaKeyFormat {
    pub algorithm: Algorithm,
}

impl JwtEcdsaKeyFormat {
    pub fn validate(&self) -> JwtResult<()> {
        if self.algorithm.scheme() != SignatureScheme::EcdsaP1363 {
            return Err(JwtError::unsupported_algorithm(self.algorithm.name()));
        }
        Ok(())
    }
}

/// The public half of an ECDSA key pair: affine coordinates on the curve
/// implied by the algorithm.
#[derive(Debug, Clone)]
pub struct JwtEcdsaPublicKey {
    version: u32,
    algorithm: Algorithm,
    x: Vec<u8>,
    y: Vec<u8>,
    custom_kid: Option<String>,
}

impl JwtEcdsaPublicKey {
    /// Wrap existing affine coordinates.
    pub fn new(algorithm: Algorithm, x: Vec<u8>, y: Vec<u8>) -> JwtResult<Self> {
        let key = Self {
            version: 0,
            algorithm,
            x,
            y,
            custom_kid: None,
        };
        key.validate()?;
        Ok(key)
    }

    /// Attach a producer-chosen `kid` value to this key.
    #[must_use]
    pub fn with_custom_kid(mut self, custom_kid: impl Into<String>) -> Self {
        self.custom_kid = Some(custom_kid.into());
        self
    }

    pub fn validate(&self) -> JwtResult<()> {
        if self.version != 0 {
            return Err(JwtError::invalid_key("only version 0 keys are supported"));
        }
        JwtEcdsaKeyFormat {
            algorithm: self.algorithm,
        }
        .validate()?;
        let field_size = self.algorithm.ec_field_size();
        if self.x.len() != field_size || self.y.len() != field_size {
            return Err(JwtError::invalid_key("invalid EC coordinate length"));
        }
        Ok(())
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
    pub fn x(&self) -> &[u8] {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[u8] {
        &self.y
    }

    #[must_use]
    pub fn custom_kid(&self) -> Option<&str> {
        self.custom_kid.as_deref()
    }
}

/// The private half of an ECDSA key pair: the public record plus the
/// private scalar.
#[derive(Clone)]
pub struct JwtEcdsaPrivateKey {
    public_key: JwtEcdsaPublicKey,
    key_value: Zeroizing<Vec<u8>>,
}

impl JwtEcdsaPrivateKey {
    /// Wrap an existing scalar together with its public half.
    pub fn new(public_key: JwtEcdsaPublicKey, key_value: Vec<u8>) -> JwtResult<Self> {
        let key = Self {
            public_key,
            key_value: Zeroizing::new(key_value),
        };
        key.validate()?;
        Ok(key)
    }

    /// Generate a fresh key pair on the curve implied by the format.
    pub fn generate(
        format: &JwtEcdsaKeyFormat,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> JwtResult<Self> {
        format.validate()?;
        let (x, y, scalar) = match format.algorithm {
            Algorithm::ES256 => {
                let signing_key = p256::ecdsa::SigningKey::random(rng);
                let point = signing_key.verifying_key().to_encoded_point(false);
                (
                    coordinate(point.x())?,
                    coordinate(point.y())?,
                    signing_key.to_bytes().to_vec(),
                )
            }
            Algorithm::ES384 => {
                let signing_key = p384::ecdsa::SigningKey::random(rng);
                let point = signing_key.verifying_key().to_encoded_point(false);
                (
                    coordinate(point.x())?,
                    coordinate(point.y())?,
                    signing_key.to_bytes().to_vec(),
                )
            }
            Algorithm::ES512 => {
                let signing_key = p521::ecdsa::SigningKey::random(rng);
                let point = p521::ecdsa::VerifyingKey::from(&signing_key).to_encoded_point(false);
                (
                    coordinate(point.x())?,
                    coordinate(point.y())?,
                    signing_key.to_bytes().to_vec(),
                )
            }
            _ => return Err(JwtError::unsupported_algorithm(format.algorithm.name())),
        };
        Self::new(JwtEcdsaPublicKey::new(format.algorithm, x, y)?, scalar)
    }

    /// Attach a producer-chosen `kid` value to this key pair.
    #[must_use]
    pub fn with_custom_kid(mut self, custom_kid: impl Into<String>) -> Self {
        self.public_key = self.public_key.with_custom_kid(custom_kid);
        self
    }

    pub fn validate(&self) -> JwtResult<()> {
        self.public_key.validate()?;
        if self.key_value.len() != self.public_key.algorithm().ec_field_size() {
            return Err(JwtError::invalid_key("invalid EC private key length"));
        }
        Ok(())
    }

    /// Project out the public half.
    #[must_use]
    pub fn public_key(&self) -> &JwtEcdsaPublicKey {
        &self.public_key
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.public_key.algorithm()
    }

    #[must_use]
    pub fn key_value(&self) -> &[u8] {
        &self.key_value
    }

    #[must_use]
    pub fn custom_kid(&self) -> Option<&str> {
        self.public_key.custom_kid()
    }
}

impl fmt::Debug for JwtEcdsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtEcdsaPrivateKey")
            .field("public_key", &self.public_key)
            .field("key_value", &format_args!("[{} bytes]", self.key_value.len()))
            .finish()
    }
}

fn coordinate(bytes: Option<&impl AsRef<[u8]>>) -> JwtResult<Vec<u8>> {
    bytes
        .map(|b| b.as_ref().to_vec())
        .ok_or_else(|| JwtError::internal("generated point is not affine"))
}

/// Key derivation is not supported for JWT keys.
///
/// # Errors
/// Always returns `JwtError::Unimplemented`.
pub fn derive_key(_format: &JwtEcdsaKeyFormat, _salt: &[u8]) -> JwtResult<JwtEcdsaPrivateKey> {
    Err(JwtError::Unimplemented("derive_key"))
}
