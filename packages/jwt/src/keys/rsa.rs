//! RSA key records for RS* (RSASSA-PKCS1 v1.5) and PS* (RSASSA-PSS).
//!
//! Both families share the same record shape; only the signature scheme
//! implied by the algorithm differs.

use std::fmt;

use rand::{CryptoRng, RngCore};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey};
use zeroize::Zeroizing;

use crate::algorithm::{Algorithm, SignatureScheme};
use crate::error::{JwtError, JwtResult};

/// Type URI under which PKCS#1 v1.5 private keys are persisted.
pub const JWT_RSA_SSA_PKCS1_PRIVATE_KEY_TYPE_URL: &str =
    "type.signet.dev/jwt.JwtRsaSsaPkcs1PrivateKey";
/// Type URI under which PKCS#1 v1.5 public keys are persisted.
pub const JWT_RSA_SSA_PKCS1_PUBLIC_KEY_TYPE_URL: &str =
    "type.signet.dev/jwt.JwtRsaSsaPkcs1PublicKey";
/// Type URI under which PSS private keys are persisted.
pub const JWT_RSA_SSA_PSS_PRIVATE_KEY_TYPE_URL: &str =
    "type.signet.dev/jwt.JwtRsaSsaPssPrivateKey";
/// Type URI under which PSS public keys are persisted.
pub const JWT_RSA_SSA_PSS_PUBLIC_KEY_TYPE_URL: &str = "type.signet.dev/jwt.JwtRsaSsaPssPublicKey";

fn check_scheme(algorithm: Algorithm, scheme: SignatureScheme) -> JwtResult<()> {
    if algorithm.scheme() != scheme {
        return Err(JwtError::unsupported_algorithm(algorithm.name()));
    }
    Ok(())
}

fn check_public_exponent(e: &[u8]) -> JwtResult<()> {
    if BigUint::from_bytes_be(e) < BigUint::from(65537u32) {
        return Err(JwtError::invalid_key(
            "public exponent must be at least 65537",
        ));
    }
    // big-endian, so the low bit lives in the last byte
    if e.last().is_none_or(|byte| byte & 1 == 0) {
        return Err(JwtError::invalid_key("public exponent must be odd"));
    }
    Ok(())
}

fn check_modulus(n: &[u8], algorithm: Algorithm) -> JwtResult<()> {
    let bits = BigUint::from_bytes_be(n).bits() as usize;
    let min = algorithm.min_rsa_modulus_bits();
    if bits < min {
        return Err(JwtError::invalid_key(&format!(
            "modulus for {algorithm} must be at least {min} bits, got {bits}"
        )));
    }
    Ok(())
}

fn validate_format(
    algorithm: Algorithm,
    scheme: SignatureScheme,
    modulus_size_bits: usize,
    public_exponent: &[u8],
) -> JwtResult<()> {
    check_scheme(algorithm, scheme)?;
    let min = algorithm.min_rsa_modulus_bits();
    if modulus_size_bits < min {
        return Err(JwtError::invalid_key(&format!(
            "modulus for {algorithm} must be at least {min} bits, got {modulus_size_bits}"
        )));
    }
    check_public_exponent(public_exponent)
}

struct RsaComponents {
    n: Vec<u8>,
    e: Vec<u8>,
    d: Vec<u8>,
    p: Vec<u8>,
    q: Vec<u8>,
}

fn generate_components(
    modulus_size_bits: usize,
    public_exponent: &[u8],
    rng: &mut (impl RngCore + CryptoRng),
) -> JwtResult<RsaComponents> {
    let exponent = BigUint::from_bytes_be(public_exponent);
    let private_key = RsaPrivateKey::new_with_exp(rng, modulus_size_bits, &exponent)
        .map_err(|e| JwtError::invalid_key(&format!("RSA key generation failed: {e}")))?;
    let primes = private_key.primes();
    let [p, q] = primes else {
        return Err(JwtError::internal("generated key does not have two primes"));
    };
    Ok(RsaComponents {
        n: private_key.n().to_bytes_be(),
        e: private_key.e().to_bytes_be(),
        d: private_key.d().to_bytes_be(),
        p: p.to_bytes_be(),
        q: q.to_bytes_be(),
    })
}

macro_rules! rsa_key_family {
    ($format:ident, $public:ident, $private:ident, $scheme:expr) => {
        /// Parameters for generating a new key pair of this family.
        #[derive(Debug, Clone)]
        pub struct $format {
            pub algorithm: Algorithm,
            pub modulus_size_bits: usize,
            /// Big-endian public exponent; at least 65537 and odd.
            pub public_exponent: Vec<u8>,
        }

        impl $format {
            pub fn validate(&self) -> JwtResult<()> {
                validate_format(
                    self.algorithm,
                    $scheme,
                    self.modulus_size_bits,
                    &self.public_exponent,
                )
            }
        }

        /// The public half: modulus and exponent, big-endian.
        #[derive(Debug, Clone)]
        pub struct $public {
            version: u32,
            algorithm: Algorithm,
            n: Vec<u8>,
            e: Vec<u8>,
            custom_kid: Option<String>,
        }

        impl $public {
            pub fn new(algorithm: Algorithm, n: Vec<u8>, e: Vec<u8>) -> JwtResult<Self> {
                let key = Self {
                    version: 0,
                    algorithm,
                    n,
                    e,
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
                check_scheme(self.algorithm, $scheme)?;
                check_modulus(&self.n, self.algorithm)?;
                check_public_exponent(&self.e)
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
            pub fn modulus(&self) -> &[u8] {
                &self.n
            }

            #[must_use]
            pub fn public_exponent(&self) -> &[u8] {
                &self.e
            }

            #[must_use]
            pub fn custom_kid(&self) -> Option<&str> {
                self.custom_kid.as_deref()
            }
        }

        /// The private half: the public record plus the private exponent
        /// and prime factors.
        #[derive(Clone)]
        pub struct $private {
            public_key: $public,
            d: Zeroizing<Vec<u8>>,
            p: Zeroizing<Vec<u8>>,
            q: Zeroizing<Vec<u8>>,
        }

        impl $private {
            pub fn new(public_key: $public, d: Vec<u8>, p: Vec<u8>, q: Vec<u8>) -> JwtResult<Self> {
                public_key.validate()?;
                Ok(Self {
                    public_key,
                    d: Zeroizing::new(d),
                    p: Zeroizing::new(p),
                    q: Zeroizing::new(q),
                })
            }

            /// Generate a fresh key pair meeting the format's parameters.
            pub fn generate(
                format: &$format,
                rng: &mut (impl RngCore + CryptoRng),
            ) -> JwtResult<Self> {
                format.validate()?;
                let components =
                    generate_components(format.modulus_size_bits, &format.public_exponent, rng)?;
                Self::new(
                    $public::new(format.algorithm, components.n, components.e)?,
                    components.d,
                    components.p,
                    components.q,
                )
            }

            /// Attach a producer-chosen `kid` value to this key pair.
            #[must_use]
            pub fn with_custom_kid(mut self, custom_kid: impl Into<String>) -> Self {
                self.public_key = self.public_key.with_custom_kid(custom_kid);
                self
            }

            pub fn validate(&self) -> JwtResult<()> {
                self.public_key.validate()
            }

            /// Project out the public half.
            #[must_use]
            pub fn public_key(&self) -> &$public {
                &self.public_key
            }

            #[must_use]
            pub fn algorithm(&self) -> Algorithm {
                self.public_key.algorithm()
            }

            #[must_use]
            pub fn private_exponent(&self) -> &[u8] {
                &self.d
            }

            #[must_use]
            pub fn prime_p(&self) -> &[u8] {
                &self.p
            }

            #[must_use]
            pub fn prime_q(&self) -> &[u8] {
                &self.q
            }

            #[must_use]
            pub fn custom_kid(&self) -> Option<&str> {
                self.public_key.custom_kid()
            }
        }

        impl fmt::Debug for $private {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($private))
                    .field("public_key", &self.public_key)
                    .field("d", &format_args!("[{} bytes]", self.d.len()))
                    .finish_non_exhaustive()
            }
        }
    };
}

rsa_key_family!(
    JwtRsaSsaPkcs1KeyFormat,
    JwtRsaSsaPkcs1PublicKey,
    JwtRsaSsaPkcs1PrivateKey,
    SignatureScheme::RsaPkcs1
);

rsa_key_family!(
    JwtRsaSsaPssKeyFormat,
    JwtRsaSsaPssPublicKey,
    JwtRsaSsaPssPrivateKey,
    SignatureScheme::RsaPss
);

/// Key derivation is not supported for JWT keys.
///
/// # Errors
/// Always returns `JwtError::Unimplemented`.
pub fn derive_pkcs1_key(
    _format: &JwtRsaSsaPkcs1KeyFormat,
    _salt: &[u8],
) -> JwtResult<JwtRsaSsaPkcs1PrivateKey> {
    Err(JwtError::Unimplemented("derive_key"))
}

/// Key derivation is not supported for JWT keys.
///
/// # Errors
/// Always returns `JwtError::Unimplemented`.
pub fn derive_pss_key(
    _format: &JwtRsaSsaPssKeyFormat,
    _salt: &[u8],
) -> JwtResult<JwtRsaSsaPssPrivateKey> {
    Err(JwtError::Unimplemented("derive_key"))
}
