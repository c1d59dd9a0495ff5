//! JSON Web Token (JWT) signing and verification with keyset-based key
//! rotation.
//!
//! This crate provides:
//! - HS256/384/512 MACs and ES*/RS*/PS* signatures over compact JWTs
//! - Per-algorithm key records with generation and validation
//! - Keysets with a primary key for signing and trial verification across
//!   every enabled key, for zero-downtime rotation
//! - A reusable claim validator with injectable time
//!
//! ```no_run
//! use signet_jwt::keys::{JwtHmacKey, JwtHmacKeyFormat};
//! use signet_jwt::{
//!     Algorithm, JwtHmac, JwtMacKeyset, KeyStatus, OutputPrefix, RawJwt, Validator,
//! };
//!
//! # fn main() -> signet_jwt::JwtResult<()> {
//! let key = JwtHmacKey::generate(
//!     &JwtHmacKeyFormat { algorithm: Algorithm::HS256, key_size: 32 },
//!     &mut rand::thread_rng(),
//! )?;
//! let keyset = JwtMacKeyset::builder()
//!     .add_entry(JwtHmac::new(&key)?, 17, OutputPrefix::KeyId, KeyStatus::Enabled)
//!     .set_primary(17)
//!     .build()?;
//!
//! let raw_jwt = RawJwt::builder()
//!     .issuer("issuer")
//!     .without_expiration()
//!     .build()?;
//! let compact = keyset.compute_and_encode(&raw_jwt)?;
//!
//! let validator = Validator::builder()
//!     .expect_issuer("issuer")
//!     .allow_missing_expiration()
//!     .build()?;
//! let verified = keyset.verify_and_decode(&compact, &validator)?;
//! assert_eq!(verified.issuer(), Some("issuer"));
//! # Ok(())
//! # }
//! ```

pub mod algorithm;
pub mod claims;
pub(crate) mod crypto;
pub mod error;
pub mod format;
pub mod keys;
pub mod keyset;
pub mod primitives;
pub mod validator;

pub use algorithm::{Algorithm, SignatureScheme};
pub use claims::{RawJwt, RawJwtBuilder, VerifiedJwt};
pub use error::{ErrorKind, JwtError, JwtResult};
pub use keyset::{
    JwtMacKeyset, JwtSignKeyset, JwtVerifyKeyset, KeyStatus, KeysetBuilder, OutputPrefix,
};
pub use primitives::{JwtHmac, JwtSigner, JwtVerifier};
pub use validator::{Validator, ValidatorBuilder};
