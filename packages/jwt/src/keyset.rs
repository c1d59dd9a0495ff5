//! Keyset-backed JWT services.
//!
//! A keyset presents an ordered set of per-key primitives as a single MAC
//! or signature service: all sign operations route to the designated
//! primary entry, verification tries every enabled entry in order. The
//! keyset is immutable once built; rotation means building a new one.

use crate::claims::{RawJwt, VerifiedJwt};
use crate::error::{ErrorKind, JwtError, JwtResult};
use crate::format;
use crate::primitives::{JwtHmac, JwtSigner, JwtVerifier};
use crate::validator::Validator;

/// Whether a keyset entry participates in verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Enabled,
    Disabled,
}

/// How a keyset entry surfaces its identity in token headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPrefix {
    /// No keyset-derived kid; headers carry one only via `custom_kid`.
    Raw,
    /// The kid is derived from the entry's 32-bit key id and is required
    /// on both sign and verify.
    KeyId,
    /// Carried by older keysets for other primitive types. Never valid for
    /// JWT keysets; wrapping rejects it.
    Legacy,
}

/// Access to per-key metadata the keyset needs from its primitives.
pub trait KeysetPrimitive {
    fn custom_kid(&self) -> Option<&str>;
}

impl KeysetPrimitive for JwtHmac {
    fn custom_kid(&self) -> Option<&str> {
        self.custom_kid()
    }
}

impl KeysetPrimitive for JwtSigner {
    fn custom_kid(&self) -> Option<&str> {
        self.custom_kid()
    }
}

impl KeysetPrimitive for JwtVerifier {
    fn custom_kid(&self) -> Option<&str> {
        self.custom_kid()
    }
}

#[derive(Debug)]
struct Entry<P> {
    primitive: P,
    key_id: u32,
    status: KeyStatus,
    prefix: OutputPrefix,
}

impl<P> Entry<P> {
    fn encoded_kid(&self) -> Option<String> {
        match self.prefix {
            OutputPrefix::KeyId => Some(format::encode_kid(self.key_id)),
            _ => None,
        }
    }
}

/// An ordered, immutable set of per-key primitives with one primary.
#[derive(Debug)]
pub struct Keyset<P> {
    entries: Vec<Entry<P>>,
    primary: usize,
}

/// A keyset of MAC primitives exposed as a single JWT MAC service.
pub type JwtMacKeyset = Keyset<JwtHmac>;
/// A keyset of signing primitives exposed as a single JWT signing service.
pub type JwtSignKeyset = Keyset<JwtSigner>;
/// A keyset of verifying primitives exposed as a single JWT verification
/// service.
pub type JwtVerifyKeyset = Keyset<JwtVerifier>;

impl<P: KeysetPrimitive> Keyset<P> {
    /// Start building a keyset.
    #[must_use]
    pub fn builder() -> KeysetBuilder<P> {
        KeysetBuilder::new()
    }

    fn primary_entry(&self) -> &Entry<P> {
        &self.entries[self.primary]
    }

    // Try every enabled entry in set order. A signature mismatch moves on
    // to the next key; any other failure is remembered so the caller sees
    // the most informative error instead of a generic one.
    fn trial_verify(
        &self,
        attempt: impl Fn(&P, Option<&str>) -> JwtResult<VerifiedJwt>,
    ) -> JwtResult<VerifiedJwt> {
        let mut interesting_error: Option<JwtError> = None;
        for entry in &self.entries {
            if entry.status != KeyStatus::Enabled {
                continue;
            }
            match attempt(&entry.primitive, entry.encoded_kid().as_deref()) {
                Ok(verified) => return Ok(verified),
                Err(error) if error.kind() == ErrorKind::Unauthenticated => {}
                Err(error) => interesting_error = Some(error),
            }
        }
        Err(interesting_error.unwrap_or_else(|| JwtError::invalid_token("verification failed")))
    }
}

impl JwtMacKeyset {
    /// MAC the claim set with the primary key and emit the compact token.
    pub fn compute_and_encode(&self, raw_jwt: &RawJwt) -> JwtResult<String> {
        let primary = self.primary_entry();
        tracing::debug!(key_id = primary.key_id, "computing MAC with primary key");
        primary
            .primitive
            .compute_and_encode_with_kid(raw_jwt, primary.encoded_kid().as_deref())
    }

    /// Verify a compact token against every enabled key.
    pub fn verify_and_decode(
        &self,
        compact: &str,
        validator: &Validator,
    ) -> JwtResult<VerifiedJwt> {
        self.trial_verify(|primitive, expected_kid| {
            primitive.verify_and_decode_with_kid(compact, validator, expected_kid)
        })
    }
}

impl JwtSignKeyset {
    /// Sign the claim set with the primary key and emit the compact token.
    pub fn sign_and_encode(&self, raw_jwt: &RawJwt) -> JwtResult<String> {
        let primary = self.primary_entry();
        tracing::debug!(key_id = primary.key_id, "signing with primary key");
        primary
            .primitive
            .sign_and_encode_with_kid(raw_jwt, primary.encoded_kid().as_deref())
    }
}

impl JwtVerifyKeyset {
    /// Verify a compact token against every enabled key.
    pub fn verify_and_decode(
        &self,
        compact: &str,
        validator: &Validator,
    ) -> JwtResult<VerifiedJwt> {
        self.trial_verify(|primitive, expected_kid| {
            primitive.verify_and_decode_with_kid(compact, validator, expected_kid)
        })
    }
}

/// Chainable builder for [`Keyset`].
pub struct KeysetBuilder<P> {
    entries: Vec<Entry<P>>,
    primary_key_id: Option<u32>,
}

impl<P: KeysetPrimitive> KeysetBuilder<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            primary_key_id: None,
        }
    }

    /// Append an entry. Entries are tried in insertion order on verify.
    #[must_use]
    pub fn add_entry(
        mut self,
        primitive: P,
        key_id: u32,
        prefix: OutputPrefix,
        status: KeyStatus,
    ) -> Self {
        self.entries.push(Entry {
            primitive,
            key_id,
            status,
            prefix,
        });
        self
    }

    /// Designate the entry with this key id as the primary.
    #[must_use]
    pub fn set_primary(mut self, key_id: u32) -> Self {
        self.primary_key_id = Some(key_id);
        self
    }

    /// Validate and build the keyset.
    ///
    /// # Errors
    /// Rejects sets without a primary, with non-JWT output prefixes, or
    /// with a key-id-bound entry whose key carries a `custom_kid`.
    pub fn build(self) -> JwtResult<Keyset<P>> {
        let Some(primary_key_id) = self.primary_key_id else {
            return Err(JwtError::invalid_key("no primary"));
        };
        let Some(primary) = self
            .entries
            .iter()
            .position(|entry| entry.key_id == primary_key_id)
        else {
            return Err(JwtError::invalid_key("no primary"));
        };
        if self.entries[primary].status != KeyStatus::Enabled {
            return Err(JwtError::invalid_key("primary key is disabled"));
        }
        for entry in &self.entries {
            if !matches!(entry.prefix, OutputPrefix::Raw | OutputPrefix::KeyId) {
                return Err(JwtError::invalid_key(
                    "all keys must have raw or key-id output prefix",
                ));
            }
            if entry.prefix == OutputPrefix::KeyId && entry.primitive.custom_kid().is_some() {
                return Err(JwtError::invalid_key(
                    "key-id-bound entries must not set custom_kid",
                ));
            }
        }
        Ok(Keyset {
            entries: self.entries,
            primary,
        })
    }
}

impl<P: KeysetPrimitive> Default for KeysetBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
