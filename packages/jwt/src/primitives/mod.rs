//! Per-key JWT primitives.
//!
//! Each primitive binds one key to one algorithm and one kid policy. The
//! keyset layer composes them into a rotating single-interface service;
//! they also work standalone for single-key deployments.

mod mac;
mod sign;
mod verify;

pub use mac::JwtHmac;
pub use sign::JwtSigner;
pub use verify::JwtVerifier;

use serde_json::{Map, Value};

use crate::algorithm::Algorithm;
use crate::claims::{RawJwt, VerifiedJwt};
use crate::error::{JwtError, JwtResult};
use crate::format;
use crate::validator::Validator;

// The kid emitted on sign comes from exactly one place: the key's
// custom_kid, or the keyset-derived value for key-id-bound entries.
// Supplying both is a caller error.
fn effective_kid<'a>(
    custom_kid: Option<&'a str>,
    kid: Option<&'a str>,
) -> JwtResult<Option<&'a str>> {
    match (custom_kid, kid) {
        (Some(_), Some(_)) => Err(JwtError::invalid_token("custom_kid and kid set")),
        (Some(custom_kid), None) => Ok(Some(custom_kid)),
        (None, kid) => Ok(kid),
    }
}

fn sign_and_encode(
    algorithm: Algorithm,
    custom_kid: Option<&str>,
    raw_jwt: &RawJwt,
    kid: Option<&str>,
    signer: impl FnOnce(&[u8]) -> JwtResult<Vec<u8>>,
) -> JwtResult<String> {
    let kid = effective_kid(custom_kid, kid)?;
    let header = format::encode_header(algorithm, raw_jwt.type_header(), kid)?;
    let payload = format::base64url_encode(&raw_jwt.to_json_payload()?);
    let unsigned_token = format!("{header}.{payload}");
    let signature = signer(unsigned_token.as_bytes())?;
    Ok(format!(
        "{unsigned_token}.{}",
        format::base64url_encode(&signature)
    ))
}

// Verify-side kid policy:
//   - custom_kid keys: a header kid is optional but must echo the custom
//     value when present.
//   - key-id-bound entries (expected_kid supplied by the keyset): the
//     header must carry exactly the derived kid.
//   - raw entries without custom_kid: any header kid is ignored.
fn check_header_kid(
    header: &Map<String, Value>,
    custom_kid: Option<&str>,
    expected_kid: Option<&str>,
) -> JwtResult<()> {
    let header_kid = format::kid_header(header);
    if let Some(custom_kid) = custom_kid {
        if let Some(kid) = header_kid
            && kid != custom_kid
        {
            return Err(JwtError::invalid_token("kid does not match custom_kid"));
        }
        return Ok(());
    }
    if let Some(expected) = expected_kid {
        return match header_kid {
            None => Err(JwtError::invalid_token("missing kid in header")),
            Some(kid) if kid != expected => Err(JwtError::invalid_token("wrong kid in header")),
            Some(_) => Ok(()),
        };
    }
    Ok(())
}

fn verify_and_decode(
    algorithm: Algorithm,
    custom_kid: Option<&str>,
    compact: &str,
    validator: &Validator,
    expected_kid: Option<&str>,
    verifier: impl FnOnce(&[u8], &[u8]) -> JwtResult<()>,
) -> JwtResult<VerifiedJwt> {
    let (header_segment, payload_segment, signature_segment) = format::split_compact(compact)?;
    let header = format::decode_header(header_segment)?;
    format::validate_header(&header, algorithm)?;
    let signature = format::base64url_decode(signature_segment)?;
    let unsigned_token = format!("{header_segment}.{payload_segment}");
    verifier(&signature, unsigned_token.as_bytes())?;
    let payload = format::base64url_decode(payload_segment)?;
    let raw_jwt = RawJwt::from_parts(format::type_header(&header), &payload)?;
    validator.validate(&raw_jwt)?;
    check_header_kid(&header, custom_kid, expected_kid)?;
    Ok(VerifiedJwt::new(raw_jwt))
}
