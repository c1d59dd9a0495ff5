//! Compact JWT framing.
//!
//! Strict unpadded base64url, three-segment splitting, header encoding and
//! strict header parsing, and the derivation of `kid` values from 32-bit
//! keyset key ids.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::algorithm::Algorithm;
use crate::error::{JwtError, JwtResult};

/// Base64 URL-safe encoding without padding (RFC 7515)
#[inline]
#[must_use]
pub(crate) fn base64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding (RFC 7515).
///
/// Rejects every non-alphabet character, including `=`, whitespace, and
/// newlines.
#[inline]
pub(crate) fn base64url_decode(input: &str) -> JwtResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|_| JwtError::invalid_token("invalid base64url segment"))
}

/// Split a compact token into its header, payload, and signature segments.
pub(crate) fn split_compact(compact: &str) -> JwtResult<(&str, &str, &str)> {
    let mut parts = compact.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(JwtError::invalid_token(
            "only tokens in JWS compact serialization format are supported",
        ));
    };
    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(JwtError::invalid_token("empty token segment"));
    }
    Ok((header, payload, signature))
}

#[derive(Serialize)]
struct Header<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    typ: Option<&'a str>,
    alg: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<&'a str>,
}

/// Serialize and encode the header segment for a token.
pub(crate) fn encode_header(
    algorithm: Algorithm,
    type_header: Option<&str>,
    kid: Option<&str>,
) -> JwtResult<String> {
    let header = Header {
        typ: type_header,
        alg: algorithm.name(),
        kid,
    };
    let json = serde_json::to_vec(&header).map_err(|e| JwtError::serialization(&e.to_string()))?;
    Ok(base64url_encode(&json))
}

// serde_json keeps the last value when a member repeats, so duplicate
// detection needs a manual map visitor.
struct StrictObject(Map<String, Value>);

impl<'de> serde::Deserialize<'de> for StrictObject {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ObjectVisitor;

        impl<'de> serde::de::Visitor<'de> for ObjectVisitor {
            type Value = StrictObject;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut object = Map::new();
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    if object.insert(name.clone(), value).is_some() {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate member '{name}'"
                        )));
                    }
                }
                Ok(StrictObject(object))
            }
        }

        deserializer.deserialize_map(ObjectVisitor)
    }
}

/// Decode and parse a header segment, rejecting duplicate members.
pub(crate) fn decode_header(segment: &str) -> JwtResult<Map<String, Value>> {
    let json = base64url_decode(segment)?;
    let StrictObject(header) = serde_json::from_slice(&json)
        .map_err(|e| JwtError::invalid_token(&format!("invalid header: {e}")))?;
    Ok(header)
}

/// Check a decoded header against the algorithm the primitive is bound to.
pub(crate) fn validate_header(header: &Map<String, Value>, algorithm: Algorithm) -> JwtResult<()> {
    let Some(alg) = header.get("alg") else {
        return Err(JwtError::invalid_token("header is missing alg"));
    };
    let Some(alg) = alg.as_str() else {
        return Err(JwtError::invalid_token("alg is not a string"));
    };
    if Algorithm::from_name(alg)? != algorithm {
        return Err(JwtError::invalid_token("invalid alg"));
    }
    if header.contains_key("crit") {
        return Err(JwtError::invalid_token(
            "all tokens with crit headers are rejected",
        ));
    }
    Ok(())
}

/// The `typ` member of a decoded header, when it is a string.
pub(crate) fn type_header(header: &Map<String, Value>) -> Option<String> {
    header
        .get("typ")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// The `kid` member of a decoded header, when it is a string.
pub(crate) fn kid_header(header: &Map<String, Value>) -> Option<&str> {
    header.get("kid").and_then(Value::as_str)
}

/// Derive the `kid` header value for a key-id-bound keyset entry: the
/// big-endian 4-byte encoding of the key id, base64url encoded. Always six
/// ASCII characters.
#[must_use]
pub fn encode_kid(key_id: u32) -> String {
    base64url_encode(&key_id.to_be_bytes())
}

/// Invert [`encode_kid`]. Returns `None` unless the value decodes to
/// exactly four bytes.
#[must_use]
pub fn decode_key_id(kid: &str) -> Option<u32> {
    let decoded = base64url_decode(kid).ok()?;
    let bytes: [u8; 4] = decoded.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}
