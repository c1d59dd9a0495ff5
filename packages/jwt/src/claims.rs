//! JWT claim sets: the unsigned claim set, its builder, and the verified
//! projection produced after signature and policy checks both pass.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::{JwtError, JwtResult};

// Registered claim names, as defined in
// https://tools.ietf.org/html/rfc7519#section-4.1.
const CLAIM_ISSUER: &str = "iss";
const CLAIM_SUBJECT: &str = "sub";
const CLAIM_AUDIENCE: &str = "aud";
const CLAIM_EXPIRATION: &str = "exp";
const CLAIM_NOT_BEFORE: &str = "nbf";
const CLAIM_ISSUED_AT: &str = "iat";
const CLAIM_JWT_ID: &str = "jti";

/// 31 Dec 9999, 23:59:59 GMT. The largest timestamp a claim may carry.
pub(crate) const MAX_TIMESTAMP: i64 = 253_402_300_799;

fn is_registered_name(name: &str) -> bool {
    matches!(
        name,
        CLAIM_ISSUER
            | CLAIM_SUBJECT
            | CLAIM_AUDIENCE
            | CLAIM_EXPIRATION
            | CLAIM_NOT_BEFORE
            | CLAIM_ISSUED_AT
            | CLAIM_JWT_ID
    )
}

fn check_custom_name(name: &str) -> JwtResult<()> {
    if is_registered_name(name) {
        return Err(JwtError::invalid_claims(&format!(
            "claim '{name}' is a registered name; use the dedicated setter"
        )));
    }
    Ok(())
}

// Timestamps arrive as JSON numbers; sub-second precision is truncated.
fn claim_timestamp(value: &Value) -> Option<i64> {
    let seconds = value.as_f64()?;
    if !(0.0..=MAX_TIMESTAMP as f64).contains(&seconds) {
        return None;
    }
    Some(seconds as i64)
}

fn string_claim_is_invalid(payload: &Map<String, Value>, name: &str) -> bool {
    payload.get(name).is_some_and(|v| !v.is_string())
}

fn timestamp_claim_is_invalid(payload: &Map<String, Value>, name: &str) -> bool {
    payload.get(name).is_some_and(|v| claim_timestamp(v).is_none())
}

/// An unsigned JWT claim set.
///
/// Immutable once built; producers hand it to a MAC or signing primitive,
/// consumers only ever observe it wrapped in a [`VerifiedJwt`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawJwt {
    type_header: Option<String>,
    payload: Map<String, Value>,
}

impl RawJwt {
    /// Start building a claim set.
    #[must_use]
    pub fn builder() -> RawJwtBuilder {
        RawJwtBuilder::new()
    }

    /// Reconstruct a claim set from a decoded payload.
    ///
    /// Registered claims are type-checked, and a string `aud` is normalized
    /// to a one-element audience list.
    pub(crate) fn from_parts(
        type_header: Option<String>,
        json_payload: &[u8],
    ) -> JwtResult<Self> {
        let value: Value = serde_json::from_slice(json_payload)
            .map_err(|e| JwtError::invalid_token(&format!("invalid JWT payload: {e}")))?;
        let Value::Object(mut payload) = value else {
            return Err(JwtError::invalid_token("JWT payload is not a JSON object"));
        };
        if string_claim_is_invalid(&payload, CLAIM_ISSUER)
            || string_claim_is_invalid(&payload, CLAIM_SUBJECT)
            || string_claim_is_invalid(&payload, CLAIM_JWT_ID)
            || timestamp_claim_is_invalid(&payload, CLAIM_EXPIRATION)
            || timestamp_claim_is_invalid(&payload, CLAIM_NOT_BEFORE)
            || timestamp_claim_is_invalid(&payload, CLAIM_ISSUED_AT)
        {
            return Err(JwtError::invalid_token(
                "contains an invalid registered claim",
            ));
        }
        normalize_audiences(&mut payload)?;
        Ok(RawJwt {
            type_header,
            payload,
        })
    }

    /// JSON payload for the compact form. A one-element audience list is
    /// emitted as a plain string.
    pub(crate) fn to_json_payload(&self) -> JwtResult<Vec<u8>> {
        let mut payload = self.payload.clone();
        if let Some(Value::Array(audiences)) = payload.get(CLAIM_AUDIENCE)
            && audiences.len() == 1
        {
            let single = audiences[0].clone();
            payload.insert(CLAIM_AUDIENCE.to_string(), single);
        }
        serde_json::to_vec(&payload).map_err(|e| JwtError::serialization(&e.to_string()))
    }

    /// The `typ` header value carried alongside the claims.
    #[must_use]
    pub fn type_header(&self) -> Option<&str> {
        self.type_header.as_deref()
    }

    /// The `iss` claim.
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.payload.get(CLAIM_ISSUER).and_then(Value::as_str)
    }

    /// The `sub` claim.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.payload.get(CLAIM_SUBJECT).and_then(Value::as_str)
    }

    /// The `jti` claim.
    #[must_use]
    pub fn jwt_id(&self) -> Option<&str> {
        self.payload.get(CLAIM_JWT_ID).and_then(Value::as_str)
    }

    /// The `aud` claim as an ordered list.
    #[must_use]
    pub fn audiences(&self) -> Option<Vec<&str>> {
        let audiences = self.payload.get(CLAIM_AUDIENCE)?.as_array()?;
        Some(audiences.iter().filter_map(Value::as_str).collect())
    }

    /// The `exp` claim.
    #[must_use]
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.timestamp(CLAIM_EXPIRATION)
    }

    /// The `nbf` claim.
    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.timestamp(CLAIM_NOT_BEFORE)
    }

    /// The `iat` claim.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(CLAIM_ISSUED_AT)
    }

    fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        let seconds = claim_timestamp(self.payload.get(name)?)?;
        DateTime::from_timestamp(seconds, 0)
    }

    fn custom_claim(&self, name: &str) -> Option<&Value> {
        if is_registered_name(name) {
            return None;
        }
        self.payload.get(name)
    }

    /// Whether the named custom claim is present with a JSON `null` value.
    #[must_use]
    pub fn is_null_claim(&self, name: &str) -> bool {
        self.custom_claim(name).is_some_and(Value::is_null)
    }

    /// The named custom claim, when it is a boolean.
    #[must_use]
    pub fn boolean_claim(&self, name: &str) -> Option<bool> {
        self.custom_claim(name)?.as_bool()
    }

    /// The named custom claim, when it is a string.
    #[must_use]
    pub fn string_claim(&self, name: &str) -> Option<&str> {
        self.custom_claim(name)?.as_str()
    }

    /// The named custom claim, when it is a number.
    #[must_use]
    pub fn number_claim(&self, name: &str) -> Option<f64> {
        self.custom_claim(name)?.as_f64()
    }

    /// The named custom claim, when it is a JSON object.
    #[must_use]
    pub fn json_object_claim(&self, name: &str) -> Option<&Map<String, Value>> {
        self.custom_claim(name)?.as_object()
    }

    /// The named custom claim, when it is a JSON array.
    #[must_use]
    pub fn json_array_claim(&self, name: &str) -> Option<&Vec<Value>> {
        self.custom_claim(name)?.as_array()
    }

    /// Names of all non-registered claims, in payload order.
    #[must_use]
    pub fn custom_claim_names(&self) -> Vec<&str> {
        self.payload
            .keys()
            .map(String::as_str)
            .filter(|name| !is_registered_name(name))
            .collect()
    }
}

fn normalize_audiences(payload: &mut Map<String, Value>) -> JwtResult<()> {
    let Some(value) = payload.get_mut(CLAIM_AUDIENCE) else {
        return Ok(());
    };
    match value {
        Value::String(audience) => {
            let single = std::mem::take(audience);
            *value = Value::Array(vec![Value::String(single)]);
            Ok(())
        }
        Value::Array(audiences) => {
            if audiences.is_empty() {
                return Err(JwtError::invalid_token("aud claim is present but empty"));
            }
            if audiences.iter().any(|v| !v.is_string()) {
                return Err(JwtError::invalid_token("aud claim is not a list of strings"));
            }
            Ok(())
        }
        _ => Err(JwtError::invalid_token("aud claim is not a list")),
    }
}

/// Chainable builder for [`RawJwt`].
///
/// Setters never fail; the first error (registered-name collision,
/// out-of-range timestamp) is remembered and reported by [`build`].
///
/// [`build`]: RawJwtBuilder::build
#[derive(Debug, Default)]
pub struct RawJwtBuilder {
    type_header: Option<String>,
    payload: Map<String, Value>,
    without_expiration: bool,
    error: Option<JwtError>,
}

impl RawJwtBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `typ` value emitted in the token header.
    #[must_use]
    pub fn type_header(mut self, type_header: impl Into<String>) -> Self {
        self.type_header = Some(type_header.into());
        self
    }

    /// Set the issuer (`iss`) claim.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.payload
            .insert(CLAIM_ISSUER.to_string(), Value::String(issuer.into()));
        self
    }

    /// Set the subject (`sub`) claim.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.payload
            .insert(CLAIM_SUBJECT.to_string(), Value::String(subject.into()));
        self
    }

    /// Set the JWT ID (`jti`) claim.
    #[must_use]
    pub fn jwt_id(mut self, jwt_id: impl Into<String>) -> Self {
        self.payload
            .insert(CLAIM_JWT_ID.to_string(), Value::String(jwt_id.into()));
        self
    }

    /// Append one audience to the `aud` claim.
    #[must_use]
    pub fn add_audience(mut self, audience: impl Into<String>) -> Self {
        let audiences = self
            .payload
            .entry(CLAIM_AUDIENCE.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = audiences {
            list.push(Value::String(audience.into()));
        }
        self
    }

    /// Set the expiration (`exp`) claim.
    #[must_use]
    pub fn expires_at(self, expiration: DateTime<Utc>) -> Self {
        self.set_timestamp(CLAIM_EXPIRATION, expiration, "invalid expiration timestamp")
    }

    /// Set the not-before (`nbf`) claim.
    #[must_use]
    pub fn not_before(self, not_before: DateTime<Utc>) -> Self {
        self.set_timestamp(CLAIM_NOT_BEFORE, not_before, "invalid not_before timestamp")
    }

    /// Set the issued-at (`iat`) claim.
    #[must_use]
    pub fn issued_at(self, issued_at: DateTime<Utc>) -> Self {
        self.set_timestamp(CLAIM_ISSUED_AT, issued_at, "invalid issued_at timestamp")
    }

    /// Mark the claim set as deliberately carrying no expiration.
    #[must_use]
    pub fn without_expiration(mut self) -> Self {
        self.without_expiration = true;
        self
    }

    /// Add a custom claim. Registered claim names are rejected.
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if let Err(err) = check_custom_name(&name) {
            return self.defer(err);
        }
        self.payload.insert(name, value.into());
        self
    }

    fn set_timestamp(mut self, name: &str, at: DateTime<Utc>, message: &str) -> Self {
        let seconds = at.timestamp();
        if !(0..=MAX_TIMESTAMP).contains(&seconds) {
            return self.defer(JwtError::invalid_claims(message));
        }
        self.payload.insert(name.to_string(), Value::from(seconds));
        self
    }

    fn defer(mut self, error: JwtError) -> Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }

    /// Build the claim set.
    ///
    /// # Errors
    /// Surfaces the first deferred setter error, and requires exactly one
    /// of `expires_at()` / `without_expiration()` to have been called.
    pub fn build(self) -> JwtResult<RawJwt> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let has_expiration = self.payload.contains_key(CLAIM_EXPIRATION);
        if !has_expiration && !self.without_expiration {
            return Err(JwtError::invalid_claims(
                "neither expires_at() nor without_expiration() was called",
            ));
        }
        if has_expiration && self.without_expiration {
            return Err(JwtError::invalid_claims(
                "expires_at() and without_expiration() must not be called together",
            ));
        }
        Ok(RawJwt {
            type_header: self.type_header,
            payload: self.payload,
        })
    }
}

/// An authenticated, validated claim set.
///
/// Produced only after both the cryptographic check and the validator
/// accept a token. An independent value with no tie to the verifying key.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedJwt {
    raw: RawJwt,
}

impl VerifiedJwt {
    pub(crate) fn new(raw: RawJwt) -> Self {
        Self { raw }
    }

    #[must_use]
    pub fn type_header(&self) -> Option<&str> {
        self.raw.type_header()
    }

    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.raw.issuer()
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.raw.subject()
    }

    #[must_use]
    pub fn jwt_id(&self) -> Option<&str> {
        self.raw.jwt_id()
    }

    #[must_use]
    pub fn audiences(&self) -> Option<Vec<&str>> {
        self.raw.audiences()
    }

    #[must_use]
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.raw.expiration()
    }

    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.raw.not_before()
    }

    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.raw.issued_at()
    }

    #[must_use]
    pub fn is_null_claim(&self, name: &str) -> bool {
        self.raw.is_null_claim(name)
    }

    #[must_use]
    pub fn boolean_claim(&self, name: &str) -> Option<bool> {
        self.raw.boolean_claim(name)
    }

    #[must_use]
    pub fn string_claim(&self, name: &str) -> Option<&str> {
        self.raw.string_claim(name)
    }

    #[must_use]
    pub fn number_claim(&self, name: &str) -> Option<f64> {
        self.raw.number_claim(name)
    }

    #[must_use]
    pub fn json_object_claim(&self, name: &str) -> Option<&Map<String, Value>> {
        self.raw.json_object_claim(name)
    }

    #[must_use]
    pub fn json_array_claim(&self, name: &str) -> Option<&Vec<Value>> {
        self.raw.json_array_claim(name)
    }

    #[must_use]
    pub fn custom_claim_names(&self) -> Vec<&str> {
        self.raw.custom_claim_names()
    }
}

impl PartialEq<RawJwt> for VerifiedJwt {
    fn eq(&self, other: &RawJwt) -> bool {
        &self.raw == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).expect("in range")
    }

    #[test]
    fn test_builder_requires_an_expiration_decision() {
        let err = RawJwt::builder().issuer("issuer").build();
        assert!(err.is_err());

        let raw = RawJwt::builder()
            .issuer("issuer")
            .without_expiration()
            .build()
            .expect("explicitly without expiration");
        assert_eq!(raw.issuer(), Some("issuer"));
        assert!(raw.expiration().is_none());

        let err = RawJwt::builder()
            .expires_at(ts(1_700_000_000))
            .without_expiration()
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn test_builder_rejects_registered_names_as_custom_claims() {
        for name in ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"] {
            let err = RawJwt::builder()
                .without_expiration()
                .claim(name, "value")
                .build();
            assert!(err.is_err(), "accepted registered name {name}");
        }
    }

    #[test]
    fn test_builder_rejects_out_of_range_timestamps() {
        let err = RawJwt::builder().expires_at(ts(-1)).build();
        assert!(err.is_err());

        // one past 31 Dec 9999
        let err = RawJwt::builder().expires_at(ts(MAX_TIMESTAMP + 1)).build();
        assert!(err.is_err());

        let ok = RawJwt::builder().expires_at(ts(MAX_TIMESTAMP)).build();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_single_audience_collapses_to_a_string() {
        let raw = RawJwt::builder()
            .add_audience("audience")
            .without_expiration()
            .build()
            .expect("build");
        let payload: Value =
            serde_json::from_slice(&raw.to_json_payload().expect("payload")).expect("json");
        assert_eq!(payload["aud"], json!("audience"));

        let raw = RawJwt::builder()
            .add_audience("one")
            .add_audience("two")
            .without_expiration()
            .build()
            .expect("build");
        let payload: Value =
            serde_json::from_slice(&raw.to_json_payload().expect("payload")).expect("json");
        assert_eq!(payload["aud"], json!(["one", "two"]));
    }

    #[test]
    fn test_decoded_string_audience_normalizes_to_a_list() {
        let raw = RawJwt::from_parts(None, br#"{"aud":"audience"}"#).expect("parse");
        assert_eq!(raw.audiences(), Some(vec!["audience"]));
    }

    #[test]
    fn test_invalid_registered_claims_are_rejected_on_decode() {
        for payload in [
            br#"{"iss":1}"#.as_slice(),
            br#"{"sub":false}"#.as_slice(),
            br#"{"jti":[]}"#.as_slice(),
            br#"{"exp":"soon"}"#.as_slice(),
            br#"{"exp":-1}"#.as_slice(),
            br#"{"nbf":{}}"#.as_slice(),
            br#"{"iat":253402300800}"#.as_slice(),
            br#"{"aud":[]}"#.as_slice(),
            br#"{"aud":[1]}"#.as_slice(),
            br#"{"aud":17}"#.as_slice(),
        ] {
            assert!(
                RawJwt::from_parts(None, payload).is_err(),
                "accepted {}",
                String::from_utf8_lossy(payload)
            );
        }
    }

    #[test]
    fn test_custom_claim_accessors_skip_registered_names() {
        let raw = RawJwt::from_parts(
            None,
            br#"{"iss":"issuer","flag":true,"count":2.5,"label":"x","nothing":null,"obj":{"k":1},"list":[1,2]}"#,
        )
        .expect("parse");
        assert_eq!(raw.boolean_claim("flag"), Some(true));
        assert_eq!(raw.number_claim("count"), Some(2.5));
        assert_eq!(raw.string_claim("label"), Some("x"));
        assert!(raw.is_null_claim("nothing"));
        assert!(raw.json_object_claim("obj").is_some());
        assert_eq!(raw.json_array_claim("list").map(Vec::len), Some(2));
        assert_eq!(raw.string_claim("iss"), None);
        let mut names = raw.custom_claim_names();
        names.sort_unstable();
        assert_eq!(names, vec!["count", "flag", "label", "list", "nothing", "obj"]);
    }

    #[test]
    fn test_subsecond_precision_is_truncated() {
        let raw = RawJwt::from_parts(None, br#"{"exp":1300819380.7}"#).expect("parse");
        assert_eq!(raw.expiration(), Some(ts(1_300_819_380)));
    }
}
