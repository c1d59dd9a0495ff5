//! Validator policy checks and error precedence through the keyset.

use chrono::{DateTime, Duration, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use signet_jwt::keys::{JwtHmacKey, JwtHmacKeyFormat};
use signet_jwt::{
    Algorithm, JwtError, JwtHmac, JwtMacKeyset, KeyStatus, OutputPrefix, RawJwt, Validator,
};

fn ts(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).expect("in range")
}

fn claims_with_issuer(issuer: &str) -> RawJwt {
    RawJwt::builder()
        .issuer(issuer)
        .without_expiration()
        .build()
        .expect("claims")
}

fn assert_claims_error(result: signet_jwt::JwtResult<()>, expected: &str) {
    match result {
        Err(JwtError::InvalidClaims(msg)) if msg == expected => {}
        other => panic!("expected claims error {expected:?}, got {other:?}"),
    }
}

#[test]
fn test_wrong_issuer_wins_over_generic_verification_failure() {
    let key = JwtHmacKey::generate(
        &JwtHmacKeyFormat {
            algorithm: Algorithm::HS256,
            key_size: 32,
        },
        &mut StdRng::seed_from_u64(1),
    )
    .expect("key");
    let keyset = JwtMacKeyset::builder()
        .add_entry(
            JwtHmac::new(&key).expect("primitive"),
            1,
            OutputPrefix::Raw,
            KeyStatus::Enabled,
        )
        .set_primary(1)
        .build()
        .expect("keyset");

    let compact = keyset
        .compute_and_encode(&claims_with_issuer("unknown"))
        .expect("sign");
    let validator = Validator::builder()
        .expect_issuer("issuer")
        .allow_missing_expiration()
        .build()
        .expect("validator");

    let err = keyset
        .verify_and_decode(&compact, &validator)
        .expect_err("wrong issuer must fail");
    assert!(
        matches!(&err, JwtError::InvalidClaims(msg) if msg == "wrong issuer"),
        "interesting status was not preserved: {err}"
    );
}

#[test]
fn test_issuer_and_subject_expectations() {
    let validator = Validator::builder()
        .expect_issuer("issuer")
        .expect_subject("subject")
        .allow_missing_expiration()
        .build()
        .expect("validator");

    let good = RawJwt::builder()
        .issuer("issuer")
        .subject("subject")
        .without_expiration()
        .build()
        .expect("claims");
    assert!(validator.validate(&good).is_ok());

    assert_claims_error(
        validator.validate(&claims_with_issuer("other")),
        "wrong issuer",
    );

    let no_issuer = RawJwt::builder()
        .subject("subject")
        .without_expiration()
        .build()
        .expect("claims");
    assert_claims_error(validator.validate(&no_issuer), "missing issuer");

    let wrong_subject = RawJwt::builder()
        .issuer("issuer")
        .subject("other")
        .without_expiration()
        .build()
        .expect("claims");
    assert_claims_error(validator.validate(&wrong_subject), "wrong subject");
}

#[test]
fn test_unexpected_issuer_and_subject_are_tolerated() {
    let validator = Validator::builder()
        .allow_missing_expiration()
        .build()
        .expect("validator");
    let raw = RawJwt::builder()
        .issuer("anyone")
        .subject("anybody")
        .without_expiration()
        .build()
        .expect("claims");
    assert!(validator.validate(&raw).is_ok());
}

#[test]
fn test_type_header_rules() {
    let default_validator = Validator::builder()
        .allow_missing_expiration()
        .build()
        .expect("validator");

    let none = RawJwt::builder()
        .without_expiration()
        .build()
        .expect("claims");
    assert!(default_validator.validate(&none).is_ok());

    let jwt_typ = RawJwt::builder()
        .type_header("JWT")
        .without_expiration()
        .build()
        .expect("claims");
    assert!(default_validator.validate(&jwt_typ).is_ok());

    let custom_typ = RawJwt::builder()
        .type_header("at+jwt")
        .without_expiration()
        .build()
        .expect("claims");
    assert_claims_error(
        default_validator.validate(&custom_typ),
        "unexpected type header",
    );

    let ignoring = Validator::builder()
        .ignore_type_header()
        .allow_missing_expiration()
        .build()
        .expect("validator");
    assert!(ignoring.validate(&custom_typ).is_ok());

    let expecting = Validator::builder()
        .expect_type_header("at+jwt")
        .allow_missing_expiration()
        .build()
        .expect("validator");
    assert!(expecting.validate(&custom_typ).is_ok());
    assert_claims_error(expecting.validate(&none), "missing type header");
    assert_claims_error(expecting.validate(&jwt_typ), "wrong type header");
}

#[test]
fn test_audience_rules() {
    let with_audience = RawJwt::builder()
        .add_audience("one")
        .add_audience("two")
        .without_expiration()
        .build()
        .expect("claims");
    let without_audience = RawJwt::builder()
        .without_expiration()
        .build()
        .expect("claims");

    let expecting = Validator::builder()
        .expect_audience("two")
        .allow_missing_expiration()
        .build()
        .expect("validator");
    assert!(expecting.validate(&with_audience).is_ok());
    assert_claims_error(expecting.validate(&without_audience), "missing audience");

    let expecting_other = Validator::builder()
        .expect_audience("three")
        .allow_missing_expiration()
        .build()
        .expect("validator");
    assert_claims_error(
        expecting_other.validate(&with_audience),
        "audience not found",
    );

    let unset = Validator::builder()
        .allow_missing_expiration()
        .build()
        .expect("validator");
    assert_claims_error(unset.validate(&with_audience), "unexpected audience");

    let ignoring = Validator::builder()
        .ignore_audiences()
        .allow_missing_expiration()
        .build()
        .expect("validator");
    assert!(ignoring.validate(&with_audience).is_ok());
}

#[test]
fn test_temporal_window_with_clock_skew() {
    let raw = RawJwt::builder()
        .not_before(ts(1_000))
        .expires_at(ts(2_000))
        .build()
        .expect("claims");

    let at = |now: i64, skew: i64| {
        Validator::builder()
            .fixed_now(ts(now))
            .clock_skew(Duration::seconds(skew))
            .build()
            .expect("validator")
            .validate(&raw)
    };

    // without skew the window is [nbf, exp)
    assert_claims_error(at(999, 0), "not yet valid");
    assert!(at(1_000, 0).is_ok());
    assert!(at(1_999, 0).is_ok());
    assert_claims_error(at(2_000, 0), "expired");

    // skew widens the window on both sides
    assert!(at(900, 100).is_ok());
    assert_claims_error(at(899, 100), "not yet valid");
    assert!(at(2_099, 100).is_ok());
    assert_claims_error(at(2_100, 100), "expired");
}

#[test]
fn test_missing_expiration_requires_opt_in() {
    let raw = RawJwt::builder()
        .without_expiration()
        .build()
        .expect("claims");

    let strict = Validator::builder().build().expect("validator");
    assert_claims_error(strict.validate(&raw), "no expiration");

    let relaxed = Validator::builder()
        .allow_missing_expiration()
        .build()
        .expect("validator");
    assert!(relaxed.validate(&raw).is_ok());
}

#[test]
fn test_issued_in_the_past_is_opt_in() {
    let validator = Validator::builder()
        .expect_issued_in_the_past()
        .allow_missing_expiration()
        .fixed_now(ts(1_000))
        .build()
        .expect("validator");

    let past = RawJwt::builder()
        .issued_at(ts(900))
        .without_expiration()
        .build()
        .expect("claims");
    assert!(validator.validate(&past).is_ok());

    let future = RawJwt::builder()
        .issued_at(ts(1_100))
        .without_expiration()
        .build()
        .expect("claims");
    assert_claims_error(validator.validate(&future), "issued in the future");

    let missing = RawJwt::builder()
        .without_expiration()
        .build()
        .expect("claims");
    assert_claims_error(validator.validate(&missing), "no issued-at");

    // without the opt-in, a future iat passes
    let lenient = Validator::builder()
        .allow_missing_expiration()
        .fixed_now(ts(1_000))
        .build()
        .expect("validator");
    assert!(lenient.validate(&future).is_ok());
}

#[test]
fn test_builder_conflicts_are_rejected() {
    assert!(
        Validator::builder()
            .expect_type_header("JWT")
            .ignore_type_header()
            .build()
            .is_err()
    );
    assert!(
        Validator::builder()
            .expect_audience("audience")
            .ignore_audiences()
            .build()
            .is_err()
    );
}

#[test]
fn test_clock_skew_is_capped_at_ten_minutes() {
    assert!(
        Validator::builder()
            .clock_skew(Duration::seconds(600))
            .build()
            .is_ok()
    );
    assert!(
        Validator::builder()
            .clock_skew(Duration::seconds(601))
            .build()
            .is_err()
    );
}
