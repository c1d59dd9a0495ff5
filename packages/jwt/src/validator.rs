//! Validation policy applied to decoded claim sets.
//!
//! A [`Validator`] is built once, is immutable, and may be reused across
//! any number of verifications. It runs only after the cryptographic check
//! has already accepted a token.

use chrono::{DateTime, Duration, Utc};

use crate::claims::RawJwt;
use crate::error::{JwtError, JwtResult};

const MAX_CLOCK_SKEW_SECONDS: i64 = 600;

/// Policy over decoded claims plus a clock source.
#[derive(Debug, Clone)]
pub struct Validator {
    expected_type_header: Option<String>,
    expected_issuer: Option<String>,
    expected_subject: Option<String>,
    expected_audience: Option<String>,
    ignore_type_header: bool,
    ignore_audiences: bool,
    allow_missing_expiration: bool,
    expect_issued_in_the_past: bool,
    clock_skew: Duration,
    fixed_now: Option<DateTime<Utc>>,
}

impl Validator {
    /// Start building a validator.
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Apply the policy to a decoded claim set.
    ///
    /// # Errors
    /// `JwtError::InvalidClaims` with a short diagnostic message on the
    /// first failing check.
    pub fn validate(&self, raw: &RawJwt) -> JwtResult<()> {
        self.check_type_header(raw)?;
        self.check_issuer(raw)?;
        self.check_subject(raw)?;
        self.check_audiences(raw)?;
        self.check_timestamps(raw)
    }

    fn check_type_header(&self, raw: &RawJwt) -> JwtResult<()> {
        if let Some(expected) = &self.expected_type_header {
            return match raw.type_header() {
                None => Err(JwtError::invalid_claims("missing type header")),
                Some(typ) if typ != expected => {
                    Err(JwtError::invalid_claims("wrong type header"))
                }
                Some(_) => Ok(()),
            };
        }
        if self.ignore_type_header {
            return Ok(());
        }
        // With no expectation, only the conventional value is accepted.
        match raw.type_header() {
            None | Some("JWT") => Ok(()),
            Some(_) => Err(JwtError::invalid_claims("unexpected type header")),
        }
    }

    fn check_issuer(&self, raw: &RawJwt) -> JwtResult<()> {
        let Some(expected) = &self.expected_issuer else {
            return Ok(());
        };
        match raw.issuer() {
            None => Err(JwtError::invalid_claims("missing issuer")),
            Some(issuer) if issuer != expected => Err(JwtError::invalid_claims("wrong issuer")),
            Some(_) => Ok(()),
        }
    }

    fn check_subject(&self, raw: &RawJwt) -> JwtResult<()> {
        let Some(expected) = &self.expected_subject else {
            return Ok(());
        };
        match raw.subject() {
            None => Err(JwtError::invalid_claims("missing subject")),
            Some(subject) if subject != expected => {
                Err(JwtError::invalid_claims("wrong subject"))
            }
            Some(_) => Ok(()),
        }
    }

    fn check_audiences(&self, raw: &RawJwt) -> JwtResult<()> {
        if let Some(expected) = &self.expected_audience {
            let Some(audiences) = raw.audiences() else {
                return Err(JwtError::invalid_claims("missing audience"));
            };
            if !audiences.contains(&expected.as_str()) {
                return Err(JwtError::invalid_claims("audience not found"));
            }
            return Ok(());
        }
        if !self.ignore_audiences && raw.audiences().is_some() {
            return Err(JwtError::invalid_claims("unexpected audience"));
        }
        Ok(())
    }

    fn check_timestamps(&self, raw: &RawJwt) -> JwtResult<()> {
        let now = self.fixed_now.unwrap_or_else(Utc::now);
        let skew = self.clock_skew;
        match raw.expiration() {
            Some(expiration) => {
                if now >= expiration + skew {
                    return Err(JwtError::invalid_claims("expired"));
                }
            }
            None => {
                if !self.allow_missing_expiration {
                    return Err(JwtError::invalid_claims("no expiration"));
                }
            }
        }
        if let Some(not_before) = raw.not_before()
            && now + skew < not_before
        {
            return Err(JwtError::invalid_claims("not yet valid"));
        }
        if self.expect_issued_in_the_past {
            let Some(issued_at) = raw.issued_at() else {
                return Err(JwtError::invalid_claims("no issued-at"));
            };
            if issued_at > now + skew {
                return Err(JwtError::invalid_claims("issued in the future"));
            }
        }
        Ok(())
    }
}

/// Chainable builder for [`Validator`].
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    expected_type_header: Option<String>,
    expected_issuer: Option<String>,
    expected_subject: Option<String>,
    expected_audience: Option<String>,
    ignore_type_header: bool,
    ignore_audiences: bool,
    allow_missing_expiration: bool,
    expect_issued_in_the_past: bool,
    clock_skew: Option<Duration>,
    fixed_now: Option<DateTime<Utc>>,
}

impl ValidatorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the token header to carry exactly this `typ` value.
    #[must_use]
    pub fn expect_type_header(mut self, type_header: impl Into<String>) -> Self {
        self.expected_type_header = Some(type_header.into());
        self
    }

    /// Require the `iss` claim to be present and equal.
    #[must_use]
    pub fn expect_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Require the `sub` claim to be present and equal.
    #[must_use]
    pub fn expect_subject(mut self, subject: impl Into<String>) -> Self {
        self.expected_subject = Some(subject.into());
        self
    }

    /// Require the `aud` claim to contain this audience.
    #[must_use]
    pub fn expect_audience(mut self, audience: impl Into<String>) -> Self {
        self.expected_audience = Some(audience.into());
        self
    }

    /// Accept any `typ` header value.
    #[must_use]
    pub fn ignore_type_header(mut self) -> Self {
        self.ignore_type_header = true;
        self
    }

    /// Accept an `aud` claim without expecting a particular audience.
    #[must_use]
    pub fn ignore_audiences(mut self) -> Self {
        self.ignore_audiences = true;
        self
    }

    /// Accept tokens that carry no `exp` claim.
    #[must_use]
    pub fn allow_missing_expiration(mut self) -> Self {
        self.allow_missing_expiration = true;
        self
    }

    /// Require an `iat` claim that does not lie in the future.
    #[must_use]
    pub fn expect_issued_in_the_past(mut self) -> Self {
        self.expect_issued_in_the_past = true;
        self
    }

    /// Tolerance for clock drift in all temporal checks. At most 600
    /// seconds; defaults to zero.
    #[must_use]
    pub fn clock_skew(mut self, skew: Duration) -> Self {
        self.clock_skew = Some(skew);
        self
    }

    /// Evaluate temporal checks against this instant instead of the wall
    /// clock.
    #[must_use]
    pub fn fixed_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    /// Build the validator.
    ///
    /// # Errors
    /// Rejects contradictory expect/ignore combinations and clock skews
    /// above the ceiling.
    pub fn build(self) -> JwtResult<Validator> {
        if self.expected_type_header.is_some() && self.ignore_type_header {
            return Err(JwtError::invalid_claims(
                "expect_type_header() and ignore_type_header() cannot be used together",
            ));
        }
        if self.expected_audience.is_some() && self.ignore_audiences {
            return Err(JwtError::invalid_claims(
                "expect_audience() and ignore_audiences() cannot be used together",
            ));
        }
        let clock_skew = self.clock_skew.unwrap_or_else(Duration::zero);
        if clock_skew > Duration::seconds(MAX_CLOCK_SKEW_SECONDS) {
            return Err(JwtError::invalid_claims(
                "clock skew too large, max is 10 minutes",
            ));
        }
        Ok(Validator {
            expected_type_header: self.expected_type_header,
            expected_issuer: self.expected_issuer,
            expected_subject: self.expected_subject,
            expected_audience: self.expected_audience,
            ignore_type_header: self.ignore_type_header,
            ignore_audiences: self.ignore_audiences,
            allow_missing_expiration: self.allow_missing_expiration,
            expect_issued_in_the_past: self.expect_issued_in_the_past,
            clock_skew,
            fixed_now: self.fixed_now,
        })
    }
}
