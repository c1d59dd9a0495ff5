//! JWT error types.

use std::fmt;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Coarse classification of a [`JwtError`].
///
/// Keyset wrappers aggregate per-key failures by kind: a plain signature
/// mismatch (`Unauthenticated`) is swallowed while the next key is tried,
/// anything else is remembered and surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, policy violation, or key parameter out of range.
    InvalidArgument,
    /// MAC or signature did not verify.
    Unauthenticated,
    /// Impossible state.
    Internal,
    /// Operation is not supported.
    Unimplemented,
}

/// JWT error types
#[derive(Debug, Clone)]
pub enum JwtError {
    /// Malformed compact token, header, or kid policy violation
    InvalidToken(String),
    /// Claim set rejected by a validator
    InvalidClaims(String),
    /// MAC or signature mismatch
    SignatureMismatch,
    /// Key error
    InvalidKey(String),
    /// Unsupported algorithm
    UnsupportedAlgorithm(String),
    /// Serialization failed
    Serialization(String),
    /// Internal error
    Internal(String),
    /// Operation not supported
    Unimplemented(&'static str),
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JwtError::InvalidToken(msg) => write!(f, "invalid JWT token: {msg}"),
            JwtError::InvalidClaims(msg) => write!(f, "invalid claims: {msg}"),
            JwtError::SignatureMismatch => write!(f, "JWT signature mismatch"),
            JwtError::InvalidKey(msg) => write!(f, "invalid key: {msg}"),
            JwtError::UnsupportedAlgorithm(alg) => write!(f, "unsupported algorithm: {alg}"),
            JwtError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            JwtError::Internal(msg) => write!(f, "internal error: {msg}"),
            JwtError::Unimplemented(op) => write!(f, "unimplemented: {op}"),
        }
    }
}

impl std::error::Error for JwtError {}

impl JwtError {
    /// Classify this error for keyset aggregation.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            JwtError::SignatureMismatch => ErrorKind::Unauthenticated,
            JwtError::Internal(_) => ErrorKind::Internal,
            JwtError::Unimplemented(_) => ErrorKind::Unimplemented,
            _ => ErrorKind::InvalidArgument,
        }
    }

    /// Create an invalid token error
    #[inline]
    #[must_use]
    pub fn invalid_token(msg: &str) -> Self {
        JwtError::InvalidToken(msg.to_string())
    }

    /// Create an invalid claims error
    #[inline]
    #[must_use]
    pub fn invalid_claims(msg: &str) -> Self {
        JwtError::InvalidClaims(msg.to_string())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        JwtError::InvalidKey(msg.to_string())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        JwtError::Serialization(msg.to_string())
    }

    /// Create an internal error
    #[inline]
    #[must_use]
    pub fn internal(msg: &str) -> Self {
        JwtError::Internal(msg.to_string())
    }
}
