//! Error types for the tracker crate.

use jsonwebtoken::Algorithm;
use samlidp_core::ConfigError;
use thiserror::Error;

/// Errors that can occur during tracked-request token operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Failed to sign a token.
    #[error("failed to encode tracked request: {0}")]
    Encoding(String),

    /// The token was rejected.
    #[error("failed to decode tracked request: {0}")]
    Decoding(#[from] DecodingError),

    /// Failed to parse or convert key material.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Failed to generate a keypair.
    #[error("failed to generate keypair: {0}")]
    KeyGenerationFailed(String),

    /// The configured algorithm cannot be used with an RSA key.
    #[error("unsupported signing algorithm: {0:?}")]
    UnsupportedAlgorithm(Algorithm),

    /// Invalid configuration.
    #[error("invalid tracker configuration: {0}")]
    Config(#[from] ConfigError),

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Why a token was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodingError {
    /// The token is not a well-formed JWT with the expected claims.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token declares an algorithm other than the configured one.
    #[error("expected algorithm {expected:?}, token declares {found:?}")]
    AlgorithmMismatch { expected: Algorithm, found: String },

    /// The signature does not verify.
    #[error("invalid signature")]
    InvalidSignature,

    /// The token has expired.
    #[error("token expired at {expired_at}")]
    Expired { expired_at: i64 },

    /// The token is not valid yet.
    #[error("token not valid before {not_before}")]
    NotYetValid { not_before: i64 },

    /// The configured audience is not among the token's audiences.
    #[error("expected audience {expected:?}")]
    InvalidAudience { expected: String },

    /// The token was issued by someone else.
    #[error("expected issuer {expected:?}")]
    InvalidIssuer { expected: String },

    /// The token lacks the `saml-authn-request` marker.
    #[error("expected saml-authn-request")]
    NotAuthnRequest,
}

impl DecodingError {
    pub(crate) fn from_jwt(
        err: jsonwebtoken::errors::Error,
        audience: &str,
        issuer: &str,
    ) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => DecodingError::InvalidSignature,
            ErrorKind::InvalidAudience => DecodingError::InvalidAudience {
                expected: audience.to_string(),
            },
            ErrorKind::InvalidIssuer => DecodingError::InvalidIssuer {
                expected: issuer.to_string(),
            },
            ErrorKind::MissingRequiredClaim(claim) => {
                DecodingError::Malformed(format!("missing required claim: {claim}"))
            }
            _ => DecodingError::Malformed(err.to_string()),
        }
    }
}
