//! Encoding and decoding of tracked requests as signed tokens.

use crate::claims::{RegisteredClaims, TrackedRequestClaims};
use crate::clock::{Clock, SystemClock};
use crate::error::{DecodingError, TrackerError};
use crate::keys::KeyPair;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, Header, Validation};
use samlidp_core::config::{ConfigError, TrackerConfigFile};
use samlidp_core::TrackedRequest;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Default token lifetime, the longest an AuthnRequest may be outstanding.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(90);

/// Default tolerance for a `nbf` set by a clock running ahead of ours.
pub const DEFAULT_NOT_BEFORE_LEEWAY: Duration = Duration::from_secs(30);

/// Default tolerance after `exp`.
pub const DEFAULT_EXPIRY_LEEWAY: Duration = Duration::ZERO;

/// Encodes tracked requests to strings and back.
pub trait TrackedRequestCodec: Send + Sync {
    /// Encode a tracked request into a signed token.
    fn encode(&self, request: &TrackedRequest) -> Result<String, TrackerError>;

    /// Verify a token and return the tracked request it carries.
    fn decode(&self, token: &str) -> Result<TrackedRequest, TrackerError>;
}

/// Configuration fixed at codec construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// The only algorithm tokens are signed with and accepted under.
    pub algorithm: Algorithm,
    pub audience: String,
    pub issuer: String,
    /// Token lifetime.
    pub max_age: Duration,
    /// Accept tokens whose `nbf` is at most this far in the future.
    pub not_before_leeway: Duration,
    /// Accept tokens at most this long after `exp`.
    pub expiry_leeway: Duration,
}

impl TrackerConfig {
    pub fn new(audience: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            algorithm: Algorithm::RS256,
            audience: audience.into(),
            issuer: issuer.into(),
            max_age: DEFAULT_MAX_AGE,
            not_before_leeway: DEFAULT_NOT_BEFORE_LEEWAY,
            expiry_leeway: DEFAULT_EXPIRY_LEEWAY,
        }
    }

    /// Configuration for a service provider at `url`, which is both the
    /// audience and the issuer of its own tracked-request tokens.
    pub fn for_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::new(url.clone(), url)
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_not_before_leeway(mut self, leeway: Duration) -> Self {
        self.not_before_leeway = leeway;
        self
    }

    pub fn with_expiry_leeway(mut self, leeway: Duration) -> Self {
        self.expiry_leeway = leeway;
        self
    }

    /// Build from the `[tracker]` section of the configuration file.
    pub fn from_file(file: &TrackerConfigFile) -> Result<Self, TrackerError> {
        let audience = file
            .audience()
            .ok_or(ConfigError::Missing("tracker.audience or tracker.url"))?;
        let issuer = file
            .issuer()
            .ok_or(ConfigError::Missing("tracker.issuer or tracker.url"))?;

        Ok(Self::new(audience, issuer)
            .with_max_age(file.max_age()?)
            .with_not_before_leeway(file.not_before_leeway()?)
            .with_expiry_leeway(file.expiry_leeway()?))
    }
}

/// Encodes tracked requests as RSA-signed JWTs.
#[derive(Debug, Clone)]
pub struct JwtTrackedRequestCodec {
    config: TrackerConfig,
    keypair: KeyPair,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtTrackedRequestCodec {
    /// Create a codec using the system clock.
    pub fn new(config: TrackerConfig, keypair: KeyPair) -> Result<Self, TrackerError> {
        if !is_rsa(config.algorithm) {
            return Err(TrackerError::UnsupportedAlgorithm(config.algorithm));
        }

        let mut validation = Validation::new(config.algorithm);
        validation.algorithms = vec![config.algorithm];
        validation.set_audience(&[&config.audience]);
        validation.set_issuer(&[&config.issuer]);
        // `iat` is not a claim jsonwebtoken can require; `RegisteredClaims`
        // has no default for it, so a token without one fails to parse.
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "aud", "iss"]);
        // Time-based checks run against our own clock after verification.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Ok(Self {
            config,
            keypair,
            validation,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used for issuing and validating tokens.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    fn verify(&self, token: &str) -> Result<TrackedRequestClaims, DecodingError> {
        let declared = declared_algorithm(token)?;
        match declared.parse::<Algorithm>() {
            Ok(algorithm) if algorithm == self.config.algorithm => {}
            _ => {
                return Err(DecodingError::AlgorithmMismatch {
                    expected: self.config.algorithm,
                    found: declared,
                });
            }
        }

        let claims = jsonwebtoken::decode::<TrackedRequestClaims>(
            token,
            self.keypair.decoding_key(),
            &self.validation,
        )
        .map_err(|e| DecodingError::from_jwt(e, &self.config.audience, &self.config.issuer))?
        .claims;

        let now = self.clock.now().timestamp();
        let registered = &claims.registered;
        if now > registered.expires_at.saturating_add(seconds(self.config.expiry_leeway)) {
            return Err(DecodingError::Expired {
                expired_at: registered.expires_at,
            });
        }
        if now.saturating_add(seconds(self.config.not_before_leeway)) < registered.not_before {
            return Err(DecodingError::NotYetValid {
                not_before: registered.not_before,
            });
        }
        if !claims.saml_authn_request {
            return Err(DecodingError::NotAuthnRequest);
        }

        Ok(claims)
    }
}

impl TrackedRequestCodec for JwtTrackedRequestCodec {
    fn encode(&self, request: &TrackedRequest) -> Result<String, TrackerError> {
        let now = self.clock.now();
        let max_age = chrono::Duration::from_std(self.config.max_age)
            .map_err(|e| TrackerError::Encoding(e.to_string()))?;
        let expires_at = now
            .checked_add_signed(max_age)
            .ok_or_else(|| TrackerError::Encoding("max_age overflows the token expiry".into()))?;

        let claims = TrackedRequestClaims {
            registered: RegisteredClaims {
                audience: vec![self.config.audience.clone()],
                expires_at: expires_at.timestamp(),
                issued_at: now.timestamp(),
                issuer: self.config.issuer.clone(),
                not_before: now.timestamp(),
                subject: request.index.clone(),
            },
            request: request.clone(),
            saml_authn_request: true,
        };

        jsonwebtoken::encode(
            &Header::new(self.config.algorithm),
            &claims,
            self.keypair.encoding_key(),
        )
        .map_err(|e| TrackerError::Encoding(e.to_string()))
    }

    fn decode(&self, token: &str) -> Result<TrackedRequest, TrackerError> {
        let claims = self.verify(token).map_err(|err| {
            tracing::debug!(error = %err, "Rejected tracked request token");
            TrackerError::Decoding(err)
        })?;

        // The signed subject is the identity; the payload index is cargo.
        let mut request = claims.request;
        request.index = claims.registered.subject;
        Ok(request)
    }
}

fn is_rsa(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    )
}

fn seconds(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}

/// The `alg` a token declares, read before anything else in it is trusted.
fn declared_algorithm(token: &str) -> Result<String, DecodingError> {
    #[derive(Deserialize)]
    struct RawHeader {
        alg: String,
    }

    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodingError::Malformed(
            "expected three dot-separated segments".into(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| DecodingError::Malformed(format!("invalid header encoding: {e}")))?;
    let header: RawHeader = serde_json::from_slice(&bytes)
        .map_err(|e| DecodingError::Malformed(format!("invalid header: {e}")))?;

    Ok(header.alg)
}
