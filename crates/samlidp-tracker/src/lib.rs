//! # samlidp-tracker
//!
//! Tracked requests carried as signed tokens instead of server-side state.
//!
//! A [`TrackedRequest`](samlidp_core::TrackedRequest) is wrapped in a JWT
//! whose registered claims (audience, issuer, expiry, subject) come from the
//! codec's configuration and clock, never from the request itself. The
//! token is signed with an RSA key and only ever verified against the single
//! configured algorithm.
//!
//! ## Token layout
//!
//! | Claim | Value |
//! |-------|-------|
//! | `aud` | configured audience |
//! | `iss` | configured issuer |
//! | `iat`, `nbf` | encode time |
//! | `exp` | encode time + `max_age` |
//! | `sub` | request index |
//! | `id`, `uri`, `index` | request payload |
//! | `saml-authn-request` | `true` |
//!
//! On decode the verified `sub` replaces whatever index the payload carries.

pub mod claims;
pub mod clock;
pub mod codec;
pub mod error;
pub mod keys;

pub use claims::{RegisteredClaims, TrackedRequestClaims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{JwtTrackedRequestCodec, TrackedRequestCodec, TrackerConfig};
pub use error::{DecodingError, TrackerError};
pub use jsonwebtoken::Algorithm;
pub use keys::KeyPair;
