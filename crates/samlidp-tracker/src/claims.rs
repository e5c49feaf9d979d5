//! Token claims for tracked requests.

use samlidp_core::TrackedRequest;
use serde::{Deserialize, Deserializer, Serialize};

/// The registered JWT claims wrapping every tracked request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// Intended recipients. Always written as an array; a bare string is
    /// accepted on input.
    #[serde(rename = "aud", deserialize_with = "one_or_many")]
    pub audience: Vec<String>,

    /// Expiration time (seconds since the epoch).
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Issued at.
    #[serde(rename = "iat")]
    pub issued_at: i64,

    #[serde(rename = "iss")]
    pub issuer: String,

    /// Not valid before.
    #[serde(rename = "nbf")]
    pub not_before: i64,

    /// The tracked request index.
    #[serde(rename = "sub")]
    pub subject: String,
}

/// Full claim set of a tracked-request token.
///
/// The registered envelope and the request payload share one flat JSON
/// object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRequestClaims {
    #[serde(flatten)]
    pub registered: RegisteredClaims,

    #[serde(flatten)]
    pub request: TrackedRequest,

    /// Marks the token as belonging to the SAML authentication flow so a
    /// JWT minted for another purpose with the same key is refused.
    #[serde(rename = "saml-authn-request", default)]
    pub saml_authn_request: bool,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims() -> TrackedRequestClaims {
        TrackedRequestClaims {
            registered: RegisteredClaims {
                audience: vec!["https://sp.example.com/saml".into()],
                expires_at: 1_700_000_090,
                issued_at: 1_700_000_000,
                issuer: "https://sp.example.com/saml".into(),
                not_before: 1_700_000_000,
                subject: "idx-1".into(),
            },
            request: TrackedRequest::new("idx-1", "id-abc", "/app"),
            saml_authn_request: true,
        }
    }

    #[test]
    fn test_claims_are_flat() {
        let value = serde_json::to_value(claims()).unwrap();
        assert_eq!(
            value,
            json!({
                "aud": ["https://sp.example.com/saml"],
                "exp": 1_700_000_090,
                "iat": 1_700_000_000,
                "iss": "https://sp.example.com/saml",
                "nbf": 1_700_000_000,
                "sub": "idx-1",
                "index": "idx-1",
                "id": "id-abc",
                "uri": "/app",
                "saml-authn-request": true,
            })
        );
    }

    #[test]
    fn test_single_string_audience() {
        let mut value = serde_json::to_value(claims()).unwrap();
        value["aud"] = json!("https://sp.example.com/saml");

        let parsed: TrackedRequestClaims = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.registered.audience, vec!["https://sp.example.com/saml"]);
    }

    #[test]
    fn test_missing_marker_defaults_to_false() {
        let mut value = serde_json::to_value(claims()).unwrap();
        value.as_object_mut().unwrap().remove("saml-authn-request");

        let parsed: TrackedRequestClaims = serde_json::from_value(value).unwrap();
        assert!(!parsed.saml_authn_request);
    }
}
