use serde::{Deserialize, Serialize};

/// One public key record of a JSON Web Key Set.
///
/// Only `kty` is mandatory here; issuers may publish non-RSA keys next to the
/// RSA ones, and those must not break parsing of the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    #[serde(default)]
    pub kid: Option<String>,
    pub kty: String,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    // RSA modulus / exponent (base64url, no padding)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

impl Jwk {
    /// `(n, e)` when this is a usable RSA record.
    pub fn rsa_components(&self) -> Option<(&str, &str)> {
        if self.kty != "RSA" {
            return None;
        }
        Some((self.n.as_deref()?, self.e.as_deref()?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

impl Jwks {
    /// First record whose `kid` matches.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTH0_STYLE: &str = r#"{
        "keys": [
            {"alg": "RS256", "kty": "RSA", "use": "sig", "n": "n-one", "e": "AQAB",
             "kid": "first", "x5t": "ignored", "x5c": ["ignored"]},
            {"kty": "EC", "crv": "P-256", "x": "x", "y": "y", "kid": "ec-key"},
            {"alg": "RS256", "kty": "RSA", "use": "sig", "n": "n-two", "e": "AQAB", "kid": "second"}
        ]
    }"#;

    #[test]
    fn parses_mixed_key_set() {
        let jwks: Jwks = serde_json::from_str(AUTH0_STYLE).unwrap();
        assert_eq!(jwks.keys.len(), 3);
        assert_eq!(jwks.keys[0].key_use.as_deref(), Some("sig"));
    }

    #[test]
    fn find_matches_by_kid() {
        let jwks: Jwks = serde_json::from_str(AUTH0_STYLE).unwrap();

        let key = jwks.find("second").unwrap();
        assert_eq!(key.rsa_components(), Some(("n-two", "AQAB")));
        assert!(jwks.find("missing").is_none());
    }

    #[test]
    fn non_rsa_record_has_no_rsa_components() {
        let jwks: Jwks = serde_json::from_str(AUTH0_STYLE).unwrap();
        assert_eq!(jwks.find("ec-key").unwrap().rsa_components(), None);
    }

    #[test]
    fn first_match_wins_for_duplicate_kids() {
        let jwks = Jwks {
            keys: vec![
                Jwk {
                    kid: Some("dup".into()),
                    kty: "RSA".into(),
                    key_use: None,
                    alg: None,
                    n: Some("first".into()),
                    e: Some("AQAB".into()),
                },
                Jwk {
                    kid: Some("dup".into()),
                    kty: "RSA".into(),
                    key_use: None,
                    alg: None,
                    n: Some("second".into()),
                    e: Some("AQAB".into()),
                },
            ],
        };

        assert_eq!(jwks.find("dup").unwrap().n.as_deref(), Some("first"));
    }
}
