use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::services::auth::bearer::bearer_token;
use crate::services::auth::error::{AuthError, InvalidHeader};
use crate::services::auth::jwks::{Jwk, JwksFetcher};
use crate::services::auth::permissions::check_permissions;

/// Verified access token payload.
///
/// NOTE:
/// - Only ever produced by `AuthService::verify`, after signature and claim checks.
/// - `aud` may be a string or an array; jsonwebtoken validates it via `Validation::set_audience`.
/// - `iss`/`aud`/`exp` default when absent so that jsonwebtoken reports the missing
///   claim instead of a deserialization failure.
/// - `exp` is any JSON number (RFC 7519 NumericDate allows fractions); jsonwebtoken
///   decides whether it has passed.
/// - `permissions` is kept raw; `check_permissions` decides what counts as a grant.
/// - Every other claim is kept as-is in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub aud: serde_json::Value,
    #[serde(default)]
    pub exp: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.exp.as_f64()?;
        DateTime::from_timestamp(secs.floor() as i64, 0)
    }
}

/// RS*/PS* access-token verifier backed by the issuer's published key set.
///
/// - The key set is fetched again for every token (no cache).
/// - Holds no mutable state; clones share the fetcher.
#[derive(Clone)]
pub struct AuthService {
    fetcher: Arc<dyn JwksFetcher>,
    validation: Validation,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("jwks", &self.fetcher.source())
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(config: &AuthConfig, fetcher: Arc<dyn JwksFetcher>) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = config.algorithms.clone();
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = config.leeway_seconds;

        Self {
            fetcher,
            validation,
        }
    }

    /// Verify a raw token against the issuer's current key set.
    ///
    /// Errors:
    /// - `AppError::KeySet` when the key set can't be fetched (server-side problem)
    /// - `AppError::Auth` for everything wrong with the token itself
    pub async fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let jwks = self.fetcher.fetch().await.map_err(|err| {
            tracing::error!(
                error = %err,
                jwks = self.fetcher.source(),
                "failed to fetch signing keys"
            );
            AppError::KeySet(err)
        })?;

        let header = jsonwebtoken::decode_header(token)
            .map_err(|_| AuthError::InvalidHeader(InvalidHeader::Unparseable))?;
        let kid = header
            .kid
            .ok_or(AuthError::InvalidHeader(InvalidHeader::MissingKeyId))?;

        let jwk = jwks
            .find(&kid)
            .ok_or(AuthError::InvalidHeader(InvalidHeader::KeyNotFound))?;
        let key = decoding_key(jwk)?;

        let data = jsonwebtoken::decode::<Claims>(token, &key, &self.validation)
            .map_err(|err| self.classify_decode_error(token, err))?;

        Ok(data.claims)
    }

    fn classify_decode_error(&self, token: &str, err: jsonwebtoken::errors::Error) -> AuthError {
        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            // jsonwebtoken only reads non-negative `exp` values; anything else lands here.
            ErrorKind::MissingRequiredClaim(claim) | ErrorKind::InvalidClaimFormat(claim)
                if claim == "exp" && self.exp_has_passed(token) =>
            {
                AuthError::TokenExpired
            }
            ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::InvalidClaimFormat(_) => AuthError::InvalidClaims,
            _ => {
                tracing::debug!(error = %err, "token rejected");
                AuthError::InvalidHeader(InvalidHeader::Unparseable)
            }
        }
    }

    // Claim errors are raised after the signature check, so the payload is authentic here.
    fn exp_has_passed(&self, token: &str) -> bool {
        let now = Utc::now().timestamp() as f64;
        let leeway = self.validation.leeway as f64;

        jsonwebtoken::dangerous::insecure_decode::<Claims>(token)
            .ok()
            .and_then(|data| data.claims.exp.as_f64())
            .is_some_and(|exp| exp < now - leeway)
    }

    /// Full authorization chain for one request:
    /// bearer header -> token verification -> permission check.
    ///
    /// Short-circuits on the first failure and returns it unchanged.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        permission: &str,
    ) -> Result<Claims, AppError> {
        let token = bearer_token(headers)?;
        let claims = self.verify(token).await?;
        check_permissions(permission, &claims)?;

        Ok(claims)
    }
}

fn decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    let (n, e) = jwk
        .rsa_components()
        .ok_or(AuthError::InvalidHeader(InvalidHeader::Unparseable))?;

    DecodingKey::from_rsa_components(n, e)
        .map_err(|_| AuthError::InvalidHeader(InvalidHeader::Unparseable))
}
