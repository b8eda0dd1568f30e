use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::{AuthError, Claims};

/// Extractor handing the verified claims to a protected handler.
///
/// The `requires_auth` route layer inserts `Claims` into request extensions
/// after the full check. A handler mounted without that layer never sees
/// claims and the request is rejected like an unauthenticated one.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or(AppError::Auth(AuthError::MissingAuthHeader))
    }
}
