//! `Authorization: Bearer <token>` header parsing.
use axum::http::{HeaderMap, header};

use crate::services::auth::error::{AuthError, MalformedHeader};

/// Pull the raw bearer token out of the request headers.
///
/// The header value is split on whitespace; the scheme must be `Bearer`
/// (any case) and exactly one token must follow it.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?;

    // Non-visible-ASCII bytes can't be a compact JWT anyway.
    let value = value
        .to_str()
        .map_err(|_| AuthError::MalformedHeader(MalformedHeader::NotBearerToken))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::MissingAuthHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidHeaderScheme);
    }

    let token = parts
        .next()
        .ok_or(AuthError::MalformedHeader(MalformedHeader::MissingToken))?;
    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader(MalformedHeader::NotBearerToken));
    }

    Ok(token)
}
