//! Authentication / authorization failure modes.
//!
//! Each variant maps to a fixed HTTP status and a stable `code` string that
//! clients can match on. The `Display` text is the human-readable description
//! returned as `message`.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingAuthHeader,

    #[error("Authorization header must start with \"Bearer\".")]
    InvalidHeaderScheme,

    #[error("{0}")]
    MalformedHeader(MalformedHeader),

    #[error("{0}")]
    InvalidHeader(InvalidHeader),

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,

    #[error("Permissions not included in JWT.")]
    PermissionsClaimMissing,

    #[error("Permission not found.")]
    PermissionNotFound,
}

/// `Authorization` header present but not of the form `Bearer <token>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedHeader {
    #[error("Token not found.")]
    MissingToken,
    #[error("Authorization header must be bearer token.")]
    NotBearerToken,
}

/// The token itself could not be matched to a key or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidHeader {
    #[error("Authorization malformed.")]
    MissingKeyId,
    #[error("Unable to find the appropriate key.")]
    KeyNotFound,
    #[error("Unable to parse authentication token.")]
    Unparseable,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidHeaderScheme
            | AuthError::MalformedHeader(_)
            | AuthError::InvalidHeader(InvalidHeader::MissingKeyId)
            | AuthError::TokenExpired
            | AuthError::InvalidClaims
            | AuthError::PermissionNotFound => StatusCode::UNAUTHORIZED,
            AuthError::InvalidHeader(InvalidHeader::KeyNotFound | InvalidHeader::Unparseable)
            | AuthError::PermissionsClaimMissing => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "authorization_header_missing",
            AuthError::InvalidHeaderScheme
            | AuthError::MalformedHeader(_)
            | AuthError::InvalidHeader(_) => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::PermissionsClaimMissing => "invalid_claims",
            AuthError::PermissionNotFound => "unauthorized",
        }
    }
}
