//! Key-set fetcher interface used by the token verifier.
use async_trait::async_trait;
use thiserror::Error;

use super::types::Jwks;

/// Failures while retrieving the signing key set.
///
/// Note:
/// - These are not auth failures. An unreachable issuer or an unreadable key set
///   means the service itself can't verify anything, so callers surface them as
///   server errors.
#[derive(Debug, Error)]
pub enum JwksError {
    #[error("jwks transport error: {0}")]
    Transport(String),
    #[error("jwks endpoint returned status {0}")]
    Status(u16),
    #[error("jwks decode error: {0}")]
    Decode(String),
}

/// Source of the issuer's published signing keys.
///
/// The verifier calls `fetch` on every verification; implementations decide
/// nothing about caching.
#[async_trait]
pub trait JwksFetcher: Send + Sync + 'static {
    // Where the keys come from (for logging).
    fn source(&self) -> &str;

    async fn fetch(&self) -> Result<Jwks, JwksError>;
}
