//! Remote signing-key set (JWKS) retrieval.
pub mod client;
pub mod http;
pub mod types;

pub use client::{JwksError, JwksFetcher};
pub use http::HttpJwksFetcher;
pub use types::{Jwk, Jwks};
