use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::services::auth::jwks::client::{JwksError, JwksFetcher};
use crate::services::auth::jwks::types::Jwks;

/// Fetches the key set over HTTPS on every call.
///
/// The client carries a hard timeout; a timed-out fetch is reported like any
/// other transport failure.
#[derive(Clone, Debug)]
pub struct HttpJwksFetcher {
    client: Client,
    url: Url,
}

impl HttpJwksFetcher {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, JwksError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JwksError::Transport(e.to_string()))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl JwksFetcher for HttpJwksFetcher {
    fn source(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch(&self) -> Result<Jwks, JwksError> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| JwksError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(JwksError::Status(resp.status().as_u16()));
        }

        resp.json::<Jwks>()
            .await
            .map_err(|e| JwksError::Decode(e.to_string()))
    }
}
