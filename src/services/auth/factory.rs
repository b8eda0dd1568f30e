//! Factory: build `AuthService` from application `AuthConfig`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::services::auth::AuthService;
use crate::services::auth::jwks::HttpJwksFetcher;

pub fn build_auth_service(config: &AuthConfig) -> Result<Arc<AuthService>, AppError> {
    let url = config.jwks_url().map_err(|e| {
        tracing::error!(error = %e, "invalid jwks url");
        AppError::Internal
    })?;

    let fetcher = HttpJwksFetcher::new(url, config.jwks_timeout).map_err(|e| {
        tracing::error!(error = %e, "failed to build jwks client");
        AppError::Internal
    })?;

    Ok(Arc::new(AuthService::new(config, Arc::new(fetcher))))
}
