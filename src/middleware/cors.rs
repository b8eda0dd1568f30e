//! CORS policy for the browser frontend.
//!
//! Policy:
//! - Development: any origin, no credentials (the bearer token travels in a header,
//!   never in cookies).
//! - Production: exact-match allowlist from `CORS_ALLOWED_ORIGINS`; an empty list
//!   sends no CORS headers at all.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config.app_env.is_production(), &config.cors_allowed_origins))
}

fn layer(production: bool, allowed_origins: &[String]) -> CorsLayer {
    let cors = if production {
        let allowed: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin),
        ))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    cors.allow_methods([
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static("x-request-id"),
    ])
    .max_age(Duration::from_secs(60 * 10))
}
