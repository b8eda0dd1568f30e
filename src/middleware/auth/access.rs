//! Per-route authorization gate.
//!
//! `requires_auth(route, &state, "post:drinks")` wraps a method router so that
//! every request first goes through:
//! - bearer header extraction
//! - token verification against the issuer's key set
//! - the permission check
//!
//! The first failure is returned as-is. On success the verified `Claims` are
//! put into request extensions, where the `AuthClaims` extractor picks them up.
//! Nothing is cached between requests.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::AuthService;
use crate::state::AppState;

#[derive(Clone)]
struct Gate {
    auth: Arc<AuthService>,
    permission: &'static str,
}

/// Guard `route` with `permission`.
///
/// Example:
/// ```ignore
/// .route("/drinks-detail", requires_auth(get(list_drinks_detail), &state, "get:drinks-detail"))
/// ```
pub fn requires_auth(
    route: MethodRouter<AppState>,
    state: &AppState,
    permission: &'static str,
) -> MethodRouter<AppState> {
    let gate = Gate {
        auth: state.auth.clone(),
        permission,
    };
    // route_layer: unmatched methods still fall through to 405 without auth
    route.route_layer(middleware::from_fn_with_state(gate, authorize))
}

async fn authorize(
    State(gate): State<Gate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match gate.auth.authorize(req.headers(), gate.permission).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = %err,
                permission = gate.permission,
                method = %req.method(),
                path = req.uri().path(),
                "authorization failed"
            );
            return Err(err);
        }
    };

    tracing::debug!(
        sub = ?claims.sub,
        permission = gate.permission,
        expires_at = ?claims.expires_at(),
        "authorized"
    );

    // middleware -> extractor handoff
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
