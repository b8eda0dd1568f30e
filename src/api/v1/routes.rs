/*
 * Responsibility
 * - URL structure of the drinks API
 * - Which permission guards which method (requires_auth per method router)
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::v1::handlers::{
    drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
    health::health,
};
use crate::middleware::auth::requires_auth;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/drinks",
            get(list_drinks).merge(requires_auth(post(create_drink), state, "post:drinks")),
        )
        .route(
            "/drinks-detail",
            requires_auth(get(list_drinks_detail), state, "get:drinks-detail"),
        )
        .route(
            "/drinks/{id}",
            requires_auth(patch(update_drink), state, "patch:drinks").merge(requires_auth(
                delete(delete_drink),
                state,
                "delete:drinks",
            )),
        )
}
