mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::Utc;
use serde_json::json;

use drinks_api::app::build_router;
use drinks_api::services::auth::AuthService;
use drinks_api::services::auth::jwks::Jwks;
use drinks_api::state::AppState;
use drinks_api::testutil::{
    self, KEY_A_KID, KEY_A_MODULUS, KEY_A_PRIVATE_PEM, KEY_B_KID, KEY_B_MODULUS,
    KEY_B_PRIVATE_PEM, StaticJwksFetcher,
};

use common::{call, send};

fn with_raw_authorization(value: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri("/drinks-detail")
        .header(header::AUTHORIZATION, value)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn missing_header_is_401_authorization_header_missing() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);

    for (method, uri) in [
        (Method::GET, "/drinks-detail"),
        (Method::POST, "/drinks"),
        (Method::PATCH, "/drinks/1"),
        (Method::DELETE, "/drinks/1"),
    ] {
        let (status, body) = call(&app, method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["code"], "authorization_header_missing");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 401);
    }
}

#[tokio::test]
async fn malformed_headers_are_401_invalid_header() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);

    for (value, message) in [
        ("Basic dXNlcjpwYXNz", "Authorization header must start with \"Bearer\"."),
        ("Bearer", "Token not found."),
        ("Bearer a b", "Authorization header must be bearer token."),
    ] {
        let (status, body) = send(&app, with_raw_authorization(value)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{value}");
        assert_eq!(body["code"], "invalid_header");
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn token_without_kid_is_401() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);
    let token =
        testutil::sign_without_kid(KEY_A_PRIVATE_PEM, &testutil::claims(&["get:drinks-detail"]));

    let (status, body) = call(&app, Method::GET, "/drinks-detail", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authorization malformed.");
}

#[tokio::test]
async fn unknown_kid_is_400() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);
    let token = testutil::sign(
        "not-published",
        KEY_A_PRIVATE_PEM,
        &testutil::claims(&["get:drinks-detail"]),
    );

    let (status, body) = call(&app, Method::GET, "/drinks-detail", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_header");
    assert_eq!(body["message"], "Unable to find the appropriate key.");
}

#[tokio::test]
async fn unparseable_token_is_400() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);

    let (status, body) = call(&app, Method::GET, "/drinks-detail", Some("abc"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unable to parse authentication token.");
}

#[tokio::test]
async fn expired_token_is_401_token_expired() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);

    let mut claims = testutil::claims(&["get:drinks-detail"]);
    claims["exp"] = json!(Utc::now().timestamp() - 60);
    let token = testutil::sign(KEY_A_KID, KEY_A_PRIVATE_PEM, &claims);

    let (status, body) = call(&app, Method::GET, "/drinks-detail", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_expired");
}

#[tokio::test]
async fn decimal_or_negative_past_exp_is_401_token_expired() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);

    for exp in [json!(1.5e9), json!(-5)] {
        let mut claims = testutil::claims(&["get:drinks-detail"]);
        claims["exp"] = exp.clone();
        let token = testutil::sign(KEY_A_KID, KEY_A_PRIVATE_PEM, &claims);

        let (status, body) = call(&app, Method::GET, "/drinks-detail", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "exp {exp}");
        assert_eq!(body["code"], "token_expired");
        assert_eq!(body["message"], "Token expired.");
    }
}

#[tokio::test]
async fn string_permissions_claim_is_a_permission_decision() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);

    let mut claims = testutil::claims(&[]);
    claims["permissions"] = json!("get:drinks-detail");
    let token = testutil::sign(KEY_A_KID, KEY_A_PRIVATE_PEM, &claims);

    let (status, _) = call(&app, Method::GET, "/drinks-detail", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::DELETE, "/drinks/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn wrong_audience_is_401_invalid_claims() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);

    let mut claims = testutil::claims(&["get:drinks-detail"]);
    claims["aud"] = json!("another-api");
    let token = testutil::sign(KEY_A_KID, KEY_A_PRIVATE_PEM, &claims);

    let (status, body) = call(&app, Method::GET, "/drinks-detail", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_claims");
    assert_eq!(
        body["message"],
        "Incorrect claims. Please, check the audience and issuer."
    );
}

#[tokio::test]
async fn missing_permissions_claim_is_400() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);

    let mut claims = testutil::claims(&[]);
    claims.as_object_mut().unwrap().remove("permissions");
    let token = testutil::sign(KEY_A_KID, KEY_A_PRIVATE_PEM, &claims);

    let (status, body) = call(&app, Method::GET, "/drinks-detail", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_claims");
    assert_eq!(body["message"], "Permissions not included in JWT.");
}

#[tokio::test]
async fn missing_permission_is_401_unauthorized() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);
    let token = testutil::token(&["get:drinks-detail"]);

    let (status, body) = call(&app, Method::DELETE, "/drinks/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "Permission not found.");
}

#[tokio::test]
async fn auth_runs_before_body_validation() {
    let (state, _) = testutil::app_state();
    let app = build_router(state);

    // Invalid body, no token: the gate answers first.
    let (status, body) = call(&app, Method::POST, "/drinks", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "authorization_header_missing");
}

#[tokio::test]
async fn unreachable_issuer_is_500() {
    let app = build_router(testutil::app_state_with_unreachable_issuer());
    let token = testutil::token(&["get:drinks-detail"]);

    let (status, body) = call(&app, Method::GET, "/drinks-detail", Some(&token), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "internal_server_error");

    // Public route does not touch the key set.
    let (status, _) = call(&app, Method::GET, "/drinks", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn any_published_key_can_sign() {
    let jwks = Jwks {
        keys: vec![
            testutil::rsa_jwk(KEY_A_KID, KEY_A_MODULUS),
            testutil::rsa_jwk(KEY_B_KID, KEY_B_MODULUS),
        ],
    };
    let auth = AuthService::new(&testutil::auth_config(), Arc::new(StaticJwksFetcher::new(jwks)));
    let (_, repo) = testutil::app_state();
    let app = build_router(AppState::new(repo, Arc::new(auth)));

    let token = testutil::sign(
        KEY_B_KID,
        KEY_B_PRIVATE_PEM,
        &testutil::claims(&["get:drinks-detail"]),
    );
    let (status, body) = call(&app, Method::GET, "/drinks-detail", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
