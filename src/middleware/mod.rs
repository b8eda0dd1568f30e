/*
 * Responsibility
 * - Public interface of the middlewares
 * - requires_auth(...) per route, cors::apply / http::apply for the whole router
 */
pub mod auth;
pub mod cors;
pub mod http;
