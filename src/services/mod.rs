/*
 * Responsibility
 * - Domain services that handlers call into (token verification, authorization)
 */
pub mod auth;
