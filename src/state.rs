/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - drinks: DrinkRepo, auth: AuthService
 * - Cheap to clone (everything behind Arc)
 */
use std::sync::Arc;

use crate::repos::DrinkRepo;
use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub drinks: Arc<dyn DrinkRepo>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(drinks: Arc<dyn DrinkRepo>, auth: Arc<AuthService>) -> Self {
        Self { drinks, auth }
    }
}
