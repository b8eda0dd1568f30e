/*
 * Responsibility
 * - Persistence of the drinks table behind the DrinkRepo trait
 */
pub mod drink_repo;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use drink_repo::{DrinkRepo, DrinkRow, PgDrinkRepo};
