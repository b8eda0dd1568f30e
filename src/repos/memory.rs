//! In-process `DrinkRepo` for tests.
//!
//! Mirrors the Postgres behavior that handlers rely on: serial ids starting
//! at 1, unique titles, `None` / `false` for unknown ids.
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::repos::drink_repo::{DrinkRepo, DrinkRow};
use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Default)]
struct Inner {
    next_id: i32,
    rows: BTreeMap<i32, DrinkRow>,
    fail: bool,
}

#[derive(Debug, Default)]
pub struct MemoryDrinkRepo {
    inner: Mutex<Inner>,
}

impl MemoryDrinkRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail like a broken connection would.
    pub fn fail_all(&self) {
        self.lock().fail = true;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn guard(&self) -> RepoResult<MutexGuard<'_, Inner>> {
        let inner = self.lock();
        if inner.fail {
            return Err(RepoError::Db(sqlx::Error::PoolClosed));
        }
        Ok(inner)
    }
}

fn title_taken(inner: &Inner, title: &str, except: Option<i32>) -> bool {
    inner
        .rows
        .values()
        .any(|r| r.title == title && Some(r.id) != except)
}

#[async_trait]
impl DrinkRepo for MemoryDrinkRepo {
    async fn list(&self) -> RepoResult<Vec<DrinkRow>> {
        Ok(self.guard()?.rows.values().cloned().collect())
    }

    async fn create(&self, title: &str, recipe: &str) -> RepoResult<DrinkRow> {
        let mut inner = self.guard()?;
        if title_taken(&inner, title, None) {
            return Err(RepoError::Conflict);
        }

        inner.next_id += 1;
        let row = DrinkRow {
            id: inner.next_id,
            title: title.to_string(),
            recipe: recipe.to_string(),
        };
        inner.rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        recipe: Option<&str>,
    ) -> RepoResult<Option<DrinkRow>> {
        let mut inner = self.guard()?;
        // Unknown id first: an UPDATE that matches no row never hits the unique index.
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(title) = title
            && title_taken(&inner, title, Some(id))
        {
            return Err(RepoError::Conflict);
        }

        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            row.title = title.to_string();
        }
        if let Some(recipe) = recipe {
            row.recipe = recipe.to_string();
        }

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        Ok(self.guard()?.rows.remove(&id).is_some())
    }
}
