/*
 * Responsibility
 * - drinks table CRUD
 * - recipe is stored as JSON text; (de)serialization belongs to the caller
 * - Unique violations on title come back as RepoError::Conflict
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DrinkRow {
    pub id: i32,
    pub title: String,
    pub recipe: String,
}

/// Storage for drinks.
///
/// `update` and `delete` report a missing id as `Ok(None)` / `Ok(false)`,
/// never as an error.
#[async_trait]
pub trait DrinkRepo: Send + Sync + 'static {
    async fn list(&self) -> RepoResult<Vec<DrinkRow>>;

    async fn create(&self, title: &str, recipe: &str) -> RepoResult<DrinkRow>;

    // `None` leaves the column unchanged.
    async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        recipe: Option<&str>,
    ) -> RepoResult<Option<DrinkRow>>;

    async fn delete(&self, id: i32) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgDrinkRepo {
    pool: PgPool,
}

impl PgDrinkRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Wipe the table and insert the sample "water" drink.
    pub async fn reset_with_sample(&self) -> RepoResult<DrinkRow> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(r#"TRUNCATE TABLE drinks RESTART IDENTITY"#)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind("water")
        .bind(r#"[{"name": "water", "color": "blue", "parts": 1}]"#)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }
}

#[async_trait]
impl DrinkRepo for PgDrinkRepo {
    async fn list(&self) -> RepoResult<Vec<DrinkRow>> {
        let rows = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, title: &str, recipe: &str) -> RepoResult<DrinkRow> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(title)
        .bind(recipe)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        recipe: Option<&str>,
    ) -> RepoResult<Option<DrinkRow>> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            UPDATE drinks
            SET
                title = COALESCE($2, title),
                recipe = COALESCE($3, recipe)
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(recipe)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn delete(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
