//! Repository for the `descendants` table.

use lembranca_core::types::DbId;
use sqlx::PgPool;

use crate::models::descendant::{CreateDescendant, Descendant};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, memorial_id, name, relationship, created_at, updated_at";

/// Provides CRUD operations for descendants.
pub struct DescendantRepo;

impl DescendantRepo {
    pub async fn create(
        pool: &PgPool,
        memorial_id: DbId,
        input: &CreateDescendant,
    ) -> Result<Descendant, sqlx::Error> {
        let query = format!(
            "INSERT INTO descendants (memorial_id, name, relationship)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Descendant>(&query)
            .bind(memorial_id)
            .bind(&input.name)
            .bind(&input.relationship)
            .fetch_one(pool)
            .await
    }

    /// Descendants of a memorial in insertion order.
    pub async fn list_by_memorial(
        pool: &PgPool,
        memorial_id: DbId,
    ) -> Result<Vec<Descendant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM descendants WHERE memorial_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Descendant>(&query)
            .bind(memorial_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a descendant belonging to `memorial_id`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, memorial_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM descendants WHERE id = $1 AND memorial_id = $2")
            .bind(id)
            .bind(memorial_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
