//! Repository for the `dedications` table.

use lembranca_core::types::DbId;
use sqlx::PgPool;

use crate::models::dedication::{CreateDedication, Dedication};

const COLUMNS: &str = "id, memorial_id, author_name, message, created_at, updated_at";

pub struct DedicationRepo;

impl DedicationRepo {
    pub async fn create(
        pool: &PgPool,
        memorial_id: DbId,
        input: &CreateDedication,
    ) -> Result<Dedication, sqlx::Error> {
        let query = format!(
            "INSERT INTO dedications (memorial_id, author_name, message)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dedication>(&query)
            .bind(memorial_id)
            .bind(&input.author_name)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// Dedications of a memorial, newest first.
    pub async fn list_by_memorial(
        pool: &PgPool,
        memorial_id: DbId,
    ) -> Result<Vec<Dedication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dedications WHERE memorial_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Dedication>(&query)
            .bind(memorial_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, memorial_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dedications WHERE id = $1 AND memorial_id = $2")
            .bind(id)
            .bind(memorial_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
