//! Repository for the `photos` table.

use lembranca_core::types::DbId;
use sqlx::PgPool;

use crate::models::photo::{CreatePhoto, Photo, UpdatePhoto};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, memorial_id, file_url, caption, sort_order, created_at, updated_at";

/// Provides CRUD operations for gallery photos.
pub struct PhotoRepo;

impl PhotoRepo {
    /// Insert a photo. Without an explicit `sort_order` it goes to the end
    /// of the gallery.
    pub async fn create(
        pool: &PgPool,
        memorial_id: DbId,
        input: &CreatePhoto,
    ) -> Result<Photo, sqlx::Error> {
        let query = format!(
            "INSERT INTO photos (memorial_id, file_url, caption, sort_order)
             VALUES ($1, $2, $3, COALESCE($4,
                (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM photos WHERE memorial_id = $1)))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(memorial_id)
            .bind(&input.file_url)
            .bind(&input.caption)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Photos of a memorial by `sort_order`.
    pub async fn list_by_memorial(
        pool: &PgPool,
        memorial_id: DbId,
    ) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM photos WHERE memorial_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(memorial_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Photo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photos WHERE id = $1");
        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        memorial_id: DbId,
        id: DbId,
        input: &UpdatePhoto,
    ) -> Result<Option<Photo>, sqlx::Error> {
        let query = format!(
            "UPDATE photos SET
                caption = COALESCE($3, caption),
                sort_order = COALESCE($4, sort_order)
             WHERE id = $1 AND memorial_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .bind(memorial_id)
            .bind(&input.caption)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a photo belonging to `memorial_id`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, memorial_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1 AND memorial_id = $2")
            .bind(id)
            .bind(memorial_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
