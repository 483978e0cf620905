//! Repository for the `funeral_homes` table.

use lembranca_core::types::DbId;
use sqlx::PgPool;

use crate::models::funeral_home::{CreateFuneralHome, FuneralHome, UpdateFuneralHome};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, phone, address, created_at, updated_at";

/// Provides CRUD operations for funeral homes.
pub struct FuneralHomeRepo;

impl FuneralHomeRepo {
    /// Insert a new funeral home, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateFuneralHome,
    ) -> Result<FuneralHome, sqlx::Error> {
        let query = format!(
            "INSERT INTO funeral_homes (name, email, password_hash, phone, address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FuneralHome>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FuneralHome>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM funeral_homes WHERE id = $1");
        sqlx::query_as::<_, FuneralHome>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find by email. Emails are stored lowercased.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<FuneralHome>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM funeral_homes WHERE email = $1");
        sqlx::query_as::<_, FuneralHome>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all funeral homes, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<FuneralHome>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM funeral_homes ORDER BY created_at DESC");
        sqlx::query_as::<_, FuneralHome>(&query).fetch_all(pool).await
    }

    /// Update profile fields. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFuneralHome,
    ) -> Result<Option<FuneralHome>, sqlx::Error> {
        let query = format!(
            "UPDATE funeral_homes SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FuneralHome>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_optional(pool)
            .await
    }

    /// Replace the password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE funeral_homes SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
