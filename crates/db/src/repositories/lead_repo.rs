//! Repository for the `leads` table.

use lembranca_core::status::StatusId;
use lembranca_core::types::DbId;
use sqlx::PgPool;

use crate::models::lead::{CreateLead, Lead, UpdateLead};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, email, phone, accept_emails, status_id, notes, created_at, updated_at";

/// Provides CRUD operations for contact-form leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a lead with the default `pending` status.
    pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads (name, email, phone, accept_emails, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.accept_emails)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List leads, newest first, optionally filtered by status.
    pub async fn list(pool: &PgPool, status_id: Option<StatusId>) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads
             WHERE ($1::SMALLINT IS NULL OR status_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(status_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLead,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET
                status_id = COALESCE($2, status_id),
                notes = COALESCE($3, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(input.status_id)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }
}
