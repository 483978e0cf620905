//! Repository for the `family_users` table.

use lembranca_core::types::DbId;
use sqlx::PgPool;

use crate::models::family_user::{
    CreatePendingFamilyUser, FamilyUser, ReissueInvitation, UpdateFamilyUser,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, phone, invitation_token_hash, \
                        invitation_expires_at, is_active, created_at, updated_at";

/// Provides CRUD and invitation handling for family users.
pub struct FamilyUserRepo;

impl FamilyUserRepo {
    /// Insert a pending (invited) family user inside an open transaction.
    pub async fn create_pending_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreatePendingFamilyUser,
    ) -> Result<FamilyUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO family_users (name, email, invitation_token_hash, invitation_expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FamilyUser>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.invitation_token_hash)
            .bind(input.invitation_expires_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Replace the invitation of a user that has not activated yet.
    ///
    /// Returns `None` when the account was activated in the meantime.
    pub async fn reissue_invitation_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &ReissueInvitation,
    ) -> Result<Option<FamilyUser>, sqlx::Error> {
        let query = format!(
            "UPDATE family_users SET
                invitation_token_hash = $2,
                invitation_expires_at = $3
             WHERE id = $1 AND is_active = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FamilyUser>(&query)
            .bind(input.family_user_id)
            .bind(&input.invitation_token_hash)
            .bind(input.invitation_expires_at)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FamilyUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM family_users WHERE id = $1");
        sqlx::query_as::<_, FamilyUser>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<FamilyUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM family_users WHERE email = $1");
        sqlx::query_as::<_, FamilyUser>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find the user holding an invitation by the token's SHA-256 hash.
    ///
    /// Expiry is checked by the caller so it can report it distinctly.
    pub async fn find_by_invitation_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<FamilyUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM family_users WHERE invitation_token_hash = $1");
        sqlx::query_as::<_, FamilyUser>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Set the password, activate the account and consume the invitation.
    ///
    /// Returns `None` if the invitation was already consumed.
    pub async fn accept_invitation(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<Option<FamilyUser>, sqlx::Error> {
        let query = format!(
            "UPDATE family_users SET
                password_hash = $2,
                is_active = true,
                invitation_token_hash = NULL,
                invitation_expires_at = NULL
             WHERE id = $1 AND invitation_token_hash IS NOT NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FamilyUser>(&query)
            .bind(id)
            .bind(password_hash)
            .fetch_optional(pool)
            .await
    }

    /// List all family users, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<FamilyUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM family_users ORDER BY created_at DESC");
        sqlx::query_as::<_, FamilyUser>(&query).fetch_all(pool).await
    }

    /// Update profile fields. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFamilyUser,
    ) -> Result<Option<FamilyUser>, sqlx::Error> {
        let query = format!(
            "UPDATE family_users SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FamilyUser>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .fetch_optional(pool)
            .await
    }

    /// Replace the password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE family_users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop invitation tokens that expired without being accepted.
    ///
    /// The user row stays so memorials remain linked; a new invitation can
    /// be issued later. Returns the number of cleared invitations.
    pub async fn clear_expired_invitations(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE family_users SET
                invitation_token_hash = NULL,
                invitation_expires_at = NULL
             WHERE invitation_token_hash IS NOT NULL
               AND invitation_expires_at < NOW()
               AND is_active = false",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
