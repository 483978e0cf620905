//! Startup tasks run once before the server accepts requests.

use lembranca_core::validation::{normalize_email, validate_email, validate_password};
use lembranca_db::models::admin_user::CreateAdminUser;
use lembranca_db::repositories::AdminUserRepo;
use lembranca_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the first admin account when the `admin_users` table is empty.
///
/// Returns `true` if an account was created.
pub async fn ensure_bootstrap_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if AdminUserRepo::count(pool).await? > 0 {
        tracing::debug!("Admin account already present, skipping bootstrap");
        return Ok(false);
    }

    validate_email(&admin.email)?;
    validate_password(&admin.password)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let created = AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            name: admin.name.clone(),
            email: normalize_email(&admin.email),
            password_hash,
        },
    )
    .await?;

    tracing::info!(admin_id = created.id, email = %created.email, "Bootstrap admin created");
    Ok(true)
}
