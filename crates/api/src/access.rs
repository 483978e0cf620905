//! Who may see and who may manage a memorial.
//!
//! Admins manage everything. A funeral home manages the memorials it
//! created and a family user the ones linked to it. Everyone else sees a
//! memorial only while it is public and not inactive.

use lembranca_core::error::CoreError;
use lembranca_core::status::MemorialStatus;
use lembranca_core::types::DbId;
use lembranca_core::validation::VISIBILITY_PRIVATE;
use lembranca_db::models::memorial::Memorial;
use lembranca_db::repositories::MemorialRepo;
use lembranca_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

pub fn can_manage(user: &AuthUser, memorial: &Memorial) -> bool {
    if user.is_admin() {
        return true;
    }
    if let Some(id) = user.funeral_home_id() {
        return memorial.funeral_home_id == Some(id);
    }
    if let Some(id) = user.family_user_id() {
        return memorial.family_user_id == Some(id);
    }
    false
}

/// 403 unless `user` manages the memorial.
pub fn ensure_can_manage(user: &AuthUser, memorial: &Memorial) -> AppResult<()> {
    if can_manage(user, memorial) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this memorial".into(),
        )))
    }
}

/// Visibility check for public reads.
///
/// Managers always pass. Inactive memorials answer 404 so a removed page
/// looks like a missing one; private memorials answer 403.
pub fn ensure_visible(memorial: &Memorial, viewer: Option<&AuthUser>) -> AppResult<()> {
    if viewer.is_some_and(|user| can_manage(user, memorial)) {
        return Ok(());
    }
    if memorial.status_id == MemorialStatus::Inactive.id() {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Memorial",
            key: memorial.slug.clone(),
        }));
    }
    if memorial.visibility == VISIBILITY_PRIVATE {
        return Err(AppError::Core(CoreError::Forbidden(
            "This memorial is private".into(),
        )));
    }
    Ok(())
}

/// Load a memorial by id or fail with 404.
pub async fn load_memorial(pool: &DbPool, id: DbId) -> AppResult<Memorial> {
    MemorialRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::not_found("Memorial", id))
}

/// Load a memorial the caller manages.
pub async fn load_managed_memorial(
    pool: &DbPool,
    id: DbId,
    user: &AuthUser,
) -> AppResult<Memorial> {
    let memorial = load_memorial(pool, id).await?;
    ensure_can_manage(user, &memorial)?;
    Ok(memorial)
}

/// Load a memorial the caller may read.
pub async fn load_visible_memorial(
    pool: &DbPool,
    id: DbId,
    viewer: Option<&AuthUser>,
) -> AppResult<Memorial> {
    let memorial = load_memorial(pool, id).await?;
    ensure_visible(&memorial, viewer)?;
    Ok(memorial)
}
