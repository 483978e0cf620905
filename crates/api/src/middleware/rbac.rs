//! Role gates for the back office.
//!
//! Admins pass every gate. Funeral homes also pass the memorial-creation
//! gate. Family users only reach routes that take a plain [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lembranca_core::error::CoreError;
use lembranca_core::roles::{ROLE_ADMIN, ROLE_FUNERAL_HOME};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate and reject with 403 unless the role is in `allowed`.
async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[&str],
    denial: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed.contains(&user.role.as_str()) {
        tracing::debug!(account_id = user.account_id, role = %user.role, "Role gate denied");
        return Err(AppError::Core(CoreError::Forbidden(denial.into())));
    }
    Ok(user)
}

/// Back-office staff only: leads, the production queue, dashboards.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        authorize(parts, state, &[ROLE_ADMIN], "Admin role required")
            .await
            .map(RequireAdmin)
    }
}

/// Accounts that may open memorials on behalf of a funeral home.
pub struct RequireFuneralHome(pub AuthUser);

impl FromRequestParts<AppState> for RequireFuneralHome {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        authorize(
            parts,
            state,
            &[ROLE_FUNERAL_HOME, ROLE_ADMIN],
            "Funeral home or Admin role required",
        )
        .await
        .map(RequireFuneralHome)
    }
}
