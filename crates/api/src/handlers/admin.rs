//! Admin dashboard handlers: statistics, account lists, cache control.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use lembranca_db::models::family_user::FamilyUserResponse;
use lembranca_db::models::funeral_home::FuneralHomeResponse;
use lembranca_db::models::stats::DashboardStats;
use lembranca_db::repositories::{FamilyUserRepo, FuneralHomeRepo, StatsRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let stats = StatsRepo::dashboard(&state.pool).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/v1/admin/funeral-homes
pub async fn list_funeral_homes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<FuneralHomeResponse>>>> {
    let homes = FuneralHomeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(
        homes.into_iter().map(FuneralHomeResponse::from).collect(),
    )))
}

/// GET /api/v1/admin/family-users
pub async fn list_family_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<FamilyUserResponse>>>> {
    let users = FamilyUserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(
        users.into_iter().map(FamilyUserResponse::from).collect(),
    )))
}

/// POST /api/v1/admin/cache/clear
///
/// Drops every cached public memorial listing. Returns 204.
pub async fn clear_cache(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> StatusCode {
    state.memorial_cache.invalidate_all();
    tracing::info!(admin_id = admin.account_id, "Public memorial cache cleared");
    StatusCode::NO_CONTENT
}
