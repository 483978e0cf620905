//! Handlers for `/memorials/{id}/dedications`.
//!
//! Any visitor may leave a dedication on a memorial they can see.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lembranca_core::types::DbId;
use lembranca_core::validation::{
    require_non_empty, validate_max_len, MAX_DEDICATION_LENGTH, MAX_NAME_LENGTH,
};
use lembranca_db::models::dedication::{CreateDedication, Dedication};
use lembranca_db::repositories::DedicationRepo;

use crate::access::{load_managed_memorial, load_visible_memorial};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/memorials/{id}/dedications
///
/// Newest first.
pub async fn list_dedications(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(memorial_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Dedication>>>> {
    load_visible_memorial(&state.pool, memorial_id, viewer.as_ref()).await?;
    let dedications = DedicationRepo::list_by_memorial(&state.pool, memorial_id).await?;
    Ok(Json(DataResponse::new(dedications)))
}

/// POST /api/v1/memorials/{id}/dedications
pub async fn create_dedication(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(memorial_id): Path<DbId>,
    Json(input): Json<CreateDedication>,
) -> AppResult<(StatusCode, Json<DataResponse<Dedication>>)> {
    load_visible_memorial(&state.pool, memorial_id, viewer.as_ref()).await?;

    require_non_empty("author_name", &input.author_name)?;
    validate_max_len("author_name", &input.author_name, MAX_NAME_LENGTH)?;
    require_non_empty("message", &input.message)?;
    validate_max_len("message", &input.message, MAX_DEDICATION_LENGTH)?;

    let input = CreateDedication {
        author_name: input.author_name.trim().to_string(),
        message: input.message.trim().to_string(),
    };
    let dedication = DedicationRepo::create(&state.pool, memorial_id, &input).await?;
    tracing::info!(memorial_id, dedication_id = dedication.id, "Dedication added");
    Ok((StatusCode::CREATED, Json(DataResponse::new(dedication))))
}

/// DELETE /api/v1/memorials/{id}/dedications/{item_id}
pub async fn delete_dedication(
    State(state): State<AppState>,
    user: AuthUser,
    Path((memorial_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_managed_memorial(&state.pool, memorial_id, &user).await?;
    if DedicationRepo::delete(&state.pool, memorial_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Dedication", id))
    }
}
