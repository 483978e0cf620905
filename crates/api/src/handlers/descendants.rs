//! Handlers for `/memorials/{id}/descendants`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lembranca_core::types::DbId;
use lembranca_core::validation::{require_non_empty, validate_max_len, MAX_NAME_LENGTH};
use lembranca_db::models::descendant::{CreateDescendant, Descendant};
use lembranca_db::repositories::DescendantRepo;

use crate::access::{load_managed_memorial, load_visible_memorial};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/memorials/{id}/descendants
pub async fn list_descendants(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(memorial_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Descendant>>>> {
    load_visible_memorial(&state.pool, memorial_id, viewer.as_ref()).await?;
    let descendants = DescendantRepo::list_by_memorial(&state.pool, memorial_id).await?;
    Ok(Json(DataResponse::new(descendants)))
}

/// POST /api/v1/memorials/{id}/descendants
pub async fn create_descendant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(memorial_id): Path<DbId>,
    Json(input): Json<CreateDescendant>,
) -> AppResult<(StatusCode, Json<DataResponse<Descendant>>)> {
    load_managed_memorial(&state.pool, memorial_id, &user).await?;

    require_non_empty("name", &input.name)?;
    validate_max_len("name", &input.name, MAX_NAME_LENGTH)?;
    require_non_empty("relationship", &input.relationship)?;
    validate_max_len("relationship", &input.relationship, MAX_NAME_LENGTH)?;

    let input = CreateDescendant {
        name: input.name.trim().to_string(),
        relationship: input.relationship.trim().to_string(),
    };
    let descendant = DescendantRepo::create(&state.pool, memorial_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(descendant))))
}

/// DELETE /api/v1/memorials/{id}/descendants/{item_id}
pub async fn delete_descendant(
    State(state): State<AppState>,
    user: AuthUser,
    Path((memorial_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_managed_memorial(&state.pool, memorial_id, &user).await?;
    if DescendantRepo::delete(&state.pool, memorial_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Descendant", id))
    }
}
