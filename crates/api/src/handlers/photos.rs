//! Handlers for `/memorials/{id}/photos`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lembranca_core::error::CoreError;
use lembranca_core::types::DbId;
use lembranca_core::validation::require_non_empty;
use lembranca_db::models::photo::{CreatePhoto, Photo, UpdatePhoto};
use lembranca_db::repositories::PhotoRepo;

use crate::access::{load_managed_memorial, load_visible_memorial};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_sort_order(sort_order: Option<i32>) -> AppResult<()> {
    if sort_order.is_some_and(|s| s < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "sort_order must not be negative".into(),
        )));
    }
    Ok(())
}

/// GET /api/v1/memorials/{id}/photos
///
/// Ordered by `sort_order`.
pub async fn list_photos(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(memorial_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Photo>>>> {
    load_visible_memorial(&state.pool, memorial_id, viewer.as_ref()).await?;
    let photos = PhotoRepo::list_by_memorial(&state.pool, memorial_id).await?;
    Ok(Json(DataResponse::new(photos)))
}

/// POST /api/v1/memorials/{id}/photos
pub async fn create_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(memorial_id): Path<DbId>,
    Json(input): Json<CreatePhoto>,
) -> AppResult<(StatusCode, Json<DataResponse<Photo>>)> {
    load_managed_memorial(&state.pool, memorial_id, &user).await?;
    require_non_empty("file_url", &input.file_url)?;
    validate_sort_order(input.sort_order)?;

    let photo = PhotoRepo::create(&state.pool, memorial_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(photo))))
}

/// PUT /api/v1/memorials/{id}/photos/{item_id}
pub async fn update_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path((memorial_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdatePhoto>,
) -> AppResult<Json<DataResponse<Photo>>> {
    load_managed_memorial(&state.pool, memorial_id, &user).await?;
    validate_sort_order(input.sort_order)?;

    let photo = PhotoRepo::update(&state.pool, memorial_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Photo", id))?;
    Ok(Json(DataResponse::new(photo)))
}

/// DELETE /api/v1/memorials/{id}/photos/{item_id}
pub async fn delete_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path((memorial_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_managed_memorial(&state.pool, memorial_id, &user).await?;
    if PhotoRepo::delete(&state.pool, memorial_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Photo", id))
    }
}
