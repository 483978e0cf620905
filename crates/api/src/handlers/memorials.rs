//! Handlers for the `/memorials` resource.
//!
//! Management endpoints require an owner (see [`crate::access`]); the
//! public endpoints serve the memorial page, its QR code and the cached
//! listing.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use lembranca_core::error::CoreError;
use lembranca_core::invitation::generate_invitation;
use lembranca_core::qr::{self, QrFormat};
use lembranca_core::slug::{fallback_slug, slug_candidate, MAX_SLUG_ATTEMPTS};
use lembranca_core::status::MemorialStatus;
use lembranca_core::types::{Date, DbId, Timestamp};
use lembranca_core::validation::{
    normalize_email, require_non_empty, validate_date_order, validate_email, validate_max_len,
    validate_visibility, MAX_NAME_LENGTH, VISIBILITY_PUBLIC,
};
use lembranca_db::models::family_user::{
    CreatePendingFamilyUser, FamilyInvitation, ReissueInvitation,
};
use lembranca_db::models::memorial::{
    CreateMemorial, Memorial, MemorialDetail, MemorialFilter, MemorialWithCounts, UpdateMemorial,
};
use lembranca_db::repositories::{FamilyUserRepo, FuneralHomeRepo, MemorialRepo};
use lembranca_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::access::{ensure_visible, load_managed_memorial};
use crate::error::{AppError, AppResult};
use crate::handlers::actor_email;
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::middleware::rbac::RequireFuneralHome;
use crate::query::{MemorialListParams, PublicMemorialParams, QrCodeParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateMemorialRequest {
    pub full_name: String,
    pub birth_date: Option<Date>,
    pub death_date: Option<Date>,
    pub birthplace: Option<String>,
    pub filiation: Option<String>,
    pub biography: Option<String>,
    pub main_photo: Option<String>,
    pub visibility: Option<String>,
    #[serde(default)]
    pub is_historical: bool,
    pub category: Option<String>,
    pub grave_location: Option<String>,
    /// Required for admins; funeral homes always use their own id.
    pub funeral_home_id: Option<DbId>,
    /// Links an existing family user or invites a new one.
    pub family_email: Option<String>,
    /// Name for a newly invited family user.
    pub family_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMemorialRequest {
    pub full_name: Option<String>,
    pub birth_date: Option<Date>,
    pub death_date: Option<Date>,
    pub birthplace: Option<String>,
    pub filiation: Option<String>,
    pub biography: Option<String>,
    pub main_photo: Option<String>,
    pub visibility: Option<String>,
    /// Lookup-table name, e.g. `"active"`.
    pub status: Option<String>,
    pub is_historical: Option<bool>,
    pub category: Option<String>,
    pub grave_location: Option<String>,
}

/// Plaintext invitation, shown exactly once.
#[derive(Debug, Serialize)]
pub struct InvitationInfo {
    pub family_user_id: DbId,
    pub email: String,
    pub token: String,
    pub expires_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct CreateMemorialResponse {
    pub memorial: Memorial,
    pub order_id: DbId,
    pub invitation: Option<InvitationInfo>,
}

#[derive(Debug, Serialize)]
pub struct QrCodeResponse {
    pub qr_code: String,
    pub format: QrFormat,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Management
// ---------------------------------------------------------------------------

/// GET /api/v1/memorials
///
/// Admins see every memorial and may filter; everyone else sees their own.
pub async fn list_memorials(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<MemorialListParams>,
) -> AppResult<Json<DataResponse<Vec<MemorialWithCounts>>>> {
    let filter = if user.is_admin() {
        MemorialFilter {
            funeral_home_id: params.funeral_home_id,
            family_user_id: params.family_user_id,
        }
    } else if let Some(id) = user.funeral_home_id() {
        MemorialFilter {
            funeral_home_id: Some(id),
            family_user_id: None,
        }
    } else if let Some(id) = user.family_user_id() {
        MemorialFilter {
            funeral_home_id: None,
            family_user_id: Some(id),
        }
    } else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Unknown account role".into(),
        )));
    };

    let memorials = MemorialRepo::list_with_counts(&state.pool, filter).await?;
    Ok(Json(DataResponse::new(memorials)))
}

/// POST /api/v1/memorials
///
/// Creates the memorial and its production order in one transaction. When
/// `family_email` names nobody yet, a pending family user is invited. A
/// pending user whose invitation lapsed gets a new one. Either way the
/// plaintext token is returned in the response.
pub async fn create_memorial(
    State(state): State<AppState>,
    RequireFuneralHome(user): RequireFuneralHome,
    Json(input): Json<CreateMemorialRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreateMemorialResponse>>)> {
    require_non_empty("full_name", &input.full_name)?;
    validate_max_len("full_name", &input.full_name, MAX_NAME_LENGTH)?;
    validate_date_order(input.birth_date, input.death_date)?;
    let visibility = match &input.visibility {
        Some(v) => validate_visibility(v)?,
        None => VISIBILITY_PUBLIC.to_string(),
    };

    let funeral_home_id = match user.funeral_home_id() {
        Some(id) => id,
        None => {
            let id = input.funeral_home_id.ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "funeral_home_id is required".into(),
                ))
            })?;
            FuneralHomeRepo::find_by_id(&state.pool, id)
                .await?
                .ok_or(AppError::not_found("FuneralHome", id))?;
            id
        }
    };

    let mut family_user_id = None;
    let mut family_invitation = None;
    let mut invitation_token = None;
    if let Some(raw_email) = input.family_email.as_deref().filter(|e| !e.trim().is_empty()) {
        validate_email(raw_email)?;
        let email = normalize_email(raw_email);
        let now = Utc::now();
        match FamilyUserRepo::find_by_email(&state.pool, &email).await? {
            Some(existing) => {
                family_user_id = Some(existing.id);
                let invitation_live = existing.invitation_token_hash.is_some()
                    && existing.invitation_expires_at.is_some_and(|at| at > now);
                if !existing.is_active && !invitation_live {
                    let invitation = generate_invitation(now, state.config.invitation_expiry_days);
                    family_invitation = Some(FamilyInvitation::Reissue(ReissueInvitation {
                        family_user_id: existing.id,
                        invitation_token_hash: invitation.hash,
                        invitation_expires_at: invitation.expires_at,
                    }));
                    invitation_token = Some(invitation.plaintext);
                }
            }
            None => {
                let invitation = generate_invitation(now, state.config.invitation_expiry_days);
                let name = input
                    .family_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
                family_invitation = Some(FamilyInvitation::New(CreatePendingFamilyUser {
                    name,
                    email,
                    invitation_token_hash: invitation.hash,
                    invitation_expires_at: invitation.expires_at,
                }));
                invitation_token = Some(invitation.plaintext);
            }
        }
    }

    let slug = generate_unique_slug(&state.pool, &input.full_name).await?;
    let changed_by = actor_email(&state.pool, &user).await?;

    let create = CreateMemorial {
        slug,
        full_name: input.full_name.trim().to_string(),
        birth_date: input.birth_date,
        death_date: input.death_date,
        birthplace: input.birthplace,
        filiation: input.filiation,
        biography: input.biography,
        main_photo: input.main_photo,
        visibility,
        status_id: MemorialStatus::PendingData.id(),
        is_historical: input.is_historical,
        category: input.category,
        grave_location: input.grave_location,
        funeral_home_id: Some(funeral_home_id),
        family_user_id,
    };

    let created = MemorialRepo::create_with_order(
        &state.pool,
        &create,
        family_invitation.as_ref(),
        changed_by.as_deref(),
    )
    .await?;

    let invitation = match (created.invited_family_user, invitation_token) {
        (Some(family_user), Some(token)) => Some(InvitationInfo {
            family_user_id: family_user.id,
            email: family_user.email,
            token,
            expires_at: family_user
                .invitation_expires_at
                .unwrap_or_else(Utc::now),
        }),
        _ => None,
    };

    tracing::info!(
        memorial_id = created.memorial.id,
        slug = %created.memorial.slug,
        order_id = created.order.id,
        invited = invitation.is_some(),
        "Memorial created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(CreateMemorialResponse {
            memorial: created.memorial,
            order_id: created.order.id,
            invitation,
        })),
    ))
}

/// GET /api/v1/memorials/{id}
pub async fn get_memorial(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MemorialDetail>>> {
    let memorial = load_managed_memorial(&state.pool, id, &user).await?;
    let detail = MemorialRepo::load_detail(&state.pool, memorial).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// PUT /api/v1/memorials/{id}
pub async fn update_memorial(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMemorialRequest>,
) -> AppResult<Json<DataResponse<Memorial>>> {
    let existing = load_managed_memorial(&state.pool, id, &user).await?;

    if let Some(name) = &input.full_name {
        require_non_empty("full_name", name)?;
        validate_max_len("full_name", name, MAX_NAME_LENGTH)?;
    }
    validate_date_order(
        input.birth_date.or(existing.birth_date),
        input.death_date.or(existing.death_date),
    )?;
    let visibility = input.visibility.as_deref().map(validate_visibility).transpose()?;
    let status_id = input
        .status
        .as_deref()
        .map(|name| {
            MemorialStatus::from_name(name).map(MemorialStatus::id).ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "Unknown memorial status '{name}'"
                )))
            })
        })
        .transpose()?;

    let update = UpdateMemorial {
        full_name: input.full_name.map(|n| n.trim().to_string()),
        birth_date: input.birth_date,
        death_date: input.death_date,
        birthplace: input.birthplace,
        filiation: input.filiation,
        biography: input.biography,
        main_photo: input.main_photo,
        visibility,
        status_id,
        is_historical: input.is_historical,
        category: input.category,
        grave_location: input.grave_location,
    };

    let memorial = MemorialRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::not_found("Memorial", id))?;
    Ok(Json(DataResponse::new(memorial)))
}

/// DELETE /api/v1/memorials/{id}
///
/// Soft delete: the memorial becomes inactive and disappears from public
/// pages, but its data is kept.
pub async fn delete_memorial(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Memorial>>> {
    load_managed_memorial(&state.pool, id, &user).await?;
    let memorial = MemorialRepo::set_status(&state.pool, id, MemorialStatus::Inactive.id())
        .await?
        .ok_or(AppError::not_found("Memorial", id))?;
    tracing::info!(memorial_id = id, "Memorial deactivated");
    Ok(Json(DataResponse::new(memorial)))
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/memorials/public?historical=
pub async fn list_public_memorials(
    State(state): State<AppState>,
    Query(params): Query<PublicMemorialParams>,
) -> AppResult<Json<DataResponse<Arc<Vec<Memorial>>>>> {
    let pool = state.pool.clone();
    let memorials = state
        .memorial_cache
        .get_or_try_insert(params.historical, async move {
            MemorialRepo::list_public(&pool, params.historical)
                .await
                .map(Arc::new)
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Public memorial query failed: {e}")))?;
    Ok(Json(DataResponse::new(memorials)))
}

/// GET /api/v1/memorials/by-slug/{slug}
pub async fn get_memorial_by_slug(
    State(state): State<AppState>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<MemorialDetail>>> {
    let memorial = find_by_slug(&state.pool, &slug).await?;
    ensure_visible(&memorial, viewer.as_ref())?;
    let detail = MemorialRepo::load_detail(&state.pool, memorial).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// GET /api/v1/memorials/by-slug/{slug}/qr-code?format=png|svg&base_url=
///
/// The QR code encodes the public page URL, so it is available for any
/// memorial that has not been deactivated.
pub async fn memorial_qr_code(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<QrCodeParams>,
) -> AppResult<Json<DataResponse<QrCodeResponse>>> {
    let memorial = find_by_slug(&state.pool, &slug).await?;
    if memorial.status_id == MemorialStatus::Inactive.id() {
        return Err(slug_not_found(&slug));
    }

    let base_url = params
        .base_url
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(state.config.public_base_url.as_str());
    let url = qr::memorial_url(base_url, &memorial.slug);
    let qr_code = qr::render(&url, params.format)?;

    Ok(Json(DataResponse::new(QrCodeResponse {
        qr_code,
        format: params.format,
        url,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn slug_not_found(slug: &str) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "Memorial",
        key: slug.to_string(),
    })
}

async fn find_by_slug(pool: &DbPool, slug: &str) -> AppResult<Memorial> {
    MemorialRepo::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| slug_not_found(slug))
}

/// Try random candidates first, then the timestamp fallback.
async fn generate_unique_slug(pool: &DbPool, full_name: &str) -> AppResult<String> {
    for _ in 0..MAX_SLUG_ATTEMPTS {
        let candidate = slug_candidate(full_name);
        if !MemorialRepo::slug_exists(pool, &candidate).await? {
            return Ok(candidate);
        }
    }
    let slug = fallback_slug(full_name, Utc::now());
    tracing::warn!(slug = %slug, "Slug candidates exhausted, using fallback");
    Ok(slug)
}
