//! Handlers for the public contact form and the admin lead inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lembranca_core::error::CoreError;
use lembranca_core::status::{LeadStatus, StatusId};
use lembranca_core::types::DbId;
use lembranca_core::validation::{
    normalize_email, require_non_empty, validate_email, validate_max_len, MAX_NAME_LENGTH,
};
use lembranca_db::models::lead::{CreateLead, Lead, UpdateLead};
use lembranca_db::repositories::LeadRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateLeadRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

fn parse_lead_status(name: &str) -> AppResult<StatusId> {
    LeadStatus::from_name(name)
        .map(LeadStatus::id)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("Unknown lead status '{name}'")))
        })
}

/// POST /api/v1/leads
pub async fn create_lead(
    State(state): State<AppState>,
    Json(input): Json<CreateLead>,
) -> AppResult<(StatusCode, Json<DataResponse<Lead>>)> {
    require_non_empty("name", &input.name)?;
    validate_max_len("name", &input.name, MAX_NAME_LENGTH)?;
    validate_email(&input.email)?;

    let input = CreateLead {
        name: input.name.trim().to_string(),
        email: normalize_email(&input.email),
        ..input
    };
    let lead = LeadRepo::create(&state.pool, &input).await?;
    tracing::info!(lead_id = lead.id, "Lead received");
    Ok((StatusCode::CREATED, Json(DataResponse::new(lead))))
}

/// GET /api/v1/admin/leads?status=
pub async fn list_leads(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<Lead>>>> {
    let status_id = params.status.as_deref().map(parse_lead_status).transpose()?;
    let leads = LeadRepo::list(&state.pool, status_id).await?;
    Ok(Json(DataResponse::new(leads)))
}

/// PUT /api/v1/admin/leads/{id}
pub async fn update_lead(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLeadRequest>,
) -> AppResult<Json<DataResponse<Lead>>> {
    let update = UpdateLead {
        status_id: input.status.as_deref().map(parse_lead_status).transpose()?,
        notes: input.notes,
    };
    let lead = LeadRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::not_found("Lead", id))?;
    Ok(Json(DataResponse::new(lead)))
}
