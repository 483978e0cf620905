//! Handlers for the production queue under `/admin/orders`.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lembranca_core::error::CoreError;
use lembranca_core::status::{OrderPriority, ProductionStatus, StatusId};
use lembranca_core::types::{DbId, Timestamp};
use lembranca_db::models::order::{
    CreateOrder, Order, OrderFilter, OrderHistory, StatusChange, UpdateOrder,
};
use lembranca_db::repositories::OrderRepo;
use serde::Deserialize;

use crate::access::load_memorial;
use crate::error::{AppError, AppResult};
use crate::handlers::actor_email;
use crate::middleware::rbac::RequireAdmin;
use crate::query::OrderListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub memorial_id: DbId,
    /// Defaults to `normal`.
    pub priority: Option<String>,
    pub notes: Option<String>,
    pub estimated_delivery: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub priority: Option<String>,
    pub notes: Option<String>,
    pub internal_notes: Option<String>,
    pub assigned_to: Option<String>,
    pub estimated_delivery: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

fn parse_status(name: &str) -> AppResult<ProductionStatus> {
    ProductionStatus::from_name(name).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown production status '{name}'"
        )))
    })
}

fn parse_priority(name: &str) -> AppResult<StatusId> {
    OrderPriority::from_name(name)
        .map(OrderPriority::id)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("Unknown priority '{name}'")))
        })
}

async fn load_order(state: &AppState, id: DbId) -> AppResult<Order> {
    OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Order", id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/orders?status=&priority=
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<OrderListParams>,
) -> AppResult<Json<DataResponse<Vec<Order>>>> {
    let filter = OrderFilter {
        production_status_id: params
            .status
            .as_deref()
            .map(|s| parse_status(s).map(ProductionStatus::id))
            .transpose()?,
        priority_id: params.priority.as_deref().map(parse_priority).transpose()?,
    };
    let orders = OrderRepo::list(&state.pool, filter).await?;
    Ok(Json(DataResponse::new(orders)))
}

/// GET /api/v1/admin/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Order>>> {
    let order = load_order(&state, id).await?;
    Ok(Json(DataResponse::new(order)))
}

/// POST /api/v1/admin/orders
///
/// Extra order for an existing memorial (e.g. a replacement plaque). Owner
/// links are copied from the memorial.
pub async fn create_order(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Order>>)> {
    let memorial = load_memorial(&state.pool, input.memorial_id).await?;
    let priority_id = match input.priority.as_deref() {
        Some(name) => parse_priority(name)?,
        None => OrderPriority::Normal.id(),
    };
    let changed_by = actor_email(&state.pool, &admin).await?;

    let order = OrderRepo::create(
        &state.pool,
        &CreateOrder {
            memorial_id: memorial.id,
            funeral_home_id: memorial.funeral_home_id,
            family_user_id: memorial.family_user_id,
            priority_id,
            notes: input.notes,
            estimated_delivery: input.estimated_delivery,
        },
        changed_by.as_deref(),
    )
    .await?;

    tracing::info!(order_id = order.id, memorial_id = memorial.id, "Order created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(order))))
}

/// PUT /api/v1/admin/orders/{id}
pub async fn update_order(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrderRequest>,
) -> AppResult<Json<DataResponse<Order>>> {
    let update = UpdateOrder {
        priority_id: input.priority.as_deref().map(parse_priority).transpose()?,
        notes: input.notes,
        internal_notes: input.internal_notes,
        assigned_to: input.assigned_to,
        estimated_delivery: input.estimated_delivery,
    };
    let order = OrderRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::not_found("Order", id))?;
    Ok(Json(DataResponse::new(order)))
}

/// POST /api/v1/admin/orders/{id}/status
///
/// Closed orders (delivered, cancelled) never move and an order cannot move
/// to its current status; both answer 409. A concurrent change between
/// read and write also answers 409.
pub async fn change_order_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeStatusRequest>,
) -> AppResult<Json<DataResponse<Order>>> {
    let next = parse_status(&input.status)?;
    let order = load_order(&state, id).await?;

    let current = ProductionStatus::from_id(order.production_status_id).ok_or_else(|| {
        AppError::InternalError(format!(
            "Order {id} has unknown production status {}",
            order.production_status_id
        ))
    })?;

    if !current.can_transition_to(next) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot move order from '{}' to '{}'",
            current.name(),
            next.name()
        ))));
    }

    let change = StatusChange {
        from_status_id: current.id(),
        to_status_id: next.id(),
        changed_by: actor_email(&state.pool, &admin).await?,
        notes: input.notes,
    };
    let order = OrderRepo::transition_status(&state.pool, id, &change)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Order status changed concurrently; reload and retry".into(),
            ))
        })?;

    tracing::info!(
        order_id = id,
        from = current.name(),
        to = next.name(),
        "Order status changed",
    );
    Ok(Json(DataResponse::new(order)))
}

/// GET /api/v1/admin/orders/{id}/history
///
/// Oldest first.
pub async fn order_history(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<OrderHistory>>>> {
    load_order(&state, id).await?;
    let history = OrderRepo::list_history(&state.pool, id).await?;
    Ok(Json(DataResponse::new(history)))
}
