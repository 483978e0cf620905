//! Production order model, history entries and DTOs.

use lembranca_core::status::StatusId;
use lembranca_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub memorial_id: DbId,
    pub funeral_home_id: Option<DbId>,
    pub family_user_id: Option<DbId>,
    pub production_status_id: StatusId,
    pub priority_id: StatusId,
    pub notes: Option<String>,
    pub internal_notes: Option<String>,
    pub estimated_delivery: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub assigned_to: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub memorial_id: DbId,
    pub funeral_home_id: Option<DbId>,
    pub family_user_id: Option<DbId>,
    pub priority_id: StatusId,
    pub notes: Option<String>,
    pub estimated_delivery: Option<Timestamp>,
}

/// DTO for updating order metadata. Status changes go through
/// `OrderRepo::transition_status`.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrder {
    pub priority_id: Option<StatusId>,
    pub notes: Option<String>,
    pub internal_notes: Option<String>,
    pub assigned_to: Option<String>,
    pub estimated_delivery: Option<Timestamp>,
}

/// List filters for the production queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    pub production_status_id: Option<StatusId>,
    pub priority_id: Option<StatusId>,
}

/// A row from the `order_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderHistory {
    pub id: DbId,
    pub order_id: DbId,
    pub previous_status_id: Option<StatusId>,
    pub new_status_id: StatusId,
    pub changed_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// A requested production status change.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub from_status_id: StatusId,
    pub to_status_id: StatusId,
    pub changed_by: Option<String>,
    pub notes: Option<String>,
}
