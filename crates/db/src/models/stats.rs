//! Aggregates for the admin dashboard.

use lembranca_core::status::StatusId;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct MemorialTotals {
    pub total: i64,
    pub active: i64,
    pub pending: i64,
}

#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct LeadTotals {
    pub total: i64,
    pub pending: i64,
}

/// Number of orders in one production status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status_id: StatusId,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub memorials: MemorialTotals,
    pub leads: LeadTotals,
    pub orders_by_status: Vec<StatusCount>,
    pub funeral_homes: i64,
    pub family_users: i64,
}
