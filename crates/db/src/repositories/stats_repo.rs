//! Aggregate queries for the admin dashboard.

use lembranca_core::status::{LeadStatus, MemorialStatus};
use sqlx::PgPool;

use crate::models::stats::{DashboardStats, LeadTotals, MemorialTotals, StatusCount};

pub struct StatsRepo;

impl StatsRepo {
    pub async fn dashboard(pool: &PgPool) -> Result<DashboardStats, sqlx::Error> {
        let memorials = sqlx::query_as::<_, MemorialTotals>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE status_id = $1) AS active,
                    COUNT(*) FILTER (WHERE status_id = $2) AS pending
             FROM memorials",
        )
        .bind(MemorialStatus::Active.id())
        .bind(MemorialStatus::PendingData.id())
        .fetch_one(pool)
        .await?;

        let leads = sqlx::query_as::<_, LeadTotals>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE status_id = $1) AS pending
             FROM leads",
        )
        .bind(LeadStatus::Pending.id())
        .fetch_one(pool)
        .await?;

        // Every status appears, including those with no orders.
        let orders_by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT s.id AS status_id, COUNT(o.id) AS count
             FROM order_production_statuses s
             LEFT JOIN orders o ON o.production_status_id = s.id
             GROUP BY s.id
             ORDER BY s.id",
        )
        .fetch_all(pool)
        .await?;

        let (funeral_homes,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM funeral_homes")
            .fetch_one(pool)
            .await?;
        let (family_users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM family_users")
            .fetch_one(pool)
            .await?;

        Ok(DashboardStats {
            memorials,
            leads,
            orders_by_status,
            funeral_homes,
            family_users,
        })
    }
}
