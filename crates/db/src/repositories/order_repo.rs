//! Repository for the `orders` and `order_history` tables.

use lembranca_core::status::{ProductionStatus, StatusId};
use lembranca_core::types::DbId;
use sqlx::PgPool;

use crate::models::order::{CreateOrder, Order, OrderFilter, OrderHistory, StatusChange, UpdateOrder};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, memorial_id, funeral_home_id, family_user_id, production_status_id, \
                        priority_id, notes, internal_notes, estimated_delivery, delivered_at, \
                        assigned_to, created_at, updated_at";

const HISTORY_COLUMNS: &str =
    "id, order_id, previous_status_id, new_status_id, changed_by, notes, created_at";

/// Provides CRUD and status-transition operations for production orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new order with its initial history entry.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrder,
        changed_by: Option<&str>,
    ) -> Result<Order, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let order = Self::create_in_tx(&mut tx, input, changed_by).await?;
        tx.commit().await?;
        Ok(order)
    }

    /// Insert an order with status `new` inside an open transaction and
    /// record the initial history entry.
    pub async fn create_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateOrder,
        changed_by: Option<&str>,
    ) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders
                (memorial_id, funeral_home_id, family_user_id, production_status_id,
                 priority_id, notes, estimated_delivery)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(input.memorial_id)
            .bind(input.funeral_home_id)
            .bind(input.family_user_id)
            .bind(ProductionStatus::New.id())
            .bind(input.priority_id)
            .bind(&input.notes)
            .bind(input.estimated_delivery)
            .fetch_one(&mut **tx)
            .await?;

        Self::insert_history(tx, order.id, None, order.production_status_id, changed_by, None)
            .await?;
        Ok(order)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List orders, newest first, optionally filtered by status and priority.
    pub async fn list(pool: &PgPool, filter: OrderFilter) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE ($1::SMALLINT IS NULL OR production_status_id = $1)
               AND ($2::SMALLINT IS NULL OR priority_id = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(filter.production_status_id)
            .bind(filter.priority_id)
            .fetch_all(pool)
            .await
    }

    /// Update order metadata. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrder,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                priority_id = COALESCE($2, priority_id),
                notes = COALESCE($3, notes),
                internal_notes = COALESCE($4, internal_notes),
                assigned_to = COALESCE($5, assigned_to),
                estimated_delivery = COALESCE($6, estimated_delivery)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(input.priority_id)
            .bind(&input.notes)
            .bind(&input.internal_notes)
            .bind(&input.assigned_to)
            .bind(input.estimated_delivery)
            .fetch_optional(pool)
            .await
    }

    /// Move an order to a new production status and append a history row,
    /// atomically.
    ///
    /// The update only applies while the order is still in
    /// `change.from_status_id`; `None` means it moved concurrently (or does
    /// not exist). `delivered_at` is stamped when entering `delivered`.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        change: &StatusChange,
    ) -> Result<Option<Order>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE orders SET
                production_status_id = $3,
                delivered_at = CASE WHEN $3 = $4 THEN NOW() ELSE delivered_at END
             WHERE id = $1 AND production_status_id = $2
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(change.from_status_id)
            .bind(change.to_status_id)
            .bind(ProductionStatus::Delivered.id())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        Self::insert_history(
            &mut tx,
            id,
            Some(change.from_status_id),
            change.to_status_id,
            change.changed_by.as_deref(),
            change.notes.as_deref(),
        )
        .await?;

        tx.commit().await?;
        Ok(Some(order))
    }

    /// History of an order, oldest first.
    pub async fn list_history(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<OrderHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM order_history
             WHERE order_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, OrderHistory>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn insert_history(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        order_id: DbId,
        previous_status_id: Option<StatusId>,
        new_status_id: StatusId,
        changed_by: Option<&str>,
        notes: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO order_history
                (order_id, previous_status_id, new_status_id, changed_by, notes)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(order_id)
        .bind(previous_status_id)
        .bind(new_status_id)
        .bind(changed_by)
        .bind(notes)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
