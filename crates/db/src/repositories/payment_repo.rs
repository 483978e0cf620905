//! Repository for the `payments` table.

use lembranca_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment::{CreatePayment, Payment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, account_role, account_id, plan_id, memorial_id, provider_intent_id, \
                        client_secret, amount_cents, currency, payment_method_type, status, \
                        pix_code, boleto_url, boleto_barcode, expires_at, created_at, updated_at";

/// Provides persistence for checkout payments.
pub struct PaymentRepo;

impl PaymentRepo {
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments
                (account_role, account_id, plan_id, memorial_id, provider_intent_id,
                 client_secret, amount_cents, currency, payment_method_type, status,
                 pix_code, boleto_url, boleto_barcode, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(&input.account_role)
            .bind(input.account_id)
            .bind(&input.plan_id)
            .bind(input.memorial_id)
            .bind(&input.provider_intent_id)
            .bind(&input.client_secret)
            .bind(input.amount_cents)
            .bind(&input.currency)
            .bind(&input.payment_method_type)
            .bind(&input.status)
            .bind(&input.pix_code)
            .bind(&input.boleto_url)
            .bind(&input.boleto_barcode)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record the provider's latest status for a payment.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("UPDATE payments SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Payments made by one account, newest first.
    pub async fn list_for_account(
        pool: &PgPool,
        account_role: &str,
        account_id: DbId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments
             WHERE account_role = $1 AND account_id = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(account_role)
            .bind(account_id)
            .fetch_all(pool)
            .await
    }
}
