//! Checkout payment model and DTOs.

use lembranca_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub account_role: String,
    #[serde(skip_serializing)]
    pub account_id: DbId,
    pub plan_id: String,
    pub memorial_id: Option<DbId>,
    pub provider_intent_id: String,
    pub client_secret: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_method_type: String,
    pub status: String,
    pub pix_code: Option<String>,
    pub boleto_url: Option<String>,
    pub boleto_barcode: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a payment.
#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub account_role: String,
    pub account_id: DbId,
    pub plan_id: String,
    pub memorial_id: Option<DbId>,
    pub provider_intent_id: String,
    pub client_secret: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_method_type: String,
    pub status: String,
    pub pix_code: Option<String>,
    pub boleto_url: Option<String>,
    pub boleto_barcode: Option<String>,
    pub expires_at: Option<Timestamp>,
}
