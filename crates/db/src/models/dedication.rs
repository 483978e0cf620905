//! Visitor dedication model and DTOs.

use lembranca_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `dedications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dedication {
    pub id: DbId,
    pub memorial_id: DbId,
    pub author_name: String,
    pub message: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for leaving a dedication.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDedication {
    pub author_name: String,
    pub message: String,
}
