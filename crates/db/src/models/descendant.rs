//! Descendant (family tree entry) model and DTOs.

use lembranca_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `descendants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Descendant {
    pub id: DbId,
    pub memorial_id: DbId,
    pub name: String,
    pub relationship: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for adding a descendant.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDescendant {
    pub name: String,
    pub relationship: String,
}
