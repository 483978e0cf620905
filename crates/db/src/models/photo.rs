//! Memorial gallery photo model and DTOs.

use lembranca_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photo {
    pub id: DbId,
    pub memorial_id: DbId,
    pub file_url: String,
    pub caption: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for adding a photo. `sort_order` defaults to the end of
/// the gallery.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhoto {
    pub file_url: String,
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
}

/// Request body for editing a photo.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePhoto {
    pub caption: Option<String>,
    pub sort_order: Option<i32>,
}
