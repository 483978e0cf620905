//! Memorial entity model and DTOs.

use lembranca_core::status::StatusId;
use lembranca_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::dedication::Dedication;
use crate::models::descendant::Descendant;
use crate::models::family_user::FamilyUser;
use crate::models::order::Order;
use crate::models::photo::Photo;

/// A row from the `memorials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Memorial {
    pub id: DbId,
    pub slug: String,
    pub full_name: String,
    pub birth_date: Option<Date>,
    pub death_date: Option<Date>,
    pub birthplace: Option<String>,
    pub filiation: Option<String>,
    pub biography: Option<String>,
    pub main_photo: Option<String>,
    pub visibility: String,
    pub status_id: StatusId,
    pub is_historical: bool,
    pub category: Option<String>,
    pub grave_location: Option<String>,
    pub funeral_home_id: Option<DbId>,
    pub family_user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Memorial list row with aggregated content counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemorialWithCounts {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub memorial: Memorial,
    pub photo_count: i64,
    pub dedication_count: i64,
}

/// A memorial with all of its nested content.
#[derive(Debug, Clone, Serialize)]
pub struct MemorialDetail {
    #[serde(flatten)]
    pub memorial: Memorial,
    pub descendants: Vec<Descendant>,
    pub photos: Vec<Photo>,
    pub dedications: Vec<Dedication>,
}

/// DTO for inserting a memorial. The slug must already be unique.
#[derive(Debug, Clone)]
pub struct CreateMemorial {
    pub slug: String,
    pub full_name: String,
    pub birth_date: Option<Date>,
    pub death_date: Option<Date>,
    pub birthplace: Option<String>,
    pub filiation: Option<String>,
    pub biography: Option<String>,
    pub main_photo: Option<String>,
    pub visibility: String,
    pub status_id: StatusId,
    pub is_historical: bool,
    pub category: Option<String>,
    pub grave_location: Option<String>,
    pub funeral_home_id: Option<DbId>,
    pub family_user_id: Option<DbId>,
}

/// DTO for updating a memorial. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateMemorial {
    pub full_name: Option<String>,
    pub birth_date: Option<Date>,
    pub death_date: Option<Date>,
    pub birthplace: Option<String>,
    pub filiation: Option<String>,
    pub biography: Option<String>,
    pub main_photo: Option<String>,
    pub visibility: Option<String>,
    pub status_id: Option<StatusId>,
    pub is_historical: Option<bool>,
    pub category: Option<String>,
    pub grave_location: Option<String>,
}

/// Ownership filters for the memorial list. `None` means unfiltered.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorialFilter {
    pub funeral_home_id: Option<DbId>,
    pub family_user_id: Option<DbId>,
}

/// Everything written by one memorial-creation transaction.
#[derive(Debug, Clone)]
pub struct CreatedMemorial {
    pub memorial: Memorial,
    /// Set when a family user was invited or re-invited alongside the memorial.
    pub invited_family_user: Option<FamilyUser>,
    pub order: Order,
}
