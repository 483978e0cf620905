//! Funeral home account model and DTOs.

use lembranca_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `funeral_homes` table.
///
/// Contains the password hash; use [`FuneralHomeResponse`] for API output.
#[derive(Debug, Clone, FromRow)]
pub struct FuneralHome {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe funeral home representation (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct FuneralHomeResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
}

impl From<FuneralHome> for FuneralHomeResponse {
    fn from(f: FuneralHome) -> Self {
        Self {
            id: f.id,
            name: f.name,
            email: f.email,
            phone: f.phone,
            address: f.address,
            created_at: f.created_at,
        }
    }
}

/// DTO for registering a funeral home.
#[derive(Debug, Clone)]
pub struct CreateFuneralHome {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Profile fields a funeral home may edit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFuneralHome {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
