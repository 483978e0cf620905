//! Contact-form lead model and DTOs.

use lembranca_core::status::StatusId;
use lembranca_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub accept_emails: bool,
    pub status_id: StatusId,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body of the public contact form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub accept_emails: bool,
    pub notes: Option<String>,
}

/// DTO for updating a lead. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateLead {
    pub status_id: Option<StatusId>,
    pub notes: Option<String>,
}
