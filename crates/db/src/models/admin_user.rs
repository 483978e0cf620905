//! Platform administrator model and DTOs.

use lembranca_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `admin_users` table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe admin representation (no password hash or lockout state).
#[derive(Debug, Clone, Serialize)]
pub struct AdminUserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<AdminUser> for AdminUserResponse {
    fn from(a: AdminUser) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            is_active: a.is_active,
            last_login_at: a.last_login_at,
            created_at: a.created_at,
        }
    }
}

/// DTO for creating an admin.
#[derive(Debug, Clone)]
pub struct CreateAdminUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
