//! Family user account model and DTOs.

use lembranca_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `family_users` table.
///
/// `password_hash` is `None` and `is_active` false until the invitation is
/// accepted.
#[derive(Debug, Clone, FromRow)]
pub struct FamilyUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub invitation_token_hash: Option<String>,
    pub invitation_expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe family user representation.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyUserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub invitation_pending: bool,
    pub created_at: Timestamp,
}

impl From<FamilyUser> for FamilyUserResponse {
    fn from(f: FamilyUser) -> Self {
        Self {
            invitation_pending: f.invitation_token_hash.is_some(),
            id: f.id,
            name: f.name,
            email: f.email,
            phone: f.phone,
            is_active: f.is_active,
            created_at: f.created_at,
        }
    }
}

/// DTO for a family user created through an invitation.
#[derive(Debug, Clone)]
pub struct CreatePendingFamilyUser {
    pub name: String,
    pub email: String,
    pub invitation_token_hash: String,
    pub invitation_expires_at: Timestamp,
}

/// Fresh invitation for a family user that never activated the account.
#[derive(Debug, Clone)]
pub struct ReissueInvitation {
    pub family_user_id: DbId,
    pub invitation_token_hash: String,
    pub invitation_expires_at: Timestamp,
}

/// Invitation written together with a new memorial.
#[derive(Debug, Clone)]
pub enum FamilyInvitation {
    /// Create a pending family user for an unknown email.
    New(CreatePendingFamilyUser),
    /// Re-invite an existing pending user whose invitation lapsed.
    Reissue(ReissueInvitation),
}

/// Profile fields a family user may edit.
#[derive(Debug, Clone, Default)]
pub struct UpdateFamilyUser {
    pub name: Option<String>,
    pub phone: Option<String>,
}
