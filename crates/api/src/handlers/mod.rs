//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod dedications;
pub mod descendants;
pub mod leads;
pub mod memorials;
pub mod orders;
pub mod payments;
pub mod photos;

use lembranca_core::roles::{ROLE_ADMIN, ROLE_FAMILY_USER, ROLE_FUNERAL_HOME};
use lembranca_db::repositories::{AdminUserRepo, FamilyUserRepo, FuneralHomeRepo};
use lembranca_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Name and email of an account.
pub(crate) struct Contact {
    pub name: String,
    pub email: String,
}

/// Contact details of the acting account.
pub(crate) async fn actor_contact(pool: &DbPool, user: &AuthUser) -> AppResult<Option<Contact>> {
    let contact = match user.role.as_str() {
        ROLE_ADMIN => AdminUserRepo::find_by_id(pool, user.account_id)
            .await?
            .map(|a| Contact { name: a.name, email: a.email }),
        ROLE_FUNERAL_HOME => FuneralHomeRepo::find_by_id(pool, user.account_id)
            .await?
            .map(|f| Contact { name: f.name, email: f.email }),
        ROLE_FAMILY_USER => FamilyUserRepo::find_by_id(pool, user.account_id)
            .await?
            .map(|f| Contact { name: f.name, email: f.email }),
        _ => None,
    };
    Ok(contact)
}

/// Email of the acting account, recorded as `changed_by` in order history.
pub(crate) async fn actor_email(pool: &DbPool, user: &AuthUser) -> AppResult<Option<String>> {
    Ok(actor_contact(pool, user).await?.map(|c| c.email))
}
