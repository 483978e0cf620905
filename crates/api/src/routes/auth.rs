//! Route definitions for the `/auth` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/funeral-homes/register", post(auth::register_funeral_home))
        .route("/funeral-homes/login", post(auth::login_funeral_home))
        .route("/families/login", post(auth::login_family))
        .route("/families/accept-invitation", post(auth::accept_invitation))
        .route("/admin/login", post(auth::login_admin))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/change-password", post(auth::change_password))
}
