//! Route definitions for the `/payments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(payments::list_plans))
        .route("/intent", post(payments::create_intent))
        .route("/checkout", post(payments::checkout))
        .route("/history", get(payments::payment_history))
        .route("/{id}/card", post(payments::confirm_card))
        .route("/{id}/pix/confirm", post(payments::confirm_pix))
}
