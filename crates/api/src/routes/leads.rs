use axum::routing::post;
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Public contact form, mounted at `/leads`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(leads::create_lead))
}
