//! Route definitions for `/admin`. Every handler requires the admin role.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin, leads, orders};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::dashboard_stats))
        .route("/funeral-homes", get(admin::list_funeral_homes))
        .route("/family-users", get(admin::list_family_users))
        .route("/cache/clear", post(admin::clear_cache))
        .route("/leads", get(leads::list_leads))
        .route("/leads/{id}", put(leads::update_lead))
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route(
            "/orders/{id}",
            get(orders::get_order).put(orders::update_order),
        )
        .route("/orders/{id}/status", post(orders::change_order_status))
        .route("/orders/{id}/history", get(orders::order_history))
}
