pub mod admin;
pub mod auth;
pub mod health;
pub mod leads;
pub mod memorials;
pub mod payments;
pub mod sitemap;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/funeral-homes/register                   register (public)
/// /auth/funeral-homes/login                      login (public)
/// /auth/families/login                           login (public)
/// /auth/families/accept-invitation               accept invitation (public)
/// /auth/admin/login                              login (public)
/// /auth/refresh                                  refresh (public)
/// /auth/logout                                   logout (auth)
/// /auth/me                                       current account (auth)
/// /auth/profile                                  update profile (auth, PUT)
/// /auth/change-password                          change password (auth)
///
/// /memorials                                     list (auth), create (funeral home/admin)
/// /memorials/public                              public listing (cached)
/// /memorials/by-slug/{slug}                      public page (optional auth)
/// /memorials/by-slug/{slug}/qr-code              QR code (public)
/// /memorials/{id}                                get, update, deactivate (owner)
/// /memorials/{id}/descendants                    list (public), create (owner)
/// /memorials/{id}/descendants/{item_id}          delete (owner)
/// /memorials/{id}/photos                         list (public), create (owner)
/// /memorials/{id}/photos/{item_id}               update, delete (owner)
/// /memorials/{id}/dedications                    list, create (public)
/// /memorials/{id}/dedications/{item_id}          delete (owner)
///
/// /leads                                         contact form (public)
///
/// /payments/plans                                plan catalogue (public)
/// /payments/intent                               raw intent (auth)
/// /payments/checkout                             checkout (auth)
/// /payments/history                              caller's payments (auth)
/// /payments/{id}/card                            confirm card (owner)
/// /payments/{id}/pix/confirm                     confirm PIX (owner)
///
/// /admin/stats                                   dashboard totals
/// /admin/funeral-homes                           list
/// /admin/family-users                            list
/// /admin/cache/clear                             clear public cache (POST)
/// /admin/leads                                   list (?status=)
/// /admin/leads/{id}                              update (PUT)
/// /admin/orders                                  list (?status=&priority=), create
/// /admin/orders/{id}                             get, update
/// /admin/orders/{id}/status                      change status (POST)
/// /admin/orders/{id}/history                     status history
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/memorials", memorials::router())
        .nest("/leads", leads::router())
        .nest("/payments", payments::router())
        .nest("/admin", admin::router())
}
