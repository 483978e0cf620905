//! Route definitions for `/memorials` and its nested resources.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::{dedications, descendants, memorials, photos};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(memorials::list_memorials).post(memorials::create_memorial),
        )
        .route("/public", get(memorials::list_public_memorials))
        .route("/by-slug/{slug}", get(memorials::get_memorial_by_slug))
        .route("/by-slug/{slug}/qr-code", get(memorials::memorial_qr_code))
        .route(
            "/{id}",
            get(memorials::get_memorial)
                .put(memorials::update_memorial)
                .delete(memorials::delete_memorial),
        )
        .route(
            "/{id}/descendants",
            get(descendants::list_descendants).post(descendants::create_descendant),
        )
        .route(
            "/{id}/descendants/{item_id}",
            delete(descendants::delete_descendant),
        )
        .route(
            "/{id}/photos",
            get(photos::list_photos).post(photos::create_photo),
        )
        .route(
            "/{id}/photos/{item_id}",
            put(photos::update_photo).delete(photos::delete_photo),
        )
        .route(
            "/{id}/dedications",
            get(dedications::list_dedications).post(dedications::create_dedication),
        )
        .route(
            "/{id}/dedications/{item_id}",
            delete(dedications::delete_dedication),
        )
}
