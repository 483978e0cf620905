use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use lembranca_core::sitemap::{render_sitemap, SitemapMemorial};
use lembranca_db::repositories::MemorialRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /sitemap.xml -- static pages plus every active public memorial.
async fn sitemap(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let memorials: Vec<SitemapMemorial> = MemorialRepo::list_public(&state.pool, None)
        .await?
        .into_iter()
        .map(|m| SitemapMemorial {
            slug: m.slug,
            is_historical: m.is_historical,
            updated_at: m.updated_at,
        })
        .collect();

    let xml = render_sitemap(&state.config.public_base_url, &memorials);
    Ok(([(CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}

/// Mount the sitemap at the root, next to `/health`.
pub fn router() -> Router<AppState> {
    Router::new().route("/sitemap.xml", get(sitemap))
}
