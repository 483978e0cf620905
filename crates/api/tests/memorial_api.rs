//! Integration tests for memorial management, public pages, QR codes and
//! the sitemap.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, body_text, create_active_memorial, create_memorial, delete_auth,
    funeral_home_token, get, get_auth, post_auth, put_json_auth, TEST_BASE_URL,
};
use lembranca_db::repositories::OrderRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_memorial_opens_production_order(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (fh_id, token) = funeral_home_token(app.clone(), "cria@funeraria.test").await;

    let created = create_memorial(
        app,
        &token,
        serde_json::json!({ "full_name": "José Conceição", "death_date": "2024-05-02" }),
    )
    .await;

    let memorial = &created["memorial"];
    assert!(memorial["slug"].as_str().unwrap().starts_with("jose-conceicao-"));
    assert_eq!(memorial["visibility"], "public");
    assert_eq!(memorial["status_id"], 2);
    assert_eq!(memorial["funeral_home_id"], fh_id);
    assert!(created["invitation"].is_null());

    let order_id = created["order_id"].as_i64().unwrap();
    let order = OrderRepo::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.memorial_id, memorial["id"].as_i64().unwrap());
    let history = OrderRepo::list_history(&pool, order_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].changed_by.as_deref(), Some("cria@funeraria.test"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_memorial_rejects_death_before_birth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "datas@funeraria.test").await;

    let response = common::post_json_auth(
        app,
        "/api/v1/memorials",
        &token,
        serde_json::json!({ "full_name": "Datas Trocadas", "birth_date": "2000-01-01", "death_date": "1990-01-01" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_must_name_the_funeral_home(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;

    let response = common::post_json_auth(
        app,
        "/api/v1/memorials",
        &token,
        serde_json::json!({ "full_name": "Sem Funerária" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invited_family_user_is_linked_without_new_invitation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "link@funeraria.test").await;
    let body = |name: &str| serde_json::json!({ "full_name": name, "family_email": "neto@familia.test" });

    let first = create_memorial(app.clone(), &token, body("Avô Paulo")).await;
    let second = create_memorial(app, &token, body("Avó Lúcia")).await;

    assert!(first["invitation"].is_object());
    assert!(second["invitation"].is_null());
    assert_eq!(
        first["invitation"]["family_user_id"],
        second["memorial"]["family_user_id"]
    );
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn funeral_homes_only_see_their_own_memorials(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, first) = funeral_home_token(app.clone(), "a@funeraria.test").await;
    let (_, second) = funeral_home_token(app.clone(), "b@funeraria.test").await;
    let created = create_memorial(app.clone(), &first, serde_json::json!({ "full_name": "Da Primeira" })).await;
    let id = created["memorial"]["id"].as_i64().unwrap();

    let list = body_json(get_auth(app.clone(), "/api/v1/memorials", &second).await).await;
    assert!(list["data"].as_array().unwrap().is_empty());

    let response = get_auth(app.clone(), &format!("/api/v1/memorials/{id}"), &second).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = admin_token(&pool, app.clone()).await;
    let list = body_json(get_auth(app, "/api/v1/memorials", &admin).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
    assert_eq!(list["data"][0]["photo_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_rejects_unknown_status(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "status@funeraria.test").await;
    let created = create_memorial(app.clone(), &token, serde_json::json!({ "full_name": "Status" })).await;
    let id = created["memorial"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        app,
        &format!("/api/v1/memorials/{id}"),
        &token,
        serde_json::json!({ "status": "archived" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Public pages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_memorial_is_hidden_from_public(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "del@funeraria.test").await;
    let memorial = create_active_memorial(app.clone(), &token, "Antônio Prado").await;
    let id = memorial["id"].as_i64().unwrap();
    let slug = memorial["slug"].as_str().unwrap().to_string();

    let response = delete_auth(app.clone(), &format!("/api/v1/memorials/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status_id"], 3);

    let public_path = format!("/api/v1/memorials/by-slug/{slug}");
    assert_eq!(get(app.clone(), &public_path).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        get(app.clone(), &format!("{public_path}/qr-code")).await.status(),
        StatusCode::NOT_FOUND
    );

    // The owner still reaches it.
    let response = get_auth(app, &public_path, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_memorial_is_forbidden_to_visitors(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "priv@funeraria.test").await;
    let created = create_memorial(
        app.clone(),
        &token,
        serde_json::json!({ "full_name": "Reservado", "visibility": "private" }),
    )
    .await;
    let slug = created["memorial"]["slug"].as_str().unwrap();

    let response = get(app, &format!("/api/v1/memorials/by-slug/{slug}")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_page_includes_nested_content(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "det@funeraria.test").await;
    let memorial = create_active_memorial(app.clone(), &token, "Helena Duarte").await;
    let id = memorial["id"].as_i64().unwrap();
    let slug = memorial["slug"].as_str().unwrap();

    common::post_json_auth(
        app.clone(),
        &format!("/api/v1/memorials/{id}/descendants"),
        &token,
        serde_json::json!({ "name": "Carlos Duarte", "relationship": "Filho" }),
    )
    .await;

    let json = body_json(get(app, &format!("/api/v1/memorials/by-slug/{slug}")).await).await;
    assert_eq!(json["data"]["full_name"], "Helena Duarte");
    assert_eq!(json["data"]["descendants"][0]["name"], "Carlos Duarte");
    assert!(json["data"]["photos"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_listing_is_cached_until_cleared(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = funeral_home_token(app.clone(), "cache@funeraria.test").await;
    create_active_memorial(app.clone(), &token, "Primeiro").await;

    let json = body_json(get(app.clone(), "/api/v1/memorials/public").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    create_active_memorial(app.clone(), &token, "Segundo").await;
    let json = body_json(get(app.clone(), "/api/v1/memorials/public").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1, "served from cache");

    let admin = admin_token(&pool, app.clone()).await;
    let response = post_auth(app.clone(), "/api/v1/admin/cache/clear", &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app, "/api/v1/memorials/public").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_listing_filters_historical(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "hist@funeraria.test").await;
    let memorial = create_active_memorial(app.clone(), &token, "Dom Pedro").await;
    let id = memorial["id"].as_i64().unwrap();
    put_json_auth(
        app.clone(),
        &format!("/api/v1/memorials/{id}"),
        &token,
        serde_json::json!({ "is_historical": true }),
    )
    .await;
    create_active_memorial(app.clone(), &token, "Pessoa Comum").await;

    let json = body_json(get(app, "/api/v1/memorials/public?historical=true").await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["full_name"], "Dom Pedro");
}

// ---------------------------------------------------------------------------
// QR code and sitemap
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn qr_code_encodes_public_url(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "qr@funeraria.test").await;
    let created = create_memorial(app.clone(), &token, serde_json::json!({ "full_name": "Placa" })).await;
    let slug = created["memorial"]["slug"].as_str().unwrap();

    let json = body_json(get(app.clone(), &format!("/api/v1/memorials/by-slug/{slug}/qr-code")).await).await;
    assert_eq!(json["data"]["format"], "png");
    assert_eq!(json["data"]["url"], format!("{TEST_BASE_URL}/m/{slug}"));
    assert!(json["data"]["qr_code"].as_str().unwrap().starts_with("data:image/png;base64,"));

    let json = body_json(
        get(
            app,
            &format!("/api/v1/memorials/by-slug/{slug}/qr-code?format=svg&base_url=https://outro.test/"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["url"], format!("https://outro.test/m/{slug}"));
    assert!(json["data"]["qr_code"].as_str().unwrap().contains("<svg"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sitemap_lists_active_public_memorials(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "map@funeraria.test").await;
    let active = create_active_memorial(app.clone(), &token, "No Mapa").await;
    let pending = create_memorial(app.clone(), &token, serde_json::json!({ "full_name": "Fora do Mapa" })).await;

    let response = get(app, "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/xml; charset=utf-8"
    );

    let xml = body_text(response).await;
    assert!(xml.contains(&format!("<loc>{TEST_BASE_URL}/sobre</loc>")));
    assert!(xml.contains(&format!("/m/{}</loc>", active["slug"].as_str().unwrap())));
    assert!(!xml.contains(pending["memorial"]["slug"].as_str().unwrap()));
}
