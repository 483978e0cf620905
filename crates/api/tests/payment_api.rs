//! Integration tests for plans, checkout and payment confirmation against
//! the mock payment provider.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use common::{body_json, funeral_home_token, get, get_auth, post_auth, post_json_auth};
use lembranca_db::repositories::PaymentRepo;
use sqlx::PgPool;

async fn checkout(app: axum::Router, token: &str, plan_id: &str, method: &str) -> serde_json::Value {
    let response = post_json_auth(
        app,
        "/api/v1/payments/checkout",
        token,
        serde_json::json!({
            "plan_id": plan_id,
            "payment_method_type": method,
            "tax_id": "123.456.789-09",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn card(number: &str) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "exp_month": 12,
        "exp_year": Utc::now().year() + 2,
        "cvc": "123",
        "holder_name": "MARIA S SILVA",
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plans_are_public(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/payments/plans").await).await;
    let plans = json["data"].as_array().unwrap();

    assert_eq!(plans.len(), 3);
    assert_eq!(plans[0]["id"], "basic");
    assert_eq!(plans[1]["price_cents"], 9990);
    assert_eq!(plans[1]["popular"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn free_plan_succeeds_immediately(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "gratis@funeraria.test").await;

    let data = checkout(app, &token, "basic", "card").await;

    assert_eq!(data["payment"]["status"], "succeeded");
    assert_eq!(data["payment"]["amount_cents"], 0);
    assert!(data["payment"]["provider_intent_id"].as_str().unwrap().starts_with("free_"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_plan_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "plano@funeraria.test").await;

    let response = post_json_auth(
        app,
        "/api/v1/payments/checkout",
        &token,
        serde_json::json!({ "plan_id": "gold", "payment_method_type": "card" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "PLAN_NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn card_checkout_and_confirmation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "cartao@funeraria.test").await;

    let data = checkout(app.clone(), &token, "premium", "card").await;
    assert_eq!(data["payment"]["status"], "requires_payment_method");
    assert_eq!(data["payment"]["currency"], "brl");
    assert!(data["payment"]["client_secret"].is_string());
    let id = data["payment"]["id"].as_i64().unwrap();
    let path = format!("/api/v1/payments/{id}/card");

    let response = post_json_auth(app.clone(), &path, &token, card("4242 4242 4242 4242")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "succeeded");

    // Already paid.
    let response = post_json_auth(app.clone(), &path, &token, card("4242424242424242")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(get_auth(app, "/api/v1/payments/history", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refused_cards_map_to_402(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "recusa@funeraria.test").await;
    let data = checkout(app.clone(), &token, "premium", "card").await;
    let path = format!("/api/v1/payments/{}/card", data["payment"]["id"]);

    let response = post_json_auth(app.clone(), &path, &token, card("4000000000000000")).await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body_json(response).await["code"], "CARD_DECLINED");

    let response = post_json_auth(app.clone(), &path, &token, card("4000000000009999")).await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body_json(response).await["code"], "INSUFFICIENT_FUNDS");

    let response = post_json_auth(app, &path, &token, card("1234")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_CARD_NUMBER");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_card_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "vencido@funeraria.test").await;
    let data = checkout(app.clone(), &token, "premium", "card").await;

    let mut body = card("4242424242424242");
    body["exp_year"] = serde_json::json!(Utc::now().year() - 1);
    let response = post_json_auth(
        app,
        &format!("/api/v1/payments/{}/card", data["payment"]["id"]),
        &token,
        body,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pix_checkout_returns_qr_and_confirms(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = funeral_home_token(app.clone(), "pix@funeraria.test").await;

    let data = checkout(app.clone(), &token, "family", "pix").await;
    assert_eq!(data["payment"]["status"], "requires_action");
    assert!(data["payment"]["pix_code"].is_string());
    assert!(data["payment"]["expires_at"].is_string());
    assert!(data["pix_qr_code"].as_str().unwrap().starts_with("data:image/png;base64,"));
    let id = data["payment"]["id"].as_i64().unwrap();

    // A PIX payment cannot be confirmed as a card.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/payments/{id}/card"),
        &token,
        card("4242424242424242"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_auth(app, &format!("/api/v1/payments/{id}/pix/confirm"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = PaymentRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.status, "succeeded");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn boleto_checkout_returns_barcode(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "boleto@funeraria.test").await;

    let data = checkout(app, &token, "premium", "boleto").await;

    assert_matches!(data["payment"]["boleto_url"].as_str(), Some(url) if url.starts_with("https://"));
    assert_eq!(data["payment"]["boleto_barcode"].as_str().unwrap().len(), 47);
    assert!(data["pix_qr_code"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn boleto_checkout_requires_valid_tax_id(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = funeral_home_token(app.clone(), "cpf@funeraria.test").await;

    for body in [
        serde_json::json!({ "plan_id": "premium", "payment_method_type": "boleto" }),
        serde_json::json!({ "plan_id": "premium", "payment_method_type": "boleto", "tax_id": "123" }),
    ] {
        let response = post_json_auth(app.clone(), "/api/v1/payments/checkout", &token, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn payments_of_other_accounts_are_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, owner) = funeral_home_token(app.clone(), "pagador@funeraria.test").await;
    let (_, other) = funeral_home_token(app.clone(), "bisbilhoteiro@funeraria.test").await;
    let data = checkout(app.clone(), &owner, "premium", "card").await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/payments/{}/card", data["payment"]["id"]),
        &other,
        card("4242424242424242"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn raw_intent_requires_positive_amount(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = funeral_home_token(app.clone(), "intent@funeraria.test").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/payments/intent",
        &token,
        serde_json::json!({ "amount": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/payments/intent",
        &token,
        serde_json::json!({ "amount": 1500, "currency": "BRL" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["currency"], "brl");
    assert!(json["data"]["payment_intent_id"].as_str().unwrap().starts_with("pi_mock_"));
}
