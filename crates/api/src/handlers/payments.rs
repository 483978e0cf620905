//! Handlers for the `/payments` resource.
//!
//! Checkout records one `payments` row per attempt. Card payments are then
//! confirmed with card data; PIX payments are confirmed by asking the
//! provider for the current status.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Utc};
use lembranca_core::error::CoreError;
use lembranca_core::payment::{
    find_plan, method_expiry, normalize_currency, validate_card_number, validate_intent_amount,
    validate_tax_id, PaymentMethodType, PaymentStatus, Plan, PLANS, PLAN_CURRENCY,
};
use lembranca_core::qr;
use lembranca_core::types::DbId;
use lembranca_db::models::payment::{CreatePayment, Payment};
use lembranca_db::repositories::PaymentRepo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::load_managed_memorial;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::handlers::actor_contact;
use crate::payments::{CardDetails, IntentRequest, Payer};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    /// Amount in cents.
    pub amount: i64,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub payment_intent_id: String,
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub plan_id: String,
    pub payment_method_type: PaymentMethodType,
    pub memorial_id: Option<DbId>,
    /// CPF or CNPJ of the payer. Required for boleto.
    pub tax_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub payment: Payment,
    pub plan: &'static Plan,
    /// PNG data URL of the PIX code, for PIX checkouts.
    pub pix_qr_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmCardRequest {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
    pub holder_name: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/payments/plans
pub async fn list_plans() -> Json<DataResponse<&'static [Plan]>> {
    Json(DataResponse::new(PLANS))
}

/// POST /api/v1/payments/intent
///
/// Raw provider intent; nothing is stored.
pub async fn create_intent(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateIntentRequest>,
) -> AppResult<Json<DataResponse<IntentResponse>>> {
    let amount = validate_intent_amount(input.amount)?;
    let currency = normalize_currency(input.currency.as_deref());

    let intent = state
        .payments
        .create_intent(&IntentRequest {
            amount_cents: amount,
            currency: currency.clone(),
            method: PaymentMethodType::Card,
            metadata: account_metadata(&user),
            payer: None,
        })
        .await?;

    Ok(Json(DataResponse::new(IntentResponse {
        payment_intent_id: intent.id,
        client_secret: intent.client_secret,
        amount,
        currency,
    })))
}

/// POST /api/v1/payments/checkout
///
/// Free plans are recorded as succeeded without contacting the provider.
/// PIX and boleto intents that come back without payment instructions are
/// rejected before anything is stored.
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CheckoutResponse>>)> {
    let plan = find_plan(&input.plan_id)?;
    if let Some(memorial_id) = input.memorial_id {
        load_managed_memorial(&state.pool, memorial_id, &user).await?;
    }

    let method = input.payment_method_type;
    let mut create = CreatePayment {
        account_role: user.role.clone(),
        account_id: user.account_id,
        plan_id: plan.id.to_string(),
        memorial_id: input.memorial_id,
        provider_intent_id: format!("free_{}", Uuid::new_v4().simple()),
        client_secret: None,
        amount_cents: plan.price_cents,
        currency: PLAN_CURRENCY.to_string(),
        payment_method_type: method.as_str().to_string(),
        status: PaymentStatus::Succeeded.as_str().to_string(),
        pix_code: None,
        boleto_url: None,
        boleto_barcode: None,
        expires_at: None,
    };

    if !plan.is_free() {
        let payer = match method {
            PaymentMethodType::Card => None,
            PaymentMethodType::Pix | PaymentMethodType::Boleto => {
                let tax_id = match (method, input.tax_id.as_deref()) {
                    (PaymentMethodType::Boleto, None) => {
                        return Err(AppError::Core(CoreError::Validation(
                            "tax_id is required for boleto".into(),
                        )));
                    }
                    (_, Some(raw)) => Some(validate_tax_id(raw)?),
                    (_, None) => None,
                };
                let contact = actor_contact(&state.pool, &user).await?.ok_or_else(|| {
                    AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
                })?;
                Some(Payer {
                    name: contact.name,
                    email: contact.email,
                    tax_id,
                })
            }
        };

        let mut metadata = account_metadata(&user);
        metadata.push(("plan_id".into(), plan.id.to_string()));
        if let Some(memorial_id) = input.memorial_id {
            metadata.push(("memorial_id".into(), memorial_id.to_string()));
        }

        let intent = state
            .payments
            .create_intent(&IntentRequest {
                amount_cents: plan.price_cents,
                currency: PLAN_CURRENCY.to_string(),
                method,
                metadata,
                payer,
            })
            .await?;
        intent.ensure_method_details(method)?;

        create.provider_intent_id = intent.id;
        create.client_secret = intent.client_secret;
        create.status = intent.status.as_str().to_string();
        create.pix_code = intent.pix_code;
        if let Some(boleto) = intent.boleto {
            create.boleto_url = Some(boleto.url);
            create.boleto_barcode = Some(boleto.barcode);
        }
        create.expires_at = method_expiry(method, Utc::now());
    }

    let pix_qr_code = create
        .pix_code
        .as_deref()
        .map(qr::render_png_data_url)
        .transpose()?;

    let payment = PaymentRepo::create(&state.pool, &create).await?;
    tracing::info!(
        payment_id = payment.id,
        plan_id = plan.id,
        method = method.as_str(),
        provider = state.payments.name(),
        "Checkout started",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(CheckoutResponse {
            payment,
            plan,
            pix_qr_code,
        })),
    ))
}

/// POST /api/v1/payments/{id}/card
pub async fn confirm_card(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ConfirmCardRequest>,
) -> AppResult<Json<DataResponse<Payment>>> {
    let payment = load_owned_payment(&state, id, &user).await?;
    ensure_open(&payment, PaymentMethodType::Card)?;

    let number = validate_card_number(&input.number)?;
    validate_card_fields(&input)?;

    let card = CardDetails {
        number,
        exp_month: input.exp_month,
        exp_year: input.exp_year,
        cvc: input.cvc.trim().to_string(),
        holder_name: input.holder_name.trim().to_string(),
    };
    let status = state
        .payments
        .confirm_card(&payment.provider_intent_id, &card)
        .await
        .inspect_err(|e| tracing::info!(payment_id = id, error = %e, "Card payment refused"))?;

    let payment = PaymentRepo::update_status(&state.pool, id, status.as_str())
        .await?
        .ok_or(AppError::not_found("Payment", id))?;
    tracing::info!(payment_id = id, status = status.as_str(), "Card payment confirmed");
    Ok(Json(DataResponse::new(payment)))
}

/// POST /api/v1/payments/{id}/pix/confirm
///
/// Syncs the status from the provider. An unpaid PIX code past its expiry
/// answers 409.
pub async fn confirm_pix(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Payment>>> {
    let payment = load_owned_payment(&state, id, &user).await?;
    ensure_open(&payment, PaymentMethodType::Pix)?;

    if payment.expires_at.is_some_and(|exp| exp < Utc::now()) {
        return Err(AppError::Core(CoreError::Conflict(
            "PIX code has expired".into(),
        )));
    }

    let status = state
        .payments
        .retrieve_status(&payment.provider_intent_id)
        .await?;
    let payment = PaymentRepo::update_status(&state.pool, id, status.as_str())
        .await?
        .ok_or(AppError::not_found("Payment", id))?;
    Ok(Json(DataResponse::new(payment)))
}

/// GET /api/v1/payments/history
pub async fn payment_history(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    let payments = PaymentRepo::list_for_account(&state.pool, &user.role, user.account_id).await?;
    Ok(Json(DataResponse::new(payments)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn account_metadata(user: &AuthUser) -> Vec<(String, String)> {
    vec![
        ("account_role".into(), user.role.clone()),
        ("account_id".into(), user.account_id.to_string()),
    ]
}

/// Payments of other accounts answer 404 rather than leaking their ids.
async fn load_owned_payment(state: &AppState, id: DbId, user: &AuthUser) -> AppResult<Payment> {
    PaymentRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.account_role == user.role && p.account_id == user.account_id)
        .ok_or(AppError::not_found("Payment", id))
}

fn ensure_open(payment: &Payment, method: PaymentMethodType) -> AppResult<()> {
    if payment.payment_method_type != method.as_str() {
        return Err(AppError::BadRequest(format!(
            "Payment {} is not a {} payment",
            payment.id,
            method.as_str()
        )));
    }
    if PaymentStatus::parse(&payment.status).is_some_and(PaymentStatus::is_final) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Payment {} is already {}",
            payment.id, payment.status
        ))));
    }
    Ok(())
}

fn validate_card_fields(input: &ConfirmCardRequest) -> AppResult<()> {
    let invalid = |msg: &str| Err(AppError::Core(CoreError::Validation(msg.into())));

    if !(1..=12).contains(&input.exp_month) {
        return invalid("exp_month must be between 1 and 12");
    }
    let now = Utc::now();
    let (year, month) = (now.year() as u32, now.month());
    if input.exp_year < year || (input.exp_year == year && input.exp_month < month) {
        return invalid("Card has expired");
    }
    let cvc = input.cvc.trim();
    if !(3..=4).contains(&cvc.len()) || !cvc.chars().all(|c| c.is_ascii_digit()) {
        return invalid("cvc must be 3 or 4 digits");
    }
    if input.holder_name.trim().is_empty() {
        return invalid("holder_name is required");
    }
    Ok(())
}
