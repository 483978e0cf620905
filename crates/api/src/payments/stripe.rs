//! Stripe payment intents over the REST API.
//!
//! Requests are form-encoded and authenticated with the secret key as a
//! bearer token. Card declines reported by Stripe are mapped onto
//! [`PaymentError::CardDeclined`] / [`PaymentError::InsufficientFunds`].

use std::time::Duration;

use async_trait::async_trait;
use lembranca_core::payment::{PaymentError, PaymentMethodType, PaymentStatus};
use reqwest::Client;
use serde::Deserialize;

use super::{BoletoDetails, CardDetails, IntentRequest, PaymentProvider, ProviderIntent};
use crate::config::StripeConfig;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct StripeProvider {
    config: StripeConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct StripeIntent {
    id: String,
    client_secret: Option<String>,
    status: String,
    next_action: Option<NextAction>,
}

#[derive(Debug, Deserialize)]
struct NextAction {
    pix_display_qr_code: Option<PixDisplay>,
    boleto_display_details: Option<BoletoDisplay>,
}

#[derive(Debug, Deserialize)]
struct PixDisplay {
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BoletoDisplay {
    hosted_voucher_url: Option<String>,
    number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    code: Option<String>,
    decline_code: Option<String>,
    message: Option<String>,
}

impl StripeProvider {
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| PaymentError::Provider(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.config.api_base)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<StripeIntent, PaymentError> {
        let response = request
            .bearer_auth(&self.config.secret_key)
            .send()
            .await
            .map_err(|e| PaymentError::Provider(format!("Stripe request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<StripeIntent>()
                .await
                .map_err(|e| PaymentError::Provider(format!("Invalid Stripe response: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, body = %body, "Stripe API error");
        Err(map_stripe_error(&body, status.as_u16()))
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    async fn create_intent(&self, request: &IntentRequest) -> Result<ProviderIntent, PaymentError> {
        let form = intent_form(request);
        let intent = self
            .send(self.client.post(self.intents_url()).form(&form))
            .await?;
        tracing::info!(intent_id = %intent.id, method = request.method.as_str(), "Stripe intent created");
        Ok(into_provider_intent(intent))
    }

    async fn confirm_card(
        &self,
        intent_id: &str,
        card: &CardDetails,
    ) -> Result<PaymentStatus, PaymentError> {
        let form = [
            ("payment_method_data[type]", "card".to_string()),
            ("payment_method_data[card][number]", card.number.clone()),
            ("payment_method_data[card][exp_month]", card.exp_month.to_string()),
            ("payment_method_data[card][exp_year]", card.exp_year.to_string()),
            ("payment_method_data[card][cvc]", card.cvc.clone()),
            (
                "payment_method_data[billing_details][name]",
                card.holder_name.clone(),
            ),
        ];
        let url = format!("{}/{intent_id}/confirm", self.intents_url());
        let intent = self.send(self.client.post(url).form(&form)).await?;
        parse_status(&intent.status)
    }

    async fn retrieve_status(&self, intent_id: &str) -> Result<PaymentStatus, PaymentError> {
        let url = format!("{}/{intent_id}", self.intents_url());
        let intent = self.send(self.client.get(url)).await?;
        parse_status(&intent.status)
    }

    fn name(&self) -> &'static str {
        "stripe"
    }
}

/// Form body for a new intent.
///
/// PIX and boleto intents are confirmed on creation so Stripe returns the
/// QR code or voucher in `next_action`.
fn intent_form(request: &IntentRequest) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = vec![
        ("amount".into(), request.amount_cents.to_string()),
        ("currency".into(), request.currency.clone()),
    ];
    match request.method {
        PaymentMethodType::Card => {
            form.push(("automatic_payment_methods[enabled]".into(), "true".into()));
        }
        PaymentMethodType::Pix | PaymentMethodType::Boleto => {
            let method = request.method.as_str();
            form.push(("payment_method_types[]".into(), method.into()));
            form.push(("payment_method_data[type]".into(), method.into()));
            form.push(("confirm".into(), "true".into()));
            if let Some(payer) = &request.payer {
                form.push((
                    "payment_method_data[billing_details][name]".into(),
                    payer.name.clone(),
                ));
                form.push((
                    "payment_method_data[billing_details][email]".into(),
                    payer.email.clone(),
                ));
                let boleto_tax_id = payer
                    .tax_id
                    .as_ref()
                    .filter(|_| request.method == PaymentMethodType::Boleto);
                if let Some(tax_id) = boleto_tax_id {
                    form.push(("payment_method_data[boleto][tax_id]".into(), tax_id.clone()));
                }
            }
        }
    }
    for (key, value) in &request.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }
    form
}

fn parse_status(status: &str) -> Result<PaymentStatus, PaymentError> {
    PaymentStatus::parse(status)
        .ok_or_else(|| PaymentError::Provider(format!("Unknown intent status '{status}'")))
}

fn into_provider_intent(intent: StripeIntent) -> ProviderIntent {
    let status = PaymentStatus::parse(&intent.status).unwrap_or(PaymentStatus::Processing);
    let (pix_code, boleto) = match intent.next_action {
        Some(action) => (
            action.pix_display_qr_code.and_then(|p| p.data),
            action
                .boleto_display_details
                .and_then(|b| match (b.hosted_voucher_url, b.number) {
                    (Some(url), Some(barcode)) => Some(BoletoDetails { url, barcode }),
                    _ => None,
                }),
        ),
        None => (None, None),
    };
    ProviderIntent {
        id: intent.id,
        client_secret: intent.client_secret,
        status,
        pix_code,
        boleto,
    }
}

/// Translate a Stripe error body into a [`PaymentError`].
fn map_stripe_error(body: &str, status: u16) -> PaymentError {
    let Ok(parsed) = serde_json::from_str::<StripeErrorBody>(body) else {
        return PaymentError::Provider(format!("Stripe returned HTTP {status}"));
    };
    let detail = parsed.error;
    match (detail.code.as_deref(), detail.decline_code.as_deref()) {
        (_, Some("insufficient_funds")) => PaymentError::InsufficientFunds,
        (Some("card_declined"), _) => PaymentError::CardDeclined,
        (Some("incorrect_number" | "invalid_number"), _) => PaymentError::InvalidCard,
        _ => PaymentError::Provider(
            detail
                .message
                .unwrap_or_else(|| format!("Stripe returned HTTP {status}")),
        ),
    }
}
