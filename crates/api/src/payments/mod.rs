//! Payment provider abstraction.
//!
//! Handlers talk to a [`PaymentProvider`] trait object stored in
//! [`AppState`](crate::state::AppState). [`stripe::StripeProvider`] calls
//! the Stripe REST API; [`mock::MockProvider`] answers locally and is used
//! whenever no Stripe secret key is configured.

pub mod mock;
pub mod stripe;

use std::sync::Arc;

use async_trait::async_trait;
use lembranca_core::payment::{PaymentError, PaymentMethodType, PaymentStatus};

use crate::config::ServerConfig;

/// Parameters of a new payment intent.
#[derive(Debug, Clone)]
pub struct IntentRequest {
    /// Amount in the currency's minor unit (cents).
    pub amount_cents: i64,
    /// Lowercase ISO currency code.
    pub currency: String,
    pub method: PaymentMethodType,
    /// Free-form key/value pairs attached to the intent.
    pub metadata: Vec<(String, String)>,
    /// Billing details, required by PIX and boleto.
    pub payer: Option<Payer>,
}

/// The person paying a PIX or boleto charge.
#[derive(Debug, Clone)]
pub struct Payer {
    pub name: String,
    pub email: String,
    /// CPF or CNPJ digits. Boleto only.
    pub tax_id: Option<String>,
}

/// Boleto voucher details.
#[derive(Debug, Clone)]
pub struct BoletoDetails {
    pub url: String,
    pub barcode: String,
}

/// An intent as reported back by the provider.
#[derive(Debug, Clone)]
pub struct ProviderIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: PaymentStatus,
    /// PIX copy-paste code, for PIX intents.
    pub pix_code: Option<String>,
    pub boleto: Option<BoletoDetails>,
}

impl ProviderIntent {
    /// PIX intents must carry a code and boleto intents a voucher before they
    /// can be stored.
    pub fn ensure_method_details(&self, method: PaymentMethodType) -> Result<(), PaymentError> {
        let missing = match method {
            PaymentMethodType::Card => false,
            PaymentMethodType::Pix => self.pix_code.is_none(),
            PaymentMethodType::Boleto => self.boleto.is_none(),
        };
        if missing {
            return Err(PaymentError::Provider(format!(
                "{} intent {} has no payment instructions",
                method.as_str(),
                self.id
            )));
        }
        Ok(())
    }
}

/// Card data for a direct confirmation.
#[derive(Debug, Clone)]
pub struct CardDetails {
    /// Digits only.
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
    pub holder_name: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent.
    async fn create_intent(&self, request: &IntentRequest) -> Result<ProviderIntent, PaymentError>;

    /// Confirm a card intent with the given card.
    async fn confirm_card(
        &self,
        intent_id: &str,
        card: &CardDetails,
    ) -> Result<PaymentStatus, PaymentError>;

    /// Fetch the current status of an intent.
    async fn retrieve_status(&self, intent_id: &str) -> Result<PaymentStatus, PaymentError>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}

/// Pick the provider for the given configuration.
///
/// # Panics
///
/// Panics if the Stripe HTTP client cannot be built.
pub fn provider_from_config(config: &ServerConfig) -> Arc<dyn PaymentProvider> {
    match &config.stripe {
        Some(stripe_config) => Arc::new(
            stripe::StripeProvider::new(stripe_config.clone())
                .expect("Failed to build the Stripe HTTP client"),
        ),
        None => Arc::new(mock::MockProvider),
    }
}
