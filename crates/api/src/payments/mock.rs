//! In-process payment provider used when Stripe is not configured.
//!
//! Card numbers ending in `0000` are declined and numbers ending in `9999`
//! fail with insufficient funds; every other confirmation succeeds.

use async_trait::async_trait;
use lembranca_core::payment::{PaymentError, PaymentMethodType, PaymentStatus};
use uuid::Uuid;

use super::{BoletoDetails, CardDetails, IntentRequest, PaymentProvider, ProviderIntent};

const DECLINED_SUFFIX: &str = "0000";
const INSUFFICIENT_FUNDS_SUFFIX: &str = "9999";

#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

#[async_trait]
impl PaymentProvider for MockProvider {
    async fn create_intent(&self, request: &IntentRequest) -> Result<ProviderIntent, PaymentError> {
        let id = format!("pi_mock_{}", Uuid::new_v4().simple());
        let client_secret = Some(format!("{id}_secret_mock"));

        let intent = match request.method {
            PaymentMethodType::Card => ProviderIntent {
                id,
                client_secret,
                status: PaymentStatus::RequiresPaymentMethod,
                pix_code: None,
                boleto: None,
            },
            PaymentMethodType::Pix => {
                let pix_code = mock_pix_code(&id, request.amount_cents);
                ProviderIntent {
                    id,
                    client_secret,
                    status: PaymentStatus::RequiresAction,
                    pix_code: Some(pix_code),
                    boleto: None,
                }
            }
            PaymentMethodType::Boleto => {
                let boleto = BoletoDetails {
                    url: format!("https://boleto.mock/{id}"),
                    barcode: mock_barcode(request.amount_cents),
                };
                ProviderIntent {
                    id,
                    client_secret,
                    status: PaymentStatus::RequiresAction,
                    pix_code: None,
                    boleto: Some(boleto),
                }
            }
        };

        tracing::debug!(intent_id = %intent.id, method = request.method.as_str(), "Mock intent created");
        Ok(intent)
    }

    async fn confirm_card(
        &self,
        intent_id: &str,
        card: &CardDetails,
    ) -> Result<PaymentStatus, PaymentError> {
        if card.number.ends_with(DECLINED_SUFFIX) {
            return Err(PaymentError::CardDeclined);
        }
        if card.number.ends_with(INSUFFICIENT_FUNDS_SUFFIX) {
            return Err(PaymentError::InsufficientFunds);
        }
        tracing::debug!(intent_id, "Mock card payment confirmed");
        Ok(PaymentStatus::Succeeded)
    }

    async fn retrieve_status(&self, _intent_id: &str) -> Result<PaymentStatus, PaymentError> {
        Ok(PaymentStatus::Succeeded)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// BR Code style payload carrying the intent id and amount.
fn mock_pix_code(intent_id: &str, amount_cents: i64) -> String {
    let amount = format!("{}.{:02}", amount_cents / 100, amount_cents % 100);
    format!(
        "00020126580014br.gov.bcb.pix0136{intent_id}520400005303986\
         54{:02}{amount}5802BR5919PORTAL DA LEMBRANCA6009SAO PAULO6304ABCD",
        amount.len()
    )
}

/// 47-digit boleto line ending with the amount in cents.
fn mock_barcode(amount_cents: i64) -> String {
    format!("{:0<32}{:015}", "23793381286", amount_cents.max(0))
}
