//! Checkout domain rules: plan catalogue, payment method types, intent
//! statuses and card/amount validation.
//!
//! Amounts are always integer cents; plan prices are quoted in BRL.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Currency of every plan in the catalogue.
pub const PLAN_CURRENCY: &str = "brl";

/// Currency used for raw payment intents when the caller omits one.
pub const DEFAULT_INTENT_CURRENCY: &str = "usd";

/// How long a PIX code stays payable.
pub const PIX_EXPIRY_MINUTES: i64 = 30;

/// How long a boleto stays payable.
pub const BOLETO_EXPIRY_DAYS: i64 = 3;

const MIN_CARD_DIGITS: usize = 13;
const MAX_CARD_DIGITS: usize = 19;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Plan '{0}' not found")]
    PlanNotFound(String),

    #[error("Invalid card number")]
    InvalidCard,

    #[error("Card declined. Please try another card")]
    CardDeclined,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Payment provider error: {0}")]
    Provider(String),
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// Billing interval of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanInterval {
    OneTime,
    Month,
    Year,
}

/// A purchasable memorial plan.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price_cents: i64,
    pub currency: &'static str,
    pub interval: PlanInterval,
    pub features: &'static [&'static str],
    pub popular: bool,
    pub stripe_price_id: Option<&'static str>,
}

impl Plan {
    pub fn is_free(&self) -> bool {
        self.price_cents == 0
    }
}

pub const PLANS: &[Plan] = &[
    Plan {
        id: "basic",
        name: "Memorial Básico",
        description: "Ideal para preservar memórias essenciais",
        price_cents: 0,
        currency: PLAN_CURRENCY,
        interval: PlanInterval::OneTime,
        features: &[
            "Página memorial personalizada",
            "Até 5 fotos",
            "Biografia básica",
            "QR Code digital",
            "Compartilhamento em redes sociais",
        ],
        popular: false,
        stripe_price_id: None,
    },
    Plan {
        id: "premium",
        name: "Memorial Premium",
        description: "Recursos completos para homenagens especiais",
        price_cents: 9990,
        currency: PLAN_CURRENCY,
        interval: PlanInterval::OneTime,
        features: &[
            "Tudo do plano Básico",
            "Fotos ilimitadas",
            "Galeria de vídeos",
            "Árvore genealógica",
            "Dedicações ilimitadas",
            "Placa física com QR Code",
            "Suporte prioritário",
        ],
        popular: true,
        stripe_price_id: Some("price_premium_memorial"),
    },
    Plan {
        id: "family",
        name: "Plano Família",
        description: "Para famílias que desejam preservar múltiplas memórias",
        price_cents: 24990,
        currency: PLAN_CURRENCY,
        interval: PlanInterval::Year,
        features: &[
            "Até 5 memoriais Premium",
            "Fotos e vídeos ilimitados",
            "Árvore genealógica conectada",
            "Backup em nuvem",
            "Domínio personalizado",
            "5 placas físicas com QR Code",
            "Suporte VIP 24/7",
        ],
        popular: false,
        stripe_price_id: Some("price_family_annual"),
    },
];

/// Look up a plan by id.
pub fn find_plan(plan_id: &str) -> Result<&'static Plan, PaymentError> {
    PLANS
        .iter()
        .find(|p| p.id == plan_id)
        .ok_or_else(|| PaymentError::PlanNotFound(plan_id.to_string()))
}

// ---------------------------------------------------------------------------
// Method types and statuses
// ---------------------------------------------------------------------------

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Card,
    Pix,
    Boleto,
}

impl PaymentMethodType {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethodType::Card => "card",
            PaymentMethodType::Pix => "pix",
            PaymentMethodType::Boleto => "boleto",
        }
    }
}

/// Payment intent lifecycle, mirroring the provider's status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    Succeeded,
    Canceled,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::RequiresPaymentMethod => "requires_payment_method",
            PaymentStatus::RequiresConfirmation => "requires_confirmation",
            PaymentStatus::RequiresAction => "requires_action",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Canceled => "canceled",
        }
    }

    /// Parse a provider status string. Unknown values map to `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "requires_payment_method" => Some(PaymentStatus::RequiresPaymentMethod),
            "requires_confirmation" => Some(PaymentStatus::RequiresConfirmation),
            "requires_action" => Some(PaymentStatus::RequiresAction),
            "processing" => Some(PaymentStatus::Processing),
            "succeeded" => Some(PaymentStatus::Succeeded),
            "canceled" => Some(PaymentStatus::Canceled),
            _ => None,
        }
    }

    /// Succeeded and canceled payments accept no further confirmation.
    pub fn is_final(self) -> bool {
        matches!(self, PaymentStatus::Succeeded | PaymentStatus::Canceled)
    }
}

/// When an unpaid intent of this method lapses.
pub fn method_expiry(method: PaymentMethodType, now: Timestamp) -> Option<Timestamp> {
    match method {
        PaymentMethodType::Card => None,
        PaymentMethodType::Pix => Some(now + chrono::Duration::minutes(PIX_EXPIRY_MINUTES)),
        PaymentMethodType::Boleto => Some(now + chrono::Duration::days(BOLETO_EXPIRY_DAYS)),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Strip the spaces customers type between card number groups.
pub fn normalize_card_number(number: &str) -> String {
    number.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A card number must be 13 to 19 digits once spaces are removed.
pub fn validate_card_number(number: &str) -> Result<String, PaymentError> {
    let digits = normalize_card_number(number);
    let len = digits.len();
    if !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&len)
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return Err(PaymentError::InvalidCard);
    }
    Ok(digits)
}

/// Boleto payers need a CPF (11 digits) or CNPJ (14 digits).
///
/// Dots, dashes and slashes are stripped; the digits are returned.
pub fn validate_tax_id(raw: &str) -> Result<String, CoreError> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '/' | ' '))
        .collect();
    if !matches!(digits.len(), 11 | 14) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(
            "tax_id must be a CPF (11 digits) or CNPJ (14 digits)".into(),
        ));
    }
    Ok(digits)
}

/// Raw intents need a strictly positive amount in cents.
pub fn validate_intent_amount(amount: i64) -> Result<i64, PaymentError> {
    if amount <= 0 {
        return Err(PaymentError::InvalidAmount(
            "amount must be a positive number".into(),
        ));
    }
    Ok(amount)
}

/// Lowercase the currency, defaulting to [`DEFAULT_INTENT_CURRENCY`].
pub fn normalize_currency(currency: Option<&str>) -> String {
    match currency.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_lowercase(),
        _ => DEFAULT_INTENT_CURRENCY.to_string(),
    }
}
