use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status as seen from the fulfillment side (order or booking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        };
        write!(f, "{name}")
    }
}

/// What a payment pays for. Exactly one of order or booking, by type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum PaymentTarget {
    Order(String),
    Booking(String),
}

/// Lifecycle of the payment record itself.
///
/// Success, Failed and Refunded are terminal: once reached, the state is
/// never rewritten, which is what makes duplicated or out-of-order outcome
/// reports safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Pending,
    Success,
    Failed,
    Refunded,
}

impl PaymentState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentState::Pending)
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentState::Pending => "pending",
            PaymentState::Success => "success",
            PaymentState::Failed => "failed",
            PaymentState::Refunded => "refunded",
        };
        write!(f, "{name}")
    }
}

/// Externally-reported result of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Failure,
}

impl PaymentOutcome {
    /// The terminal payment state this outcome settles into.
    pub fn settled_state(self) -> PaymentState {
        match self {
            PaymentOutcome::Success => PaymentState::Success,
            PaymentOutcome::Failure => PaymentState::Failed,
        }
    }
}

/// A payment attempt against the gateway.
///
/// The reference is the idempotency key shared with the gateway; it is
/// minted once and immutable. Only the reconciliation engine mutates state
/// and channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub reference: String,
    pub user_id: String,
    pub target: PaymentTarget,
    pub amount: Decimal,
    pub currency: String,
    pub state: PaymentState,
    /// Settlement channel reported by the gateway (card, bank, ussd, ...).
    pub channel: Option<String>,
}

impl Payment {
    pub fn new(user_id: &str, target: PaymentTarget, amount: Decimal, currency: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            reference: mint_reference(),
            user_id: user_id.to_string(),
            target,
            amount,
            currency: currency.to_string(),
            state: PaymentState::Pending,
            channel: None,
        }
    }
}

/// Mints a gateway reference: routable prefix plus an opaque suffix.
pub fn mint_reference() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..12].to_uppercase();
    format!("QG-PAY-{suffix}")
}
