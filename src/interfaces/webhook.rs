use crate::application::payments::PaymentService;
use crate::domain::payment::PaymentOutcome;
use crate::error::{CoreError, Result};
use crate::infrastructure::gateway::verify_signature;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Acknowledgement returned to the gateway. Always `Ok` once the signature
/// checks out and the reference resolves, even for a no-op, so the gateway
/// stops retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookAck {
    Ok,
}

#[derive(Deserialize)]
struct WebhookEvent {
    event: String,
    data: WebhookData,
}

#[derive(Deserialize)]
struct WebhookData {
    reference: String,
    channel: Option<String>,
}

/// Inbound webhook adapter: authenticates the raw body, extracts the
/// outcome and funnels it into the reconciliation engine.
pub struct WebhookHandler {
    payments: Arc<PaymentService>,
    secret: Option<String>,
}

impl WebhookHandler {
    /// `secret` is the shared HMAC secret; `None` disables signature
    /// checking (dev mode, where the stub gateway is in play anyway).
    pub fn new(payments: Arc<PaymentService>, secret: Option<String>) -> Self {
        Self { payments, secret }
    }

    /// Handles one webhook delivery.
    ///
    /// The signature is verified against the raw body before anything is
    /// parsed or mutated; a mismatch is `AuthenticationFailed`. Deliveries
    /// may arrive duplicated or out of order; the engine's idempotency
    /// rule makes that safe, and a late report conflicting with a settled
    /// payment is acknowledged (logged) rather than bounced, so the
    /// gateway does not keep retrying something that can never apply.
    pub async fn handle(&self, raw_body: &[u8], signature: Option<&str>) -> Result<WebhookAck> {
        if let Some(secret) = &self.secret {
            let signature = signature.ok_or(CoreError::AuthenticationFailed)?;
            verify_signature(secret, raw_body, signature)?;
        }

        let event: WebhookEvent = serde_json::from_slice(raw_body)
            .map_err(|e| CoreError::Validation(format!("malformed webhook payload: {e}")))?;

        let outcome = match event.event.as_str() {
            "charge.success" => PaymentOutcome::Success,
            "charge.failed" => PaymentOutcome::Failure,
            other => {
                info!(event = other, "ignoring webhook event");
                return Ok(WebhookAck::Ok);
            }
        };

        match self
            .payments
            .apply_outcome(&event.data.reference, outcome, event.data.channel)
            .await
        {
            Ok(_) => Ok(WebhookAck::Ok),
            Err(CoreError::Conflict { reference, state }) => {
                warn!(reference, state, "late webhook conflicts with settled payment, acknowledged");
                Ok(WebhookAck::Ok)
            }
            Err(err) => Err(err),
        }
    }
}
