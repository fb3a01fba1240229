use crate::config::GatewaySettings;
use crate::domain::payment::{PaymentOutcome, PaymentTarget};
use crate::domain::ports::{GatewayRef, InitializedSession, OutcomeReport, PaymentGateway};
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use sha2::Sha512;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

type HmacSha512 = Hmac<Sha512>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Selects the gateway implementation from configuration.
///
/// A configured secret key selects the live Paystack adapter. Without one
/// the adapter is disabled and the auto-success stub is used instead, but
/// only in debug builds: a release build without a secret is a
/// configuration error, never a silent fallback.
pub fn gateway_for(settings: &GatewaySettings) -> Result<GatewayRef> {
    match &settings.secret_key {
        Some(_) => Ok(Arc::new(PaystackGateway::new(settings)?)),
        None if cfg!(debug_assertions) => {
            warn!("no gateway secret configured, using auto-success stub");
            Ok(Arc::new(StubGateway))
        }
        None => Err(CoreError::Validation(
            "gateway secret key is required in release builds".to_string(),
        )),
    }
}

/// Verifies a webhook signature: HMAC-SHA512 over the raw body with the
/// shared secret, hex-encoded in the signature header.
///
/// The comparison is constant-time via `Mac::verify_slice`. Must be called
/// before the body is parsed or any state is touched.
pub fn verify_signature(secret: &str, body: &[u8], signature_hex: &str) -> Result<()> {
    let expected = hex::decode(signature_hex).map_err(|_| CoreError::AuthenticationFailed)?;

    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|_| CoreError::AuthenticationFailed)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| CoreError::AuthenticationFailed)
}

/// Signs a body the way the gateway does. Used by the demo binary and
/// tests to fabricate authentic webhook deliveries.
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Live Paystack adapter.
///
/// Amounts go over the wire in minor units (kobo). Timeouts and non-2xx
/// responses surface as `Unavailable`; the caller decides whether to retry.
pub struct PaystackGateway {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
    callback_url: String,
    currency: String,
}

impl PaystackGateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self> {
        let secret_key = settings
            .secret_key
            .clone()
            .ok_or_else(|| CoreError::Validation("gateway secret key is not set".to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CoreError::Internal(Box::new(e)))?;

        Ok(Self {
            http,
            secret_key,
            base_url: settings.base_url.clone(),
            callback_url: settings.callback_url.clone(),
            currency: settings.currency.clone(),
        })
    }

    fn minor_units(amount: Decimal) -> Result<i64> {
        (amount * Decimal::ONE_HUNDRED)
            .trunc()
            .to_i64()
            .ok_or_else(|| CoreError::Validation(format!("amount {amount} out of range")))
    }
}

#[derive(Deserialize)]
struct InitializeResponse {
    data: InitializeData,
}

#[derive(Deserialize)]
struct InitializeData {
    authorization_url: Option<String>,
    access_code: Option<String>,
}

#[derive(Deserialize)]
struct VerifyResponse {
    data: VerifyData,
}

#[derive(Deserialize)]
struct VerifyData {
    status: String,
    channel: Option<String>,
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    async fn initialize(
        &self,
        reference: &str,
        amount: Decimal,
        email: &str,
        target: &PaymentTarget,
    ) -> Result<InitializedSession> {
        let (order_id, booking_id) = match target {
            PaymentTarget::Order(id) => (Some(id.as_str()), None),
            PaymentTarget::Booking(id) => (None, Some(id.as_str())),
        };
        let body = serde_json::json!({
            "email": email,
            "amount": Self::minor_units(amount)?,
            "reference": reference,
            "callback_url": self.callback_url,
            "currency": self.currency,
            "metadata": {
                "order_id": order_id,
                "booking_id": booking_id,
            },
        });

        let response = self
            .http
            .post(format!("{}/transaction/initialize", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CoreError::Unavailable(format!(
                "initialize returned {}",
                response.status()
            )));
        }

        let parsed: InitializeResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Unavailable(e.to_string()))?;

        Ok(InitializedSession {
            authorization_url: parsed.data.authorization_url,
            access_code: parsed.data.access_code,
        })
    }

    async fn verify(&self, reference: &str) -> Result<OutcomeReport> {
        let response = self
            .http
            .get(format!("{}/transaction/verify/{reference}", self.base_url))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| CoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CoreError::Unavailable(format!(
                "verify returned {}",
                response.status()
            )));
        }

        let parsed: VerifyResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Unavailable(e.to_string()))?;

        let outcome = if parsed.data.status == "success" {
            PaymentOutcome::Success
        } else {
            PaymentOutcome::Failure
        };

        Ok(OutcomeReport { outcome, channel: parsed.data.channel })
    }
}

/// Dev-mode gateway: every payment succeeds without leaving the process.
pub struct StubGateway;

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn initialize(
        &self,
        reference: &str,
        _amount: Decimal,
        _email: &str,
        _target: &PaymentTarget,
    ) -> Result<InitializedSession> {
        info!(reference, "stub gateway session initialized");
        Ok(InitializedSession { authorization_url: None, access_code: None })
    }

    async fn verify(&self, reference: &str) -> Result<OutcomeReport> {
        info!(reference, "stub gateway auto-success");
        Ok(OutcomeReport { outcome: PaymentOutcome::Success, channel: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_round_trip() {
        let body = br#"{"event":"charge.success"}"#;
        let signature = sign_body("secret", body);
        assert!(verify_signature("secret", body, &signature).is_ok());
    }

    #[test]
    fn test_signature_rejects_wrong_secret() {
        let body = br#"{"event":"charge.success"}"#;
        let signature = sign_body("secret", body);
        assert!(matches!(
            verify_signature("other", body, &signature),
            Err(CoreError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_signature_rejects_tampered_body() {
        let signature = sign_body("secret", b"original");
        assert!(verify_signature("secret", b"tampered", &signature).is_err());
    }

    #[test]
    fn test_signature_rejects_non_hex_header() {
        assert!(verify_signature("secret", b"body", "not hex!").is_err());
    }

    #[test]
    fn test_minor_units_conversion() {
        use rust_decimal_macros::dec;
        assert_eq!(PaystackGateway::minor_units(dec!(26000)).unwrap(), 2600000);
        assert_eq!(PaystackGateway::minor_units(dec!(2400.50)).unwrap(), 240050);
    }

    #[tokio::test]
    async fn test_stub_gateway_always_succeeds() {
        let gateway = StubGateway;
        let report = gateway.verify("QG-PAY-TEST").await.unwrap();
        assert_eq!(report.outcome, PaymentOutcome::Success);
    }
}
