use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;

/// Top-level configuration. Built once at startup and passed by reference
/// into the services; there is no ambient global settings object.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub fees: FeeSettings,
    pub gateway: GatewaySettings,
}

/// Fee and commission knobs used by the money rules.
///
/// Percentages and the deposit ratio are configuration, not constants, so
/// tests can override them.
#[derive(Debug, Clone)]
pub struct FeeSettings {
    /// Flat delivery fee for standard delivery.
    pub delivery_base_fee: Decimal,
    /// Multiplier applied to the base fee for express delivery.
    pub express_multiplier: Decimal,
    /// Platform cut of the gift order subtotal, in percent.
    pub gift_commission_percent: Decimal,
    /// Platform cut of the booked service price, in percent.
    pub beauty_commission_percent: Decimal,
    /// Upfront deposit for a booking, in percent of the service price.
    pub booking_deposit_percent: Decimal,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            delivery_base_fee: dec!(1000),
            express_multiplier: dec!(2.5),
            gift_commission_percent: dec!(25),
            beauty_commission_percent: dec!(20),
            booking_deposit_percent: dec!(30),
        }
    }
}

/// Payment gateway configuration.
///
/// `secret_key` doubles as the webhook HMAC secret. When it is absent the
/// adapter is considered disabled and a dev-mode stub may be selected
/// instead; see `infrastructure::gateway::gateway_for`.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub secret_key: Option<String>,
    pub base_url: String,
    pub callback_url: String,
    pub currency: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            secret_key: None,
            base_url: "https://api.paystack.co".to_string(),
            callback_url: "https://quickgift.ng/payment/callback".to_string(),
            currency: "NGN".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = FeeSettings::default();
        let gateway_defaults = GatewaySettings::default();
        Self {
            fees: FeeSettings {
                delivery_base_fee: decimal_env("DELIVERY_BASE_FEE", defaults.delivery_base_fee),
                express_multiplier: decimal_env("EXPRESS_MULTIPLIER", defaults.express_multiplier),
                gift_commission_percent: decimal_env(
                    "GIFT_COMMISSION_PERCENT",
                    defaults.gift_commission_percent,
                ),
                beauty_commission_percent: decimal_env(
                    "BEAUTY_COMMISSION_PERCENT",
                    defaults.beauty_commission_percent,
                ),
                booking_deposit_percent: decimal_env(
                    "BOOKING_DEPOSIT_PERCENT",
                    defaults.booking_deposit_percent,
                ),
            },
            gateway: GatewaySettings {
                secret_key: env::var("PAYSTACK_SECRET_KEY").ok().filter(|k| !k.is_empty()),
                base_url: env::var("PAYSTACK_BASE_URL").unwrap_or(gateway_defaults.base_url),
                callback_url: env::var("PAYMENT_CALLBACK_URL")
                    .unwrap_or(gateway_defaults.callback_url),
                currency: env::var("PAYMENT_CURRENCY").unwrap_or(gateway_defaults.currency),
            },
        }
    }
}

fn decimal_env(key: &str, default: Decimal) -> Decimal {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
