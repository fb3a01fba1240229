use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A gift product as checkout sees it. Prices are always resolved from this
/// record, never taken from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub vendor_name: String,
    pub price: Decimal,
}

/// A beauty-service provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub business_name: String,
    pub is_available: bool,
}

/// A service offered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub price: Decimal,
    pub duration_minutes: u32,
    pub is_active: bool,
}
