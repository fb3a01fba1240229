use crate::domain::booking::Booking;
use crate::domain::catalog::{Product, Provider, Service};
use crate::domain::order::Order;
use crate::domain::payment::{Payment, PaymentOutcome, PaymentTarget};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

pub type PaymentStoreRef = Arc<dyn PaymentStore>;
pub type OrderStoreRef = Arc<dyn OrderStore>;
pub type BookingStoreRef = Arc<dyn BookingStore>;
pub type CatalogStoreRef = Arc<dyn CatalogStore>;
pub type GatewayRef = Arc<dyn PaymentGateway>;

/// Payment records, keyed by their unique gateway reference.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn store(&self, payment: Payment) -> Result<()>;
    async fn get(&self, reference: &str) -> Result<Option<Payment>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn store(&self, order: Order) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Order>>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn store(&self, booking: Booking) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Booking>>;
}

/// Read side of the catalog consumed by checkout, plus seeding writes.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn product(&self, id: &str) -> Result<Option<Product>>;
    async fn provider(&self, id: &str) -> Result<Option<Provider>>;
    /// Looks up a service belonging to the given provider.
    async fn service(&self, provider_id: &str, service_id: &str) -> Result<Option<Service>>;
    async fn add_product(&self, product: Product) -> Result<()>;
    async fn add_provider(&self, provider: Provider) -> Result<()>;
    async fn add_service(&self, service: Service) -> Result<()>;
}

/// A hosted checkout session opened at the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializedSession {
    pub authorization_url: Option<String>,
    pub access_code: Option<String>,
}

/// Outcome of a payment attempt as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeReport {
    pub outcome: PaymentOutcome,
    pub channel: Option<String>,
}

/// The payment gateway boundary.
///
/// Implementations must not hold any reconciliation lock across these
/// calls; both may block on network I/O.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a hosted checkout session for the given reference.
    async fn initialize(
        &self,
        reference: &str,
        amount: Decimal,
        email: &str,
        target: &PaymentTarget,
    ) -> Result<InitializedSession>;

    /// Asks the gateway for the outcome of a payment attempt.
    async fn verify(&self, reference: &str) -> Result<OutcomeReport>;
}
