use async_trait::async_trait;
use quickgift_core::application::bookings::BookingService;
use quickgift_core::application::locks::KeyedLocks;
use quickgift_core::application::orders::OrderService;
use quickgift_core::application::payments::PaymentService;
use quickgift_core::config::FeeSettings;
use quickgift_core::domain::catalog::{Product, Provider, Service};
use quickgift_core::domain::payment::{PaymentOutcome, PaymentTarget};
use quickgift_core::domain::ports::{
    CatalogStore, CatalogStoreRef, GatewayRef, InitializedSession, OutcomeReport, PaymentGateway,
    PaymentStoreRef,
};
use quickgift_core::error::Result;
use quickgift_core::infrastructure::in_memory::{
    InMemoryBookingStore, InMemoryCatalogStore, InMemoryOrderStore, InMemoryPaymentStore,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Gateway double that reports a fixed outcome on verify.
pub struct FixedOutcomeGateway {
    pub outcome: PaymentOutcome,
    pub channel: Option<String>,
}

#[async_trait]
impl PaymentGateway for FixedOutcomeGateway {
    async fn initialize(
        &self,
        _reference: &str,
        _amount: Decimal,
        _email: &str,
        _target: &PaymentTarget,
    ) -> Result<InitializedSession> {
        Ok(InitializedSession {
            authorization_url: Some("https://checkout.test/session".to_string()),
            access_code: Some("ac_test".to_string()),
        })
    }

    async fn verify(&self, _reference: &str) -> Result<OutcomeReport> {
        Ok(OutcomeReport { outcome: self.outcome, channel: self.channel.clone() })
    }
}

/// Fully wired services over in-memory stores and a seeded catalog.
pub struct TestApp {
    pub orders: OrderService,
    pub bookings: BookingService,
    pub payments: Arc<PaymentService>,
    pub order_store: InMemoryOrderStore,
    pub payment_store: PaymentStoreRef,
}

pub async fn app() -> TestApp {
    app_with_gateway(Arc::new(FixedOutcomeGateway {
        outcome: PaymentOutcome::Success,
        channel: Some("card".to_string()),
    }))
    .await
}

pub async fn app_with_gateway(gateway: GatewayRef) -> TestApp {
    let order_store = InMemoryOrderStore::new();
    let booking_store = InMemoryBookingStore::new();
    let payment_store: PaymentStoreRef = Arc::new(InMemoryPaymentStore::new());
    let catalog: CatalogStoreRef = Arc::new(InMemoryCatalogStore::new());
    let locks = Arc::new(KeyedLocks::new());
    let fees = FeeSettings::default();

    seed_catalog(&catalog).await;

    let orders = OrderService::new(
        Arc::new(order_store.clone()),
        catalog.clone(),
        locks.clone(),
        fees.clone(),
    );
    let bookings = BookingService::new(
        Arc::new(booking_store.clone()),
        catalog.clone(),
        locks.clone(),
        fees,
    );
    let payments = Arc::new(PaymentService::new(
        payment_store.clone(),
        Arc::new(order_store.clone()),
        Arc::new(booking_store),
        gateway,
        locks,
        "NGN",
    ));

    TestApp { orders, bookings, payments, order_store, payment_store }
}

async fn seed_catalog(catalog: &CatalogStoreRef) {
    catalog
        .add_product(Product {
            id: "p-chocolate".to_string(),
            name: "Chocolate Box".to_string(),
            vendor_name: "Sweet Things".to_string(),
            price: dec!(15000),
        })
        .await
        .unwrap();
    catalog
        .add_product(Product {
            id: "p-candle".to_string(),
            name: "Scented Candle".to_string(),
            vendor_name: "Glow Lagos".to_string(),
            price: dec!(5000),
        })
        .await
        .unwrap();

    catalog
        .add_provider(Provider {
            id: "prov-ada".to_string(),
            business_name: "Ada Beauty Studio".to_string(),
            is_available: true,
        })
        .await
        .unwrap();
    catalog
        .add_provider(Provider {
            id: "prov-busy".to_string(),
            business_name: "Fully Booked".to_string(),
            is_available: false,
        })
        .await
        .unwrap();
    catalog
        .add_provider(Provider {
            id: "prov-zee".to_string(),
            business_name: "Zee Cuts".to_string(),
            is_available: true,
        })
        .await
        .unwrap();

    catalog
        .add_service(Service {
            id: "svc-manicure".to_string(),
            provider_id: "prov-ada".to_string(),
            name: "Gel Manicure".to_string(),
            price: dec!(8000),
            duration_minutes: 60,
            is_active: true,
        })
        .await
        .unwrap();
    catalog
        .add_service(Service {
            id: "svc-retired".to_string(),
            provider_id: "prov-ada".to_string(),
            name: "Retired Treatment".to_string(),
            price: dec!(10000),
            duration_minutes: 90,
            is_active: false,
        })
        .await
        .unwrap();
}
