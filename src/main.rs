use clap::Parser;
use miette::{IntoDiagnostic, Result};
use quickgift_core::application::locks::KeyedLocks;
use quickgift_core::application::orders::{CreateOrder, OrderLine, OrderService};
use quickgift_core::application::payments::{InitializePayment, PaymentService};
use quickgift_core::config::Settings;
use quickgift_core::domain::order::DeliveryDetails;
use quickgift_core::domain::payment::PaymentTarget;
use quickgift_core::domain::ports::{
    BookingStoreRef, CatalogStore, CatalogStoreRef, OrderStoreRef, PaymentStoreRef,
};
use quickgift_core::infrastructure::gateway::gateway_for;
use quickgift_core::infrastructure::in_memory::{
    InMemoryBookingStore, InMemoryCatalogStore, InMemoryOrderStore, InMemoryPaymentStore,
};
use quickgift_core::interfaces::csv::catalog_reader::CatalogReader;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

/// Dev harness: seeds the catalog from CSV, checks out every product as one
/// gift order, runs the payment through the configured gateway and prints
/// the reconciled state.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Product catalog CSV file (id, name, vendor_name, price)
    catalog: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Price the order with express delivery
    #[arg(long)]
    express: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    // Seed the catalog
    let catalog: CatalogStoreRef = Arc::new(InMemoryCatalogStore::new());
    let file = File::open(&cli.catalog).into_diagnostic()?;
    let mut product_ids = Vec::new();
    for product in CatalogReader::new(file).products() {
        match product {
            Ok(product) => {
                product_ids.push(product.id.clone());
                catalog.add_product(product).await.into_diagnostic()?;
            }
            Err(e) => {
                eprintln!("Error reading product: {}", e);
            }
        }
    }

    let (payments, orders, bookings) = match &cli.db_path {
        Some(db_path) => open_persistent_stores(db_path)?,
        None => (
            Arc::new(InMemoryPaymentStore::new()) as PaymentStoreRef,
            Arc::new(InMemoryOrderStore::new()) as OrderStoreRef,
            Arc::new(InMemoryBookingStore::new()) as BookingStoreRef,
        ),
    };

    let locks = Arc::new(KeyedLocks::new());
    let gateway = gateway_for(&settings.gateway).into_diagnostic()?;

    let order_service = OrderService::new(
        orders.clone(),
        catalog.clone(),
        locks.clone(),
        settings.fees.clone(),
    );
    let payment_service = PaymentService::new(
        payments,
        orders,
        bookings,
        gateway,
        locks,
        &settings.gateway.currency,
    );

    // Checkout: one of everything in the catalog
    let order = order_service
        .create(
            "demo-user",
            CreateOrder {
                items: product_ids
                    .iter()
                    .map(|id| OrderLine { product_id: id.clone(), quantity: 1 })
                    .collect(),
                delivery: DeliveryDetails::default(),
                is_express: cli.express,
            },
        )
        .await
        .into_diagnostic()?;

    let receipt = payment_service
        .initialize(
            "demo-user",
            InitializePayment {
                target: PaymentTarget::Order(order.id.clone()),
                amount: order.total,
                email: "demo@quickgift.ng".to_string(),
            },
        )
        .await
        .into_diagnostic()?;

    let reconciliation = payment_service
        .verify(&receipt.reference)
        .await
        .into_diagnostic()?;

    let order = order_service.get(&order.id).await.into_diagnostic()?;
    println!(
        "order,{},{},{},{},{}",
        order.order_number,
        order.total.normalize(),
        order.status,
        order.payment_status,
        order.payment_ref.as_deref().unwrap_or("-"),
    );
    println!(
        "payment,{},{},{}",
        reconciliation.payment.reference,
        reconciliation.payment.state,
        reconciliation.payment.channel.as_deref().unwrap_or("-"),
    );

    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
fn open_persistent_stores(
    db_path: &std::path::Path,
) -> Result<(PaymentStoreRef, OrderStoreRef, BookingStoreRef)> {
    let store =
        quickgift_core::infrastructure::rocksdb::RocksDbStore::open(db_path).into_diagnostic()?;
    Ok((
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store),
    ))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_persistent_stores(
    db_path: &std::path::Path,
) -> Result<(PaymentStoreRef, OrderStoreRef, BookingStoreRef)> {
    let _ = db_path;
    Err(miette::miette!(
        "--db-path requires building with --features storage-rocksdb"
    ))
}
