use crate::domain::booking::Booking;
use crate::domain::order::Order;
use crate::domain::payment::Payment;
use crate::domain::ports::{BookingStore, OrderStore, PaymentStore};
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for payment records, keyed by gateway reference.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for orders, keyed by id.
pub const CF_ORDERS: &str = "orders";
/// Column Family for bookings, keyed by id.
pub const CF_BOOKINGS: &str = "bookings";

/// A persistent store implementation using RocksDB.
///
/// Payments, orders and bookings live in separate Column Families. Values
/// are serialized with `serde_json`. This struct is thread-safe (`Clone`
/// shares the underlying `Arc<DB>`), so one instance can back all three
/// store ports.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default()),
            ColumnFamilyDescriptor::new(CF_ORDERS, Options::default()),
            ColumnFamilyDescriptor::new(CF_BOOKINGS, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cfs)
            .map_err(|e| CoreError::Internal(Box::new(e)))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn put<T: serde::Serialize>(&self, cf_name: &str, key: &str, value: &T) -> Result<()> {
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| internal(format!("{cf_name} column family not found")))?;
        let bytes = serde_json::to_vec(value).map_err(|e| CoreError::Internal(Box::new(e)))?;
        self.db
            .put_cf(&cf, key.as_bytes(), bytes)
            .map_err(|e| CoreError::Internal(Box::new(e)))
    }

    fn fetch<T: serde::de::DeserializeOwned>(&self, cf_name: &str, key: &str) -> Result<Option<T>> {
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| internal(format!("{cf_name} column family not found")))?;
        let result = self
            .db
            .get_cf(&cf, key.as_bytes())
            .map_err(|e| CoreError::Internal(Box::new(e)))?;

        match result {
            Some(bytes) => {
                let value =
                    serde_json::from_slice(&bytes).map_err(|e| CoreError::Internal(Box::new(e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

fn internal(message: String) -> CoreError {
    CoreError::Internal(Box::new(std::io::Error::other(message)))
}

#[async_trait]
impl PaymentStore for RocksDbStore {
    async fn store(&self, payment: Payment) -> Result<()> {
        self.put(CF_PAYMENTS, &payment.reference, &payment)
    }

    async fn get(&self, reference: &str) -> Result<Option<Payment>> {
        self.fetch(CF_PAYMENTS, reference)
    }
}

#[async_trait]
impl OrderStore for RocksDbStore {
    async fn store(&self, order: Order) -> Result<()> {
        self.put(CF_ORDERS, &order.id, &order)
    }

    async fn get(&self, id: &str) -> Result<Option<Order>> {
        self.fetch(CF_ORDERS, id)
    }
}

#[async_trait]
impl BookingStore for RocksDbStore {
    async fn store(&self, booking: Booking) -> Result<()> {
        self.put(CF_BOOKINGS, &booking.id, &booking)
    }

    async fn get(&self, id: &str) -> Result<Option<Booking>> {
        self.fetch(CF_BOOKINGS, id)
    }
}
