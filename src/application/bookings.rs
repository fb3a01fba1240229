use crate::application::locks::KeyedLocks;
use crate::config::FeeSettings;
use crate::domain::booking::{Booking, BookingSlot, BookingStatus};
use crate::domain::money;
use crate::domain::ports::{BookingStore, BookingStoreRef, CatalogStore, CatalogStoreRef};
use crate::error::{CoreError, Result};
use std::sync::Arc;
use tracing::info;

/// Request to book a provider's service.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub provider_id: String,
    pub service_id: String,
    pub slot: BookingSlot,
}

/// Creates bookings and applies manual status transitions.
pub struct BookingService {
    bookings: BookingStoreRef,
    catalog: CatalogStoreRef,
    locks: Arc<KeyedLocks>,
    fees: FeeSettings,
}

impl BookingService {
    pub fn new(
        bookings: BookingStoreRef,
        catalog: CatalogStoreRef,
        locks: Arc<KeyedLocks>,
        fees: FeeSettings,
    ) -> Self {
        Self { bookings, catalog, locks, fees }
    }

    /// Books a service with an available provider.
    ///
    /// Requires the provider to exist and be available, and an active
    /// service belonging to that provider. The service is snapshotted into
    /// the booking; deposit and commission are computed once here.
    pub async fn create(&self, user_id: &str, req: CreateBooking) -> Result<Booking> {
        let provider = self
            .catalog
            .provider(&req.provider_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("provider {}", req.provider_id)))?;

        if !provider.is_available {
            return Err(CoreError::Validation(format!(
                "provider {} is currently unavailable",
                provider.business_name
            )));
        }

        let service = self
            .catalog
            .service(&req.provider_id, &req.service_id)
            .await?
            .filter(|service| service.is_active)
            .ok_or_else(|| CoreError::NotFound(format!("service {}", req.service_id)))?;

        let charges = money::booking_charges(service.price, &self.fees);
        let booking = Booking::new(user_id, &service, &charges, req.slot);
        self.bookings.store(booking.clone()).await?;

        info!(booking = %booking.booking_number, deposit = %booking.deposit, "booking created");
        Ok(booking)
    }

    pub async fn get(&self, booking_id: &str) -> Result<Booking> {
        self.bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))
    }

    /// Applies a manual status transition.
    ///
    /// Runs under the same per-entity lock the reconciliation engine uses.
    pub async fn update_status(&self, booking_id: &str, to: BookingStatus) -> Result<Booking> {
        let _guard = self.locks.acquire(booking_id).await;

        let mut booking = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))?;
        booking.transition(to)?;
        self.bookings.store(booking.clone()).await?;

        info!(booking = %booking.booking_number, status = %booking.status, "booking status updated");
        Ok(booking)
    }
}
