use crate::domain::catalog::Service;
use crate::domain::money::BookingCharges;
use crate::domain::payment::PaymentStatus;
use crate::error::{CoreError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking lifecycle status. Same shape as the order machine but an
/// independent transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Returns whether `self -> to` is a legal edge.
    pub fn can_transition(self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (InProgress, Completed)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        };
        write!(f, "{name}")
    }
}

/// Scheduling details captured when the booking is placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingSlot {
    pub date: Option<NaiveDate>,
    /// Wall-clock start, e.g. "10:00".
    pub time: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// A beauty-service booking.
///
/// The service is snapshotted (name, price, duration) so later catalog edits
/// do not change what was booked. Deposit and commission are computed once
/// at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    /// Human-readable number, minted once, immutable.
    pub booking_number: String,
    pub user_id: String,
    pub provider_id: String,
    pub service_id: String,
    pub service_name: String,
    pub price: Decimal,
    pub duration_minutes: u32,
    pub slot: BookingSlot,
    pub deposit: Decimal,
    pub commission: Decimal,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_ref: Option<String>,
}

impl Booking {
    pub fn new(user_id: &str, service: &Service, charges: &BookingCharges, slot: BookingSlot) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            booking_number: mint_booking_number(),
            user_id: user_id.to_string(),
            provider_id: service.provider_id.clone(),
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            price: service.price,
            duration_minutes: service.duration_minutes,
            slot,
            deposit: charges.deposit,
            commission: charges.commission,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_ref: None,
        }
    }

    /// Moves the booking to `to` if the transition table allows it.
    pub fn transition(&mut self, to: BookingStatus) -> Result<()> {
        if self.status.can_transition(to) {
            self.status = to;
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            })
        }
    }

    /// Records a successful payment. The payment reference is set once.
    pub fn mark_paid(&mut self, reference: &str) {
        self.payment_status = PaymentStatus::Paid;
        if self.payment_ref.is_none() {
            self.payment_ref = Some(reference.to_string());
        }
    }
}

fn mint_booking_number() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("QB-{suffix}")
}
