use crate::domain::money::OrderTotals;
use crate::domain::payment::PaymentStatus;
use crate::error::{CoreError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order fulfillment status.
///
/// Delivered and Cancelled are terminal; the transition table is the single
/// source of truth for both manual updates and payment-driven confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Returns whether `self -> to` is a legal edge.
    pub fn can_transition(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, InTransit)
                | (Confirmed, Cancelled)
                | (InTransit, Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{name}")
    }
}

/// Snapshot of a purchased product, priced from the catalog at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub vendor_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Delivery and recipient details captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    pub address: Option<String>,
    pub city: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub personal_message: Option<String>,
    pub is_anonymous: bool,
    pub scheduled_date: Option<NaiveDate>,
}

/// A gift order.
///
/// Money fields are computed once at creation from `OrderTotals` and never
/// recomputed; `total = subtotal + delivery_fee` holds by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Human-readable number, minted once, immutable.
    pub order_number: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub commission: Decimal,
    pub total: Decimal,
    pub is_express: bool,
    pub delivery: DeliveryDetails,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_ref: Option<String>,
}

impl Order {
    pub fn new(
        user_id: &str,
        items: Vec<OrderItem>,
        totals: &OrderTotals,
        delivery: DeliveryDetails,
        is_express: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            order_number: mint_order_number(),
            user_id: user_id.to_string(),
            items,
            subtotal: totals.subtotal,
            delivery_fee: totals.delivery_fee,
            commission: totals.commission,
            total: totals.total,
            is_express,
            delivery,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_ref: None,
        }
    }

    /// Moves the order to `to` if the transition table allows it.
    ///
    /// On an illegal edge the order is left untouched and the error names
    /// both states.
    pub fn transition(&mut self, to: OrderStatus) -> Result<()> {
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

fn mint_order_number() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("QG-{suffix}")
}
