use crate::application::locks::KeyedLocks;
use crate::domain::booking::BookingStatus;
use crate::domain::money::Amount;
use crate::domain::order::OrderStatus;
use crate::domain::payment::{Payment, PaymentOutcome, PaymentState, PaymentTarget};
use crate::domain::ports::{
    BookingStore, BookingStoreRef, GatewayRef, OrderStore, OrderStoreRef, PaymentGateway,
    PaymentStore, PaymentStoreRef,
};
use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

/// Request to open a payment session for an order or booking.
#[derive(Debug, Clone)]
pub struct InitializePayment {
    pub target: PaymentTarget,
    pub amount: Decimal,
    pub email: String,
}

/// What the client needs to complete checkout at the gateway.
#[derive(Debug, Clone)]
pub struct InitializeReceipt {
    pub reference: String,
    pub authorization_url: Option<String>,
}

/// Result of reconciling one outcome report.
///
/// `applied` is false when the report was an idempotent replay of an
/// already-settled outcome.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub payment: Payment,
    pub applied: bool,
}

/// Initializes payments and reconciles externally-reported outcomes.
///
/// `apply_outcome` is the single reconciliation entry point: the client
/// verify call, the webhook and the dev-mode fallback all funnel into it,
/// so the idempotency and transition rules live in exactly one place.
pub struct PaymentService {
    payments: PaymentStoreRef,
    orders: OrderStoreRef,
    bookings: BookingStoreRef,
    gateway: GatewayRef,
    locks: Arc<KeyedLocks>,
    currency: String,
}

impl PaymentService {
    pub fn new(
        payments: PaymentStoreRef,
        orders: OrderStoreRef,
        bookings: BookingStoreRef,
        gateway: GatewayRef,
        locks: Arc<KeyedLocks>,
        currency: &str,
    ) -> Self {
        Self {
            payments,
            orders,
            bookings,
            gateway,
            locks,
            currency: currency.to_string(),
        }
    }

    /// Mints a reference, persists the pending payment and opens a gateway
    /// session.
    ///
    /// The gateway call blocks on network I/O and therefore happens outside
    /// every lock; the payment is already persisted as pending, so a
    /// webhook racing the response is handled like any other report.
    pub async fn initialize(&self, user_id: &str, req: InitializePayment) -> Result<InitializeReceipt> {
        match &req.target {
            PaymentTarget::Order(id) => {
                self.orders
                    .get(id)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(format!("order {id}")))?;
            }
            PaymentTarget::Booking(id) => {
                self.bookings
                    .get(id)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(format!("booking {id}")))?;
            }
        }
        let amount = Amount::new(req.amount)?;

        let payment = Payment::new(user_id, req.target, amount.value(), &self.currency);
        self.payments.store(payment.clone()).await?;
        info!(reference = %payment.reference, amount = %payment.amount, "payment initialized");

        let session = self
            .gateway
            .initialize(&payment.reference, payment.amount, &req.email, &payment.target)
            .await?;

        Ok(InitializeReceipt {
            reference: payment.reference,
            authorization_url: session.authorization_url,
        })
    }

    pub async fn get(&self, reference: &str) -> Result<Payment> {
        self.payments
            .get(reference)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("payment {reference}")))
    }

    /// Client-pull verification: asks the gateway for the outcome, then
    /// reconciles it.
    pub async fn verify(&self, reference: &str) -> Result<Reconciliation> {
        // Resolve the reference before the network round trip so an unknown
        // reference is a crisp NotFound rather than a gateway error.
        self.get(reference).await?;

        let report = self.gateway.verify(reference).await?;
        self.apply_outcome(reference, report.outcome, report.channel).await
    }

    /// Reconciles one externally-reported outcome against the payment and
    /// its linked order or booking.
    ///
    /// Attempts for the same reference serialize on a per-reference lock;
    /// unrelated references reconcile in parallel. A replay of an already-
    /// settled outcome is a no-op returning the current state. A report
    /// conflicting with a terminal state is rejected: terminal payment
    /// state is never rewritten.
    pub async fn apply_outcome(
        &self,
        reference: &str,
        outcome: PaymentOutcome,
        channel: Option<String>,
    ) -> Result<Reconciliation> {
        let _guard = self.locks.acquire(reference).await;

        let payment = self
            .payments
            .get(reference)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("payment {reference}")))?;

        if payment.state.is_terminal() {
            if payment.state == outcome.settled_state() {
                info!(reference, state = %payment.state, "outcome already applied, replay ignored");
                return Ok(Reconciliation { payment, applied: false });
            }
            return Err(CoreError::Conflict {
                reference: reference.to_string(),
                state: payment.state.to_string(),
            });
        }

        match outcome {
            PaymentOutcome::Failure => {
                let mut updated = payment;
                updated.state = PaymentState::Failed;
                self.payments.store(updated.clone()).await?;
                // No automatic cancellation: the order/booking stays as-is.
                warn!(reference, "payment failed, fulfillment left untouched");
                Ok(Reconciliation { payment: updated, applied: true })
            }
            PaymentOutcome::Success => {
                let before = payment.clone();
                let mut updated = payment;
                updated.state = PaymentState::Success;
                updated.channel = channel;
                self.payments.store(updated.clone()).await?;

                if let Err(err) = self.settle_target(&updated).await {
                    // Both writes are one unit: restore the payment so no
                    // divergent pair outlives this call.
                    self.payments.store(before).await?;
                    return Err(err);
                }

                info!(reference, channel = updated.channel.as_deref(), "payment reconciled");
                Ok(Reconciliation { payment: updated, applied: true })
            }
        }
    }

    /// Marks the linked order or booking paid and drives pending→confirmed.
    ///
    /// Shares the per-entity lock with the manual status updaters. If the
    /// entity already left pending through a manual transition, the payment
    /// fields are still written and the status is left alone.
    async fn settle_target(&self, payment: &Payment) -> Result<()> {
        match &payment.target {
            PaymentTarget::Order(id) => {
                let _guard = self.locks.acquire(id).await;

                let mut order = self
                    .orders
                    .get(id)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(format!("order {id}")))?;
                order.mark_paid(&payment.reference);
                if order.status == OrderStatus::Pending {
                    order.transition(OrderStatus::Confirmed)?;
                } else {
                    warn!(
                        order = %order.order_number,
                        status = %order.status,
                        "order already left pending, payment recorded without status change"
                    );
                }
                self.orders.store(order).await
            }
            PaymentTarget::Booking(id) => {
                let _guard = self.locks.acquire(id).await;

                let mut booking = self
                    .bookings
                    .get(id)
                    .await?
                    .ok_or_else(|| CoreError::NotFound(format!("booking {id}")))?;
                booking.mark_paid(&payment.reference);
                if booking.status == BookingStatus::Pending {
                    booking.transition(BookingStatus::Confirmed)?;
                } else {
                    warn!(
                        booking = %booking.booking_number,
                        status = %booking.status,
                        "booking already left pending, payment recorded without status change"
                    );
                }
                self.bookings.store(booking).await
            }
        }
    }
}
