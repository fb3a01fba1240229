use crate::application::locks::KeyedLocks;
use crate::config::FeeSettings;
use crate::domain::money::{self, PricedLine};
use crate::domain::order::{DeliveryDetails, Order, OrderItem, OrderStatus};
use crate::domain::ports::{CatalogStore, CatalogStoreRef, OrderStore, OrderStoreRef};
use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// One requested checkout line; the price is resolved from the catalog.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
}

/// Checkout request for a gift order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub items: Vec<OrderLine>,
    pub delivery: DeliveryDetails,
    pub is_express: bool,
}

/// Creates gift orders and applies manual status transitions.
pub struct OrderService {
    orders: OrderStoreRef,
    catalog: CatalogStoreRef,
    locks: Arc<KeyedLocks>,
    fees: FeeSettings,
}

impl OrderService {
    pub fn new(
        orders: OrderStoreRef,
        catalog: CatalogStoreRef,
        locks: Arc<KeyedLocks>,
        fees: FeeSettings,
    ) -> Self {
        Self { orders, catalog, locks, fees }
    }

    /// Creates an order from catalog-resolved items.
    ///
    /// Every product is resolved before anything is written, so a missing
    /// product fails the whole checkout with nothing persisted. Unit prices
    /// come from the catalog, never from the client.
    pub async fn create(&self, user_id: &str, req: CreateOrder) -> Result<Order> {
        if req.items.is_empty() {
            return Err(CoreError::Validation("order has no items".to_string()));
        }

        let mut items = Vec::with_capacity(req.items.len());
        for line in &req.items {
            if line.quantity == 0 {
                return Err(CoreError::Validation(format!(
                    "quantity must be positive for product {}",
                    line.product_id
                )));
            }
            let product = self
                .catalog
                .product(&line.product_id)
                .await?
                .ok_or_else(|| CoreError::NotFound(format!("product {}", line.product_id)))?;

            items.push(OrderItem {
                product_id: product.id,
                product_name: product.name,
                vendor_name: product.vendor_name,
                quantity: line.quantity,
                unit_price: product.price,
                total_price: product.price * Decimal::from(line.quantity),
            });
        }

        let lines: Vec<PricedLine> = items
            .iter()
            .map(|item| PricedLine { unit_price: item.unit_price, quantity: item.quantity })
            .collect();
        let totals = money::order_totals(&lines, req.is_express, &self.fees);

        let order = Order::new(user_id, items, &totals, req.delivery, req.is_express);
        self.orders.store(order.clone()).await?;

        info!(order = %order.order_number, total = %order.total, "order created");
        Ok(order)
    }

    pub async fn get(&self, order_id: &str) -> Result<Order> {
        self.orders
            .get(order_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("order {order_id}")))
    }

    /// Applies a manual status transition.
    ///
    /// Runs under the same per-entity lock the reconciliation engine uses,
    /// so a manual update cannot interleave with a payment-driven one.
    pub async fn update_status(&self, order_id: &str, to: OrderStatus) -> Result<Order> {
        let _guard = self.locks.acquire(order_id).await;

        let mut order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("order {order_id}")))?;
        order.transition(to)?;
        self.orders.store(order.clone()).await?;

        info!(order = %order.order_number, status = %order.status, "order status updated");
        Ok(order)
    }
}
