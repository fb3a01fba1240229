use crate::config::FeeSettings;
use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A positive monetary amount.
///
/// Wrapper around `rust_decimal::Decimal` that rejects zero and negative
/// values at construction, so payment amounts are valid by type.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(CoreError::Validation("amount must be positive".to_string()))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CoreError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// A checkout line already resolved against the catalog.
#[derive(Debug, Clone, Copy)]
pub struct PricedLine {
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// Computed money fields for an order. Fixed at creation, never recomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub commission: Decimal,
    pub total: Decimal,
}

/// Computed money fields for a booking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingCharges {
    pub deposit: Decimal,
    pub commission: Decimal,
}

/// Computes order totals from catalog-resolved lines.
///
/// subtotal = Σ(unit_price × quantity); the delivery fee is the configured
/// base fee, multiplied for express delivery; commission is the platform's
/// cut of the pre-fee subtotal; total = subtotal + delivery fee.
pub fn order_totals(lines: &[PricedLine], is_express: bool, fees: &FeeSettings) -> OrderTotals {
    let subtotal: Decimal = lines
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum();

    let delivery_fee = if is_express {
        fees.delivery_base_fee * fees.express_multiplier
    } else {
        fees.delivery_base_fee
    };

    let commission = subtotal * fees.gift_commission_percent / Decimal::ONE_HUNDRED;

    OrderTotals {
        subtotal,
        delivery_fee,
        commission,
        total: subtotal + delivery_fee,
    }
}

/// Computes the upfront deposit and platform commission for a booking.
pub fn booking_charges(service_price: Decimal, fees: &FeeSettings) -> BookingCharges {
    BookingCharges {
        deposit: service_price * fees.booking_deposit_percent / Decimal::ONE_HUNDRED,
        commission: service_price * fees.beauty_commission_percent / Decimal::ONE_HUNDRED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fees() -> FeeSettings {
        FeeSettings::default()
    }

    #[test]
    fn test_order_totals_standard_delivery() {
        let lines = [
            PricedLine { unit_price: dec!(15000), quantity: 1 },
            PricedLine { unit_price: dec!(5000), quantity: 2 },
        ];
        let totals = order_totals(&lines, false, &fees());

        assert_eq!(totals.subtotal, dec!(25000));
        assert_eq!(totals.delivery_fee, dec!(1000));
        assert_eq!(totals.total, dec!(26000));
    }

    #[test]
    fn test_order_totals_express_delivery() {
        let lines = [PricedLine { unit_price: dec!(15000), quantity: 1 }];
        let totals = order_totals(&lines, true, &fees());

        assert_eq!(totals.delivery_fee, dec!(2500));
        assert_eq!(totals.total, dec!(17500));
    }

    #[test]
    fn test_order_commission_is_percent_of_subtotal() {
        let lines = [PricedLine { unit_price: dec!(10000), quantity: 1 }];
        let totals = order_totals(&lines, false, &fees());

        // 25% of 10000, never including the delivery fee
        assert_eq!(totals.commission, dec!(2500));
    }

    #[test]
    fn test_booking_charges() {
        let charges = booking_charges(dec!(8000), &fees());

        assert_eq!(charges.deposit, dec!(2400.00));
        assert_eq!(charges.commission, dec!(1600.00));
    }

    #[test]
    fn test_booking_charges_respect_overridden_rates() {
        let custom = FeeSettings {
            booking_deposit_percent: dec!(50),
            beauty_commission_percent: dec!(10),
            ..FeeSettings::default()
        };
        let charges = booking_charges(dec!(8000), &custom);

        assert_eq!(charges.deposit, dec!(4000));
        assert_eq!(charges.commission, dec!(800));
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(CoreError::Validation(_))
        ));
    }
}
