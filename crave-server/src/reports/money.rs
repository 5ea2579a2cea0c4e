//! Decimal helpers for report sums
//!
//! Sums are accumulated as `Decimal` and converted to `f64` once, rounded
//! to two places, when the report is emitted. Every step is checked: an
//! amount that cannot be represented, or a sum that overflows, fails the
//! whole report instead of being dropped.
//!
//! The order limits below keep accepted orders far inside `Decimal` range.

use rust_decimal::prelude::*;
use shared::error::AppError;
use thiserror::Error;

const DECIMAL_PLACES: u32 = 2;

/// Maximum unit price of a line item
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum quantity of a line item
pub const MAX_QUANTITY: u32 = 9999;
/// Maximum order-level amount and line total
pub const MAX_AMOUNT: f64 = 100_000_000.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoneyError {
    #[error("Amount {0} cannot be represented as a decimal")]
    Unrepresentable(f64),

    #[error("Report total overflowed")]
    Overflow,
}

impl From<MoneyError> for AppError {
    fn from(err: MoneyError) -> Self {
        AppError::internal(err.to_string())
    }
}

pub type MoneyResult<T> = Result<T, MoneyError>;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> MoneyResult<Decimal> {
    Decimal::from_f64(value).ok_or(MoneyError::Unrepresentable(value))
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// quantity × price as ordered
pub fn line_total(quantity: u32, price: f64) -> MoneyResult<Decimal> {
    to_decimal(price)?
        .checked_mul(Decimal::from(quantity))
        .ok_or(MoneyError::Overflow)
}

#[inline]
pub fn checked_add(total: Decimal, amount: Decimal) -> MoneyResult<Decimal> {
    total.checked_add(amount).ok_or(MoneyError::Overflow)
}
