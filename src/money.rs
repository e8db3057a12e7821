//! Decimal amount validation and SQLite column mapping.
//!
//! Monetary amounts are `rust_decimal::Decimal` throughout the application
//! and are stored as TEXT in SQLite so that no value ever round-trips
//! through a binary float.

use rusqlite::{Row, types::Type};
use rust_decimal::Decimal;

use crate::Error;

/// Validate an amount that must be strictly positive, e.g. a transaction
/// amount, a goal target, or a budget cap.
///
/// # Errors
///
/// Returns [Error::NonPositiveAmount] if `amount` is zero or negative.
pub fn positive_amount(amount: Decimal) -> Result<Decimal, Error> {
    if amount > Decimal::ZERO {
        Ok(amount)
    } else {
        Err(Error::NonPositiveAmount(amount))
    }
}

/// Validate an amount that must be zero or greater, e.g. a goal's saved
/// progress.
///
/// # Errors
///
/// Returns [Error::NegativeAmount] if `amount` is negative.
pub fn non_negative_amount(amount: Decimal) -> Result<Decimal, Error> {
    if amount >= Decimal::ZERO {
        Ok(amount)
    } else {
        Err(Error::NegativeAmount(amount))
    }
}

/// Read a decimal amount from a TEXT column.
///
/// Intended for use inside `map_row` functions, so parse failures are
/// reported as `rusqlite` conversion errors.
pub fn decimal_column(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    text.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}
