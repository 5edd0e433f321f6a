//! Decimal money helpers.
//!
//! Prices, costs and balances are carried as [`Decimal`] in the currency's
//! standard unit (dollars, not cents). Conversion to the integer minor unit
//! only happens at the payment-catalog boundary.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Tax rate applied when a store has not configured its own (8%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Round an amount to whole cents, halves away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a standard-unit amount into the integer minor unit (`round(amount × 100)`).
///
/// Returns `None` if the result does not fit in an `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}
