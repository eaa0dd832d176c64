//! Prices

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};

/// Rounds an amount to the minor unit of the given currency, halves away from zero.
pub fn round_to_minor(amount: Decimal, currency: &Currency) -> Decimal {
    amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount for display in the given currency (e.g. `$22.28`).
///
/// Amounts are carried at full precision everywhere else; this is the only place they are
/// rounded.
pub fn format_price(amount: Decimal, currency: &'static Currency) -> String {
    Money::from_decimal(round_to_minor(amount, currency), currency).to_string()
}
