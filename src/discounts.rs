//! Discounts
//!
//! Percentage discounts as entered at the till. Both per-line and cart-wide discounts are
//! expressed in percent points and clamped into `0..=100` when they are assigned, so the pricing
//! engine never has to second-guess them.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::{Deserialize, Serialize};

/// A discount in percent points, always within `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    /// No discount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Everything free.
    pub const FULL: Self = Self(Decimal::ONE_HUNDRED);

    /// Creates a discount from percent points, clamping into `0..=100`.
    #[must_use]
    pub fn new(points: Decimal) -> Self {
        Self(points.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// Parses operator input such as `"15"`, `"12.5"` or `"20%"`.
    ///
    /// Anything that is not a number is treated as no discount; numbers out of range are
    /// clamped.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();

        trimmed
            .parse::<Decimal>()
            .or_else(|_err| Decimal::from_scientific(trimmed))
            .map_or(Self::ZERO, Self::new)
    }

    /// Percent points, e.g. `15` for a 15% discount.
    #[must_use]
    pub fn points(&self) -> Decimal {
        self.0
    }

    /// Returns true if this discount takes nothing off.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The discount as a fraction (15% is `0.15`).
    #[must_use]
    pub fn fraction(&self) -> Percentage {
        Percentage::from(self.0 / Decimal::ONE_HUNDRED)
    }

    /// The amount this discount takes off `amount`.
    #[must_use]
    pub fn amount_of(&self, amount: Decimal) -> Decimal {
        self.fraction() * amount
    }
}

impl From<Decimal> for DiscountPercent {
    fn from(points: Decimal) -> Self {
        Self::new(points)
    }
}

impl From<DiscountPercent> for Decimal {
    fn from(discount: DiscountPercent) -> Self {
        discount.0
    }
}

impl From<f64> for DiscountPercent {
    fn from(points: f64) -> Self {
        if points.is_nan() {
            return Self::ZERO;
        }

        if points.is_infinite() {
            return if points.is_sign_positive() {
                Self::FULL
            } else {
                Self::ZERO
            };
        }

        Decimal::from_f64(points).map_or(Self::ZERO, Self::new)
    }
}

impl From<u8> for DiscountPercent {
    fn from(points: u8) -> Self {
        Self::new(Decimal::from(points))
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}
