//! Pricing
//!
//! Totals for a sequence of line items plus a cart-wide discount. Line discounts come off
//! first, the cart discount comes off the already-discounted subtotal, and tax is charged on
//! whatever is left. Nothing is rounded here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{discounts::DiscountPercent, items::LineItem};

/// Flat sales tax rate (10%).
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Price breakdown for a cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Sum of line totals after line discounts
    pub subtotal: Decimal,

    /// Sum of line discount amounts
    pub item_discounts: Decimal,

    /// Cart discount taken off the subtotal
    pub cart_discount_amount: Decimal,

    /// Tax on the subtotal after the cart discount
    pub tax: Decimal,

    /// Amount due
    pub total: Decimal,
}

impl OrderTotals {
    /// Subtotal after the cart discount; the amount tax is charged on.
    #[must_use]
    pub fn taxable_amount(&self) -> Decimal {
        self.subtotal - self.cart_discount_amount
    }

    /// Line discounts plus the cart discount.
    #[must_use]
    pub fn total_discount(&self) -> Decimal {
        self.item_discounts + self.cart_discount_amount
    }
}

/// Tax due on `amount`.
pub fn tax_on(amount: Decimal) -> Decimal {
    amount * TAX_RATE
}

/// Computes the totals for `items` with a cart-wide discount.
///
/// Discounts are expected to be clamped already, which [`DiscountPercent`] guarantees.
pub fn compute_totals(items: &[LineItem], cart_discount: DiscountPercent) -> OrderTotals {
    let (subtotal, item_discounts) = items.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(subtotal, discounts), item| {
            let discount = item.discount_amount();

            (subtotal + item.gross() - discount, discounts + discount)
        },
    );

    let cart_discount_amount = cart_discount.amount_of(subtotal);
    let taxable = subtotal - cart_discount_amount;
    let tax = tax_on(taxable);

    OrderTotals {
        subtotal,
        item_discounts,
        cart_discount_amount,
        tax,
        total: taxable + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, price: Decimal, quantity: u32, discount: u8) -> LineItem {
        LineItem::new(id, id, price, quantity).with_discount(discount)
    }

    #[test]
    fn empty_items_give_zero_totals() {
        let totals = compute_totals(&[], DiscountPercent::from(25_u8));

        assert_eq!(totals, OrderTotals::default());
    }

    #[test]
    fn item_and_cart_discounts_compose() {
        let items = [
            line("burger", Decimal::from(10), 2, 0),
            line("fries", Decimal::from(5), 1, 50),
        ];

        let totals = compute_totals(&items, DiscountPercent::from(10_u8));

        assert_eq!(totals.subtotal, Decimal::new(225, 1));
        assert_eq!(totals.item_discounts, Decimal::new(25, 1));
        assert_eq!(totals.cart_discount_amount, Decimal::new(225, 2));
        assert_eq!(totals.taxable_amount(), Decimal::new(2_025, 2));
        assert_eq!(totals.tax, Decimal::new(2_025, 3));
        assert_eq!(totals.total, Decimal::new(22_275, 3));
        assert_eq!(totals.total_discount(), Decimal::new(475, 2));
    }

    #[test]
    fn total_is_taxable_amount_plus_ten_percent() {
        let scenarios = [
            (vec![line("a", Decimal::new(1_299, 2), 3, 15)], 0_u8),
            (vec![line("a", Decimal::new(333, 2), 7, 33)], 12),
            (
                vec![
                    line("a", Decimal::new(1_999, 2), 1, 100),
                    line("b", Decimal::new(1, 2), 9, 0),
                ],
                99,
            ),
            (vec![line("a", Decimal::from(40), 1, 0)], 100),
        ];

        let multiplier = Decimal::ONE + TAX_RATE;

        for (items, cart_discount) in scenarios {
            let totals = compute_totals(&items, DiscountPercent::from(cart_discount));

            assert_eq!(
                totals.total,
                (totals.subtotal - totals.cart_discount_amount) * multiplier,
                "total should be the taxable amount plus tax for {items:?}"
            );
            assert_eq!(totals.tax, tax_on(totals.taxable_amount()));
        }
    }

    #[test]
    fn full_cart_discount_zeroes_total() {
        let items = [line("steak", Decimal::from(30), 1, 0)];

        let totals = compute_totals(&items, DiscountPercent::FULL);

        assert_eq!(totals.subtotal, Decimal::from(30));
        assert_eq!(totals.cart_discount_amount, Decimal::from(30));
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn cart_discount_applies_after_item_discounts() {
        let items = [line("pizza", Decimal::from(20), 1, 50)];

        let totals = compute_totals(&items, DiscountPercent::from(50_u8));

        assert_eq!(totals.subtotal, Decimal::from(10));
        assert_eq!(totals.cart_discount_amount, Decimal::from(5));
        assert_eq!(totals.total, Decimal::new(55, 1));
    }
}
