//! Checkout
//!
//! Turns the cart into a placed [`Order`].

use jiff::Zoned;
use rand::Rng;
use thiserror::Error;

use crate::{
    cart::Cart,
    orders::{Order, OrderId, OrderNumber, OrderStatus, PaymentMethod},
    pricing::OrderTotals,
};

/// Customer name used when none is given.
pub const GUEST: &str = "Guest";

/// Calendar date format stamped on orders (`10/16/2026`).
pub const DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Clock time format stamped on orders (`02:05 PM`).
pub const TIME_FORMAT: &str = "%I:%M %p";

/// Errors that prevent an order from being placed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing in the cart to sell.
    #[error("cannot place an order from an empty cart")]
    EmptyCart,
}

/// Materialize an order from the cart and its totals.
///
/// The cart's lines are copied into the order, so later cart changes leave it untouched. Line
/// and cart discounts are combined into the order's single `discount` figure. This function has
/// no side effects; recording the order and clearing the cart is up to the caller (see
/// [`Register::checkout`](crate::register::Register::checkout)).
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
pub fn place_order<R: Rng + ?Sized>(
    cart: &Cart,
    totals: &OrderTotals,
    customer_name: &str,
    payment_method: PaymentMethod,
    now: &Zoned,
    rng: &mut R,
) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let timestamp = now.timestamp().as_millisecond();
    let customer_name = customer_name.trim();

    Ok(Order {
        id: OrderId::new(),
        order_number: OrderNumber::generate(timestamp, rng),
        customer_name: if customer_name.is_empty() {
            GUEST.to_string()
        } else {
            customer_name.to_string()
        },
        items: cart.items().to_vec(),
        subtotal: totals.subtotal,
        tax: totals.tax,
        discount: totals.total_discount(),
        total: totals.total,
        payment_method,
        status: OrderStatus::Completed,
        date: now.strftime(DATE_FORMAT).to_string(),
        time: now.strftime(TIME_FORMAT).to_string(),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, tz::TimeZone};
    use rand::{SeedableRng, rngs::StdRng};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::items::LineItem;

    fn now() -> TestResult<Zoned> {
        Ok(date(2026, 10, 16).at(14, 5, 0, 0).to_zoned(TimeZone::UTC)?)
    }

    fn test_cart() -> TestResult<Cart> {
        let mut cart = Cart::with_items([
            LineItem::new("burger", "Burger", Decimal::from(10), 2),
            LineItem::new("fries", "Fries", Decimal::from(5), 1).with_discount(50_u8),
        ])?;

        cart.set_cart_discount(10_u8);

        Ok(cart)
    }

    fn place(
        cart: &Cart,
        name: &str,
        method: PaymentMethod,
        now: &Zoned,
    ) -> Result<Order, CheckoutError> {
        let mut rng = StdRng::seed_from_u64(0);

        place_order(cart, &cart.totals(), name, method, now, &mut rng)
    }

    #[test]
    fn empty_cart_is_refused() -> TestResult {
        let result = place(&Cart::new(), "Ada", PaymentMethod::Card, &now()?);

        assert_eq!(result, Err(CheckoutError::EmptyCart));

        Ok(())
    }

    #[test]
    fn order_snapshots_cart_and_totals() -> TestResult {
        let cart = test_cart()?;

        let order = place(&cart, " Ada ", PaymentMethod::Card, &now()?)?;

        assert_eq!(order.customer_name, "Ada");
        assert_eq!(order.items, cart.items());
        assert_eq!(order.subtotal, Decimal::new(225, 1));
        assert_eq!(order.discount, Decimal::new(475, 2));
        assert_eq!(order.tax, Decimal::new(2_025, 3));
        assert_eq!(order.total, Decimal::new(22_275, 3));
        assert_eq!(order.payment_method, PaymentMethod::Card);
        assert_eq!(order.status, OrderStatus::Completed);

        Ok(())
    }

    #[test]
    fn order_is_stamped_from_now() -> TestResult {
        let cart = test_cart()?;
        let now = now()?;

        let order = place(&cart, "", PaymentMethod::Cash, &now)?;

        assert_eq!(order.date, "10/16/2026");
        assert_eq!(order.time, "02:05 PM");
        assert_eq!(order.timestamp, now.timestamp().as_millisecond());
        assert!(
            order
                .order_number
                .as_str()
                .starts_with(&format!("ORD-{:06}-", order.timestamp % 1_000_000)),
            "order number should embed the timestamp"
        );

        Ok(())
    }

    #[test]
    fn blank_customer_name_defaults_to_guest() -> TestResult {
        let cart = test_cart()?;

        let order = place(&cart, "   ", PaymentMethod::Cash, &now()?)?;

        assert_eq!(order.customer_name, GUEST);

        Ok(())
    }

    #[test]
    fn later_cart_changes_do_not_touch_the_order() -> TestResult {
        let mut cart = test_cart()?;

        let order = place(&cart, "Ada", PaymentMethod::Cash, &now()?)?;

        cart.update_quantity("burger", 9)?;
        cart.clear();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items.first().map(|item| item.quantity), Some(2));

        Ok(())
    }
}
