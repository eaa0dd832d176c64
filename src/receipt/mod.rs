//! Receipt
//!
//! A receipt is projected from a placed order alone. Its figures are recomputed from the order's
//! own line items rather than copied from the order's stored aggregates, so every printed total
//! agrees with the printed lines.

use std::io;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    checkout::GUEST,
    discounts::DiscountPercent,
    orders::{Order, OrderNumber, PaymentMethod},
    pricing::tax_on,
};

mod render;

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The receipt could not be written to its destination.
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// Header details printed at the top of every receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    /// Restaurant name
    pub name: String,

    /// Street address
    pub address: String,

    /// Contact phone number
    pub phone: String,
}

impl Default for StoreInfo {
    fn default() -> Self {
        Self {
            name: "RestaurantPOS".to_string(),
            address: "123 Main Street".to_string(),
            phone: "(555) 123-4567".to_string(),
        }
    }
}

/// One printed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Product name
    pub name: String,

    /// Kitchen note
    pub notes: Option<String>,

    /// Line discount
    pub discount: DiscountPercent,

    /// Units
    pub quantity: u32,

    /// Unit price
    pub unit_price: Decimal,

    /// Line total after the line discount
    pub total: Decimal,
}

/// The totals block, recomputed from the printed lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiptTotals {
    /// Sum of unit price times quantity, before any discount
    pub subtotal: Decimal,

    /// Sum of line discounts
    pub item_discounts: Decimal,

    /// Cart-wide discount, recovered from the order's combined discount
    pub cart_discount: Decimal,

    /// Tax on the discounted subtotal
    pub tax: Decimal,

    /// Amount paid
    pub total: Decimal,
}

impl ReceiptTotals {
    /// Subtotal after both kinds of discount.
    #[must_use]
    pub fn discounted_subtotal(&self) -> Decimal {
        self.subtotal - self.item_discounts - self.cart_discount
    }
}

/// Printable receipt for a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    order_number: OrderNumber,
    customer_name: String,
    payment_method: PaymentMethod,
    date: String,
    time: String,
    lines: Vec<ReceiptLine>,
    totals: ReceiptTotals,
}

impl Receipt {
    /// Project a receipt from an order.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        let lines: Vec<ReceiptLine> = order
            .items
            .iter()
            .map(|item| ReceiptLine {
                name: item.name.clone(),
                notes: item.notes.clone(),
                discount: item.discount,
                quantity: item.quantity,
                unit_price: item.price,
                total: item.net(),
            })
            .collect();

        let subtotal: Decimal = order.items.iter().map(|item| item.gross()).sum();
        let item_discounts: Decimal = order.items.iter().map(|item| item.discount_amount()).sum();
        let cart_discount = order.discount - item_discounts;
        let discounted_subtotal = subtotal - item_discounts - cart_discount;
        let tax = tax_on(discounted_subtotal);

        let customer_name = if order.customer_name.trim().is_empty() {
            GUEST.to_string()
        } else {
            order.customer_name.clone()
        };

        Self {
            order_number: order.order_number.clone(),
            customer_name,
            payment_method: order.payment_method,
            date: order.date.clone(),
            time: order.time.clone(),
            lines,
            totals: ReceiptTotals {
                subtotal,
                item_discounts,
                cart_discount,
                tax,
                total: discounted_subtotal + tax,
            },
        }
    }

    /// Order number
    #[must_use]
    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// Customer name, `Guest` when none was given
    #[must_use]
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Payment method
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Date the order was placed, as displayed at checkout
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Time the order was placed, as displayed at checkout
    #[must_use]
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Printed lines in order
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Totals block
    #[must_use]
    pub fn totals(&self) -> &ReceiptTotals {
        &self.totals
    }

    /// Total cost before any discount
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.totals.subtotal
    }

    /// Total amount paid
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.totals.total
    }

    /// Everything taken off by line and cart discounts.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        self.totals.item_discounts + self.totals.cart_discount
    }

    /// Writes the receipt as a plain-text document.
    ///
    /// Sections are printed in order: store header, order details, line items, totals, footer.
    /// Amounts are rounded to the currency's minor unit here and nowhere else.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        store: &StoreInfo,
        currency: &'static Currency,
    ) -> Result<(), ReceiptError> {
        render::write_receipt(&mut out, self, store, currency)
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Zoned, civil::date, tz::TimeZone};
    use rand::{SeedableRng, rngs::StdRng};
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;
    use crate::{
        cart::Cart,
        checkout::place_order,
        items::LineItem,
        orders::{OrderStatus, tests::order},
    };

    fn now() -> TestResult<Zoned> {
        Ok(date(2026, 10, 16).at(14, 5, 0, 0).to_zoned(TimeZone::UTC)?)
    }

    fn placed(cart: &Cart, customer: &str) -> TestResult<Order> {
        let mut rng = StdRng::seed_from_u64(3);

        Ok(place_order(
            cart,
            &cart.totals(),
            customer,
            PaymentMethod::Card,
            &now()?,
            &mut rng,
        )?)
    }

    fn discounted_cart() -> TestResult<Cart> {
        let mut cart = Cart::with_items([
            LineItem::new("burger", "Burger", Decimal::from(10), 2),
            LineItem::new("fries", "Fries", Decimal::from(5), 1)
                .with_discount(50_u8)
                .with_notes(Some("extra salt".to_string())),
        ])?;

        cart.set_cart_discount(10_u8);

        Ok(cart)
    }

    #[test]
    fn recomputes_totals_from_lines() -> TestResult {
        let cart = discounted_cart()?;
        let receipt = Receipt::from_order(&placed(&cart, "Ada")?);

        let totals = receipt.totals();

        assert_eq!(totals.subtotal, Decimal::from(25));
        assert_eq!(totals.item_discounts, Decimal::new(25, 1));
        assert_eq!(totals.cart_discount, Decimal::new(225, 2));
        assert_eq!(totals.discounted_subtotal(), Decimal::new(2_025, 2));
        assert_eq!(totals.tax, Decimal::new(2_025, 3));
        assert_eq!(receipt.total(), Decimal::new(22_275, 3));
        assert_eq!(receipt.savings(), Decimal::new(475, 2));

        Ok(())
    }

    #[test]
    fn receipt_total_matches_checkout_total() -> TestResult {
        let carts = [
            discounted_cart()?,
            Cart::with_items([LineItem::new("tea", "Tea", Decimal::new(299, 2), 3)])?,
            {
                let mut cart = Cart::with_items([
                    LineItem::new("a", "A", Decimal::new(1_337, 2), 7).with_discount(33_u8),
                    LineItem::new("b", "B", Decimal::new(1, 2), 1).with_discount(100_u8),
                ])?;
                cart.set_cart_discount(17.5);
                cart
            },
        ];

        for cart in carts {
            let expected = cart.totals().total;
            let receipt = Receipt::from_order(&placed(&cart, "")?);

            assert_eq!(
                receipt.total(),
                expected,
                "receipt disagrees with checkout for {cart:?}"
            );
        }

        Ok(())
    }

    #[test]
    fn lines_carry_net_totals_and_notes() -> TestResult {
        let receipt = Receipt::from_order(&placed(&discounted_cart()?, "Ada")?);

        let fries = receipt.lines().get(1).ok_or("expected a second line")?;

        assert_eq!(fries.name, "Fries");
        assert_eq!(fries.notes.as_deref(), Some("extra salt"));
        assert_eq!(fries.total, Decimal::new(25, 1));
        assert_eq!(fries.unit_price, Decimal::from(5));
        assert_eq!(fries.discount, DiscountPercent::from(50_u8));

        Ok(())
    }

    #[test]
    fn metadata_comes_from_order() -> TestResult {
        let order = placed(&discounted_cart()?, "")?;
        let receipt = Receipt::from_order(&order);

        assert_eq!(receipt.customer_name(), "Guest");
        assert_eq!(receipt.order_number(), &order.order_number);
        assert_eq!(receipt.payment_method(), PaymentMethod::Card);
        assert_eq!(receipt.date(), "10/16/2026");
        assert_eq!(receipt.time(), "02:05 PM");

        Ok(())
    }

    #[test]
    fn ignores_stored_aggregates() {
        let mut stored = order(10, OrderStatus::Completed, 0);
        stored.subtotal = Decimal::from(999);
        stored.tax = Decimal::from(999);
        stored.total = Decimal::from(999);

        let receipt = Receipt::from_order(&stored);

        assert_eq!(receipt.subtotal(), Decimal::from(10));
        assert_eq!(receipt.total(), Decimal::from(11));
    }

    #[test]
    fn write_to_prints_sections_in_order() -> TestResult {
        let receipt = Receipt::from_order(&placed(&discounted_cart()?, "Ada")?);

        let mut out = Vec::new();
        receipt.write_to(&mut out, &StoreInfo::default(), USD)?;
        let output = String::from_utf8(out)?;

        let positions = [
            "RestaurantPOS",
            "Order:",
            "Customer: Ada",
            "Payment: Card",
            "Burger",
            "Fries",
            "Subtotal:",
            "Item Discounts:",
            "Cart Discount:",
            "Tax (10%):",
            "TOTAL:",
            "Thank you for your order!",
        ]
        .iter()
        .map(|needle| {
            output
                .find(needle)
                .ok_or(format!("missing {needle:?} in\n{output}"))
        })
        .collect::<Result<Vec<usize>, String>>()?;

        assert!(
            positions.windows(2).all(|pair| pair.first() < pair.last()),
            "sections out of order:\n{output}"
        );
        assert!(
            output.contains("$22.28"),
            "total should be rounded:\n{output}"
        );
        assert!(output.contains("50% OFF"));
        assert!(output.contains("extra salt"));

        Ok(())
    }

    #[test]
    fn write_to_omits_zero_discount_rows() -> TestResult {
        let cart = Cart::with_items([LineItem::new("tea", "Tea", Decimal::from(3), 1)])?;
        let receipt = Receipt::from_order(&placed(&cart, "Ada")?);

        let mut out = Vec::new();
        receipt.write_to(&mut out, &StoreInfo::default(), USD)?;
        let output = String::from_utf8(out)?;

        assert!(!output.contains("Item Discounts:"));
        assert!(!output.contains("Cart Discount:"));
        assert!(output.contains("$3.30"));

        Ok(())
    }
}
