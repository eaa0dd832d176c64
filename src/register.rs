//! Register
//!
//! One till session: the cart being rung up and the history of placed orders, each held in its
//! own [`Store`].

use std::rc::Rc;

use jiff::Zoned;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    analytics::{AnalyticsSnapshot, compute_analytics},
    cart::Cart,
    checkout::{CheckoutError, place_order},
    orders::{Order, OrderHistory, OrderHistoryError, OrderId, OrderStatus, PaymentMethod},
    pricing::OrderTotals,
    storage::{CART_STORAGE_KEY, SALES_STORAGE_KEY, Storage},
    store::Store,
};

/// Till session.
#[derive(Debug)]
pub struct Register {
    cart: Store<Cart>,
    orders: Store<OrderHistory>,
    rng: StdRng,
}

impl Default for Register {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Register {
    /// Register over the given stores.
    #[must_use]
    pub fn new(cart: Store<Cart>, orders: Store<OrderHistory>) -> Self {
        Self {
            cart,
            orders,
            rng: StdRng::from_entropy(),
        }
    }

    /// Register that forgets everything when dropped.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Store::default(), Store::default())
    }

    /// Register whose cart and order history are persisted to `storage`.
    #[must_use]
    pub fn persisted(storage: Rc<dyn Storage>) -> Self {
        Self::new(
            Store::persisted(Rc::clone(&storage), CART_STORAGE_KEY),
            Store::persisted(storage, SALES_STORAGE_KEY),
        )
    }

    /// Use `rng` for order numbers.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        self.cart.get()
    }

    /// Cart store, for mutations and subscriptions.
    pub fn cart_store(&mut self) -> &mut Store<Cart> {
        &mut self.cart
    }

    /// Order history.
    pub fn orders(&self) -> &OrderHistory {
        self.orders.get()
    }

    /// Order history store, for mutations and subscriptions.
    pub fn orders_store(&mut self) -> &mut Store<OrderHistory> {
        &mut self.orders
    }

    /// Totals for the current cart.
    pub fn totals(&self) -> OrderTotals {
        self.cart().totals()
    }

    /// Place an order for the current cart.
    ///
    /// The order is recorded in the history before the cart is cleared, so a failure in between
    /// can never lose a sale.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines; nothing changes.
    pub fn checkout(
        &mut self,
        customer_name: &str,
        payment_method: PaymentMethod,
        now: &Zoned,
    ) -> Result<Order, CheckoutError> {
        let cart = self.cart.get();
        let order = place_order(
            cart,
            &cart.totals(),
            customer_name,
            payment_method,
            now,
            &mut self.rng,
        )?;

        self.orders.update(|history| history.add(order.clone()));
        self.cart.update(Cart::clear);

        Ok(order)
    }

    /// Change the status of a recorded order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderHistoryError::NotFound`] if no order has the given id.
    pub fn update_order_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), OrderHistoryError> {
        self.orders
            .try_update(|history| history.update_status(id, status))
    }

    /// Dashboard figures for the recorded orders as of `now`.
    pub fn analytics(&self, now: &Zoned) -> AnalyticsSnapshot {
        compute_analytics(self.orders().iter(), now)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use jiff::{civil::date, tz::TimeZone};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::{items::LineItem, storage::MemoryStorage};

    fn now() -> TestResult<Zoned> {
        Ok(date(2026, 10, 16).at(12, 0, 0, 0).to_zoned(TimeZone::UTC)?)
    }

    fn register() -> Register {
        Register::in_memory().with_rng(StdRng::seed_from_u64(42))
    }

    fn ring_up(register: &mut Register) -> TestResult {
        register.cart_store().try_update(|cart| {
            cart.add_item(LineItem::new("burger", "Burger", Decimal::from(10), 2))
                .map(|_line| ())
        })?;

        Ok(())
    }

    #[test]
    fn checkout_records_order_then_clears_cart() -> TestResult {
        let mut register = register();
        ring_up(&mut register)?;

        let order = register.checkout("Ada", PaymentMethod::Card, &now()?)?;

        assert!(register.cart().is_empty());
        assert_eq!(register.orders().len(), 1);
        assert_eq!(register.orders().get(order.id), Some(&order));
        assert_eq!(order.total, Decimal::from(22));

        Ok(())
    }

    #[test]
    fn empty_checkout_changes_nothing() -> TestResult {
        let mut register = register();

        let result = register.checkout("Ada", PaymentMethod::Card, &now()?);

        assert_eq!(result, Err(CheckoutError::EmptyCart));
        assert!(register.orders().is_empty());

        Ok(())
    }

    #[test]
    fn history_is_updated_before_cart_is_cleared() -> TestResult {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut register = register();
        ring_up(&mut register)?;

        let sink = Rc::clone(&events);
        register
            .orders_store()
            .subscribe(move |_: &OrderHistory| sink.borrow_mut().push("orders"));

        let sink = Rc::clone(&events);
        register
            .cart_store()
            .subscribe(move |_: &Cart| sink.borrow_mut().push("cart"));

        register.checkout("", PaymentMethod::Cash, &now()?)?;

        assert_eq!(*events.borrow(), vec!["orders", "cart"]);

        Ok(())
    }

    #[test]
    fn cancelled_orders_leave_the_dashboard() -> TestResult {
        let mut register = register();
        ring_up(&mut register)?;
        let order = register.checkout("Ada", PaymentMethod::Card, &now()?)?;

        assert_eq!(register.analytics(&now()?).total_orders, 1);

        register.update_order_status(order.id, OrderStatus::Cancelled)?;

        let snapshot = register.analytics(&now()?);

        assert_eq!(snapshot.total_orders, 0);
        assert_eq!(snapshot.total_sales, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn unknown_order_status_update_fails() {
        let mut register = register();
        let id = OrderId::new();

        assert_eq!(
            register.update_order_status(id, OrderStatus::Pending),
            Err(OrderHistoryError::NotFound(id))
        );
    }

    #[test]
    fn persisted_register_survives_restart() -> TestResult {
        let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());

        let mut register = Register::persisted(Rc::clone(&storage));
        ring_up(&mut register)?;
        register
            .cart_store()
            .update(|cart| cart.set_cart_discount(10_u8));

        let reopened = Register::persisted(Rc::clone(&storage));

        assert_eq!(reopened.cart().total_quantity(), 2);
        assert_eq!(reopened.totals().cart_discount_amount, Decimal::from(2));

        let mut register = reopened;
        register.checkout("Ada", PaymentMethod::Mobile, &now()?)?;

        let reopened = Register::persisted(storage);

        assert!(reopened.cart().is_empty());
        assert_eq!(reopened.orders().len(), 1);

        Ok(())
    }
}
