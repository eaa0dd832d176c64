//! Analytics
//!
//! Dashboard figures derived from the order history. Everything is recomputed from scratch on
//! each call and only completed orders are counted; pending and cancelled orders are invisible
//! to every metric.

use std::hash::Hash;

use jiff::{Timestamp, ToSpan, Zoned, civil::Date};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::orders::{Order, PaymentMethod};

/// Number of entries kept in the top products and top customers lists.
pub const TOP_LIMIT: usize = 10;

/// Number of calendar days, ending today, covered by [`AnalyticsSnapshot::sales_by_day`].
pub const SALES_WINDOW_DAYS: i64 = 7;

/// Units sold and gross revenue for one product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    /// Product name
    pub name: String,

    /// Units sold
    pub quantity: u64,

    /// Unit price times quantity, before any discount
    pub revenue: Decimal,
}

/// Orders and spend for one customer name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSales {
    /// Customer name
    pub name: String,

    /// Number of orders
    pub orders: u64,

    /// Sum of order totals
    pub total: Decimal,
}

/// Sales on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySales {
    /// Calendar day (`YYYY-MM-DD`)
    pub date: Date,

    /// Sum of order totals
    pub sales: Decimal,

    /// Number of orders
    pub orders: u64,
}

/// Sales taken with one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentMethodSales {
    /// Payment method
    pub method: PaymentMethod,

    /// Sum of order totals
    pub amount: Decimal,

    /// Number of orders
    pub count: u64,
}

/// Dashboard figures for an order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    /// Sum of completed order totals
    pub total_sales: Decimal,

    /// Number of completed orders
    pub total_orders: usize,

    /// Mean completed order total, zero when there are none
    pub average_order_value: Decimal,

    /// Best sellers by units sold, at most [`TOP_LIMIT`]
    pub top_products: Vec<ProductSales>,

    /// Best customers by spend, at most [`TOP_LIMIT`]
    pub top_customers: Vec<CustomerSales>,

    /// One entry per day of the trailing week, oldest first
    pub sales_by_day: SmallVec<[DailySales; 7]>,

    /// One entry per payment method that was actually used
    pub sales_by_payment_method: Vec<PaymentMethodSales>,
}

impl AnalyticsSnapshot {
    /// Number of customers shown in the top customers list.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.top_customers.len()
    }
}

/// Compute the dashboard figures for `orders` as of `now`.
///
/// The order in which `orders` are supplied does not matter beyond breaking ties between equal
/// entries in the ranked lists, which keep first-seen order. Days are bucketed by each order's
/// timestamp in `now`'s time zone, so the stored display date is never consulted.
pub fn compute_analytics<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    now: &Zoned,
) -> AnalyticsSnapshot {
    let completed: Vec<&Order> = orders
        .into_iter()
        .filter(|order| order.is_completed())
        .collect();

    let total_sales: Decimal = completed.iter().map(|order| order.total).sum();
    let total_orders = completed.len();

    let average_order_value = if total_orders == 0 {
        Decimal::ZERO
    } else {
        total_sales / Decimal::from(total_orders)
    };

    AnalyticsSnapshot {
        total_sales,
        total_orders,
        average_order_value,
        top_products: top_products(&completed),
        top_customers: top_customers(&completed),
        sales_by_day: sales_by_day(&completed, now),
        sales_by_payment_method: sales_by_payment_method(&completed),
    }
}

fn top_products(orders: &[&Order]) -> Vec<ProductSales> {
    let mut products = Tally::default();

    for item in orders.iter().flat_map(|order| order.items.iter()) {
        let entry = products.entry(&item.name, || ProductSales {
            name: item.name.clone(),
            quantity: 0,
            revenue: Decimal::ZERO,
        });

        entry.quantity += u64::from(item.quantity);
        entry.revenue += item.gross();
    }

    let mut products = products.into_entries();
    products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    products.truncate(TOP_LIMIT);

    products
}

fn top_customers(orders: &[&Order]) -> Vec<CustomerSales> {
    let mut customers = Tally::default();

    for order in orders {
        let entry = customers.entry(&order.customer_name, || CustomerSales {
            name: order.customer_name.clone(),
            orders: 0,
            total: Decimal::ZERO,
        });

        entry.orders += 1;
        entry.total += order.total;
    }

    let mut customers = customers.into_entries();
    customers.sort_by(|a, b| b.total.cmp(&a.total));
    customers.truncate(TOP_LIMIT);

    customers
}

fn sales_by_day(orders: &[&Order], now: &Zoned) -> SmallVec<[DailySales; 7]> {
    let today = now.date();

    let mut days: SmallVec<[DailySales; 7]> = (0..SALES_WINDOW_DAYS)
        .rev()
        .map(|offset| DailySales {
            date: today.saturating_sub(offset.days()),
            sales: Decimal::ZERO,
            orders: 0,
        })
        .collect();

    for order in orders {
        let Ok(placed_at) = Timestamp::from_millisecond(order.timestamp) else {
            continue;
        };

        let day = placed_at.to_zoned(now.time_zone().clone()).date();

        if let Some(bucket) = days.iter_mut().find(|bucket| bucket.date == day) {
            bucket.sales += order.total;
            bucket.orders += 1;
        }
    }

    days
}

fn sales_by_payment_method(orders: &[&Order]) -> Vec<PaymentMethodSales> {
    let mut methods = Tally::default();

    for order in orders {
        let entry = methods.entry(&order.payment_method, || PaymentMethodSales {
            method: order.payment_method,
            amount: Decimal::ZERO,
            count: 0,
        });

        entry.amount += order.total;
        entry.count += 1;
    }

    methods.into_entries()
}

/// Accumulators keyed by group, remembering the order groups were first seen in.
struct Tally<K, T> {
    seen: Vec<K>,
    entries: FxHashMap<K, T>,
}

impl<K, T> Default for Tally<K, T> {
    fn default() -> Self {
        Self {
            seen: Vec::new(),
            entries: FxHashMap::default(),
        }
    }
}

impl<K: Clone + Eq + Hash, T> Tally<K, T> {
    fn entry<Q>(&mut self, key: &Q, init: impl FnOnce() -> T) -> &mut T
    where
        Q: ToOwned<Owned = K> + ?Sized,
    {
        let key = key.to_owned();

        if !self.entries.contains_key(&key) {
            self.seen.push(key.clone());
        }

        self.entries.entry(key).or_insert_with(init)
    }

    fn into_entries(mut self) -> Vec<T> {
        self.seen
            .iter()
            .filter_map(|key| self.entries.remove(key))
            .collect()
    }
}
