//! Bistro
//!
//! Bistro is the point-of-sale core of a restaurant till: a menu catalog, a shopping cart with
//! item and cart-wide discounts, checkout into an order history, printable receipts and a sales
//! dashboard computed from completed orders.

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod discounts;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod register;
pub mod storage;
pub mod store;
pub mod tables;
