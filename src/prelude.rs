//! Bistro prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    analytics::{
        AnalyticsSnapshot, CustomerSales, DailySales, PaymentMethodSales, ProductSales,
        compute_analytics,
    },
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    checkout::{CheckoutError, place_order},
    discounts::DiscountPercent,
    items::LineItem,
    orders::{
        Order, OrderHistory, OrderHistoryError, OrderId, OrderNumber, OrderStatus, PaymentMethod,
    },
    prices::format_price,
    pricing::{OrderTotals, TAX_RATE, compute_totals},
    products::{Category, Product},
    receipt::{Receipt, ReceiptError, StoreInfo},
    register::Register,
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    store::{Store, SubscriptionKey},
};
