//! Cart
//!
//! The order currently being rung up. Lines keep their insertion order, which is also the order
//! they are displayed and printed in.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    discounts::DiscountPercent,
    items::{LineItem, normalize_notes},
    pricing::{OrderTotals, compute_totals},
    products::Product,
};

/// Errors related to cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No line with the given id is in the cart.
    #[error("Item {0} not found in cart")]
    ItemNotFound(String),

    /// Lines must hold at least one unit.
    #[error("Cannot add zero units of {0}")]
    ZeroQuantity(String),
}

/// Cart
///
/// Serializes to the persisted `{ "orderItems": [...], "cartDiscount": n }` layout. Deserialized
/// lines are added one by one, so duplicates merge and zero-quantity lines are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CartDocument")]
pub struct Cart {
    order_items: Vec<LineItem>,
    cart_discount: DiscountPercent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartDocument {
    #[serde(default)]
    order_items: Vec<LineItem>,

    #[serde(default)]
    cart_discount: DiscountPercent,
}

impl From<CartDocument> for Cart {
    fn from(document: CartDocument) -> Self {
        let mut cart = Self::new();

        for item in document.order_items {
            if let Err(error) = cart.add_item(item) {
                warn!(%error, "dropping persisted cart line");
            }
        }

        cart.cart_discount = document.cart_discount;
        cart
    }
}

impl Cart {
    /// Create a new, empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart holding the given lines, merging lines that share an identity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if any line has a quantity of zero.
    pub fn with_items(items: impl IntoIterator<Item = LineItem>) -> Result<Self, CartError> {
        let mut cart = Self::new();

        for item in items {
            cart.add_item(item)?;
        }

        Ok(cart)
    }

    /// Ring up `quantity` units of a catalog product.
    ///
    /// If a line for the same product with the same note already exists its quantity is
    /// increased; otherwise a new line is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn add(
        &mut self,
        product: &Product,
        quantity: u32,
        notes: Option<String>,
    ) -> Result<&LineItem, CartError> {
        self.add_item(LineItem::from_product(product, quantity).with_notes(notes))
    }

    /// Add a prepared line, merging it into an existing line with the same identity.
    ///
    /// A new line carrying a note, or one whose id is already in use, is given its own
    /// `<product>-<n>` id so that differently annotated lines of one product can coexist.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if the line has a quantity of zero.
    pub fn add_item(&mut self, item: LineItem) -> Result<&LineItem, CartError> {
        if item.quantity == 0 {
            return Err(CartError::ZeroQuantity(item.name));
        }

        let mut item = LineItem {
            notes: normalize_notes(item.notes),
            ..item
        };

        let position = self
            .order_items
            .iter()
            .position(|line| line.is_same_line(item.product_id(), item.notes.as_deref()));

        let position = if let Some(position) = position {
            if let Some(line) = self.order_items.get_mut(position) {
                line.quantity = line.quantity.saturating_add(item.quantity);

                debug!(line = %line.id, quantity = line.quantity, "increased cart line quantity");
            }

            position
        } else {
            if item.product_id.is_empty() {
                item.product_id.clone_from(&item.id);
            }

            let noted_on_product_id = item.notes.is_some() && item.id == item.product_id;

            if noted_on_product_id || self.order_items.iter().any(|line| line.id == item.id) {
                item.id = self.next_line_id(&item.product_id);
            }

            debug!(line = %item.id, quantity = item.quantity, "added cart line");

            self.order_items.push(item);
            self.order_items.len() - 1
        };

        self.order_items
            .get(position)
            .ok_or_else(|| CartError::ItemNotFound(position.to_string()))
    }

    /// Set the quantity of a line. Quantities of zero or less remove the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has the given id.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove(id).map(|_removed| ());
        }

        let line = self.line_mut(id)?;
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        debug!(line = %id, quantity = line.quantity, "updated cart line quantity");

        Ok(())
    }

    /// Remove a line from the cart, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has the given id.
    pub fn remove(&mut self, id: &str) -> Result<LineItem, CartError> {
        let position = self
            .order_items
            .iter()
            .position(|line| line.id == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))?;

        debug!(line = %id, "removed cart line");

        Ok(self.order_items.remove(position))
    }

    /// Empty the cart and drop the cart discount.
    pub fn clear(&mut self) {
        self.order_items.clear();
        self.cart_discount = DiscountPercent::ZERO;
    }

    /// Set a line discount. Out-of-range values are clamped into `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has the given id.
    pub fn set_item_discount(
        &mut self,
        id: &str,
        discount: impl Into<DiscountPercent>,
    ) -> Result<(), CartError> {
        let line = self.line_mut(id)?;
        line.discount = discount.into();

        debug!(line = %id, discount = %line.discount, "set line discount");

        Ok(())
    }

    /// Remove a line discount.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has the given id.
    pub fn clear_item_discount(&mut self, id: &str) -> Result<(), CartError> {
        self.set_item_discount(id, DiscountPercent::ZERO)
    }

    /// Set the cart-wide discount. Out-of-range values are clamped into `0..=100`.
    pub fn set_cart_discount(&mut self, discount: impl Into<DiscountPercent>) {
        self.cart_discount = discount.into();

        debug!(discount = %self.cart_discount, "set cart discount");
    }

    /// Remove the cart-wide discount.
    pub fn clear_cart_discount(&mut self) {
        self.set_cart_discount(DiscountPercent::ZERO);
    }

    /// The cart-wide discount.
    #[must_use]
    pub fn cart_discount(&self) -> DiscountPercent {
        self.cart_discount
    }

    /// Lines in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.order_items
    }

    /// Get a line by id.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has the given id.
    pub fn get_item(&self, id: &str) -> Result<&LineItem, CartError> {
        self.order_items
            .iter()
            .find(|line| line.id == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.order_items.iter()
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.order_items.len()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.order_items
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order_items.is_empty()
    }

    /// Price the cart as it stands.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        compute_totals(&self.order_items, self.cart_discount)
    }

    fn line_mut(&mut self, id: &str) -> Result<&mut LineItem, CartError> {
        self.order_items
            .iter_mut()
            .find(|line| line.id == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))
    }

    fn next_line_id(&self, product_id: &str) -> String {
        (1_u32..)
            .map(|n| format!("{product_id}-{n}"))
            .find(|candidate| self.order_items.iter().all(|line| &line.id != candidate))
            .unwrap_or_else(|| product_id.to_string())
    }
}
