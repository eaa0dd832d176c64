//! Items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{discounts::DiscountPercent, products::Product};

/// A quantity of one catalog product within a cart or a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Line identity within the cart
    pub id: String,

    /// Catalog product this line was rung up from
    #[serde(default)]
    pub product_id: String,

    /// Display name at the time the line was added
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Number of units
    pub quantity: u32,

    /// Icon or glyph
    #[serde(default)]
    pub icon: String,

    /// Category label
    #[serde(default)]
    pub category: String,

    /// Free-text kitchen note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Line discount
    #[serde(default)]
    pub discount: DiscountPercent,
}

impl LineItem {
    /// Creates an undiscounted line with no note, whose line id is the product id.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Self {
        let product_id = product_id.into();

        Self {
            id: product_id.clone(),
            product_id,
            name: name.into(),
            price,
            quantity,
            icon: String::new(),
            category: String::new(),
            notes: None,
            discount: DiscountPercent::ZERO,
        }
    }

    /// Creates a line for `quantity` units of a catalog product.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            icon: product.icon.clone(),
            category: product.category.clone(),
            ..Self::new(&product.id, &product.name, product.price, quantity)
        }
    }

    /// Sets the line discount.
    #[must_use]
    pub fn with_discount(mut self, discount: impl Into<DiscountPercent>) -> Self {
        self.discount = discount.into();
        self
    }

    /// Sets the kitchen note; blank notes are dropped.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = normalize_notes(notes);
        self
    }

    /// Catalog identity, falling back to the line id for lines persisted without one.
    pub fn product_id(&self) -> &str {
        if self.product_id.is_empty() {
            &self.id
        } else {
            &self.product_id
        }
    }

    /// Returns true if adding `product_id` with `notes` should merge into this line.
    pub fn is_same_line(&self, product_id: &str, notes: Option<&str>) -> bool {
        self.product_id() == product_id && self.notes.as_deref() == notes
    }

    /// Unit price times quantity, before any discount.
    pub fn gross(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Amount taken off the gross line total by the line discount.
    pub fn discount_amount(&self) -> Decimal {
        self.discount.amount_of(self.gross())
    }

    /// Line total after the line discount.
    pub fn net(&self) -> Decimal {
        self.gross() - self.discount_amount()
    }
}

/// Trims a note and drops it entirely if nothing is left.
pub(crate) fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty())
}
