//! Products

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A menu entry that can be rung up at the till.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identity
    pub id: String,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Category label, matched case-insensitively against category ids
    pub category: String,

    /// Icon or glyph shown next to the name
    #[serde(default)]
    pub icon: String,

    /// Menu description
    #[serde(default)]
    pub description: String,

    /// Image location
    #[serde(default)]
    pub image: String,
}

/// A menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identity; `all` is the catch-all category
    pub id: String,

    /// Display name
    pub name: String,

    /// Icon or glyph
    #[serde(default)]
    pub icon: String,

    /// Number of products in the category
    #[serde(default)]
    pub count: usize,
}
