//! Catalog
//!
//! The menu the till sells from, loaded from a YAML document:
//!
//! ```yaml
//! currency: USD
//! categories:
//!   - id: all
//!     name: All Items
//!   - id: burgers
//!     name: Burgers
//! products:
//!   - id: classic-burger
//!     name: Classic Burger
//!     price: "12.99"
//!     category: burgers
//! ```

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::products::{Category, Product};

/// Id of the category every product belongs to.
pub const ALL_CATEGORY: &str = "all";

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Invalid price format
    #[error("Invalid price for {product}: {price}")]
    InvalidPrice {
        /// Product id
        product: String,

        /// Price as written
        price: String,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    currency: String,

    #[serde(default)]
    categories: Vec<CategoryFixture>,

    #[serde(default)]
    products: Vec<ProductFixture>,
}

#[derive(Debug, Deserialize)]
struct CategoryFixture {
    id: String,
    name: String,

    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: String,
    name: String,

    /// Price in major units (e.g. "12.99")
    price: String,

    category: String,

    #[serde(default)]
    icon: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    image: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let price = fixture
            .price
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|price| !price.is_sign_negative())
            .ok_or_else(|| CatalogError::InvalidPrice {
                product: fixture.id.clone(),
                price: fixture.price.clone(),
            })?;

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            price,
            category: fixture.category,
            icon: fixture.icon,
            description: fixture.description,
            image: fixture.image,
        })
    }
}

/// Menu catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: &'static Currency,
    categories: Vec<Category>,
    products: Vec<Product>,
    product_index: FxHashMap<String, usize>,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path.as_ref())?;

        debug!(path = %path.as_ref().display(), "loading catalog");

        Self::from_yaml_str(&contents)
    }

    /// Parse a catalog from YAML.
    ///
    /// Category counts are derived from the products; any counts in the document are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, names an unknown currency, contains an
    /// unparseable price, or repeats a product id.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let currency = iso::find(fixture.currency.trim())
            .ok_or_else(|| CatalogError::UnknownCurrency(fixture.currency.clone()))?;

        let mut products = Vec::with_capacity(fixture.products.len());
        let mut product_index = FxHashMap::default();

        for product_fixture in fixture.products {
            let product = Product::try_from(product_fixture)?;

            if product_index.contains_key(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }

            product_index.insert(product.id.clone(), products.len());
            products.push(product);
        }

        let categories = fixture
            .categories
            .into_iter()
            .map(|category| {
                let count = if category.id == ALL_CATEGORY {
                    products.len()
                } else {
                    products
                        .iter()
                        .filter(|product| same_category(&product.category, &category.id))
                        .count()
                };

                Category {
                    id: category.id,
                    name: category.name,
                    icon: category.icon,
                    count,
                }
            })
            .collect();

        Ok(Self {
            currency,
            categories,
            products,
            product_index,
        })
    }

    /// Currency every price is in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Categories in menu order, with derived counts.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Products in menu order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.product_index
            .get(id)
            .and_then(|&index| self.products.get(index))
    }

    /// Products in `category` whose name, category, or description contains `query`.
    ///
    /// Category `all` matches every product. Both arguments are compared case-insensitively and
    /// a blank query matches everything.
    pub fn filter<'a>(
        &'a self,
        category: &'a str,
        query: &str,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        let query = query.trim().to_lowercase();
        let any_category = normalize(category) == ALL_CATEGORY;

        self.products.iter().filter(move |product| {
            (any_category || same_category(&product.category, category))
                && (query.is_empty()
                    || product.name.to_lowercase().contains(&query)
                    || product.category.to_lowercase().contains(&query)
                    || product.description.to_lowercase().contains(&query))
        })
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn same_category(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    const MENU: &str = r#"
currency: USD
categories:
  - id: all
    name: All Items
  - id: burgers
    name: Burgers
    icon: "B"
  - id: drinks
    name: Drinks
  - id: desserts
    name: Desserts
products:
  - id: classic-burger
    name: Classic Burger
    price: "12.99"
    category: Burgers
    description: Beef patty with cheddar
  - id: veggie-burger
    name: Veggie Burger
    price: "11.50"
    category: burgers
    description: Black bean patty
  - id: cola
    name: Cola
    price: "2.5"
    category: drinks
    description: Served with ice
"#;

    #[test]
    fn counts_are_derived_from_products() -> TestResult {
        let catalog = Catalog::from_yaml_str(MENU)?;

        let counts: Vec<(&str, usize)> = catalog
            .categories()
            .iter()
            .map(|category| (category.id.as_str(), category.count))
            .collect();

        assert_eq!(
            counts,
            vec![("all", 3), ("burgers", 2), ("drinks", 1), ("desserts", 0)]
        );
        assert_eq!(catalog.currency(), USD);

        Ok(())
    }

    #[test]
    fn products_are_found_by_id() -> TestResult {
        let catalog = Catalog::from_yaml_str(MENU)?;

        let cola = catalog.product("cola").ok_or("cola should exist")?;

        assert_eq!(cola.price, Decimal::new(25, 1));
        assert!(catalog.product("water").is_none());

        Ok(())
    }

    #[test]
    fn filter_by_category_ignores_case_and_whitespace() -> TestResult {
        let catalog = Catalog::from_yaml_str(MENU)?;

        let ids: Vec<&str> = catalog
            .filter(" BURGERS ", "")
            .map(|product| product.id.as_str())
            .collect();

        assert_eq!(ids, vec!["classic-burger", "veggie-burger"]);
        assert_eq!(catalog.filter("all", "").count(), 3);
        assert_eq!(catalog.filter("desserts", "").count(), 0);

        Ok(())
    }

    #[test]
    fn search_matches_name_category_and_description() -> TestResult {
        let catalog = Catalog::from_yaml_str(MENU)?;

        let search = |query: &str| -> Vec<String> {
            catalog
                .filter(ALL_CATEGORY, query)
                .map(|product| product.id.clone())
                .collect()
        };

        assert_eq!(search("veggie"), vec!["veggie-burger"]);
        assert_eq!(search("DRINK"), vec!["cola"]);
        assert_eq!(search("patty"), vec!["classic-burger", "veggie-burger"]);
        assert!(search("sushi").is_empty());

        Ok(())
    }

    #[test]
    fn search_narrows_a_category() -> TestResult {
        let catalog = Catalog::from_yaml_str(MENU)?;

        assert_eq!(catalog.filter("burgers", "cheddar").count(), 1);
        assert_eq!(catalog.filter("drinks", "cheddar").count(), 0);

        Ok(())
    }

    #[test]
    fn other_currencies_are_supported() -> TestResult {
        let catalog = Catalog::from_yaml_str("currency: GBP\n")?;

        assert_eq!(catalog.currency(), GBP);
        assert!(catalog.products().is_empty());

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let result = Catalog::from_yaml_str("currency: XXY\n");

        assert!(matches!(result, Err(CatalogError::UnknownCurrency(code)) if code == "XXY"));
    }

    #[test]
    fn invalid_prices_are_rejected() {
        for price in ["twelve", "-1.00"] {
            let yaml = format!(
                r#"
currency: USD
products:
  - id: x
    name: X
    price: "{price}"
    category: misc
"#
            );

            assert!(
                matches!(
                    Catalog::from_yaml_str(&yaml),
                    Err(CatalogError::InvalidPrice { .. })
                ),
                "{price} should be rejected"
            );
        }
    }

    #[test]
    fn duplicate_product_ids_are_rejected() {
        let yaml = r#"
currency: USD
products:
  - id: x
    name: X
    price: "1"
    category: misc
  - id: x
    name: Y
    price: "2"
    category: misc
"#;

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::DuplicateProduct(id)) if id == "x"
        ));
    }

    #[test]
    fn bundled_menu_loads() -> TestResult {
        let catalog =
            Catalog::from_path(Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/menu.yml"))?;

        assert!(!catalog.products().is_empty());
        assert_eq!(
            catalog.categories().first().map(|category| category.count),
            Some(catalog.products().len())
        );

        Ok(())
    }
}
