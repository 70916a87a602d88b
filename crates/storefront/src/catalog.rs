//! Product catalog snapshot with category filtering, sorting and search.

use std::str::FromStr;

use goshen_core::{ProductId, round_money};
use rust_decimal::Decimal;

use crate::models::{Category, Product};

/// How many flagged products the home page rails show.
pub const RAIL_LIMIT: usize = 30;

/// Subcategory option meaning "no subcategory filter".
pub const ALL_SUBCATEGORIES: &str = "All Subcategories";

/// The product list as last fetched from the backend.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whether a product id is currently listed. Cart lines for unlisted
    /// products are stale.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.iter().any(|p| &p.id == id)
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products in a category, in catalog order.
    #[must_use]
    pub fn in_category(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category.name())
            .collect()
    }

    #[must_use]
    pub fn new_arrivals(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.new_arrival)
            .take(RAIL_LIMIT)
            .collect()
    }

    #[must_use]
    pub fn best_sellers(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.best_selling)
            .take(RAIL_LIMIT)
            .collect()
    }

    /// Search in-stock products by category, description or subcategory.
    ///
    /// Matching is a case-insensitive substring test. A blank term matches
    /// nothing.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Product> {
        if term.trim().is_empty() {
            return Vec::new();
        }
        let term = term.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.in_stock)
            .filter(|p| {
                p.category.to_lowercase().contains(&term)
                    || p.description.to_lowercase().contains(&term)
                    || p.sub_category.to_lowercase().contains(&term)
            })
            .collect()
    }
}

/// Stock filter on category pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    All,
    InStock,
    OutOfStock,
}

impl FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "all-products" => Ok(Self::All),
            "in-stock" => Ok(Self::InStock),
            "out-of-stock" => Ok(Self::OutOfStock),
            _ => Err(format!("invalid availability: {s}")),
        }
    }
}

/// Ordering on category pages.
///
/// `BestSelling` and `NewArrivals` narrow the list to flagged products and
/// keep catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    LowHigh,
    HighLow,
    BestSelling,
    NewArrivals,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low-high" => Ok(Self::LowHigh),
            "high-low" => Ok(Self::HighLow),
            "best" => Ok(Self::BestSelling),
            "new" => Ok(Self::NewArrivals),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

/// Category page filter box state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub availability: Availability,
    pub subcategory: Option<String>,
    pub sort: SortOrder,
}

impl CatalogFilter {
    /// Apply availability, then subcategory, then ordering.
    #[must_use]
    pub fn apply<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> Vec<&'a Product> {
        let mut result: Vec<&Product> = products
            .into_iter()
            .filter(|p| match self.availability {
                Availability::All => true,
                Availability::InStock => p.in_stock,
                Availability::OutOfStock => !p.in_stock,
            })
            .filter(|p| match self.subcategory.as_deref() {
                None | Some("" | ALL_SUBCATEGORIES) => true,
                Some(sub) => p.sub_category == sub,
            })
            .collect();

        match self.sort {
            SortOrder::LowHigh => result.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::HighLow => result.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::BestSelling => result.retain(|p| p.best_selling),
            SortOrder::NewArrivals => result.retain(|p| p.new_arrival),
        }

        result
    }
}

/// Quantity picker on the product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantitySelector {
    quantity: u32,
}

impl Default for QuantitySelector {
    fn default() -> Self {
        Self { quantity: 1 }
    }
}

impl QuantitySelector {
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    pub const fn increase(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Never goes below one.
    pub const fn decrease(&mut self) {
        if self.quantity > 1 {
            self.quantity -= 1;
        }
    }

    #[must_use]
    pub fn line_total(&self, unit_price: Decimal) -> Decimal {
        round_money(Decimal::from(self.quantity) * unit_price)
    }
}
