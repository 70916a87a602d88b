//! Catalog products and shop categories.

use goshen_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as listed by the backend catalog.
///
/// Read-only from the client's point of view for the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "subCategory")]
    pub sub_category: String,
    /// The backend spells this field `stockAvaiable`.
    #[serde(default, rename = "stockAvaiable")]
    pub in_stock: bool,
    #[serde(default, rename = "newArrive")]
    pub new_arrival: bool,
    #[serde(default, rename = "bestSelling")]
    pub best_selling: bool,
}

impl Product {
    /// Title shown in listings: the name, or the description when unnamed.
    #[must_use]
    pub fn title(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.description
        } else {
            &self.name
        }
    }
}

/// Top-level shop departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    VegetablesAndFruits,
    Groceries,
    SnacksAndDrinks,
    Homewares,
}

impl Category {
    pub const ALL: [Self; 4] = [
        Self::VegetablesAndFruits,
        Self::Groceries,
        Self::SnacksAndDrinks,
        Self::Homewares,
    ];

    /// Category name exactly as stored on products.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::VegetablesAndFruits => "Vegetables & Fruits",
            Self::Groceries => "Groceries",
            Self::SnacksAndDrinks => "Snacks & Drinks",
            Self::Homewares => "Homewares",
        }
    }

    /// URL slug of the category page.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::VegetablesAndFruits => "vegetables-fruits",
            Self::Groceries => "groceries",
            Self::SnacksAndDrinks => "snacks-drinks",
            Self::Homewares => "homewares",
        }
    }

    /// Subcategories offered in the category page filter.
    #[must_use]
    pub const fn subcategories(&self) -> &'static [&'static str] {
        match self {
            Self::VegetablesAndFruits => &[
                "Leafy greens",
                "Root vegetables",
                "Fruits",
                "Asia vegetables",
            ],
            Self::Groceries => &[
                "Rice",
                "Noodles",
                "Cooking oil",
                "Salt",
                "Sugar",
                "Sauces",
                "Spices & seasoning",
                "Canned foods",
                "Dry beans & lentils",
                "Instant foods",
                "Dry food",
                "Corn & maize",
            ],
            Self::SnacksAndDrinks => &[
                "Chips",
                "Candies",
                "Biscuits",
                "Soft drinks",
                "Energy drinks",
                "Asian beverages",
                "Tea",
                "Coffee",
            ],
            Self::Homewares => &[
                "Kitchenware",
                "Cleaning supplies",
                "Storage containers",
                "Small appliances",
                "Tableware & utensils",
            ],
        }
    }

    /// Look a category up by slug or display name (case-insensitive).
    #[must_use]
    pub fn lookup(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|category| {
            category.slug().eq_ignore_ascii_case(value) || category.name().eq_ignore_ascii_case(value)
        })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
