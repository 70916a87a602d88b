//! Cart line items.

use goshen_core::{ProductId, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product's entry in a cart.
///
/// The same shape is returned by the backend as `cartData` and persisted as
/// the guest cart, so the wire names (`id`, `price`, `total`) are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product this line is for. At most one line per product.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Unit price at the time the product was added.
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    #[serde(rename = "total", with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

impl CartLineItem {
    /// Create a line with its total computed.
    #[must_use]
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
            line_total: Decimal::from(quantity) * unit_price,
        }
    }

    /// Set a new quantity and recompute the total against `unit_price`.
    pub fn set_quantity(&mut self, quantity: u32, unit_price: Decimal) {
        self.quantity = quantity;
        self.unit_price = unit_price;
        self.line_total = Decimal::from(quantity) * unit_price;
    }

    /// Line total rounded to cents for display.
    #[must_use]
    pub fn display_total(&self) -> Decimal {
        round_money(self.line_total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_computes_total() {
        let line = CartLineItem::new(ProductId::new("p1"), 3, Decimal::new(199, 2));
        assert_eq!(line.line_total, Decimal::new(597, 2));
    }

    #[test]
    fn test_line_uses_wire_field_names() {
        let line = CartLineItem::new(ProductId::new("p1"), 2, Decimal::new(5, 0));
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["id"], "p1");
        assert_eq!(value["quantity"], 2);
        assert_eq!(value["price"], 5.0);
        assert_eq!(value["total"], 10.0);

        let back: CartLineItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, line);
    }
}
