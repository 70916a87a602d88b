//! Orders as returned by the order history endpoint.

use chrono::{DateTime, Utc};
use goshen_core::{OrderId, OrderStatus, PaymentMethod, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::forms::ShippingAddress;

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default, alias = "shippingAddress")]
    pub address: Option<ShippingAddress>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, rename = "paymentMethod")]
    pub payment_method: Option<PaymentMethod>,
    /// Free-form payment label from the backend (it writes `paied` once settled).
    #[serde(default, rename = "paymentStatus")]
    pub payment_status: Option<String>,
    #[serde(
        default,
        rename = "createdAt",
        alias = "date",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Whether the backend reports this order as paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status
            .as_deref()
            .is_some_and(|s| matches!(s.to_ascii_lowercase().as_str(), "paid" | "paied"))
    }
}

/// A product snapshot with the quantity ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "_id")]
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

/// Accept either epoch milliseconds or an RFC 3339 string.
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Millis(ms)) => DateTime::from_timestamp_millis(ms),
        Some(Raw::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        None => None,
    })
}
