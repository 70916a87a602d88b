//! Status enums for orders, inquiries and payments.

use serde::{Deserialize, Deserializer, Serialize};

/// Order fulfilment status as reported by the backend.
///
/// The backend stores human-readable labels, so those labels are the wire
/// format. Anything unrecognised is treated as a freshly placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Order Placed")]
    OrderPlaced,
    #[serde(rename = "Shipped")]
    Shipped,
    #[serde(rename = "Out for delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
}

impl OrderStatus {
    /// All statuses in tracking order.
    pub const STEPS: [Self; 4] = [
        Self::OrderPlaced,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Position of this status on the order tracking bar (0-based).
    #[must_use]
    pub const fn tracking_step(&self) -> usize {
        match self {
            Self::OrderPlaced => 0,
            Self::Shipped => 1,
            Self::OutForDelivery => 2,
            Self::Delivered => 3,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OrderPlaced => "Order Placed",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for delivery",
            Self::Delivered => "Delivered",
        }
    }

    /// Parse a backend label, falling back to [`OrderStatus::OrderPlaced`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::STEPS
            .into_iter()
            .find(|status| status.label() == label)
            .unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map(Self::from_label).unwrap_or_default())
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Support inquiry status.
///
/// Only `replied` matters to the shopper; every other backend value reads as
/// still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    #[default]
    Pending,
    Replied,
}

impl<'de> Deserialize<'de> for InquiryStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(match label.as_deref() {
            Some("replied") => Self::Replied,
            _ => Self::Pending,
        })
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Replied => write!(f, "replied"),
        }
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    /// Card payment through the hosted payment processor.
    Stripe,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cod => write!(f, "cod"),
            Self::Stripe => write!(f, "stripe"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cod" => Ok(Self::Cod),
            "stripe" | "card" => Ok(Self::Stripe),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
