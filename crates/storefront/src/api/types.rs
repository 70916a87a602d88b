//! Request and response payloads for the backend REST API.

use goshen_core::{OrderId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CartLineItem, Inquiry, Order, Product, ShippingAddress};

/// Fields shared by every backend reply.
///
/// The payload sits next to these fields and is parsed separately once the
/// reply is known to be successful.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload-free reply.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsPayload {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenPayload {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartPayload {
    #[serde(default, rename = "cartData")]
    pub cart_data: Vec<CartLineItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderPayload {
    #[serde(default)]
    pub order: Option<Order>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPayload {
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagesPayload {
    #[serde(default)]
    pub messages: Vec<Inquiry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentPayload {
    #[serde(default)]
    pub session_url: Option<String>,
    #[serde(default, rename = "clientSecret")]
    pub client_secret: Option<String>,
    #[serde(default, rename = "orderId")]
    pub order_id: Option<OrderId>,
}

/// Cart returned by a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartReply {
    pub lines: Vec<CartLineItem>,
    pub message: Option<String>,
}

/// How a card payment continues after it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentSession {
    /// Hosted checkout page to open.
    Redirect { session_url: String },
    /// Card form confirmation with an intent secret.
    CardPayment {
        client_secret: String,
        order_id: OrderId,
    },
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub phone: &'a str,
    pub confirmpsd: &'a str,
}

/// Body of the add/plus/deduct cart calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemRequest {
    pub id: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemIdRequest<'a> {
    pub id: &'a str,
}

/// A catalog product with the ordered quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub address: ShippingAddress,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifySessionRequest<'a> {
    pub session_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmPaymentRequest<'a> {
    #[serde(rename = "orderId")]
    pub order_id: &'a str,
    pub success: bool,
}
