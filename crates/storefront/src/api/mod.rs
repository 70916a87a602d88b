//! Backend REST API client.
//!
//! # Architecture
//!
//! - [`ShopBackend`] is the seam between the store and the network: one
//!   method per endpoint, object-safe so the store holds an
//!   `Arc<dyn ShopBackend>` and tests swap in a scripted mock
//! - [`BackendClient`] implements it over `reqwest`
//! - Every reply is an envelope `{ success, message?, ...payload }`; a
//!   `success: false` reply becomes [`ApiError::Rejected`]
//! - The product list is cached in memory via `moka`
//!
//! # Example
//!
//! ```rust,ignore
//! use goshen_storefront::api::{BackendClient, ShopBackend};
//!
//! let client = BackendClient::new(&config)?;
//! let products = client.list_products(false).await?;
//! let token = client.login("ada@example.com", "hunter22").await?;
//! let cart = client.get_cart(&token).await?;
//! ```

mod client;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;

pub use client::BackendClient;
pub use types::{CartItemRequest, CartReply, OrderItem, OrderRequest, PaymentSession};

use async_trait::async_trait;
use goshen_core::{InquiryId, OrderId, ProductId};
use secrecy::SecretString;
use thiserror::Error;

use crate::models::{CartLineItem, ContactForm, Inquiry, Order, Product};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend answered `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// The backend operations the storefront consumes.
///
/// Authenticated calls take the session token, sent in a `token` header.
#[async_trait]
pub trait ShopBackend: Send + Sync {
    /// Full product catalog. `fresh` bypasses any cache.
    async fn list_products(&self, fresh: bool) -> Result<Vec<Product>, ApiError>;

    async fn register(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<SecretString, ApiError>;

    async fn login(&self, email: &str, password: &SecretString) -> Result<SecretString, ApiError>;

    async fn get_cart(&self, token: &SecretString) -> Result<Vec<CartLineItem>, ApiError>;

    async fn add_to_cart(
        &self,
        token: &SecretString,
        item: &CartItemRequest,
    ) -> Result<CartReply, ApiError>;

    async fn increment_cart_item(
        &self,
        token: &SecretString,
        item: &CartItemRequest,
    ) -> Result<CartReply, ApiError>;

    async fn decrement_cart_item(
        &self,
        token: &SecretString,
        item: &CartItemRequest,
    ) -> Result<CartReply, ApiError>;

    async fn remove_cart_item(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> Result<CartReply, ApiError>;

    /// Cash-on-delivery order. Guests may check out, so the token is optional.
    async fn place_order(
        &self,
        token: Option<&SecretString>,
        order: &OrderRequest,
    ) -> Result<Option<Order>, ApiError>;

    /// Start a card payment for an order.
    async fn create_payment(
        &self,
        token: Option<&SecretString>,
        order: &OrderRequest,
    ) -> Result<PaymentSession, ApiError>;

    /// Verify a hosted checkout session after the shopper returns.
    async fn verify_checkout_session(
        &self,
        token: &SecretString,
        session_id: &str,
    ) -> Result<(), ApiError>;

    /// Mark a card-paid order as paid.
    async fn confirm_payment(
        &self,
        token: Option<&SecretString>,
        order_id: &OrderId,
    ) -> Result<(), ApiError>;

    async fn user_orders(&self, token: &SecretString) -> Result<Vec<Order>, ApiError>;

    /// Returns the backend's confirmation message.
    async fn submit_inquiry(
        &self,
        token: Option<&SecretString>,
        form: &ContactForm,
    ) -> Result<Option<String>, ApiError>;

    async fn user_inquiries(&self, token: &SecretString) -> Result<Vec<Inquiry>, ApiError>;

    async fn mark_inquiry_read(
        &self,
        token: &SecretString,
        inquiry_id: &InquiryId,
    ) -> Result<(), ApiError>;
}
