//! `reqwest` implementation of [`ShopBackend`].

use std::sync::Arc;

use async_trait::async_trait;
use goshen_core::{InquiryId, OrderId, ProductId};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::types::{
    CartPayload, ConfirmPaymentRequest, Empty, ItemIdRequest, LoginRequest, MessagesPayload,
    OrderPayload, OrdersPayload, PaymentPayload, ProductsPayload, RegisterRequest, ReplyStatus,
    TokenPayload, VerifySessionRequest,
};
use super::{ApiError, CartItemRequest, CartReply, OrderRequest, PaymentSession, ShopBackend};
use crate::config::StorefrontConfig;
use crate::models::{CartLineItem, ContactForm, Inquiry, Order, Product};

const PRODUCTS_KEY: &str = "products";
const DEFAULT_REJECTION: &str = "Request failed";

/// HTTP client for the shop backend.
///
/// Cheap to clone; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<&'static str, Arc<Vec<Product>>>,
}

/// A successful reply: its payload plus the backend's message, if any.
struct Reply<T> {
    payload: T,
    message: Option<String>,
}

impl BackendClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.catalog_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.backend_url.clone(),
                products,
            }),
        })
    }

    /// Drop the cached product list.
    pub async fn invalidate_products(&self) {
        self.inner.products.invalidate(PRODUCTS_KEY).await;
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Reply<T>, ApiError> {
        let url = self.inner.base_url.join(path)?;
        let request = self.inner.client.get(url);
        self.execute(request).await
    }

    async fn post<B, T>(
        &self,
        path: &str,
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<Reply<T>, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.inner.base_url.join(path)?;
        let mut request = self.inner.client.post(url).json(body);
        if let Some(token) = token {
            request = request.header("token", token.expose_secret());
        }
        self.execute(request).await
    }

    /// Send a request and unwrap the reply envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Reply<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        let reply_status: ReplyStatus = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse backend reply"
            );
            ApiError::Parse(e)
        })?;

        if !reply_status.success {
            let message = reply_status
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REJECTION.to_string());
            debug!(message = %message, "Backend rejected request");
            return Err(ApiError::Rejected(message));
        }

        let payload = serde_json::from_str(&response_text)?;
        Ok(Reply {
            payload,
            message: reply_status.message,
        })
    }

    async fn cart_call<B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        token: &SecretString,
        body: &B,
    ) -> Result<CartReply, ApiError> {
        let reply: Reply<CartPayload> = self.post(path, Some(token), body).await?;
        Ok(CartReply {
            lines: reply.payload.cart_data,
            message: reply.message,
        })
    }
}

#[async_trait]
impl ShopBackend for BackendClient {
    #[instrument(skip(self))]
    async fn list_products(&self, fresh: bool) -> Result<Vec<Product>, ApiError> {
        if !fresh && let Some(products) = self.inner.products.get(PRODUCTS_KEY).await {
            debug!("Cache hit for product list");
            return Ok(products.as_ref().clone());
        }

        let reply: Reply<ProductsPayload> = self.get("/api/product/list").await?;
        let products = reply.payload.products;
        debug!(count = products.len(), "Fetched product list");

        self.inner
            .products
            .insert(PRODUCTS_KEY, Arc::new(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self, password, confirm_password))]
    async fn register(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<SecretString, ApiError> {
        let body = RegisterRequest {
            name,
            email,
            password: password.expose_secret(),
            phone,
            confirmpsd: confirm_password.expose_secret(),
        };
        let reply: Reply<TokenPayload> = self.post("/api/user/register", None, &body).await?;
        Ok(SecretString::from(reply.payload.token))
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &SecretString) -> Result<SecretString, ApiError> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let reply: Reply<TokenPayload> = self.post("/api/user/login", None, &body).await?;
        Ok(SecretString::from(reply.payload.token))
    }

    #[instrument(skip_all)]
    async fn get_cart(&self, token: &SecretString) -> Result<Vec<CartLineItem>, ApiError> {
        let reply: Reply<CartPayload> = self
            .post("/api/cart/get", Some(token), &serde_json::json!({}))
            .await?;
        Ok(reply.payload.cart_data)
    }

    #[instrument(skip(self, token), fields(product_id = %item.id))]
    async fn add_to_cart(
        &self,
        token: &SecretString,
        item: &CartItemRequest,
    ) -> Result<CartReply, ApiError> {
        self.cart_call("/api/cart/add", token, item).await
    }

    #[instrument(skip(self, token), fields(product_id = %item.id))]
    async fn increment_cart_item(
        &self,
        token: &SecretString,
        item: &CartItemRequest,
    ) -> Result<CartReply, ApiError> {
        self.cart_call("/api/cart/plus", token, item).await
    }

    #[instrument(skip(self, token), fields(product_id = %item.id))]
    async fn decrement_cart_item(
        &self,
        token: &SecretString,
        item: &CartItemRequest,
    ) -> Result<CartReply, ApiError> {
        self.cart_call("/api/cart/deduct", token, item).await
    }

    #[instrument(skip(self, token), fields(product_id = %product_id))]
    async fn remove_cart_item(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> Result<CartReply, ApiError> {
        let body = ItemIdRequest {
            id: product_id.as_str(),
        };
        self.cart_call("/api/cart/remove", token, &body).await
    }

    #[instrument(skip_all, fields(items = order.items.len(), amount = %order.amount))]
    async fn place_order(
        &self,
        token: Option<&SecretString>,
        order: &OrderRequest,
    ) -> Result<Option<Order>, ApiError> {
        let reply: Reply<OrderPayload> = self.post("/api/order/place", token, order).await?;
        Ok(reply.payload.order)
    }

    #[instrument(skip_all, fields(items = order.items.len(), amount = %order.amount))]
    async fn create_payment(
        &self,
        token: Option<&SecretString>,
        order: &OrderRequest,
    ) -> Result<PaymentSession, ApiError> {
        let reply: Reply<PaymentPayload> = self.post("/api/order/stripe", token, order).await?;
        let PaymentPayload {
            session_url,
            client_secret,
            order_id,
        } = reply.payload;

        match (session_url, client_secret, order_id) {
            (Some(session_url), _, _) => Ok(PaymentSession::Redirect { session_url }),
            (None, Some(client_secret), Some(order_id)) => Ok(PaymentSession::CardPayment {
                client_secret,
                order_id,
            }),
            _ => Err(ApiError::Rejected(
                "Payment session missing from reply".to_string(),
            )),
        }
    }

    #[instrument(skip(self, token))]
    async fn verify_checkout_session(
        &self,
        token: &SecretString,
        session_id: &str,
    ) -> Result<(), ApiError> {
        let body = VerifySessionRequest { session_id };
        let _: Reply<Empty> = self.post("/api/order/verifyStripe", Some(token), &body).await?;
        Ok(())
    }

    #[instrument(skip(self, token), fields(order_id = %order_id))]
    async fn confirm_payment(
        &self,
        token: Option<&SecretString>,
        order_id: &OrderId,
    ) -> Result<(), ApiError> {
        let body = ConfirmPaymentRequest {
            order_id: order_id.as_str(),
            success: true,
        };
        let _: Reply<Empty> = self.post("/api/order/verify-stripe", token, &body).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn user_orders(&self, token: &SecretString) -> Result<Vec<Order>, ApiError> {
        let reply: Reply<OrdersPayload> = self
            .post("/api/order/userorders", Some(token), &serde_json::json!({}))
            .await?;
        Ok(reply.payload.orders)
    }

    #[instrument(skip(self, token, form), fields(subject = %form.subject))]
    async fn submit_inquiry(
        &self,
        token: Option<&SecretString>,
        form: &ContactForm,
    ) -> Result<Option<String>, ApiError> {
        let reply: Reply<Empty> = self.post("/api/contact/add", token, form).await?;
        Ok(reply.message)
    }

    #[instrument(skip_all)]
    async fn user_inquiries(&self, token: &SecretString) -> Result<Vec<Inquiry>, ApiError> {
        let reply: Reply<MessagesPayload> = self
            .post("/api/contact/user-inquiries", Some(token), &serde_json::json!({}))
            .await?;
        Ok(reply.payload.messages)
    }

    #[instrument(skip(self, token), fields(inquiry_id = %inquiry_id))]
    async fn mark_inquiry_read(
        &self,
        token: &SecretString,
        inquiry_id: &InquiryId,
    ) -> Result<(), ApiError> {
        let body = ItemIdRequest {
            id: inquiry_id.as_str(),
        };
        let _: Reply<Empty> = self.post("/api/contact/mark-read", Some(token), &body).await?;
        Ok(())
    }
}
