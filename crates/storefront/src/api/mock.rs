#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use goshen_core::{InquiryId, OrderId, OrderStatus, PaymentMethod, ProductId};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::oneshot;

use super::{ApiError, CartItemRequest, CartReply, OrderRequest, PaymentSession, ShopBackend};
use crate::models::{CartLineItem, ContactForm, Inquiry, Order, Product};

/// Password every mock account accepts.
pub const PASSWORD: &str = "hunter22";

/// In-memory backend that behaves like the real cart endpoints.
#[derive(Clone, Default)]
pub struct MockBackend {
    pub state: Arc<Mutex<MockState>>,
    gates: Arc<Mutex<VecDeque<oneshot::Receiver<()>>>>,
}

#[derive(Default)]
pub struct MockState {
    pub products: Vec<Product>,
    pub carts: HashMap<String, Vec<CartLineItem>>,
    pub orders: Vec<Order>,
    pub placed: Vec<OrderRequest>,
    pub inquiries: Vec<Inquiry>,
    pub submitted: Vec<ContactForm>,
    pub marked_read: Vec<InquiryId>,
    pub confirmed: Vec<OrderId>,
    pub calls: Vec<&'static str>,
    pub payment: Option<PaymentSession>,
    /// Next call fails with this rejection.
    pub reject_next: Option<String>,
    /// Mark-read calls fail.
    pub fail_mark_read: bool,
}

pub fn product(id: &str, price: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: format!("Fresh {id}"),
        price,
        image: None,
        category: "Groceries".to_string(),
        sub_category: "Pantry".to_string(),
        in_stock: true,
        new_arrival: false,
        best_selling: false,
    }
}

pub fn token_for(email: &str) -> String {
    format!("token-{email}")
}

impl MockBackend {
    pub fn with_products(products: Vec<Product>) -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().products = products;
        mock
    }

    /// Hold the next cart mutation's reply until the returned sender fires.
    ///
    /// The reply is computed when the call arrives, so a held reply carries
    /// the server cart as it was at that moment.
    pub fn hold_next_cart_call(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn server_cart(&self, token: &str) -> Vec<CartLineItem> {
        self.state
            .lock()
            .unwrap()
            .carts
            .get(token)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_server_cart(&self, token: &str, lines: Vec<CartLineItem>) {
        self.state
            .lock()
            .unwrap()
            .carts
            .insert(token.to_string(), lines);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: &'static str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.reject_next.take().map_or(Ok(()), |m| Err(ApiError::Rejected(m)))
    }

    async fn mutate_cart(
        &self,
        call: &'static str,
        token: &SecretString,
        f: impl FnOnce(&mut Vec<CartLineItem>),
    ) -> Result<CartReply, ApiError> {
        self.record(call)?;
        let lines = {
            let mut state = self.state.lock().unwrap();
            let cart = state
                .carts
                .entry(token.expose_secret().to_string())
                .or_default();
            f(cart);
            cart.clone()
        };

        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        Ok(CartReply {
            lines,
            message: (call == "add_to_cart").then(|| "Added To Cart".to_string()),
        })
    }
}

#[async_trait]
impl ShopBackend for MockBackend {
    async fn list_products(&self, _fresh: bool) -> Result<Vec<Product>, ApiError> {
        self.record("list_products")?;
        Ok(self.state.lock().unwrap().products.clone())
    }

    async fn register(
        &self,
        _name: &str,
        email: &str,
        _phone: &str,
        _password: &SecretString,
        _confirm_password: &SecretString,
    ) -> Result<SecretString, ApiError> {
        self.record("register")?;
        Ok(SecretString::from(token_for(email)))
    }

    async fn login(&self, email: &str, password: &SecretString) -> Result<SecretString, ApiError> {
        self.record("login")?;
        if password.expose_secret() != PASSWORD {
            return Err(ApiError::Rejected("Invalid credentials".to_string()));
        }
        Ok(SecretString::from(token_for(email)))
    }

    async fn get_cart(&self, token: &SecretString) -> Result<Vec<CartLineItem>, ApiError> {
        self.record("get_cart")?;
        Ok(self.server_cart(token.expose_secret()))
    }

    async fn add_to_cart(
        &self,
        token: &SecretString,
        item: &CartItemRequest,
    ) -> Result<CartReply, ApiError> {
        let item = item.clone();
        self.mutate_cart("add_to_cart", token, move |cart| {
            if let Some(line) = cart.iter_mut().find(|l| l.product_id == item.id) {
                let quantity = line.quantity + item.quantity;
                line.set_quantity(quantity, item.price);
            } else {
                cart.push(CartLineItem::new(item.id, item.quantity, item.price));
            }
        })
        .await
    }

    async fn increment_cart_item(
        &self,
        token: &SecretString,
        item: &CartItemRequest,
    ) -> Result<CartReply, ApiError> {
        let item = item.clone();
        self.mutate_cart("increment_cart_item", token, move |cart| {
            if let Some(line) = cart.iter_mut().find(|l| l.product_id == item.id) {
                let quantity = line.quantity + 1;
                line.set_quantity(quantity, item.price);
            }
        })
        .await
    }

    async fn decrement_cart_item(
        &self,
        token: &SecretString,
        item: &CartItemRequest,
    ) -> Result<CartReply, ApiError> {
        let item = item.clone();
        self.mutate_cart("decrement_cart_item", token, move |cart| {
            if let Some(line) = cart.iter_mut().find(|l| l.product_id == item.id) {
                let quantity = line.quantity.saturating_sub(1);
                line.set_quantity(quantity, item.price);
            }
            cart.retain(|l| l.quantity > 0);
        })
        .await
    }

    async fn remove_cart_item(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> Result<CartReply, ApiError> {
        let product_id = product_id.clone();
        self.mutate_cart("remove_cart_item", token, move |cart| {
            cart.retain(|l| l.product_id != product_id);
        })
        .await
    }

    async fn place_order(
        &self,
        _token: Option<&SecretString>,
        order: &OrderRequest,
    ) -> Result<Option<Order>, ApiError> {
        self.record("place_order")?;
        let mut state = self.state.lock().unwrap();
        state.placed.push(order.clone());
        let placed = Order {
            id: OrderId::new(format!("order-{}", state.placed.len())),
            items: Vec::new(),
            amount: order.amount,
            address: Some(order.address.clone()),
            status: OrderStatus::OrderPlaced,
            payment_method: Some(PaymentMethod::Cod),
            payment_status: None,
            created_at: None,
        };
        drop(state);
        Ok(Some(placed))
    }

    async fn create_payment(
        &self,
        _token: Option<&SecretString>,
        order: &OrderRequest,
    ) -> Result<PaymentSession, ApiError> {
        self.record("create_payment")?;
        let mut state = self.state.lock().unwrap();
        state.placed.push(order.clone());
        Ok(state.payment.clone().unwrap_or_else(|| PaymentSession::Redirect {
            session_url: "https://pay.example.test/session/1".to_string(),
        }))
    }

    async fn verify_checkout_session(
        &self,
        _token: &SecretString,
        session_id: &str,
    ) -> Result<(), ApiError> {
        self.record("verify_checkout_session")?;
        if session_id.starts_with("cs_") {
            Ok(())
        } else {
            Err(ApiError::Rejected("Payment not completed".to_string()))
        }
    }

    async fn confirm_payment(
        &self,
        _token: Option<&SecretString>,
        order_id: &OrderId,
    ) -> Result<(), ApiError> {
        self.record("confirm_payment")?;
        self.state.lock().unwrap().confirmed.push(order_id.clone());
        Ok(())
    }

    async fn user_orders(&self, _token: &SecretString) -> Result<Vec<Order>, ApiError> {
        self.record("user_orders")?;
        Ok(self.state.lock().unwrap().orders.clone())
    }

    async fn submit_inquiry(
        &self,
        _token: Option<&SecretString>,
        form: &ContactForm,
    ) -> Result<Option<String>, ApiError> {
        self.record("submit_inquiry")?;
        self.state.lock().unwrap().submitted.push(form.clone());
        Ok(Some("Message sent".to_string()))
    }

    async fn user_inquiries(&self, _token: &SecretString) -> Result<Vec<Inquiry>, ApiError> {
        self.record("user_inquiries")?;
        Ok(self.state.lock().unwrap().inquiries.clone())
    }

    async fn mark_inquiry_read(
        &self,
        _token: &SecretString,
        inquiry_id: &InquiryId,
    ) -> Result<(), ApiError> {
        self.record("mark_inquiry_read")?;
        let mut state = self.state.lock().unwrap();
        if state.fail_mark_read {
            return Err(ApiError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        state.marked_read.push(inquiry_id.clone());
        if let Some(inquiry) = state.inquiries.iter_mut().find(|i| &i.id == inquiry_id) {
            inquiry.is_read = true;
        }
        drop(state);
        Ok(())
    }
}
