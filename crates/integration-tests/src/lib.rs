//! Integration tests for the Goshen storefront.
//!
//! The tests drive a real [`ShopStore`] (HTTP client, file storage) against
//! [`MockShop`], an in-process axum server that speaks the backend REST API
//! and keeps its state in memory. No external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p goshen-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::start(vec![product("p1", "Kale", 5.0, true)]).await;
//! let store = ctx.store();
//! store.start().await;
//! assert_eq!(store.catalog().len(), 1);
//! ```

#![allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::unused_async
)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use goshen_storefront::{GuestCartPolicy, ShopStore, StorefrontConfig};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Password accepted for every seeded user.
pub const PASSWORD: &str = "hunter22";

const NOT_AUTHORIZED: &str = "Not Authorized Login Again";

/// A catalog product as the backend lists it.
#[must_use]
pub fn product(id: &str, name: &str, price: f64, in_stock: bool) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": format!("Fresh {name}"),
        "price": price,
        "image": format!("https://cdn.example.com/{id}.jpg"),
        "category": "Vegetables & Fruits",
        "subCategory": "Leafy greens",
        "stockAvaiable": in_stock,
        "newArrive": false,
        "bestSelling": false,
    })
}

/// The token the mock issues for a user.
#[must_use]
pub fn token_for(email: &str) -> String {
    format!("token-{email}")
}

// =============================================================================
// Backend state
// =============================================================================

/// A server-side cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerLine {
    pub id: String,
    pub quantity: u32,
    pub price: f64,
    pub total: f64,
}

impl ServerLine {
    fn new(id: String, quantity: u32, price: f64) -> Self {
        Self {
            id,
            quantity,
            price,
            total: f64::from(quantity) * price,
        }
    }
}

#[derive(Debug, Default)]
pub struct ShopState {
    pub products: Vec<Value>,
    /// email -> password
    pub users: HashMap<String, String>,
    /// token -> cart
    pub carts: HashMap<String, Vec<ServerLine>>,
    /// token -> orders, oldest first
    pub orders: HashMap<String, Vec<Value>>,
    /// token -> inquiries
    pub inquiries: HashMap<String, Vec<Value>>,
    /// Every submitted contact form, signed in or not.
    pub contact_forms: Vec<Value>,
    /// Every order body received.
    pub order_requests: Vec<Value>,
    /// Request count per path.
    pub hits: HashMap<String, usize>,
    /// Answer the next request with this status.
    pub fail_next: Option<StatusCode>,
    /// Answer the next request with 429 and this `Retry-After`.
    pub rate_limit_next: Option<u64>,
    next_order: u64,
}

/// In-memory backend. Clones share state.
#[derive(Clone, Default)]
pub struct MockShop {
    state: Arc<Mutex<ShopState>>,
}

impl MockShop {
    #[must_use]
    pub fn with_products(products: Vec<Value>) -> Self {
        let shop = Self::default();
        shop.state().products = products;
        shop
    }

    pub fn state(&self) -> MutexGuard<'_, ShopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_user(&self, email: &str) {
        self.state()
            .users
            .insert(email.to_string(), PASSWORD.to_string());
    }

    /// How many requests hit `path`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.state().hits.get(path).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn cart_of(&self, email: &str) -> Vec<ServerLine> {
        self.state()
            .carts
            .get(&token_for(email))
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_cart(&self, email: &str, lines: Vec<ServerLine>) {
        self.state().carts.insert(token_for(email), lines);
    }

    pub fn add_order(&self, email: &str, order: Value) {
        self.state()
            .orders
            .entry(token_for(email))
            .or_default()
            .push(order);
    }

    pub fn add_inquiry(&self, email: &str, inquiry: Value) {
        self.state()
            .inquiries
            .entry(token_for(email))
            .or_default()
            .push(inquiry);
    }

    pub fn fail_next(&self, status: StatusCode) {
        self.state().fail_next = Some(status);
    }

    pub fn rate_limit_next(&self, retry_after: u64) {
        self.state().rate_limit_next = Some(retry_after);
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/product/list", get(list_products))
            .route("/api/user/register", post(register))
            .route("/api/user/login", post(login))
            .route("/api/cart/get", post(get_cart))
            .route("/api/cart/add", post(add_to_cart))
            .route("/api/cart/plus", post(plus))
            .route("/api/cart/deduct", post(deduct))
            .route("/api/cart/remove", post(remove))
            .route("/api/order/place", post(place_order))
            .route("/api/order/stripe", post(stripe))
            .route("/api/order/verifyStripe", post(verify_session))
            .route("/api/order/verify-stripe", post(confirm_payment))
            .route("/api/order/userorders", post(user_orders))
            .route("/api/contact/add", post(add_inquiry))
            .route("/api/contact/user-inquiries", post(user_inquiries))
            .route("/api/contact/mark-read", post(mark_read))
            .with_state(self.clone())
    }

    /// Count the request and answer with an injected failure, if any.
    fn intercept(&self, path: &str) -> Option<Response> {
        let mut state = self.state();
        *state.hits.entry(path.to_string()).or_default() += 1;

        if let Some(retry_after) = state.rate_limit_next.take() {
            return Some(
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_after.to_string())],
                    "slow down",
                )
                    .into_response(),
            );
        }
        state
            .fail_next
            .take()
            .map(|status| (status, "backend exploded").into_response())
    }

    /// The token of a known user, or `None` for guests and strangers.
    fn authorize(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers.get("token")?.to_str().ok()?;
        let state = self.state();
        state
            .users
            .keys()
            .any(|email| token_for(email) == token)
            .then(|| token.to_string())
    }
}

fn ok(mut body: Value) -> Response {
    body["success"] = Value::Bool(true);
    Json(body).into_response()
}

fn rejected(message: &str) -> Response {
    Json(json!({ "success": false, "message": message })).into_response()
}

fn cart_reply(lines: &[ServerLine], message: Option<&str>) -> Response {
    let mut body = json!({ "cartData": lines });
    if let Some(message) = message {
        body["message"] = Value::String(message.to_string());
    }
    ok(body)
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(shop): State<MockShop>) -> Response {
    if let Some(failure) = shop.intercept("/api/product/list") {
        return failure;
    }
    let products = shop.state().products.clone();
    ok(json!({ "products": products }))
}

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    name: String,
    email: String,
    password: String,
    #[serde(default)]
    confirmpsd: Option<String>,
}

async fn register(State(shop): State<MockShop>, Json(body): Json<Credentials>) -> Response {
    if let Some(failure) = shop.intercept("/api/user/register") {
        return failure;
    }
    if body.name.is_empty() {
        return rejected("Name is required");
    }
    if body.confirmpsd.as_deref() != Some(body.password.as_str()) {
        return rejected("Passwords do not match");
    }
    let mut state = shop.state();
    if state.users.contains_key(&body.email) {
        return rejected("User already exists");
    }
    state.users.insert(body.email.clone(), body.password);
    ok(json!({ "token": token_for(&body.email) }))
}

async fn login(State(shop): State<MockShop>, Json(body): Json<Credentials>) -> Response {
    if let Some(failure) = shop.intercept("/api/user/login") {
        return failure;
    }
    let state = shop.state();
    match state.users.get(&body.email) {
        Some(password) if *password == body.password => {
            ok(json!({ "token": token_for(&body.email) }))
        }
        Some(_) => rejected("Invalid credentials"),
        None => rejected("User doesn't exist"),
    }
}

async fn get_cart(State(shop): State<MockShop>, headers: HeaderMap) -> Response {
    if let Some(failure) = shop.intercept("/api/cart/get") {
        return failure;
    }
    let Some(token) = shop.authorize(&headers) else {
        return rejected(NOT_AUTHORIZED);
    };
    let lines = shop.state().carts.get(&token).cloned().unwrap_or_default();
    cart_reply(&lines, None)
}

#[derive(Deserialize)]
struct CartItem {
    id: String,
    #[serde(default)]
    quantity: u32,
    #[serde(default)]
    price: f64,
}

/// Apply a cart mutation for an authorized user.
fn mutate_cart(
    shop: &MockShop,
    path: &str,
    headers: &HeaderMap,
    message: Option<&str>,
    mutate: impl FnOnce(&mut Vec<ServerLine>),
) -> Response {
    if let Some(failure) = shop.intercept(path) {
        return failure;
    }
    let Some(token) = shop.authorize(headers) else {
        return rejected(NOT_AUTHORIZED);
    };

    let lines = {
        let mut state = shop.state();
        let cart = state.carts.entry(token).or_default();
        mutate(cart);
        cart.clone()
    };
    cart_reply(&lines, message)
}

async fn add_to_cart(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(item): Json<CartItem>,
) -> Response {
    mutate_cart(&shop, "/api/cart/add", &headers, Some("Added To Cart"), |cart| {
        if let Some(line) = cart.iter_mut().find(|l| l.id == item.id) {
            *line = ServerLine::new(item.id, line.quantity + item.quantity, item.price);
        } else {
            cart.push(ServerLine::new(item.id, item.quantity, item.price));
        }
    })
}

async fn plus(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(item): Json<CartItem>,
) -> Response {
    mutate_cart(&shop, "/api/cart/plus", &headers, None, |cart| {
        if let Some(line) = cart.iter_mut().find(|l| l.id == item.id) {
            *line = ServerLine::new(item.id, line.quantity + 1, item.price);
        }
    })
}

async fn deduct(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(item): Json<CartItem>,
) -> Response {
    mutate_cart(&shop, "/api/cart/deduct", &headers, None, |cart| {
        if let Some(index) = cart.iter().position(|l| l.id == item.id) {
            let quantity = cart[index].quantity.saturating_sub(1);
            if quantity == 0 {
                cart.remove(index);
            } else {
                cart[index] = ServerLine::new(item.id, quantity, item.price);
            }
        }
    })
}

#[derive(Deserialize)]
struct ItemId {
    id: String,
}

async fn remove(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(item): Json<ItemId>,
) -> Response {
    mutate_cart(&shop, "/api/cart/remove", &headers, None, |cart| {
        cart.retain(|l| l.id != item.id);
    })
}

async fn place_order(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = shop.intercept("/api/order/place") {
        return failure;
    }
    let token = shop.authorize(&headers);

    let mut state = shop.state();
    state.next_order += 1;
    let order = json!({
        "_id": format!("order-{}", state.next_order),
        "items": body["items"],
        "amount": body["amount"],
        "address": body["address"],
        "status": "Order Placed",
        "paymentMethod": "cod",
        "paymentStatus": "pending",
        "createdAt": 1_700_000_000_000_i64 + i64::try_from(state.next_order).unwrap_or_default(),
    });
    state.order_requests.push(body);
    if let Some(token) = token {
        state.carts.remove(&token);
        state.orders.entry(token).or_default().push(order.clone());
    }
    ok(json!({ "message": "Order Placed", "order": order }))
}

async fn stripe(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = shop.intercept("/api/order/stripe") {
        return failure;
    }
    if shop.authorize(&headers).is_none() {
        return rejected(NOT_AUTHORIZED);
    }
    shop.state().order_requests.push(body);
    ok(json!({ "session_url": "https://checkout.example.com/cs_test_1" }))
}

#[derive(Deserialize)]
struct SessionId {
    session_id: String,
}

async fn verify_session(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(body): Json<SessionId>,
) -> Response {
    if let Some(failure) = shop.intercept("/api/order/verifyStripe") {
        return failure;
    }
    let Some(token) = shop.authorize(&headers) else {
        return rejected(NOT_AUTHORIZED);
    };
    if !body.session_id.starts_with("cs_") {
        return rejected("Payment failed");
    }
    shop.state().carts.remove(&token);
    ok(json!({}))
}

async fn confirm_payment(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = shop.intercept("/api/order/verify-stripe") {
        return failure;
    }
    if body["success"] != Value::Bool(true) || !body["orderId"].is_string() {
        return rejected("Payment failed");
    }
    if let Some(token) = shop.authorize(&headers) {
        shop.state().carts.remove(&token);
    }
    ok(json!({}))
}

async fn user_orders(State(shop): State<MockShop>, headers: HeaderMap) -> Response {
    if let Some(failure) = shop.intercept("/api/order/userorders") {
        return failure;
    }
    let Some(token) = shop.authorize(&headers) else {
        return rejected(NOT_AUTHORIZED);
    };
    let orders = shop.state().orders.get(&token).cloned().unwrap_or_default();
    ok(json!({ "orders": orders }))
}

async fn add_inquiry(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = shop.intercept("/api/contact/add") {
        return failure;
    }
    let token = shop.authorize(&headers);
    let mut state = shop.state();
    state.contact_forms.push(body.clone());
    if let Some(token) = token {
        let inquiries = state.inquiries.entry(token).or_default();
        let id = format!("inq-{}", inquiries.len() + 1);
        inquiries.push(json!({
            "_id": id,
            "subject": body["subject"],
            "message": body["message"],
            "status": "pending",
            "isRead": false,
        }));
    }
    ok(json!({ "message": "Message sent successfully" }))
}

async fn user_inquiries(State(shop): State<MockShop>, headers: HeaderMap) -> Response {
    if let Some(failure) = shop.intercept("/api/contact/user-inquiries") {
        return failure;
    }
    let Some(token) = shop.authorize(&headers) else {
        return rejected(NOT_AUTHORIZED);
    };
    let messages = shop.state().inquiries.get(&token).cloned().unwrap_or_default();
    ok(json!({ "messages": messages }))
}

async fn mark_read(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(body): Json<ItemId>,
) -> Response {
    if let Some(failure) = shop.intercept("/api/contact/mark-read") {
        return failure;
    }
    let Some(token) = shop.authorize(&headers) else {
        return rejected(NOT_AUTHORIZED);
    };
    let mut state = shop.state();
    let Some(inquiry) = state
        .inquiries
        .get_mut(&token)
        .and_then(|list| list.iter_mut().find(|i| i["_id"] == body.id.as_str()))
    else {
        return rejected("Inquiry not found");
    };
    inquiry["isRead"] = Value::Bool(true);
    ok(json!({}))
}

// =============================================================================
// Test context
// =============================================================================

/// A running [`MockShop`] plus a scratch data directory.
///
/// The server is stopped and the directory removed on drop.
pub struct TestContext {
    pub shop: MockShop,
    pub base_url: Url,
    pub data_dir: PathBuf,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Serve a shop listing `products` on a free local port.
    pub async fn start(products: Vec<Value>) -> Self {
        let shop = MockShop::with_products(products);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = shop.router();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let data_dir = std::env::temp_dir().join(format!("goshen-it-{}", uuid::Uuid::new_v4()));

        Self {
            shop,
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            data_dir,
            server,
        }
    }

    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            backend_url: self.base_url.clone(),
            data_dir: self.data_dir.clone(),
            http_timeout: Duration::from_secs(5),
            ..StorefrontConfig::default()
        }
    }

    #[must_use]
    pub fn merge_config(&self) -> StorefrontConfig {
        StorefrontConfig {
            guest_cart_policy: GuestCartPolicy::Merge,
            ..self.config()
        }
    }

    /// A fresh store over this context's backend and data directory.
    ///
    /// Two stores from the same context share persisted state, like two
    /// launches of the app on one device.
    #[must_use]
    pub fn store(&self) -> ShopStore {
        ShopStore::connect(self.config()).unwrap()
    }

    /// A store already started (catalog and cart loaded).
    pub async fn started_store(&self) -> ShopStore {
        let store = self.store();
        store.start().await;
        store
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}
