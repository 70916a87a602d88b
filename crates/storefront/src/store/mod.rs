//! The cart/session store.
//!
//! [`ShopStore`] is the single source of truth for what is in the cart and
//! who is shopping. It is built once at startup, shared by cloning, and reset
//! through [`ShopStore::reset_session`].
//!
//! # Session modes
//!
//! - **Guest**: no token. The cart is authoritative locally and persisted
//!   under `guestCart` after every mutation.
//! - **Authenticated**: token present. The server cart is authoritative and
//!   every mutation mirrors the cart the backend returns.
//!
//! The initial mode is decided by whether a token is stored. Login and
//! registration move to authenticated and fetch the server cart; logout
//! moves back to guest. A failing call never changes the mode.
//!
//! Cart operations delegate to the [`CartStrategy`] chosen at the last
//! transition. Remote replies are sequenced through [`SequencedCart`], so a
//! late reply never overwrites a newer cart.

mod account;
mod checkout;

pub use checkout::CheckoutOutcome;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use goshen_core::{Price, ProductId};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::api::{BackendClient, CartItemRequest, ShopBackend};
use crate::cart::{
    CartOutcome, CartStrategy, GuestCartStrategy, RemoteCartStrategy, SequencedCart,
    live_item_count, live_total,
};
use crate::catalog::Catalog;
use crate::config::{GuestCartPolicy, StorefrontConfig};
use crate::error::{Result, StoreError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::session::keys;
use crate::models::{CartLineItem, LoginForm, Product, RegisterForm, SessionMode};
use crate::navigation::Route;
use crate::notifications::Notifications;
use crate::storage::{FileStorage, LocalStorage};

/// Cart and session state shared by every view.
#[derive(Clone)]
pub struct ShopStore {
    inner: Arc<ShopStoreInner>,
}

struct ShopStoreInner {
    config: StorefrontConfig,
    backend: Arc<dyn ShopBackend>,
    storage: Arc<dyn LocalStorage>,
    catalog: RwLock<Arc<Catalog>>,
    cart: SequencedCart,
    session: RwLock<Session>,
    notifications: Notifications,
    unread_replies: AtomicUsize,
}

struct Session {
    token: Option<SecretString>,
    strategy: Arc<dyn CartStrategy>,
}

/// A live cart line joined with its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    pub product: Product,
    pub line: CartLineItem,
}

/// Cart totals as shown on the cart and checkout pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub item_count: usize,
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

impl ShopStore {
    /// Create a store over a backend and durable storage.
    ///
    /// The session starts authenticated if a token is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored token cannot be read.
    pub fn new(
        config: StorefrontConfig,
        backend: Arc<dyn ShopBackend>,
        storage: Arc<dyn LocalStorage>,
    ) -> Result<Self> {
        let token = storage
            .get(keys::TOKEN)?
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(SecretString::from);

        let strategy = Self::strategy_for(&backend, &storage, token.as_ref());
        info!(mode = %strategy.mode(), "Store created");

        Ok(Self {
            inner: Arc::new(ShopStoreInner {
                config,
                backend,
                storage,
                catalog: RwLock::new(Arc::new(Catalog::default())),
                cart: SequencedCart::default(),
                session: RwLock::new(Session { token, strategy }),
                notifications: Notifications::new(),
                unread_replies: AtomicUsize::new(0),
            }),
        })
    }

    /// Create a store talking HTTP to the configured backend, persisting to
    /// the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the stored
    /// token cannot be read.
    pub fn connect(config: StorefrontConfig) -> Result<Self> {
        let backend = Arc::new(BackendClient::new(&config)?);
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        Self::new(config, backend, storage)
    }

    fn strategy_for(
        backend: &Arc<dyn ShopBackend>,
        storage: &Arc<dyn LocalStorage>,
        token: Option<&SecretString>,
    ) -> Arc<dyn CartStrategy> {
        match token {
            Some(token) => Arc::new(RemoteCartStrategy::new(
                Arc::clone(backend),
                token.clone(),
            )),
            None => Arc::new(GuestCartStrategy::new(Arc::clone(storage))),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn notifications(&self) -> &Notifications {
        &self.inner.notifications
    }

    /// Current catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(
            &self
                .inner
                .catalog
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.strategy().mode()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.mode() == SessionMode::Authenticated
    }

    /// Replied inquiries the shopper has not opened yet.
    #[must_use]
    pub fn unread_replies(&self) -> usize {
        self.inner.unread_replies.load(Ordering::Relaxed)
    }

    fn strategy(&self) -> Arc<dyn CartStrategy> {
        Arc::clone(
            &self
                .inner
                .session
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .strategy,
        )
    }

    pub(crate) fn token(&self) -> Option<SecretString> {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    pub(crate) fn backend(&self) -> &dyn ShopBackend {
        self.inner.backend.as_ref()
    }

    /// Log and report a failure, and notify the shopper unless it is a form
    /// error.
    pub(crate) fn surface(&self, operation: &str, err: StoreError) -> StoreError {
        err.report(operation);
        if !matches!(err, StoreError::InvalidForm(_)) {
            self.inner.notifications.error(err.user_message());
        }
        err
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load the catalog and the cart for the current session.
    ///
    /// Failures are surfaced as notifications; the store stays usable.
    pub async fn start(&self) {
        let _ = self.load_catalog(false).await;
        let _ = self.load_cart().await;
    }

    /// Fetch the product list. `force` bypasses the client cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails; the previous catalog is
    /// kept.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self, force: bool) -> Result<usize> {
        let products = self
            .inner
            .backend
            .list_products(force)
            .await
            .map_err(|e| self.surface("load_catalog", e.into()))?;
        let count = products.len();
        *self
            .inner
            .catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(Catalog::new(products));
        Ok(count)
    }

    /// Load the authoritative cart through the active strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded; the cart is unchanged.
    pub async fn load_cart(&self) -> Result<()> {
        self.strategy()
            .load(&self.inner.cart)
            .await
            .map_err(|e| self.surface("load_cart", e))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    fn announce(&self, outcome: &CartOutcome) {
        if let Some(message) = outcome.message.as_deref().filter(|m| !m.is_empty()) {
            self.inner.notifications.success(message);
        }
    }

    /// Add `quantity` of a product at `unit_price`.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero quantity or a failed backend call; the
    /// cart is unchanged.
    pub async fn add_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome> {
        add_breadcrumb("cart", "Add item", Some(&[("product_id", product_id.as_str())]));
        let outcome = self
            .strategy()
            .add_item(&self.inner.cart, product_id, quantity, unit_price)
            .await
            .map_err(|e| self.surface("add_item", e))?;
        self.announce(&outcome);
        Ok(outcome)
    }

    /// Raise a line by one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call or persistence fails.
    pub async fn increment_item(
        &self,
        product_id: &ProductId,
        current_quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome> {
        add_breadcrumb("cart", "Increment item", Some(&[("product_id", product_id.as_str())]));
        self.strategy()
            .increment_item(&self.inner.cart, product_id, current_quantity, unit_price)
            .await
            .map_err(|e| self.surface("increment_item", e))
    }

    /// Lower a line by one; a line at one is removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call or persistence fails.
    pub async fn decrement_item(
        &self,
        product_id: &ProductId,
        current_quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome> {
        add_breadcrumb("cart", "Decrement item", Some(&[("product_id", product_id.as_str())]));
        self.strategy()
            .decrement_item(&self.inner.cart, product_id, current_quantity, unit_price)
            .await
            .map_err(|e| self.surface("decrement_item", e))
    }

    /// Drop a product's line.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call or persistence fails.
    pub async fn remove_item(&self, product_id: &ProductId) -> Result<CartOutcome> {
        add_breadcrumb("cart", "Remove item", Some(&[("product_id", product_id.as_str())]));
        self.strategy()
            .remove_item(&self.inner.cart, product_id)
            .await
            .map_err(|e| self.surface("remove_item", e))
    }

    /// All cart lines, stale ones included.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLineItem> {
        self.inner.cart.snapshot()
    }

    /// The line for a product, if any.
    #[must_use]
    pub fn cart_line(&self, product_id: &ProductId) -> Option<CartLineItem> {
        self.cart_lines()
            .into_iter()
            .find(|l| &l.product_id == product_id)
    }

    /// Number of lines for products still in the catalog.
    #[must_use]
    pub fn item_count(&self) -> usize {
        live_item_count(&self.inner.cart.snapshot(), &self.catalog())
    }

    /// Sum of live line totals, rounded to cents.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        live_total(&self.inner.cart.snapshot(), &self.catalog())
    }

    /// Live lines joined with their products, in cart order.
    #[must_use]
    pub fn cart_view(&self) -> Vec<CartEntry> {
        let catalog = self.catalog();
        self.inner
            .cart
            .snapshot()
            .into_iter()
            .filter_map(|line| {
                catalog.get(&line.product_id).map(|product| CartEntry {
                    product: product.clone(),
                    line,
                })
            })
            .collect()
    }

    /// Totals with the delivery fee, which only applies to a non-empty cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let currency = self.inner.config.currency;
        let item_count = self.item_count();
        let subtotal = self.cart_total();
        let delivery_fee = if item_count == 0 {
            Decimal::ZERO
        } else {
            self.inner.config.delivery_fee
        };
        CartSummary {
            item_count,
            subtotal: Price::new(subtotal, currency),
            delivery_fee: Price::new(delivery_fee, currency),
            total: Price::new(subtotal + delivery_fee, currency),
        }
    }

    /// Empty the cart after a completed order.
    pub(crate) async fn clear_cart(&self) -> Result<()> {
        self.strategy().clear(&self.inner.cart).await
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Sign in and switch to the server cart.
    ///
    /// # Errors
    ///
    /// Returns `InvalidForm` for bad input (not notified) or the backend
    /// failure; the session stays a guest session.
    #[instrument(skip_all)]
    pub async fn login(&self, form: &LoginForm) -> Result<Route> {
        let email = form.validate()?;
        let token = self
            .inner
            .backend
            .login(email.as_str(), &form.password)
            .await
            .map_err(|e| self.surface("login", e.into()))?;
        set_sentry_user(email.as_str());
        self.establish_session(token).await?;
        Ok(Route::Home)
    }

    /// Create an account and switch to the server cart.
    ///
    /// # Errors
    ///
    /// Returns `InvalidForm` for bad input (not notified) or the backend
    /// failure.
    #[instrument(skip_all)]
    pub async fn register(&self, form: &RegisterForm) -> Result<Route> {
        let email = form.validate()?;
        let token = self
            .inner
            .backend
            .register(
                form.name.trim(),
                email.as_str(),
                form.phone.trim(),
                &form.password,
                &form.confirm_password,
            )
            .await
            .map_err(|e| self.surface("register", e.into()))?;
        set_sentry_user(email.as_str());
        self.establish_session(token).await?;
        Ok(Route::Home)
    }

    /// GUEST -> AUTHENTICATED.
    async fn establish_session(&self, token: SecretString) -> Result<()> {
        self.inner
            .storage
            .set(keys::TOKEN, token.expose_secret())
            .map_err(|e| self.surface("store_token", e.into()))?;

        let guest_lines = if self.is_authenticated() {
            Vec::new()
        } else {
            self.inner.cart.snapshot()
        };

        let strategy = Self::strategy_for(&self.inner.backend, &self.inner.storage, Some(&token));
        {
            let mut session = self
                .inner
                .session
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            session.token = Some(token.clone());
            session.strategy = strategy;
        }
        // Nothing sent under the old session may land in the new one.
        self.inner.cart.clear();
        info!("Session authenticated");

        if self.inner.config.guest_cart_policy == GuestCartPolicy::Merge {
            self.merge_guest_lines(&token, &guest_lines).await;
        }
        if let Err(e) = self.inner.storage.remove(keys::GUEST_CART) {
            StoreError::from(e).report("discard_guest_cart");
        }

        let _ = self.load_cart().await;
        self.refresh_unread_replies().await;
        Ok(())
    }

    async fn merge_guest_lines(&self, token: &SecretString, lines: &[CartLineItem]) {
        for line in lines {
            let request = CartItemRequest {
                id: line.product_id.clone(),
                quantity: line.quantity,
                price: line.unit_price,
            };
            if let Err(e) = self.inner.backend.add_to_cart(token, &request).await {
                warn!(product_id = %line.product_id, error = %e, "Could not merge guest cart line");
            }
        }
        info!(lines = lines.len(), "Merged guest cart into server cart");
    }

    /// Sign out and show the login view.
    pub fn logout(&self) -> Route {
        self.reset_session();
        Route::Login
    }

    /// AUTHENTICATED -> GUEST: forget the token, empty the cart, reset the
    /// unread counter.
    pub fn reset_session(&self) {
        if let Err(e) = self.inner.storage.remove(keys::TOKEN) {
            StoreError::from(e).report("reset_session");
        }
        {
            let mut session = self
                .inner
                .session
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            session.token = None;
            session.strategy = Arc::new(GuestCartStrategy::new(Arc::clone(&self.inner.storage)));
        }
        self.inner.cart.clear();
        self.inner.unread_replies.store(0, Ordering::Relaxed);
        clear_sentry_user();
        info!("Session reset");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::mock::{MockBackend, PASSWORD, product, token_for};
    use crate::notifications::NoticeLevel;
    use crate::storage::{MemoryStorage, read_json};

    pub(super) fn price(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    pub(super) fn store_with(
        mock: &MockBackend,
        storage: &MemoryStorage,
        config: StorefrontConfig,
    ) -> ShopStore {
        ShopStore::new(config, Arc::new(mock.clone()), Arc::new(storage.clone())).unwrap()
    }

    pub(super) async fn started(mock: &MockBackend, storage: &MemoryStorage) -> ShopStore {
        let store = store_with(mock, storage, StorefrontConfig::default());
        store.start().await;
        store
    }

    pub(super) fn catalog_mock() -> MockBackend {
        MockBackend::with_products(vec![product("p1", price(500)), product("p2", price(250))])
    }

    #[tokio::test]
    async fn test_guest_add_scenario() {
        let store = started(&catalog_mock(), &MemoryStorage::new()).await;

        store.add_item(&ProductId::new("p1"), 2, price(500)).await.unwrap();

        assert_eq!(store.cart_total(), price(1000));
        assert_eq!(store.item_count(), 1);
        let notices = store.notifications().drain();
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[0].message, "Added to Cart");
    }

    #[tokio::test]
    async fn test_guest_decrement_from_one_removes_line() {
        let store = started(&catalog_mock(), &MemoryStorage::new()).await;
        let p1 = ProductId::new("p1");
        store.add_item(&p1, 1, price(500)).await.unwrap();

        store.decrement_item(&p1, 1, price(500)).await.unwrap();
        assert!(store.cart_line(&p1).is_none());
    }

    #[tokio::test]
    async fn test_guest_cart_survives_restart() {
        let mock = catalog_mock();
        let storage = MemoryStorage::new();
        let store = started(&mock, &storage).await;
        store.add_item(&ProductId::new("p1"), 1, price(500)).await.unwrap();
        store.add_item(&ProductId::new("p2"), 3, price(250)).await.unwrap();

        let restarted = started(&mock, &storage).await;
        assert_eq!(restarted.mode(), SessionMode::Guest);
        assert_eq!(restarted.cart_lines(), store.cart_lines());
    }

    #[tokio::test]
    async fn test_stale_lines_excluded_from_totals() {
        let mock = catalog_mock();
        let storage = MemoryStorage::new();
        let store = started(&mock, &storage).await;
        store.add_item(&ProductId::new("p1"), 1, price(500)).await.unwrap();
        store.add_item(&ProductId::new("p2"), 2, price(250)).await.unwrap();

        mock.state.lock().unwrap().products.retain(|p| p.id.as_str() != "p2");
        store.load_catalog(true).await.unwrap();

        assert_eq!(store.cart_lines().len(), 2);
        assert_eq!(store.item_count(), 1);
        assert_eq!(store.cart_total(), price(500));
        assert_eq!(store.cart_view().len(), 1);
    }

    #[tokio::test]
    async fn test_summary_applies_delivery_fee_to_non_empty_cart() {
        let store = started(&catalog_mock(), &MemoryStorage::new()).await;
        let empty = store.summary();
        assert_eq!(empty.total.amount, Decimal::ZERO);

        store.add_item(&ProductId::new("p1"), 2, price(500)).await.unwrap();
        let summary = store.summary();
        assert_eq!(summary.subtotal.amount, price(1000));
        assert_eq!(summary.delivery_fee.amount, price(2000));
        assert_eq!(summary.total.to_string(), "$30.00");
    }

    #[tokio::test]
    async fn test_login_replaces_guest_cart_with_server_cart() {
        let mock = catalog_mock();
        let storage = MemoryStorage::new();
        mock.set_server_cart(
            &token_for("ada@example.com"),
            vec![CartLineItem::new(ProductId::new("p2"), 1, price(250))],
        );
        let store = started(&mock, &storage).await;
        store.add_item(&ProductId::new("p1"), 2, price(500)).await.unwrap();

        let route = store
            .login(&LoginForm::new("ada@example.com", PASSWORD))
            .await
            .unwrap();

        assert_eq!(route, Route::Home);
        assert_eq!(store.mode(), SessionMode::Authenticated);
        assert_eq!(
            store.cart_lines(),
            vec![CartLineItem::new(ProductId::new("p2"), 1, price(250))]
        );
        assert!(storage.get(keys::GUEST_CART).unwrap().is_none());
        assert_eq!(
            storage.get(keys::TOKEN).unwrap().as_deref(),
            Some("token-ada@example.com")
        );
    }

    #[tokio::test]
    async fn test_login_merge_policy_keeps_guest_lines() {
        let mock = catalog_mock();
        let storage = MemoryStorage::new();
        let config = StorefrontConfig {
            guest_cart_policy: GuestCartPolicy::Merge,
            ..StorefrontConfig::default()
        };
        let store = store_with(&mock, &storage, config);
        store.start().await;
        store.add_item(&ProductId::new("p1"), 2, price(500)).await.unwrap();

        store
            .login(&LoginForm::new("ada@example.com", PASSWORD))
            .await
            .unwrap();

        assert_eq!(store.cart_line(&ProductId::new("p1")).unwrap().quantity, 2);
        assert_eq!(mock.server_cart("token-ada@example.com").len(), 1);
    }

    #[tokio::test]
    async fn test_failed_login_stays_guest_and_notifies() {
        let store = started(&catalog_mock(), &MemoryStorage::new()).await;

        let err = store
            .login(&LoginForm::new("ada@example.com", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert_eq!(store.mode(), SessionMode::Guest);
        assert_eq!(store.notifications().drain()[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_invalid_login_form_is_not_notified() {
        let mock = catalog_mock();
        let store = started(&mock, &MemoryStorage::new()).await;

        let err = store
            .login(&LoginForm::new("not-an-email", PASSWORD))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidForm(_)));
        assert!(store.notifications().is_empty());
        assert!(!mock.calls().contains(&"login"));
    }

    #[tokio::test]
    async fn test_logout_resets_session() {
        let mock = catalog_mock();
        let storage = MemoryStorage::new();
        let store = started(&mock, &storage).await;
        store
            .login(&LoginForm::new("ada@example.com", PASSWORD))
            .await
            .unwrap();
        store.add_item(&ProductId::new("p1"), 1, price(500)).await.unwrap();

        let route = store.logout();

        assert_eq!(route, Route::Login);
        assert_eq!(store.mode(), SessionMode::Guest);
        assert!(store.cart_lines().is_empty());
        assert_eq!(store.unread_replies(), 0);
        assert!(storage.get(keys::TOKEN).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stored_token_starts_authenticated() {
        let mock = catalog_mock();
        let storage = MemoryStorage::new();
        storage.set(keys::TOKEN, "tok").unwrap();
        mock.set_server_cart("tok", vec![CartLineItem::new(ProductId::new("p1"), 4, price(500))]);

        let store = started(&mock, &storage).await;

        assert!(store.is_authenticated());
        assert_eq!(store.item_count(), 1);
        assert_eq!(store.cart_total(), price(2000));
    }

    #[tokio::test]
    async fn test_remote_failure_notifies_and_keeps_cart() {
        let mock = catalog_mock();
        let storage = MemoryStorage::new();
        storage.set(keys::TOKEN, "tok").unwrap();
        mock.set_server_cart("tok", vec![CartLineItem::new(ProductId::new("p1"), 1, price(500))]);
        let store = started(&mock, &storage).await;

        mock.state.lock().unwrap().reject_next = Some("Cart locked".to_string());
        assert!(store.remove_item(&ProductId::new("p1")).await.is_err());

        assert_eq!(store.cart_lines().len(), 1);
        assert_eq!(store.notifications().drain()[0].message, "Cart locked");
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_catalog_load_keeps_store_usable() {
        let mock = catalog_mock();
        mock.state.lock().unwrap().reject_next = Some("Maintenance".to_string());
        let storage = MemoryStorage::new();
        let store = started(&mock, &storage).await;

        assert!(store.catalog().is_empty());
        assert_eq!(store.notifications().len(), 1);

        store.add_item(&ProductId::new("p1"), 1, price(500)).await.unwrap();
        let stored: Vec<CartLineItem> = read_json(&storage, keys::GUEST_CART).unwrap().unwrap();
        assert_eq!(stored.len(), 1);
    }
}
