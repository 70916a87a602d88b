//! Guest and authenticated cart behaviour behind one trait.
//!
//! The store picks a strategy once per session transition and delegates
//! every cart operation to it.

use std::sync::Arc;

use async_trait::async_trait;
use goshen_core::ProductId;
use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::{instrument, warn};

use super::{SequencedCart, add_line, decrement_line, increment_line, remove_line};
use crate::api::{CartItemRequest, CartReply, ShopBackend};
use crate::error::StoreError;
use crate::models::CartLineItem;
use crate::models::session::{SessionMode, keys};
use crate::storage::{LocalStorage, StorageError, read_json, write_json};

/// Message shown after a guest add.
pub const ADDED_TO_CART: &str = "Added to Cart";

/// Result of a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartOutcome {
    /// Whether the result was installed (a stale remote reply is not).
    pub applied: bool,
    /// Message to show the shopper, if any.
    pub message: Option<String>,
}

impl CartOutcome {
    const fn applied() -> Self {
        Self {
            applied: true,
            message: None,
        }
    }
}

/// Where the cart lives and how it is mutated.
#[async_trait]
pub trait CartStrategy: Send + Sync {
    fn mode(&self) -> SessionMode;

    /// Load the authoritative cart into `cart`.
    async fn load(&self, cart: &SequencedCart) -> Result<(), StoreError>;

    async fn add_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome, StoreError>;

    async fn increment_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
        current_quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome, StoreError>;

    async fn decrement_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
        current_quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome, StoreError>;

    async fn remove_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
    ) -> Result<CartOutcome, StoreError>;

    /// Empty the cart after a completed order.
    async fn clear(&self, cart: &SequencedCart) -> Result<(), StoreError>;
}

// =============================================================================
// Guest
// =============================================================================

/// Cart held locally and persisted under `guestCart` after every mutation.
pub struct GuestCartStrategy {
    storage: Arc<dyn LocalStorage>,
}

impl GuestCartStrategy {
    #[must_use]
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// Read the stored guest cart. A corrupt value reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error only if storage itself cannot be read.
    pub fn stored_lines(&self) -> Result<Vec<CartLineItem>, StorageError> {
        match read_json::<Vec<CartLineItem>>(self.storage.as_ref(), keys::GUEST_CART) {
            Ok(lines) => Ok(lines.unwrap_or_default()),
            Err(StorageError::Serialization(e)) => {
                warn!(error = %e, "Stored guest cart is corrupt, starting empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn persist(&self, lines: &[CartLineItem]) -> Result<(), StoreError> {
        write_json(self.storage.as_ref(), keys::GUEST_CART, lines)?;
        Ok(())
    }
}

#[async_trait]
impl CartStrategy for GuestCartStrategy {
    fn mode(&self) -> SessionMode {
        SessionMode::Guest
    }

    async fn load(&self, cart: &SequencedCart) -> Result<(), StoreError> {
        cart.replace(self.stored_lines()?);
        Ok(())
    }

    async fn add_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome, StoreError> {
        cart.try_update(
            |lines| add_line(lines, product_id, quantity, unit_price),
            |lines| self.persist(lines),
        )?;
        Ok(CartOutcome {
            applied: true,
            message: Some(ADDED_TO_CART.to_string()),
        })
    }

    async fn increment_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
        _current_quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome, StoreError> {
        let changed = cart.try_update(
            |lines| Ok(increment_line(lines, product_id, unit_price)),
            |lines| self.persist(lines),
        )?;
        Ok(CartOutcome {
            applied: changed,
            message: None,
        })
    }

    async fn decrement_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
        _current_quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome, StoreError> {
        let changed = cart.try_update(
            |lines| Ok(decrement_line(lines, product_id, unit_price)),
            |lines| self.persist(lines),
        )?;
        Ok(CartOutcome {
            applied: changed,
            message: None,
        })
    }

    async fn remove_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
    ) -> Result<CartOutcome, StoreError> {
        let changed = cart.try_update(
            |lines| Ok(remove_line(lines, product_id)),
            |lines| self.persist(lines),
        )?;
        Ok(CartOutcome {
            applied: changed,
            message: None,
        })
    }

    async fn clear(&self, cart: &SequencedCart) -> Result<(), StoreError> {
        cart.try_update(
            |lines| {
                lines.clear();
                Ok(())
            },
            |_| {
                self.storage.remove(keys::GUEST_CART)?;
                Ok::<_, StoreError>(())
            },
        )
    }
}

// =============================================================================
// Remote
// =============================================================================

/// Server-authoritative cart for a signed-in shopper.
pub struct RemoteCartStrategy {
    backend: Arc<dyn ShopBackend>,
    token: SecretString,
}

impl RemoteCartStrategy {
    #[must_use]
    pub fn new(backend: Arc<dyn ShopBackend>, token: SecretString) -> Self {
        Self { backend, token }
    }

    fn install(cart: &SequencedCart, ticket: super::Ticket, reply: CartReply) -> CartOutcome {
        let applied = cart.commit(ticket, reply.lines);
        CartOutcome {
            applied,
            message: reply.message,
        }
    }
}

#[async_trait]
impl CartStrategy for RemoteCartStrategy {
    fn mode(&self) -> SessionMode {
        SessionMode::Authenticated
    }

    #[instrument(skip_all)]
    async fn load(&self, cart: &SequencedCart) -> Result<(), StoreError> {
        let ticket = cart.begin();
        let lines = self.backend.get_cart(&self.token).await?;
        cart.commit(ticket, lines);
        Ok(())
    }

    #[instrument(skip(self, cart, unit_price))]
    async fn add_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome, StoreError> {
        if quantity == 0 {
            return Err(StoreError::InvalidQuantity(quantity));
        }
        let ticket = cart.begin();
        let request = CartItemRequest {
            id: product_id.clone(),
            quantity,
            price: unit_price,
        };
        let reply = self.backend.add_to_cart(&self.token, &request).await?;
        Ok(Self::install(cart, ticket, reply))
    }

    #[instrument(skip(self, cart, unit_price))]
    async fn increment_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
        current_quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome, StoreError> {
        let ticket = cart.begin();
        let request = CartItemRequest {
            id: product_id.clone(),
            quantity: current_quantity,
            price: unit_price,
        };
        let reply = self
            .backend
            .increment_cart_item(&self.token, &request)
            .await?;
        Ok(Self::install(cart, ticket, reply))
    }

    #[instrument(skip(self, cart, unit_price))]
    async fn decrement_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
        current_quantity: u32,
        unit_price: Decimal,
    ) -> Result<CartOutcome, StoreError> {
        let ticket = cart.begin();
        let request = CartItemRequest {
            id: product_id.clone(),
            quantity: current_quantity,
            price: unit_price,
        };
        let reply = self
            .backend
            .decrement_cart_item(&self.token, &request)
            .await?;
        Ok(Self::install(cart, ticket, reply))
    }

    #[instrument(skip(self, cart))]
    async fn remove_item(
        &self,
        cart: &SequencedCart,
        product_id: &ProductId,
    ) -> Result<CartOutcome, StoreError> {
        let ticket = cart.begin();
        let reply = self
            .backend
            .remove_cart_item(&self.token, product_id)
            .await?;
        Ok(Self::install(cart, ticket, reply))
    }

    /// The backend empties the server cart when it accepts an order.
    async fn clear(&self, cart: &SequencedCart) -> Result<(), StoreError> {
        cart.clear();
        Ok(())
    }
}
