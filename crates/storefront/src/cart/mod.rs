//! Cart state and arithmetic.
//!
//! # Overview
//!
//! - Pure line-item arithmetic ([`add_line`], [`increment_line`],
//!   [`decrement_line`], [`remove_line`]) used for the guest cart
//! - Derived totals that skip stale lines ([`live_item_count`],
//!   [`live_total`])
//! - [`SequencedCart`], the in-memory cart guarded by a version counter so
//!   that a late response never overwrites a newer cart
//! - The two [`CartStrategy`] implementations in [`strategy`]

pub mod strategy;

pub use strategy::{CartOutcome, CartStrategy, GuestCartStrategy, RemoteCartStrategy};

use std::sync::{Mutex, MutexGuard};

use goshen_core::{ProductId, round_money};
use rust_decimal::Decimal;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::models::CartLineItem;

// =============================================================================
// Line arithmetic
// =============================================================================

/// Add `quantity` of a product, merging into an existing line.
///
/// # Errors
///
/// Returns `InvalidQuantity` for a zero quantity.
pub fn add_line(
    lines: &mut Vec<CartLineItem>,
    product_id: &ProductId,
    quantity: u32,
    unit_price: Decimal,
) -> Result<(), StoreError> {
    if quantity == 0 {
        return Err(StoreError::InvalidQuantity(quantity));
    }

    if let Some(line) = lines.iter_mut().find(|l| &l.product_id == product_id) {
        let quantity = line.quantity.saturating_add(quantity);
        line.set_quantity(quantity, unit_price);
    } else {
        lines.push(CartLineItem::new(product_id.clone(), quantity, unit_price));
    }
    Ok(())
}

/// Raise a line by one. Returns whether a line was changed.
pub fn increment_line(
    lines: &mut [CartLineItem],
    product_id: &ProductId,
    unit_price: Decimal,
) -> bool {
    lines
        .iter_mut()
        .find(|l| &l.product_id == product_id)
        .is_some_and(|line| {
            let quantity = line.quantity.saturating_add(1);
            line.set_quantity(quantity, unit_price);
            true
        })
}

/// Lower a line by one, removing it when it reaches zero.
/// Returns whether a line was changed.
pub fn decrement_line(
    lines: &mut Vec<CartLineItem>,
    product_id: &ProductId,
    unit_price: Decimal,
) -> bool {
    let Some(line) = lines.iter_mut().find(|l| &l.product_id == product_id) else {
        return false;
    };

    let quantity = line.quantity.saturating_sub(1);
    if quantity == 0 {
        lines.retain(|l| &l.product_id != product_id);
    } else {
        line.set_quantity(quantity, unit_price);
    }
    true
}

/// Drop a product's line. Returns whether a line was removed.
pub fn remove_line(lines: &mut Vec<CartLineItem>, product_id: &ProductId) -> bool {
    let before = lines.len();
    lines.retain(|l| &l.product_id != product_id);
    lines.len() != before
}

// =============================================================================
// Derived totals
// =============================================================================

/// Number of lines whose product is still listed.
#[must_use]
pub fn live_item_count(lines: &[CartLineItem], catalog: &Catalog) -> usize {
    lines
        .iter()
        .filter(|l| catalog.contains(&l.product_id))
        .count()
}

/// Sum of live line totals, rounded to cents.
#[must_use]
pub fn live_total(lines: &[CartLineItem], catalog: &Catalog) -> Decimal {
    round_money(
        lines
            .iter()
            .filter(|l| catalog.contains(&l.product_id))
            .map(|l| l.line_total)
            .sum(),
    )
}

// =============================================================================
// SequencedCart
// =============================================================================

/// Version handed out when a remote mutation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct CartState {
    lines: Vec<CartLineItem>,
    /// Last ticket issued.
    issued: u64,
    /// Version of the content currently held.
    applied: u64,
}

impl CartState {
    const fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }
}

/// The in-memory cart with request sequencing.
///
/// Every mutation gets a version from one counter. A remote response is only
/// applied if no newer version has been applied already; local updates and
/// replacements always take a fresh version and therefore also invalidate
/// anything still in flight.
#[derive(Debug, Default)]
pub struct SequencedCart {
    state: Mutex<CartState>,
}

impl SequencedCart {
    #[must_use]
    pub fn new(lines: Vec<CartLineItem>) -> Self {
        Self {
            state: Mutex::new(CartState {
                lines,
                ..CartState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Current lines.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLineItem> {
        self.lock().lines.clone()
    }

    /// Version of the lines currently held.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.lock().applied
    }

    /// Reserve a version for a mutation about to be sent.
    pub fn begin(&self) -> Ticket {
        Ticket(self.lock().next())
    }

    /// Apply a response for `ticket`. Returns `false` (and drops the lines)
    /// when a newer version is already held.
    pub fn commit(&self, ticket: Ticket, lines: Vec<CartLineItem>) -> bool {
        let mut state = self.lock();
        if ticket.0 <= state.applied {
            debug!(
                ticket = ticket.0,
                applied = state.applied,
                "Discarding stale cart response"
            );
            return false;
        }
        state.lines = lines;
        state.applied = ticket.0;
        true
    }

    /// Mutate a copy of the lines, hand it to `persist`, and install it as
    /// the newest version only if `persist` succeeds.
    ///
    /// The lock is held throughout, so concurrent local updates serialize.
    ///
    /// # Errors
    ///
    /// Returns whatever `update` or `persist` returns; the cart is then
    /// unchanged.
    pub fn try_update<T, E>(
        &self,
        update: impl FnOnce(&mut Vec<CartLineItem>) -> Result<T, E>,
        persist: impl FnOnce(&[CartLineItem]) -> Result<(), E>,
    ) -> Result<T, E> {
        let mut state = self.lock();
        let mut lines = state.lines.clone();
        let value = update(&mut lines)?;
        persist(&lines)?;
        let version = state.next();
        state.lines = lines;
        state.applied = version;
        Ok(value)
    }

    /// Replace the content outright as the newest version.
    pub fn replace(&self, lines: Vec<CartLineItem>) {
        let mut state = self.lock();
        let version = state.next();
        state.lines = lines;
        state.applied = version;
    }

    pub fn clear(&self) {
        self.replace(Vec::new());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::mock::product;

    fn price(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let mut lines = Vec::new();
        for quantity in [2, 3, 1] {
            add_line(&mut lines, &id("p1"), quantity, price(500)).unwrap();
        }
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 6);
        assert_eq!(lines[0].line_total, price(3000));
    }

    #[test]
    fn test_add_zero_quantity_is_rejected() {
        let mut lines = Vec::new();
        let err = add_line(&mut lines, &id("p1"), 0, price(500)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuantity(0)));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_decrement_from_one_removes_line() {
        let mut lines = vec![CartLineItem::new(id("p1"), 1, price(500))];
        assert!(decrement_line(&mut lines, &id("p1"), price(500)));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_decrement_recomputes_total() {
        let mut lines = vec![CartLineItem::new(id("p1"), 3, price(250))];
        assert!(decrement_line(&mut lines, &id("p1"), price(250)));
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].line_total, price(500));
    }

    #[test]
    fn test_increment_and_decrement_of_absent_line_are_noops() {
        let mut lines = vec![CartLineItem::new(id("p1"), 1, price(500))];
        assert!(!increment_line(&mut lines, &id("p2"), price(100)));
        assert!(!decrement_line(&mut lines, &id("p2"), price(100)));
        assert_eq!(lines, vec![CartLineItem::new(id("p1"), 1, price(500))]);
    }

    #[test]
    fn test_remove_line() {
        let mut lines = vec![
            CartLineItem::new(id("p1"), 1, price(500)),
            CartLineItem::new(id("p2"), 2, price(100)),
        ];
        assert!(remove_line(&mut lines, &id("p1")));
        assert!(!remove_line(&mut lines, &id("p1")));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_live_totals_skip_stale_lines() {
        let catalog = Catalog::new(vec![product("p1", price(500))]);
        let lines = vec![
            CartLineItem::new(id("p1"), 2, price(500)),
            CartLineItem::new(id("gone"), 4, price(999)),
        ];
        assert_eq!(live_item_count(&lines, &catalog), 1);
        assert_eq!(live_total(&lines, &catalog), price(1000));
        // no mutation in between
        assert_eq!(live_total(&lines, &catalog), price(1000));
    }

    #[test]
    fn test_live_total_rounds_to_cents() {
        let catalog = Catalog::new(vec![product("p1", Decimal::new(3333, 3))]);
        let lines = vec![CartLineItem::new(id("p1"), 3, Decimal::new(3333, 3))];
        assert_eq!(live_total(&lines, &catalog), price(1000));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let cart = SequencedCart::default();
        let first = cart.begin();
        let second = cart.begin();

        assert!(cart.commit(second, vec![CartLineItem::new(id("p1"), 2, price(100))]));
        assert!(!cart.commit(first, vec![CartLineItem::new(id("p1"), 1, price(100))]));
        assert_eq!(cart.snapshot()[0].quantity, 2);
    }

    #[test]
    fn test_in_order_commits_all_apply() {
        let cart = SequencedCart::default();
        let first = cart.begin();
        let second = cart.begin();
        assert!(cart.commit(first, vec![CartLineItem::new(id("p1"), 1, price(100))]));
        assert!(cart.commit(second, vec![CartLineItem::new(id("p1"), 2, price(100))]));
        assert_eq!(cart.version(), 2);
    }

    #[test]
    fn test_replace_invalidates_in_flight_responses() {
        let cart = SequencedCart::default();
        let ticket = cart.begin();
        cart.replace(Vec::new());
        assert!(!cart.commit(ticket, vec![CartLineItem::new(id("p1"), 1, price(100))]));
        assert!(cart.snapshot().is_empty());
    }

    #[test]
    fn test_try_update_rolls_back_when_persist_fails() {
        let cart = SequencedCart::new(vec![CartLineItem::new(id("p1"), 1, price(100))]);
        let result: Result<(), &str> = cart.try_update(
            |lines| {
                lines.clear();
                Ok(())
            },
            |_| Err("disk full"),
        );
        assert_eq!(result, Err("disk full"));
        assert_eq!(cart.snapshot().len(), 1);
    }
}
