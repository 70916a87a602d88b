//! Goshen storefront library.
//!
//! The client-side state of the Goshen grocery storefront: the product
//! catalog, the cart in both its guest and signed-in form, the shopper's
//! session, checkout and the contact/inquiry flow. Everything is reached
//! through [`ShopStore`]; the backend is spoken to through [`ShopBackend`]
//! (implemented over HTTP by [`BackendClient`]) and durable shopper state
//! lives behind [`LocalStorage`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod notifications;
pub mod storage;
pub mod store;

pub use api::{ApiError, BackendClient, ShopBackend};
pub use catalog::{Availability, Catalog, CatalogFilter, QuantitySelector, SortOrder};
pub use config::{GuestCartPolicy, StorefrontConfig};
pub use error::{Result, StoreError};
pub use navigation::Route;
pub use notifications::{Notice, NoticeLevel, Notifications};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
pub use store::{CartEntry, CartSummary, CheckoutOutcome, ShopStore};
