//! Goshen Core - Shared types library.
//!
//! This crate provides common types used across all Goshen components:
//! - `storefront` - Cart/session store and backend client library
//! - `cli` - Command-line shop front built on the store
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients,
//! no persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
