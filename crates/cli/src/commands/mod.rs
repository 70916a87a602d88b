//! Subcommand implementations.
//!
//! Each command drives one store operation and prints the result. Notices
//! the store raised along the way are printed once the command is done.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;

use goshen_storefront::{NoticeLevel, ShopStore};

/// Print and drop pending notices.
pub fn print_notices(store: &ShopStore) {
    for notice in store.notifications().drain() {
        let marker = match notice.level {
            NoticeLevel::Success => "✓",
            NoticeLevel::Error => "✗",
            NoticeLevel::Info => "•",
        };
        println!("{marker} {}", notice.message);
    }
}
