//! Domain models for the storefront.
//!
//! These are the shapes the backend REST API speaks (field names follow the
//! wire, see the `serde` renames) plus the shopper-facing forms.

pub mod cart;
pub mod forms;
pub mod inquiry;
pub mod order;
pub mod product;
pub mod session;

pub use cart::CartLineItem;
pub use forms::{ContactForm, FormError, LoginForm, RegisterForm, ShippingAddress};
pub use inquiry::Inquiry;
pub use order::{Order, OrderLine};
pub use product::{Category, Product};
pub use session::SessionMode;
