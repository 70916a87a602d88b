//! Views the store can ask to show.
//!
//! Routing itself belongs to the view layer; store operations that end in a
//! navigation return the target as a [`Route`].

use goshen_core::ProductId;

use crate::models::Category;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Category(Category),
    Product(ProductId),
    Cart,
    Checkout,
    Orders,
    Inquiries,
    Login,
    OrderSuccess,
    About,
    Contact,
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Category(category) => format!("/{}", category.slug()),
            Self::Product(id) => format!("/product/{id}"),
            Self::Cart => "/cart".to_string(),
            Self::Checkout => "/payment".to_string(),
            Self::Orders => "/orders".to_string(),
            Self::Inquiries => "/my-inquiries".to_string(),
            Self::Login => "/login".to_string(),
            Self::OrderSuccess => "/order-success".to_string(),
            Self::About => "/about-us".to_string(),
            Self::Contact => "/contact-us".to_string(),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
