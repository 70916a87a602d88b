//! Session-related types.

/// Keys used in durable client-side storage.
pub mod keys {
    /// Serialized guest cart line items.
    pub const GUEST_CART: &str = "guestCart";

    /// Raw authentication token.
    pub const TOKEN: &str = "token";
}

/// Who is shopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// No token: the cart lives in local storage only.
    Guest,
    /// Token present: the server cart is authoritative.
    Authenticated,
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guest => write!(f, "guest"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}
