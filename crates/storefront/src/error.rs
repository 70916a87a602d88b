//! Unified error handling with Sentry integration.
//!
//! Every store operation returns `Result<T, StoreError>`. Failures of remote
//! calls are reported (logged, captured to Sentry when they are
//! infrastructure failures) and surfaced as a notification by the store;
//! form errors go straight back to the caller.

use thiserror::Error;

use crate::api::ApiError;
use crate::models::FormError;
use crate::storage::StorageError;

/// Store-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend call failed or was rejected.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Durable client-side storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Form input failed validation before submission.
    #[error("Invalid form: {0}")]
    InvalidForm(#[from] FormError),

    /// The operation needs a signed-in shopper.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Checkout attempted with no live cart lines.
    #[error("Empty cart detected")]
    EmptyCart,

    /// Quantity must be at least one.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
}

impl StoreError {
    /// Text shown to the shopper.
    ///
    /// Transport and parse failures are summarised; backend rejections carry
    /// the backend's own message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Rejected(message)) => message.clone(),
            Self::Api(ApiError::RateLimited(secs)) => {
                format!("Too many requests, try again in {secs} seconds")
            }
            Self::Api(_) => "Could not reach the shop, please try again".to_string(),
            Self::Storage(_) => "Could not save your cart on this device".to_string(),
            Self::InvalidForm(err) => err.to_string(),
            Self::NotAuthenticated => "Please log in to continue".to_string(),
            Self::EmptyCart => "Empty cart detected".to_string(),
            Self::InvalidQuantity(_) => "Quantity must be at least 1".to_string(),
        }
    }

    /// Whether this is an infrastructure failure worth capturing.
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Api(
                    ApiError::Http(_)
                        | ApiError::Status { .. }
                        | ApiError::Parse(_)
                        | ApiError::Url(_)
                )
        )
    }

    /// Log the error, capturing infrastructure failures to Sentry.
    pub fn report(&self, operation: &str) {
        if self.is_infrastructure() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                operation,
                sentry_event_id = %event_id,
                "Store operation failed"
            );
        } else {
            tracing::warn!(error = %self, operation, "Store operation failed");
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart and
/// session actions leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "p1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Associate subsequent Sentry events with a signed-in email.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}
