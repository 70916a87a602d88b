//! Order placement and payment confirmation.

use goshen_core::{OrderId, PaymentMethod};
use tracing::{info, instrument, warn};

use super::ShopStore;
use crate::api::{OrderItem, OrderRequest, PaymentSession};
use crate::error::{Result, StoreError, add_breadcrumb};
use crate::models::{Order, ShippingAddress};
use crate::navigation::Route;

pub const ORDER_PLACED: &str = "Order Placed! Welcome to Goshen.";
pub const PAYMENT_SUCCESSFUL: &str = "Payment Successful!";

/// What happens after the checkout form is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Cash on delivery accepted; the cart has been emptied.
    Placed { order: Option<Order>, route: Route },
    /// Continue on the hosted payment page.
    Redirect { session_url: String },
    /// Confirm the card payment, then call
    /// [`ShopStore::confirm_card_payment`].
    CardPayment {
        client_secret: String,
        order_id: OrderId,
    },
}

impl ShopStore {
    /// Build the order body from live cart lines.
    fn order_request(&self, address: &ShippingAddress) -> Result<OrderRequest> {
        let catalog = self.catalog();
        let items: Vec<OrderItem> = self
            .cart_lines()
            .into_iter()
            .filter_map(|line| {
                catalog.get(&line.product_id).map(|product| OrderItem {
                    product: product.clone(),
                    quantity: line.quantity,
                })
            })
            .collect();

        if items.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        Ok(OrderRequest {
            address: address.clone(),
            items,
            amount: self.summary().total.amount,
        })
    }

    /// Submit the checkout form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidForm` for an incomplete address (not notified),
    /// `EmptyCart` when no cart line is for a listed product, or the backend
    /// failure.
    #[instrument(skip(self, address))]
    pub async fn place_order(
        &self,
        address: &ShippingAddress,
        method: PaymentMethod,
    ) -> Result<CheckoutOutcome> {
        address.validate()?;
        let request = self
            .order_request(address)
            .map_err(|e| self.surface("place_order", e))?;
        let token = self.token();
        let method_name = method.to_string();
        add_breadcrumb("checkout", "Place order", Some(&[("method", method_name.as_str())]));

        match method {
            PaymentMethod::Cod => {
                let order = self
                    .backend()
                    .place_order(token.as_ref(), &request)
                    .await
                    .map_err(|e| self.surface("place_order", e.into()))?;
                self.finish_order("place_order").await;
                self.notifications().success(ORDER_PLACED);
                info!(amount = %request.amount, "Order placed");
                Ok(CheckoutOutcome::Placed {
                    order,
                    route: Route::OrderSuccess,
                })
            }
            PaymentMethod::Stripe => {
                let session = self
                    .backend()
                    .create_payment(token.as_ref(), &request)
                    .await
                    .map_err(|e| self.surface("create_payment", e.into()))?;
                Ok(match session {
                    PaymentSession::Redirect { session_url } => {
                        CheckoutOutcome::Redirect { session_url }
                    }
                    PaymentSession::CardPayment {
                        client_secret,
                        order_id,
                    } => CheckoutOutcome::CardPayment {
                        client_secret,
                        order_id,
                    },
                })
            }
        }
    }

    /// Record a confirmed card payment and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns the backend failure; the cart is then left as it was.
    #[instrument(skip(self))]
    pub async fn confirm_card_payment(&self, order_id: &OrderId) -> Result<Route> {
        let token = self.token();
        self.backend()
            .confirm_payment(token.as_ref(), order_id)
            .await
            .map_err(|e| self.surface("confirm_card_payment", e.into()))?;
        self.finish_order("confirm_card_payment").await;
        self.notifications().success(PAYMENT_SUCCESSFUL);
        Ok(Route::Orders)
    }

    /// Verify a hosted checkout session after the shopper comes back.
    ///
    /// Only runs for a signed-in shopper. Returns whether the payment was
    /// verified; failures are logged and never notified.
    #[instrument(skip(self))]
    pub async fn verify_checkout_session(&self, session_id: &str) -> bool {
        let Some(token) = self.token() else {
            return false;
        };
        if session_id.trim().is_empty() {
            return false;
        }

        match self
            .backend()
            .verify_checkout_session(&token, session_id)
            .await
        {
            Ok(()) => {
                self.finish_order("verify_checkout_session").await;
                info!("Payment verified");
                true
            }
            Err(e) => {
                warn!(error = %e, "Payment verification failed");
                false
            }
        }
    }

    async fn finish_order(&self, operation: &str) {
        if let Err(e) = self.clear_cart().await {
            e.report(operation);
        }
    }
}
