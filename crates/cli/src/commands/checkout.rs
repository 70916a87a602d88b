//! Checkout and payment commands.

use goshen_core::{OrderId, PaymentMethod};
use goshen_storefront::models::ShippingAddress;
use goshen_storefront::{CheckoutOutcome, ShopStore};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub async fn place_order(
    store: &ShopStore,
    address: &ShippingAddress,
    method: PaymentMethod,
) -> CommandResult {
    let total = store.summary().total;
    match store.place_order(address, method).await? {
        CheckoutOutcome::Placed { order, route } => {
            if let Some(order) = order {
                println!("Order {} placed ({total}).", order.id);
            }
            println!("Next: {route}");
        }
        CheckoutOutcome::Redirect { session_url } => {
            println!("Complete your payment at:");
            println!("  {session_url}");
            println!("Then run: goshen verify-payment <session_id>");
        }
        CheckoutOutcome::CardPayment { order_id, .. } => {
            println!("Card payment started for order {order_id}.");
            println!("Once the card is confirmed run: goshen confirm-payment {order_id}");
        }
    }
    Ok(())
}

pub async fn verify(store: &ShopStore, session_id: &str) -> CommandResult {
    if store.verify_checkout_session(session_id).await {
        println!("Payment verified. Your cart has been emptied.");
        Ok(())
    } else {
        Err("Payment could not be verified".into())
    }
}

pub async fn confirm(store: &ShopStore, order_id: &OrderId) -> CommandResult {
    let route = store.confirm_card_payment(order_id).await?;
    println!("Next: {route}");
    Ok(())
}
