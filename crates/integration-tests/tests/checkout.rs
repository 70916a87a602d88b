//! Checkout, payment verification and order history.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use goshen_core::{OrderStatus, PaymentMethod, ProductId};
use goshen_integration_tests::{PASSWORD, TestContext, product};
use goshen_storefront::models::{LoginForm, ShippingAddress};
use goshen_storefront::{CheckoutOutcome, Route, ShopStore, StoreError};
use rust_decimal::Decimal;
use serde_json::{Value, json};

const ADA: &str = "ada@example.com";

fn products() -> Vec<Value> {
    vec![
        product("p1", "Kale", 5.0, true),
        product("p3", "Bok choy", 3.0, true),
    ]
}

fn id(s: &str) -> ProductId {
    ProductId::new(s)
}

fn dollars(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

fn address() -> ShippingAddress {
    ShippingAddress {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: ADA.into(),
        street: "1 Fresh Lane".into(),
        city: "Ringwood".into(),
        state: "VIC".into(),
        zipcode: "3134".into(),
        country: "Australia".into(),
        phone: "0400000000".into(),
    }
}

async fn signed_in(ctx: &TestContext) -> ShopStore {
    ctx.shop.add_user(ADA);
    let store = ctx.started_store().await;
    store.login(&LoginForm::new(ADA, PASSWORD)).await.unwrap();
    store.notifications().drain();
    store
}

#[tokio::test]
async fn test_guest_cash_on_delivery_order() {
    let ctx = TestContext::start(products()).await;
    let store = ctx.started_store().await;
    store.add_item(&id("p1"), 2, dollars(5)).await.unwrap();
    store.add_item(&id("p3"), 1, dollars(3)).await.unwrap();
    // no longer listed, so never ordered
    store.add_item(&id("gone"), 1, dollars(9)).await.unwrap();
    store.notifications().drain();

    let outcome = store
        .place_order(&address(), PaymentMethod::Cod)
        .await
        .unwrap();

    let CheckoutOutcome::Placed { order, route } = outcome else {
        panic!("expected a placed order");
    };
    assert_eq!(route, Route::OrderSuccess);
    assert_eq!(order.unwrap().status, OrderStatus::OrderPlaced);

    let request = ctx.shop.state().order_requests[0].clone();
    assert_eq!(request["amount"], json!(33.0));
    assert_eq!(request["items"].as_array().unwrap().len(), 2);
    assert_eq!(request["items"][0]["_id"], "p1");
    assert_eq!(request["items"][0]["quantity"], 2);
    assert_eq!(request["address"]["firstName"], "Ada");

    assert!(store.cart_lines().is_empty());
    assert!(!ctx.data_dir.join("guestCart.json").exists());
    assert_eq!(
        store.notifications().drain()[0].message,
        "Order Placed! Welcome to Goshen."
    );
}

#[tokio::test]
async fn test_signed_in_order_shows_in_history() {
    let ctx = TestContext::start(products()).await;
    let store = signed_in(&ctx).await;
    store.add_item(&id("p1"), 1, dollars(5)).await.unwrap();

    store
        .place_order(&address(), PaymentMethod::Cod)
        .await
        .unwrap();
    assert!(ctx.shop.cart_of(ADA).is_empty());

    let orders = store.order_history().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].amount, dollars(25));
    assert_eq!(orders[0].items[0].quantity, 1);
    assert_eq!(orders[0].address.as_ref().unwrap().city, "Ringwood");
    assert!(orders[0].created_at.is_some());
}

#[tokio::test]
async fn test_order_history_is_newest_first() {
    let ctx = TestContext::start(products()).await;
    for n in 1..=3 {
        ctx.shop.add_order(
            ADA,
            json!({ "_id": format!("o{n}"), "amount": 10.0, "status": "Delivered", "items": [] }),
        );
    }
    let store = signed_in(&ctx).await;

    let ids: Vec<_> = store
        .order_history()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id.into_inner())
        .collect();
    assert_eq!(ids, ["o3", "o2", "o1"]);
}

#[tokio::test]
async fn test_guest_has_no_order_history() {
    let ctx = TestContext::start(products()).await;
    let store = ctx.started_store().await;

    let err = store.order_history().await.unwrap_err();

    assert!(matches!(err, StoreError::NotAuthenticated));
    assert_eq!(ctx.shop.hits("/api/order/userorders"), 0);
}

#[tokio::test]
async fn test_hosted_checkout_then_verification() {
    let ctx = TestContext::start(products()).await;
    let store = signed_in(&ctx).await;
    store.add_item(&id("p3"), 2, dollars(3)).await.unwrap();

    let outcome = store
        .place_order(&address(), PaymentMethod::Stripe)
        .await
        .unwrap();
    let CheckoutOutcome::Redirect { session_url } = outcome else {
        panic!("expected a redirect");
    };
    assert!(session_url.starts_with("https://checkout.example.com/"));
    // nothing is emptied until the payment is verified
    assert_eq!(store.cart_lines().len(), 1);

    assert!(!store.verify_checkout_session("bogus").await);
    assert_eq!(store.cart_lines().len(), 1);

    assert!(store.verify_checkout_session("cs_test_1").await);
    assert!(store.cart_lines().is_empty());
    assert!(ctx.shop.cart_of(ADA).is_empty());
}

#[tokio::test]
async fn test_rejected_payment_keeps_cart() {
    let ctx = TestContext::start(products()).await;
    let store = ctx.started_store().await;
    store.add_item(&id("p1"), 1, dollars(5)).await.unwrap();
    store.notifications().drain();

    // the mock only takes card payments from signed-in shoppers
    let result = store.place_order(&address(), PaymentMethod::Stripe).await;

    assert!(result.is_err());
    assert_eq!(store.cart_lines().len(), 1);
    assert_eq!(
        store.notifications().drain()[0].message,
        "Not Authorized Login Again"
    );
}
