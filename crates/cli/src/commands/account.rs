//! Session, order history and inquiry commands.

use goshen_core::Price;
use goshen_storefront::ShopStore;
use goshen_storefront::models::{ContactForm, LoginForm, RegisterForm};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub async fn login(store: &ShopStore, email: String, password: String) -> CommandResult {
    let route = store.login(&LoginForm::new(email, password)).await?;
    println!("Signed in. Cart has {} item(s).", store.item_count());
    if store.unread_replies() > 0 {
        println!("You have {} new reply(ies): goshen inquiries", store.unread_replies());
    }
    println!("Next: {route}");
    Ok(())
}

pub async fn register(
    store: &ShopStore,
    name: String,
    email: String,
    phone: String,
    password: String,
    confirm: String,
) -> CommandResult {
    let form = RegisterForm {
        name,
        email,
        phone,
        password: password.into(),
        confirm_password: confirm.into(),
    };
    let route = store.register(&form).await?;
    println!("Account created. Next: {route}");
    Ok(())
}

pub fn logout(store: &ShopStore) {
    let route = store.logout();
    println!("Signed out. Next: {route}");
}

pub async fn orders(store: &ShopStore) -> CommandResult {
    let orders = store.order_history().await?;
    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }

    let currency = store.config().currency;
    for order in &orders {
        let date = order
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let payment = order
            .payment_method
            .map(|m| m.to_string())
            .unwrap_or_default();
        let paid = if order.is_paid() { "paid" } else { "unpaid" };
        println!(
            "{} {date} {:>10} {} ({payment}, {paid})",
            order.id,
            Price::new(order.amount, currency).display(),
            order.status,
        );
        for item in &order.items {
            println!("    {} x {}", item.quantity, item.name);
        }
    }
    Ok(())
}

pub async fn contact(
    store: &ShopStore,
    name: String,
    email: String,
    subject: Option<String>,
    message: String,
) -> CommandResult {
    let form = ContactForm::new(name, email, subject, message);
    store.submit_inquiry(&form).await?;
    Ok(())
}

pub async fn inquiries(store: &ShopStore) -> CommandResult {
    let inquiries = store.my_inquiries().await?;
    if inquiries.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }

    for inquiry in &inquiries {
        let date = inquiry
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("[{}] {} {date}", inquiry.status, inquiry.subject);
        println!("    {}", inquiry.message);
        if let Some(reply) = &inquiry.reply {
            println!("    Reply: {reply}");
        }
    }
    Ok(())
}
