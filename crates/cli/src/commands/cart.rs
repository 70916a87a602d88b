//! Cart commands.

use goshen_core::{Price, ProductId};
use goshen_storefront::ShopStore;
use rust_decimal::Decimal;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print the cart and its totals.
pub fn show(store: &ShopStore) {
    let entries = store.cart_view();
    if entries.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    let currency = store.config().currency;
    for entry in &entries {
        println!(
            "{:<26} {:<34} {:>4} x {:>9} = {:>10}",
            entry.product.id,
            entry.product.title(),
            entry.line.quantity,
            Price::new(entry.line.unit_price, currency).display(),
            Price::new(entry.line.line_total, currency).display(),
        );
    }

    let summary = store.summary();
    println!();
    println!("Items:     {}", summary.item_count);
    println!("Subtotal:  {}", summary.subtotal);
    println!("Delivery:  {}", summary.delivery_fee);
    println!("Total:     {}", summary.total);
}

/// Price the shopper sees for a product: the catalog price, or the price the
/// line was added at when the product is no longer listed.
fn unit_price(store: &ShopStore, id: &ProductId) -> Option<Decimal> {
    store
        .catalog()
        .get(id)
        .map(|p| p.price)
        .or_else(|| store.cart_line(id).map(|l| l.unit_price))
}

pub async fn add(store: &ShopStore, id: &ProductId, quantity: u32) -> CommandResult {
    let price = store
        .catalog()
        .get(id)
        .map(|p| p.price)
        .ok_or_else(|| format!("Product not found: {id}"))?;
    store.add_item(id, quantity, price).await?;
    show(store);
    Ok(())
}

pub async fn increment(store: &ShopStore, id: &ProductId) -> CommandResult {
    let line = store
        .cart_line(id)
        .ok_or_else(|| format!("Not in cart: {id}"))?;
    let price = unit_price(store, id).unwrap_or(line.unit_price);
    store.increment_item(id, line.quantity, price).await?;
    show(store);
    Ok(())
}

pub async fn decrement(store: &ShopStore, id: &ProductId) -> CommandResult {
    let line = store
        .cart_line(id)
        .ok_or_else(|| format!("Not in cart: {id}"))?;
    let price = unit_price(store, id).unwrap_or(line.unit_price);
    store.decrement_item(id, line.quantity, price).await?;
    show(store);
    Ok(())
}
