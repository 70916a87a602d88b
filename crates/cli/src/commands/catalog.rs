//! Browsing commands.

use goshen_core::{Price, ProductId};
use goshen_storefront::models::{Category, Product};
use goshen_storefront::{CatalogFilter, ShopStore};

fn print_rows(store: &ShopStore, products: &[&Product]) {
    let currency = store.config().currency;
    if products.is_empty() {
        println!("No products found.");
        return;
    }
    for product in products {
        let stock = if product.in_stock { "" } else { "  (out of stock)" };
        println!(
            "{:<26} {:<40} {:>10}{stock}",
            product.id,
            product.title(),
            Price::new(product.price, currency).display(),
        );
    }
}

/// New arrivals and best sellers.
pub fn home(store: &ShopStore) {
    let catalog = store.catalog();
    println!("New arrivals");
    print_rows(store, &catalog.new_arrivals());
    println!();
    println!("Best sellers");
    print_rows(store, &catalog.best_sellers());
}

/// A category page, a search, or the whole catalog.
pub fn list(
    store: &ShopStore,
    category: Option<Category>,
    search: Option<&str>,
    filter: &CatalogFilter,
) {
    let catalog = store.catalog();
    let products = match (search, category) {
        (Some(term), _) => catalog.search(term),
        (None, Some(category)) => filter.apply(catalog.in_category(category)),
        (None, None) => filter.apply(catalog.products()),
    };
    print_rows(store, &products);
}

/// A product page.
///
/// # Errors
///
/// Returns an error if the product is not listed.
pub fn show(store: &ShopStore, id: &ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = store.catalog();
    let product = catalog
        .get(id)
        .ok_or_else(|| format!("Product not found: {id}"))?;
    let currency = store.config().currency;

    println!("{}", product.title());
    if !product.description.is_empty() && product.description != product.title() {
        println!("{}", product.description);
    }
    println!("Price:    {}", Price::new(product.price, currency));
    println!("Category: {} / {}", product.category, product.sub_category);
    println!(
        "Stock:    {}",
        if product.in_stock { "In stock" } else { "Out of stock" }
    );
    if let Some(line) = store.cart_line(id) {
        println!("In cart:  {}", line.quantity);
    }
    Ok(())
}
