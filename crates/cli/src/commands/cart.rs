//! Cart commands.
//!
//! Each command runs inside the provider scope set up by `main` and finds the
//! cart through `use_cart()`.

use marketplace_cart::use_cart;
use marketplace_cart_core::{Decimal, Product, ProductId, Snapshot};
use tracing::info;

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if called outside a provider scope.
pub fn add(
    id: String,
    title: String,
    image_url: String,
    price: Decimal,
) -> Result<(), Box<dyn std::error::Error>> {
    let cart = use_cart()?;
    cart.add_to_cart(Product::new(id.clone(), title, image_url, price));

    let quantity = cart
        .products()
        .get(&ProductId::new(id.as_str()))
        .map_or(0, |item| item.quantity);
    info!(id = %id, quantity, "Added to cart");
    Ok(())
}

/// Add one unit to an existing line item.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn increment(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    use_cart()?.increment(&ProductId::new(id))?;
    info!(id = %id, "Incremented");
    Ok(())
}

/// Remove one unit from an existing line item.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub fn decrement(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    use_cart()?.decrement(&ProductId::new(id))?;
    info!(id = %id, "Decremented");
    Ok(())
}

/// Print the cart to stdout.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be encoded.
#[allow(clippy::print_stdout)]
pub fn list(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let products = use_cart()?.products();

    if json {
        println!("{}", products.to_json()?);
    } else {
        print!("{}", render_table(&products));
    }
    Ok(())
}

/// Format an amount, or `n/a` when it cannot be computed.
fn money(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| "n/a".to_string(), |amount| format!("${amount:.2}"))
}

/// Render one line per item followed by totals.
fn render_table(snapshot: &Snapshot) -> String {
    if snapshot.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in snapshot {
        out.push_str(&format!(
            "{:>4} x {:<24} {:>10}  ({})\n",
            item.quantity,
            item.title,
            money(item.line_total()),
            item.id
        ));
    }
    out.push_str(&format!(
        "{} item(s), subtotal {}\n",
        snapshot.item_count(),
        money(snapshot.subtotal())
    ));
    out
}
