//! # Cart
//!
//! The in-progress list of line items for the current transaction.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Click Product ──────────► add() ───────────► merge or push line       │
//! │  Change Quantity ────────► update_quantity() ► line.quantity = n       │
//! │  Click Remove ───────────► remove() ────────► retain others            │
//! │  Cancel / Sale done ─────► clear() ─────────► items.clear()            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is deliberately not consulted here; a line can hold more units
//! than the catalog has on hand.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

/// A line in the cart.
///
/// `product` is a frozen copy taken when the line was created. Price edits
/// in the catalog after that moment do not change this line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub product: Product,
    /// Always > 0 while the line is in a cart.
    pub quantity: u32,
}

impl CartItem {
    /// Creates a line from a product snapshot.
    pub fn new(product: &Product, quantity: u32) -> Self {
        CartItem {
            product: product.clone(),
            quantity,
        }
    }

    /// Id of the product this line refers to.
    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Unit sale price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.sale_price().multiply_quantity(self.quantity)
    }

    /// (Unit sale price − unit cost) × quantity.
    pub fn line_profit(&self) -> Money {
        self.product.unit_margin().multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - At most one line per product id (adding again sums quantities)
/// - Every line has `quantity > 0`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds `quantity` units of `product`.
    ///
    /// ## Behavior
    /// - Product already in cart: its quantity grows by `quantity`
    /// - Product not in cart: a new line is appended
    /// - `quantity == 0`: nothing happens
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }

        self.items.push(CartItem::new(product, quantity));
    }

    /// Replaces the quantity of a line.
    ///
    /// A quantity of zero removes the line. Returns `false` when the
    /// product is not in the cart (no-op).
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }

        match self.items.iter_mut().find(|i| i.product.id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Removes the line for `product_id`. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        self.items.len() != initial_len
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the line for `product_id`, if any.
    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Number of distinct products in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Units across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Σ sale price × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Σ (sale price − cost price) × quantity.
    pub fn profit(&self) -> Money {
        self.items.iter().map(CartItem::line_profit).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    #[ts(type = "number")]
    pub total_quantity: u64,
    pub total_cents: i64,
    pub profit_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total_cents: cart.total().cents(),
            profit_cents: cart.profit().cents(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, sale: i64, cost: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Produto {}", id),
            sku: format!("SKU-{}", id),
            cost_price_cents: cost,
            sale_price_cents: sale,
            stock: 10,
            category: String::new(),
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 899, 550), 2);

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total().cents(), 1798);
        assert_eq!(cart.profit().cents(), 698);
    }

    #[test]
    fn test_cart_add_same_product_sums_quantities() {
        let mut cart = Cart::new();
        let product = test_product("1", 899, 550);

        for qty in [2, 3, 1, 4] {
            cart.add(&product, qty);
        }

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.item("1").map(|i| i.quantity), Some(10));
    }

    #[test]
    fn test_cart_add_zero_is_noop() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 899, 550), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_ignores_stock_on_add() {
        let mut cart = Cart::new();
        let product = test_product("1", 100, 50);
        cart.add(&product, product.stock + 5);
        assert_eq!(cart.total_quantity(), 15);
    }

    #[test]
    fn test_cart_line_keeps_price_snapshot() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 899, 550);
        cart.add(&product, 1);

        product.sale_price_cents = 1299;
        cart.add(&product, 1);

        // Merged into the original line at the original price.
        assert_eq!(cart.total().cents(), 1798);
    }

    #[test]
    fn test_cart_update_quantity() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 899, 550), 2);

        assert!(cart.update_quantity("1", 7));
        assert_eq!(cart.total_quantity(), 7);

        assert!(!cart.update_quantity("missing", 3));
        assert_eq!(cart.item_count(), 1);

        assert!(cart.update_quantity("1", 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_remove() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 899, 550), 2);
        cart.add(&test_product("2", 450, 200), 1);

        assert!(cart.remove("1"));
        assert!(!cart.remove("1"));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items[0].product_id(), "2");
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 899, 550), 2);
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }

    #[test]
    fn test_cart_totals_from_cart() {
        let mut cart = Cart::new();
        cart.add(&test_product("1", 899, 550), 2);
        cart.add(&test_product("2", 450, 200), 3);

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 5);
        assert_eq!(totals.total_cents, 1798 + 1350);
        assert_eq!(totals.profit_cents, 698 + 750);
    }
}
