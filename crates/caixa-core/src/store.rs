//! # POS State
//!
//! The application state object: catalog, cart and sale history, with the
//! transitions that move between them.
//!
//! ## Sale Transition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      process_sale(tender)                               │
//! │                                                                         │
//! │  cart empty? ──yes──► Err(EmptyCart), nothing touched                  │
//! │      │ no                                                               │
//! │      ▼                                                                  │
//! │  1. compute total, profit, payments  (read-only)                        │
//! │  2. build Sale { id, items snapshot, timestamp }                        │
//! │      ─────────── nothing written above this line ───────────            │
//! │  3. stock = max(0, stock − qty) for every line                          │
//! │  4. sales.push(sale)                                                    │
//! │  5. cart.clear()                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition takes `&mut self`, so a caller holding the state
//! behind a lock never observes a half-applied sale.
//!
//! ## Example
//! ```rust
//! use caixa_core::{NewProduct, PaymentMethod, PosState};
//!
//! let mut state = PosState::default();
//! let product = state.add_product(NewProduct {
//!     name: "Coca-Cola 350ml".to_string(),
//!     sku: "BEB-001".to_string(),
//!     cost_price_cents: 550,
//!     sale_price_cents: 899,
//!     stock: 48,
//!     category: "Bebidas".to_string(),
//! });
//!
//! state.add_to_cart(&product, 2);
//! let sale = state.process_sale(PaymentMethod::Pix.into()).unwrap();
//!
//! assert_eq!(sale.total_cents, 1798);
//! assert_eq!(sale.profit_cents, 698);
//! assert_eq!(state.product(&product.id).unwrap().stock, 46);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::report::{DateRange, SalesReport};
use crate::types::{NewProduct, Payment, PaymentMethod, Product, ProductUpdate, Sale, Tender};
use crate::validation::{validate_line_quantity, validate_payments};

/// Catalog, cart and sale history.
///
/// Serialized as one JSON document. Every field defaults when absent so
/// older snapshots keep loading as new fields appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PosState {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub sales: Vec<Sale>,
}

impl PosState {
    pub fn new() -> Self {
        PosState::default()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Adds a product to the catalog under a fresh UUID.
    pub fn add_product(&mut self, new: NewProduct) -> Product {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            sku: new.sku.trim().to_string(),
            cost_price_cents: new.cost_price_cents,
            sale_price_cents: new.sale_price_cents,
            stock: new.stock,
            category: new.category.trim().to_string(),
        };
        self.products.push(product.clone());
        product
    }

    /// Applies a partial update to a catalog product.
    ///
    /// Lines already in the cart keep the snapshot they were added with.
    pub fn update_product(&mut self, id: &str, update: &ProductUpdate) -> CoreResult<Product> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        update.apply_to(product);
        Ok(product.clone())
    }

    /// Moves stock by `delta`, flooring at zero. Returns the new stock, or
    /// `None` for an unknown id.
    pub fn adjust_stock(&mut self, id: &str, delta: i64) -> Option<u32> {
        let product = self.products.iter_mut().find(|p| p.id == id)?;
        product.stock = clamp_stock(i64::from(product.stock).saturating_add(delta));
        Some(product.stock)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products whose name, SKU or category contains `query`.
    pub fn search_products(&self, query: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.matches(query))
            .cloned()
            .collect()
    }

    /// Products with `stock <= threshold`, lowest stock first.
    pub fn low_stock(&self, threshold: u32) -> Vec<Product> {
        let mut low: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.stock <= threshold)
            .cloned()
            .collect();
        low.sort_by_key(|p| p.stock);
        low
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds a snapshot of `product` to the cart. Stock is not checked.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) {
        self.cart.add(product, quantity);
    }

    /// Looks `product_id` up in the catalog and adds it to the cart.
    ///
    /// The resulting line may hold at most
    /// [`MAX_LINE_QUANTITY`](crate::validation::MAX_LINE_QUANTITY) units.
    pub fn add_to_cart_by_id(&mut self, product_id: &str, quantity: u32) -> CoreResult<()> {
        let product = self
            .product(product_id)
            .cloned()
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let in_cart = self.cart.item(product_id).map_or(0, |i| i.quantity);
        validate_line_quantity(in_cart.saturating_add(quantity))?;

        self.cart.add(&product, quantity);
        Ok(())
    }

    /// Removes a line. Unknown ids are ignored.
    pub fn remove_from_cart(&mut self, product_id: &str) -> bool {
        self.cart.remove(product_id)
    }

    /// Sets a line's quantity; zero removes it. Unknown ids are ignored
    /// (`Ok(false)`).
    pub fn update_cart_quantity(&mut self, product_id: &str, quantity: u32) -> CoreResult<bool> {
        validate_line_quantity(quantity)?;
        Ok(self.cart.update_quantity(product_id, quantity))
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Finalizes the cart into a sale stamped with a new id and the current time.
    pub fn process_sale(&mut self, tender: Tender) -> CoreResult<Sale> {
        self.process_sale_at(tender, Uuid::new_v4().to_string(), Utc::now())
    }

    /// Finalizes the cart into a sale with the given id and timestamp.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyCart`] if there is nothing to sell
    /// - [`CoreError::Validation`] if a split tender has no payments or a
    ///   negative amount
    ///
    /// On error the state is untouched.
    pub fn process_sale_at(
        &mut self,
        tender: Tender,
        id: String,
        timestamp: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let (payment_method, payments) = resolve_tender(tender)?;

        let sale = Sale {
            id,
            items: self.cart.items.clone(),
            total_cents: self.cart.total().cents(),
            profit_cents: self.cart.profit().cents(),
            payment_method,
            payments,
            timestamp,
        };

        for item in &sale.items {
            if let Some(product) = self.products.iter_mut().find(|p| p.id == item.product.id) {
                product.stock = product.stock.saturating_sub(item.quantity);
            }
        }
        self.sales.push(sale.clone());
        self.cart.clear();

        Ok(sale)
    }

    /// Sale history, oldest first.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    /// Aggregates the sales inside `range`.
    pub fn report(&self, range: DateRange) -> SalesReport {
        SalesReport::from_sales(&self.sales, range)
    }
}

fn resolve_tender(tender: Tender) -> CoreResult<(PaymentMethod, Vec<Payment>)> {
    match tender {
        Tender::Single(method) => Ok((method, Vec::new())),
        Tender::Split(payments) => {
            validate_payments(&payments)?;
            // validate_payments guarantees at least one entry
            let method = payments
                .first()
                .map(|p| p.method)
                .unwrap_or(PaymentMethod::Cash);
            Ok((method, payments))
        }
    }
}

fn clamp_stock(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}
