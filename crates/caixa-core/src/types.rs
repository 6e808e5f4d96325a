//! # Domain Types
//!
//! Core domain types used throughout Caixa POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartItem     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  product (snap) │──►│  items (snap)   │       │
//! │  │  sku, name      │   │  quantity       │   │  total, profit  │       │
//! │  │  cost / sale $  │   └─────────────────┘   │  payment(s)     │       │
//! │  │  stock, category│                         │  timestamp      │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │ PaymentMethod   │   │    Payment      │                             │
//! │  │  Cash, Pix      │   │  method, amount │ (split tender)              │
//! │  │  Credit, Debit  │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartItem;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// What the shop paid per unit, in centavos.
    pub cost_price_cents: i64,

    /// Shelf price per unit, in centavos.
    pub sale_price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: u32,

    /// Free-form grouping ("Bebidas", "Mercearia", ...).
    #[serde(default)]
    pub category: String,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Returns the cost price as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Profit made on one unit at current prices.
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.sale_price() - self.cost_price()
    }

    /// Case-insensitive match on name, SKU or category.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.sku.to_lowercase().contains(&query)
            || self.category.to_lowercase().contains(&query)
    }
}

/// Input for creating a product. The id is assigned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub cost_price_cents: i64,
    pub sale_price_cents: i64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category: String,
}

/// Partial update for a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub cost_price_cents: Option<i64>,
    pub sale_price_cents: Option<i64>,
    pub stock: Option<u32>,
    pub category: Option<String>,
}

impl ProductUpdate {
    /// Applies the patch to `product` in place.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.trim().to_string();
        }
        if let Some(sku) = &self.sku {
            product.sku = sku.trim().to_string();
        }
        if let Some(cost) = self.cost_price_cents {
            product.cost_price_cents = cost;
        }
        if let Some(price) = self.sale_price_cents {
            product.sale_price_cents = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category) = &self.category {
            product.category = category.trim().to_string();
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Notes and coins.
    #[serde(alias = "dinheiro")]
    Cash,
    /// Instant transfer through the Brazilian central bank rail.
    Pix,
    /// Credit card on an external terminal.
    #[serde(alias = "credito")]
    CreditCard,
    /// Debit card on an external terminal.
    #[serde(alias = "debito")]
    DebitCard,
}

impl PaymentMethod {
    /// Every method, in receipt/report order.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Pix,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
    ];

    /// Label printed on the receipt.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::CreditCard => "Cartão de Crédito",
            PaymentMethod::DebitCard => "Cartão de Débito",
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// One part of a split-tender sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Payment {
    pub method: PaymentMethod,
    /// Amount paid with this method, in centavos.
    pub amount_cents: i64,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// How a sale is being paid when it is finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tender {
    /// One payment method covers the whole sale.
    Single(PaymentMethod),
    /// Several payments, each with its own method and amount.
    Split(Vec<Payment>),
}

impl From<PaymentMethod> for Tender {
    fn from(method: PaymentMethod) -> Self {
        Tender::Single(method)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A finalized sale. Immutable once recorded.
///
/// `items` is a snapshot of the cart at the moment of sale, so later
/// catalog edits never change a historical sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub items: Vec<CartItem>,
    /// Σ sale price × quantity, in centavos.
    pub total_cents: i64,
    /// Σ (sale price − cost price) × quantity, in centavos.
    pub profit_cents: i64,
    /// Single payment method. For split sales, the first payment's method.
    pub payment_method: PaymentMethod,
    /// Split payments. Empty when the sale was paid with `payment_method` alone.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<Payment>,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the profit as Money.
    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }

    /// Units sold across all lines.
    pub fn units(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Whether the sale was paid with more than one payment entry.
    pub fn is_split(&self) -> bool {
        !self.payments.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
