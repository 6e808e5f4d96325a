//! # caixa-core: Pure Business Logic for Caixa POS
//!
//! Catalog, cart, sale finalization, receipts and reports for a small
//! Brazilian point-of-sale. No I/O lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caixa POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (browser / PWA)                     │   │
//! │  │    Catalog UI ──► Cart UI ──► Payment UI ──► WhatsApp receipt  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    pos-api (axum handlers)                      │   │
//! │  │    lock PosState ──► transition ──► persist snapshot            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caixa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  cart   │ │  store  │ │ receipt │ │ report  │  │   │
//! │  │   │  Money  │ │  Cart   │ │PosState │ │ wa.me   │ │ totals  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 caixa-db (snapshot storage)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Payment, ...)
//! - [`money`] - Integer centavos with BRL formatting
//! - [`cart`] - Cart and line items
//! - [`store`] - [`PosState`] and its transitions
//! - [`receipt`] - WhatsApp receipt text and link
//! - [`report`] - Sales aggregation
//! - [`error`] / [`validation`] - Typed errors and input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use caixa_core::{Money, NewProduct, PaymentMethod, PosState};
//! use caixa_core::receipt::{format_receipt, ReceiptOptions};
//!
//! let mut state = PosState::default();
//! let coke = state.add_product(NewProduct {
//!     name: "Coca-Cola 350ml".into(),
//!     sku: "BEB-001".into(),
//!     cost_price_cents: 550,
//!     sale_price_cents: 899,
//!     stock: 48,
//!     category: "Bebidas".into(),
//! });
//!
//! state.add_to_cart(&coke, 2);
//! let sale = state.process_sale(PaymentMethod::Cash.into()).unwrap();
//!
//! assert_eq!(sale.total(), Money::from_cents(1798));
//! assert!(format_receipt(&sale, &ReceiptOptions::default()).contains("Coca-Cola"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod receipt;
pub mod report;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use receipt::ReceiptOptions;
pub use report::{DateRange, PaymentMethodTotal, SalesReport};
pub use store::PosState;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key the whole [`PosState`] snapshot is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "caixa-pos-storage";

pub use receipt::DEFAULT_UTC_OFFSET_MINUTES;

/// Stock level at or below which a product is reported as running low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;
