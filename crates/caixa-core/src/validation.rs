//! # Validation Module
//!
//! Input validation utilities for Caixa POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization: no negative stock/quantity)     │
//! │  └── THIS MODULE: field rules                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PosState transitions                                         │
//! │  └── Invariants (stock floor, one line per product)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caixa_core::validation::{validate_sku, validate_email};
//!
//! assert!(validate_sku("BEB-001").is_ok());
//! assert!(validate_email("dono@loja.com.br").is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{NewProduct, Payment, ProductUpdate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shortest password accepted for a provisioned account.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Longest subscription grant, in days.
pub const MAX_DAYS_GIVEN: i64 = 3650;

/// Highest unit price accepted, in centavos (R$ 1.000.000.000,00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;

/// Highest stock level a product may be set to.
pub const MAX_STOCK: u32 = 10_000_000;

/// Most units of one product a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 100_000;

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens, underscores
///
/// ## Example
/// ```rust
/// use caixa_core::validation::validate_sku;
///
/// assert!(validate_sku("BEB-001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a category. Empty is allowed.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    if category.trim().chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a price in centavos: must be non-negative. Zero is allowed.
///
/// ## Example
/// ```rust
/// use caixa_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("salePrice", 899).is_ok());
/// assert!(validate_price_cents("salePrice", 0).is_ok());
/// assert!(validate_price_cents("salePrice", -100).is_err());
/// assert!(validate_price_cents("salePrice", i64::MAX).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock level: at most [`MAX_STOCK`].
pub fn validate_stock(stock: u32) -> ValidationResult<()> {
    if stock > MAX_STOCK {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::from(MAX_STOCK),
        });
    }

    Ok(())
}

/// Validates the quantity of a cart line: at most [`MAX_LINE_QUANTITY`].
pub fn validate_line_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::from(MAX_LINE_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed. Maximum 100 characters.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates every field of a new product.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_sku(&product.sku)?;
    validate_price_cents("costPrice", product.cost_price_cents)?;
    validate_price_cents("salePrice", product.sale_price_cents)?;
    validate_stock(product.stock)?;
    validate_category(&product.category)
}

/// Validates the fields present in a product patch.
pub fn validate_product_update(update: &ProductUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.name {
        validate_product_name(name)?;
    }
    if let Some(sku) = &update.sku {
        validate_sku(sku)?;
    }
    if let Some(cost) = update.cost_price_cents {
        validate_price_cents("costPrice", cost)?;
    }
    if let Some(price) = update.sale_price_cents {
        validate_price_cents("salePrice", price)?;
    }
    if let Some(stock) = update.stock {
        validate_stock(stock)?;
    }
    if let Some(category) = &update.category {
        validate_category(category)?;
    }
    Ok(())
}

/// Validates a split-tender payment list.
///
/// ## Rules
/// - At least one payment
/// - No negative amounts
pub fn validate_payments(payments: &[Payment]) -> ValidationResult<()> {
    if payments.is_empty() {
        return Err(ValidationError::Required {
            field: "payments".to_string(),
        });
    }

    for payment in payments {
        validate_price_cents("payment amount", payment.amount_cents)?;
    }

    Ok(())
}

// =============================================================================
// Provisioning Validators
// =============================================================================

/// Validates a company name: non-empty, at most 120 characters.
pub fn validate_company_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "companyName".to_string(),
        });
    }

    if name.chars().count() > 120 {
        return Err(ValidationError::TooLong {
            field: "companyName".to_string(),
            max: 120,
        });
    }

    Ok(())
}

/// Validates an email address shape: `local@domain.tld`, no whitespace.
///
/// ## Example
/// ```rust
/// use caixa_core::validation::validate_email;
///
/// assert!(validate_email("dono@loja.com.br").is_ok());
/// assert!(validate_email("sem-arroba").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "adminEmail".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "adminEmail".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must be of the form name@domain"));
    }

    let dot_ok = domain
        .rsplit_once('.')
        .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
        .unwrap_or(false);
    if !dot_ok {
        return Err(invalid("domain must contain a '.'"));
    }

    Ok(())
}

/// Validates a new account password: at least [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "adminPassword".to_string(),
        });
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "adminPassword".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a subscription grant in days: `1..=MAX_DAYS_GIVEN`.
pub fn validate_days_given(days: i64) -> ValidationResult<()> {
    if !(1..=MAX_DAYS_GIVEN).contains(&days) {
        return Err(ValidationError::OutOfRange {
            field: "daysGiven".to_string(),
            min: 1,
            max: MAX_DAYS_GIVEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("BEB-001").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("produto_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("tem espaco").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Pão de Queijo 1kg").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_new_product_rejects_negative_price() {
        let product = NewProduct {
            name: "Café".to_string(),
            sku: "CAF-01".to_string(),
            cost_price_cents: -1,
            sale_price_cents: 1000,
            stock: 3,
            category: "Mercearia".to_string(),
        };
        assert!(matches!(
            validate_new_product(&product),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_product_update_checks_only_present_fields() {
        assert!(validate_product_update(&ProductUpdate::default()).is_ok());

        let update = ProductUpdate {
            name: Some(String::new()),
            ..ProductUpdate::default()
        };
        assert!(validate_product_update(&update).is_err());
    }

    #[test]
    fn test_validate_payments() {
        assert!(validate_payments(&[]).is_err());
        assert!(validate_payments(&[Payment {
            method: PaymentMethod::Pix,
            amount_cents: 1000,
        }])
        .is_ok());
        assert!(validate_payments(&[Payment {
            method: PaymentMethod::Cash,
            amount_cents: -5,
        }])
        .is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("dono@loja.com.br").is_ok());
        assert!(validate_email("  a@b.co  ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("sem-arroba").is_err());
        assert!(validate_email("@loja.com").is_err());
        assert!(validate_email("a@loja").is_err());
        assert!(validate_email("a@@loja.com").is_err());
        assert!(validate_email("a b@loja.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("segredo").is_ok());
        assert!(matches!(
            validate_password("12345"),
            Err(ValidationError::TooShort { min: 6, .. })
        ));
        assert!(matches!(
            validate_password(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_days_given() {
        assert!(validate_days_given(1).is_ok());
        assert!(validate_days_given(30).is_ok());
        assert!(validate_days_given(MAX_DAYS_GIVEN).is_ok());
        assert!(validate_days_given(0).is_err());
        assert!(validate_days_given(-7).is_err());
        assert!(validate_days_given(MAX_DAYS_GIVEN + 1).is_err());
    }

    #[test]
    fn test_validate_company_name() {
        assert!(validate_company_name("Mercadinho São José").is_ok());
        assert!(validate_company_name("  ").is_err());
    }

    #[test]
    fn test_large_values_rejected() {
        assert!(validate_price_cents("salePrice", MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents("salePrice", MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_price_cents("salePrice", i64::MAX / 2).is_err());

        assert!(validate_stock(MAX_STOCK).is_ok());
        assert!(validate_stock(u32::MAX).is_err());
        assert!(validate_line_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(validate_line_quantity(MAX_LINE_QUANTITY + 1).is_err());

        let update = ProductUpdate {
            stock: Some(u32::MAX),
            ..ProductUpdate::default()
        };
        assert!(matches!(
            validate_product_update(&update),
            Err(ValidationError::OutOfRange { field, .. }) if field == "stock"
        ));
    }
}
