//! # Receipt Formatting
//!
//! Turns a finalized [`Sale`] into a WhatsApp-ready text message and a
//! `wa.me` deep link carrying it.
//!
//! ## Message Layout
//! ```text
//! 🧾 *Comprovante de Venda*
//! 🏪 Mercadinho São José
//! ━━━━━━━━━━━━━━━━━━━━
//! 📅 Data: 19/10/2026 12:00
//! 🔖 Venda: #3F2A9C1B
//! ━━━━━━━━━━━━━━━━━━━━
//! 🛒 *Itens*
//! 2x Coca-Cola 350ml
//!    R$ 8,99 cada = R$ 17,98
//! ━━━━━━━━━━━━━━━━━━━━
//! 💰 *Total: R$ 17,98*
//! 💳 Pagamento: PIX
//! ━━━━━━━━━━━━━━━━━━━━
//! Obrigado pela preferência! 🙏
//! ```

use chrono::{FixedOffset, Offset, Utc};

use crate::types::Sale;

/// Default offset for receipts: America/Sao_Paulo (UTC−03:00).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -180;

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Rendering options for [`format_receipt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptOptions {
    /// Printed under the title when set.
    pub store_name: Option<String>,
    /// Offset applied to the UTC sale timestamp before printing.
    pub utc_offset_minutes: i32,
}

impl Default for ReceiptOptions {
    fn default() -> Self {
        ReceiptOptions {
            store_name: None,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl ReceiptOptions {
    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

/// Short human-facing sale reference: first 8 characters, uppercased.
pub fn short_sale_id(id: &str) -> String {
    id.chars().take(8).collect::<String>().to_uppercase()
}

/// Renders the receipt text for `sale`.
///
/// ## Example
/// ```rust
/// use caixa_core::receipt::{format_receipt, ReceiptOptions};
/// # use caixa_core::{Sale, PaymentMethod};
/// # let sale = Sale {
/// #     id: "abc".into(), items: vec![], total_cents: 1798, profit_cents: 0,
/// #     payment_method: PaymentMethod::Pix, payments: vec![],
/// #     timestamp: "2026-10-19T15:00:00Z".parse().unwrap(),
/// # };
/// let text = format_receipt(&sale, &ReceiptOptions::default());
/// assert!(text.contains("19/10/2026 12:00"));
/// assert!(text.contains("R$\u{a0}17,98"));
/// ```
pub fn format_receipt(sale: &Sale, options: &ReceiptOptions) -> String {
    let local = sale.timestamp.with_timezone(&options.offset());
    let mut lines = vec!["🧾 *Comprovante de Venda*".to_string()];

    if let Some(store) = options.store_name.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(format!("🏪 {}", store.trim()));
    }
    lines.push(SEPARATOR.to_string());
    lines.push(format!("📅 Data: {}", local.format("%d/%m/%Y %H:%M")));
    lines.push(format!("🔖 Venda: #{}", short_sale_id(&sale.id)));
    lines.push(SEPARATOR.to_string());

    lines.push("🛒 *Itens*".to_string());
    for item in &sale.items {
        lines.push(format!("{}x {}", item.quantity, item.product.name));
        lines.push(format!(
            "   {} cada = {}",
            item.product.sale_price(),
            item.line_total()
        ));
    }
    lines.push(SEPARATOR.to_string());

    lines.push(format!("💰 *Total: {}*", sale.total()));
    if sale.is_split() {
        lines.push("💳 Pagamento:".to_string());
        for payment in &sale.payments {
            lines.push(format!("   • {}: {}", payment.method.label(), payment.amount()));
        }
    } else {
        lines.push(format!("💳 Pagamento: {}", sale.payment_method.label()));
    }
    lines.push(SEPARATOR.to_string());
    lines.push("Obrigado pela preferência! 🙏".to_string());

    lines.join("\n")
}

/// Keeps only ASCII digits: `"+55 (11) 98765-4321"` → `"5511987654321"`.
pub fn sanitize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Builds `https://wa.me/<digits>?text=<percent-encoded text>`.
///
/// ## Example
/// ```rust
/// use caixa_core::receipt::whatsapp_link;
///
/// let link = whatsapp_link("+55 (11) 98765-4321", "Olá, tudo bem?");
/// assert_eq!(
///     link,
///     "https://wa.me/5511987654321?text=Ol%C3%A1%2C%20tudo%20bem%3F"
/// );
/// ```
pub fn whatsapp_link(phone: &str, text: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        sanitize_phone(phone),
        urlencoding::encode(text)
    )
}

/// Receipt text for `sale` wrapped in a WhatsApp link to `phone`.
pub fn receipt_link(sale: &Sale, options: &ReceiptOptions, phone: &str) -> String {
    whatsapp_link(phone, &format_receipt(sale, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::types::{Payment, PaymentMethod, Product};
    use chrono::TimeZone;

    fn product(id: &str, name: &str, cost: i64, sale: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: format!("SKU-{}", id),
            cost_price_cents: cost,
            sale_price_cents: sale,
            stock: 10,
            category: String::new(),
        }
    }

    fn two_item_sale() -> Sale {
        let items = vec![
            CartItem::new(&product("1", "Coca-Cola 350ml", 550, 899), 2),
            CartItem::new(&product("2", "Pão Francês", 40, 125_000), 1),
        ];
        Sale {
            id: "3f2a9c1b-0000-4000-8000-000000000000".to_string(),
            items,
            total_cents: 1798 + 125_000,
            profit_cents: 0,
            payment_method: PaymentMethod::Pix,
            payments: Vec::new(),
            timestamp: Utc.with_ymd_and_hms(2026, 10, 19, 2, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_receipt_contains_items_and_total() {
        let text = format_receipt(&two_item_sale(), &ReceiptOptions::default());

        assert!(text.contains("2x Coca-Cola 350ml"));
        assert!(text.contains("1x Pão Francês"));
        assert!(text.contains("R$\u{a0}8,99 cada = R$\u{a0}17,98"));
        assert!(text.contains("💰 *Total: R$\u{a0}1.267,98*"));
        assert!(text.contains("💳 Pagamento: PIX"));
        assert!(text.contains("#3F2A9C1B"));
    }

    #[test]
    fn test_receipt_line_layout() {
        let text = format_receipt(&two_item_sale(), &ReceiptOptions::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0], "🧾 *Comprovante de Venda*");
        assert_eq!(lines[1], SEPARATOR);
        assert_eq!(lines[4], SEPARATOR);
        assert_eq!(lines[5], "🛒 *Itens*");
        assert_eq!(lines[7], "   R$\u{a0}8,99 cada = R$\u{a0}17,98");
        assert_eq!(lines[10], SEPARATOR);
        assert_eq!(lines[12], "💳 Pagamento: PIX");
        assert_eq!(lines[13], SEPARATOR);
        assert_eq!(lines[14], "Obrigado pela preferência! 🙏");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_receipt_date_uses_offset() {
        let sale = two_item_sale();

        // 02:30 UTC is 23:30 of the previous day in São Paulo.
        let text = format_receipt(&sale, &ReceiptOptions::default());
        assert!(text.contains("📅 Data: 18/10/2026 23:30"));

        let utc = ReceiptOptions {
            utc_offset_minutes: 0,
            ..ReceiptOptions::default()
        };
        assert!(format_receipt(&sale, &utc).contains("19/10/2026 02:30"));
    }

    #[test]
    fn test_receipt_store_name_header() {
        let options = ReceiptOptions {
            store_name: Some("Mercadinho São José".to_string()),
            ..ReceiptOptions::default()
        };
        let text = format_receipt(&two_item_sale(), &options);
        assert!(text.contains("🏪 Mercadinho São José"));

        let text = format_receipt(&two_item_sale(), &ReceiptOptions::default());
        assert!(!text.contains("🏪"));
    }

    #[test]
    fn test_receipt_lists_split_payments() {
        let mut sale = two_item_sale();
        sale.payments = vec![
            Payment {
                method: PaymentMethod::Pix,
                amount_cents: 100_000,
            },
            Payment {
                method: PaymentMethod::Cash,
                amount_cents: 26_798,
            },
        ];

        let text = format_receipt(&sale, &ReceiptOptions::default());
        assert!(text.contains("💳 Pagamento:\n"));
        assert!(text.contains("   • PIX: R$\u{a0}1.000,00"));
        assert!(text.contains("   • Dinheiro: R$\u{a0}267,98"));
    }

    #[test]
    fn test_sanitize_phone() {
        assert_eq!(sanitize_phone("+55 (11) 98765-4321"), "5511987654321");
        assert_eq!(sanitize_phone("abc"), "");
        assert_eq!(sanitize_phone("١٢٣"), "");
    }

    #[test]
    fn test_receipt_link_is_url_safe() {
        let sale = two_item_sale();
        let link = receipt_link(&sale, &ReceiptOptions::default(), "+55 11 98765-4321");

        let (base, query) = link.split_once("?text=").unwrap();
        assert_eq!(base, "https://wa.me/5511987654321");
        assert!(query
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-._~%".contains(c)));

        let decoded = urlencoding::decode(query).unwrap();
        assert_eq!(decoded, format_receipt(&sale, &ReceiptOptions::default()));
    }
}
