//! # Sales Reports
//!
//! Aggregates over the sale history: revenue, profit, units and a
//! breakdown by payment method.
//!
//! ```text
//! sales ──► DateRange filter [from, to) ──► SalesReport
//!                                            ├── sale_count, units_sold
//!                                            ├── revenue, profit, average ticket
//!                                            └── by_payment_method[Cash, Pix, Credit, Debit]
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{PaymentMethod, Sale};

/// A half-open time window over sale timestamps: `from` inclusive, `to`
/// exclusive. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "Option<String>")]
    pub from: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// The whole history.
    pub fn all() -> Self {
        DateRange::default()
    }

    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        DateRange { from, to }
    }

    /// Whether `timestamp` falls inside the window.
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| *timestamp >= from)
            && self.to.map_or(true, |to| *timestamp < to)
    }
}

/// Amount taken with one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentMethodTotal {
    pub method: PaymentMethod,
    /// Sales in which this method was used at least once.
    pub sale_count: usize,
    pub amount_cents: i64,
}

/// Summary of the sales inside a [`DateRange`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesReport {
    pub range: DateRange,
    pub sale_count: usize,
    #[ts(type = "number")]
    pub units_sold: u64,
    pub revenue_cents: i64,
    pub profit_cents: i64,
    /// Revenue / sale count, rounded down. Zero when there are no sales.
    pub average_ticket_cents: i64,
    /// One entry per method, in [`PaymentMethod::ALL`] order.
    pub by_payment_method: Vec<PaymentMethodTotal>,
}

impl SalesReport {
    /// Builds a report over the sales whose timestamp lies in `range`.
    ///
    /// Split sales contribute each payment's own amount to its method;
    /// single-method sales contribute their full total.
    pub fn from_sales<'a, I>(sales: I, range: DateRange) -> Self
    where
        I: IntoIterator<Item = &'a Sale>,
    {
        let mut sale_count = 0usize;
        let mut units_sold = 0u64;
        let mut revenue = Money::zero();
        let mut profit = Money::zero();
        let mut by_method: Vec<PaymentMethodTotal> = PaymentMethod::ALL
            .iter()
            .map(|&method| PaymentMethodTotal {
                method,
                sale_count: 0,
                amount_cents: 0,
            })
            .collect();

        for sale in sales.into_iter().filter(|s| range.contains(&s.timestamp)) {
            sale_count += 1;
            units_sold += sale.units();
            revenue += sale.total();
            profit += sale.profit();

            let mut used = [false; 4];
            if sale.is_split() {
                for payment in &sale.payments {
                    let idx = method_index(payment.method);
                    by_method[idx].amount_cents =
                        by_method[idx].amount_cents.saturating_add(payment.amount_cents);
                    used[idx] = true;
                }
            } else {
                let idx = method_index(sale.payment_method);
                by_method[idx].amount_cents = by_method[idx].amount_cents.saturating_add(sale.total_cents);
                used[idx] = true;
            }
            for (entry, was_used) in by_method.iter_mut().zip(used) {
                if was_used {
                    entry.sale_count += 1;
                }
            }
        }

        let average_ticket_cents = if sale_count == 0 {
            0
        } else {
            revenue.cents() / sale_count as i64
        };

        SalesReport {
            range,
            sale_count,
            units_sold,
            revenue_cents: revenue.cents(),
            profit_cents: profit.cents(),
            average_ticket_cents,
            by_payment_method: by_method,
        }
    }

    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }

    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }
}

fn method_index(method: PaymentMethod) -> usize {
    match method {
        PaymentMethod::Cash => 0,
        PaymentMethod::Pix => 1,
        PaymentMethod::CreditCard => 2,
        PaymentMethod::DebitCard => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::types::{Payment, Product};
    use chrono::TimeZone;

    fn sale(id: &str, total: i64, profit: i64, qty: u32, day: u32) -> Sale {
        let product = Product {
            id: format!("p-{}", id),
            name: "Item".to_string(),
            sku: "IT-1".to_string(),
            cost_price_cents: 0,
            sale_price_cents: total / i64::from(qty),
            stock: 0,
            category: String::new(),
        };
        Sale {
            id: id.to_string(),
            items: vec![CartItem::new(&product, qty)],
            total_cents: total,
            profit_cents: profit,
            payment_method: PaymentMethod::Cash,
            payments: Vec::new(),
            timestamp: Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_report() {
        let report = SalesReport::from_sales(&[], DateRange::all());
        assert_eq!(report.sale_count, 0);
        assert_eq!(report.average_ticket_cents, 0);
        assert_eq!(report.by_payment_method.len(), 4);
    }

    #[test]
    fn test_report_totals() {
        let sales = vec![sale("a", 1798, 698, 2, 1), sale("b", 1000, 400, 4, 2)];
        let report = SalesReport::from_sales(&sales, DateRange::all());

        assert_eq!(report.sale_count, 2);
        assert_eq!(report.units_sold, 6);
        assert_eq!(report.revenue_cents, 2798);
        assert_eq!(report.profit_cents, 1098);
        assert_eq!(report.average_ticket_cents, 1399);
        assert_eq!(report.by_payment_method[0].amount_cents, 2798);
        assert_eq!(report.by_payment_method[0].sale_count, 2);
    }

    #[test]
    fn test_range_is_inclusive_exclusive() {
        let sales = vec![
            sale("a", 100, 10, 1, 1),
            sale("b", 200, 20, 1, 2),
            sale("c", 300, 30, 1, 3),
        ];
        let range = DateRange::new(
            Some(Utc.with_ymd_and_hms(2026, 10, 2, 12, 0, 0).unwrap()),
            Some(Utc.with_ymd_and_hms(2026, 10, 3, 12, 0, 0).unwrap()),
        );
        let report = SalesReport::from_sales(&sales, range);

        assert_eq!(report.sale_count, 1);
        assert_eq!(report.revenue_cents, 200);
    }

    #[test]
    fn test_split_payments_counted_by_amount() {
        let mut split = sale("a", 5000, 1000, 1, 1);
        split.payment_method = PaymentMethod::Pix;
        split.payments = vec![
            Payment {
                method: PaymentMethod::Pix,
                amount_cents: 3000,
            },
            Payment {
                method: PaymentMethod::DebitCard,
                amount_cents: 2000,
            },
        ];

        let report = SalesReport::from_sales(&[split], DateRange::all());
        let pix = &report.by_payment_method[1];
        let debit = &report.by_payment_method[3];

        assert_eq!(pix.amount_cents, 3000);
        assert_eq!(pix.sale_count, 1);
        assert_eq!(debit.amount_cents, 2000);
        assert_eq!(report.by_payment_method[0].sale_count, 0);
    }
}
