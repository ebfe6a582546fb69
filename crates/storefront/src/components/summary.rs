//! Order summary: subtotal, tax, shipping, discounts and total.
//!
//! Every figure is taken from the backend as is. Nothing is added up here,
//! so the total shown is always the one the backend will charge.

use askama::Template;
use bolt_core::Price;

use crate::commerce::{MinorUnits, Order};

/// A labelled amount in the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: String,
    pub amount: String,
}

/// Order summary component.
#[derive(Debug, Clone, Template)]
#[template(path = "components/order_summary.html")]
pub struct OrderSummary {
    pub subtotal: String,
    /// First tax line: rate label and amount.
    pub tax: Option<SummaryRow>,
    pub shipping: String,
    pub discounts: Vec<SummaryRow>,
    pub total: String,
}

impl OrderSummary {
    /// Build the summary from the order's backend totals.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        let price = |amount: MinorUnits| Price::from_minor(amount, order.currency_code).display();

        Self {
            subtotal: price(order.sub_total_with_tax),
            tax: order.tax_summary.first().map(|line| SummaryRow {
                label: format!("{} ({}%)", line.description, line.tax_rate),
                amount: price(line.tax_total),
            }),
            shipping: price(order.shipping_with_tax),
            discounts: order
                .discounts
                .iter()
                .map(|discount| SummaryRow {
                    label: discount.description.clone(),
                    amount: price(discount.amount_with_tax),
                })
                .collect(),
            total: price(order.total_with_tax),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commerce::memory::order_with_lines;
    use crate::commerce::{Discount, TaxLine};

    #[test]
    fn test_single_line_without_shipping_or_tax() {
        let summary = OrderSummary::from_order(&order_with_lines(&[(2, 9975)]));

        assert_eq!(summary.subtotal, "199.50 Ft");
        assert_eq!(summary.total, "199.50 Ft");
        assert_eq!(summary.shipping, "0.00 Ft");
        assert!(summary.tax.is_none());
    }

    #[test]
    fn test_total_is_backend_value_not_recomputed() {
        let mut order = order_with_lines(&[(1, 1000)]);
        // Deliberately inconsistent: the summary must still show the backend total.
        order.total_with_tax = MinorUnits::new(1234);

        let summary = OrderSummary::from_order(&order);
        assert_eq!(summary.total, "12.34 Ft");
    }

    #[test]
    fn test_first_tax_line_and_discounts() {
        let mut order = order_with_lines(&[(1, 12700)]);
        order.tax_summary = vec![
            TaxLine {
                description: "ÁFA".to_string(),
                tax_rate: 27.0,
                tax_base: MinorUnits::new(10000),
                tax_total: MinorUnits::new(2700),
            },
            TaxLine {
                description: "Reduced".to_string(),
                tax_rate: 5.0,
                tax_base: MinorUnits::ZERO,
                tax_total: MinorUnits::ZERO,
            },
        ];
        order.discounts = vec![Discount {
            description: "Welcome".to_string(),
            amount_with_tax: MinorUnits::new(-500),
        }];

        let summary = OrderSummary::from_order(&order);
        let tax = summary.tax.clone().unwrap();
        assert_eq!(tax.label, "ÁFA (27%)");
        assert_eq!(tax.amount, "27.00 Ft");
        assert_eq!(summary.discounts[0].amount, "-5.00 Ft");

        let html = summary.render().unwrap();
        assert!(html.contains("Welcome"));
        assert!(!html.contains("Reduced"));
    }
}
