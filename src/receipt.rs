//! Receipt
//!
//! Terminal rendering of an order summary: one row per cart line followed by the summary
//! figures from a [`PriceBreakdown`].

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{items::CartItem, money::Amount, pricing::PriceBreakdown};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("failed to write receipt")]
    IO(#[from] io::Error),
}

/// Cart lines together with their priced summary.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutSummary<'a> {
    items: &'a [CartItem],
    breakdown: &'a PriceBreakdown,
}

impl<'a> CheckoutSummary<'a> {
    /// Pair cart lines with their breakdown.
    pub fn new(items: &'a [CartItem], breakdown: &'a PriceBreakdown) -> Self {
        Self { items, breakdown }
    }

    /// Write the receipt.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "Item",
            "Variation",
            "Qty",
            "Unit Price",
            "Line Total",
            "Discount",
        ]);

        for item in self.items {
            builder.push_record([
                item.name().to_string(),
                item.variation(),
                item.quantity().to_string(),
                item.price().to_string(),
                item.line_total().to_string(),
                discount_cell(item.discount()),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..6), Alignment::right());

        writeln!(out, "\n{table}")?;

        write_summary(&mut out, self.breakdown)
    }
}

fn discount_cell(discount: &Amount) -> String {
    if discount.is_zero() {
        String::new()
    } else {
        format!("-{discount}")
    }
}

fn write_summary(
    out: &mut impl io::Write,
    breakdown: &PriceBreakdown,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    for (label, value) in summary_rows(breakdown) {
        builder.push_record([label.to_string(), value]);
    }

    let mut table = builder.build();

    table.with(Style::blank());
    table.modify(Columns::new(0..2), Alignment::right());
    table.modify(Rows::last(), Color::BOLD);

    writeln!(out, "{table}\n")?;

    Ok(())
}

/// Summary rows in display order. Optional charges only appear when non-zero; shipping always
/// appears and reads "Free" when waived.
fn summary_rows(breakdown: &PriceBreakdown) -> Vec<(&'static str, String)> {
    let mut rows = vec![("Subtotal:", breakdown.subtotal.to_string())];

    if !breakdown.product_discount.is_zero() {
        rows.push(("Product discount:", format!("-{}", breakdown.product_discount)));
    }

    if breakdown.has_free_shipping() {
        rows.push(("Shipping:", "Free".to_string()));
    } else {
        rows.push(("Shipping:", breakdown.shipping.to_string()));
    }

    if !breakdown.cod_charge.is_zero() {
        rows.push(("COD charge:", breakdown.cod_charge.to_string()));
    }

    if !breakdown.gift_wrap.is_zero() {
        rows.push(("Gift wrap:", breakdown.gift_wrap.to_string()));
    }

    if !breakdown.coupon_discount.is_zero() {
        rows.push(("Coupon:", format!("-{}", breakdown.coupon_discount)));
    }

    rows.push(("Total:", breakdown.total.to_string()));

    rows
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use crate::{
        gift_wrap::GiftWrap,
        payment::PaymentMethod,
        pricing::{PricingInput, PricingPolicy, price_checkout},
    };

    use super::*;

    fn render(items: &[CartItem], breakdown: &PriceBreakdown) -> TestResult<String> {
        let mut out = Vec::new();

        CheckoutSummary::new(items, breakdown).write_to(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn renders_lines_and_summary() -> TestResult {
        let bralette =
            CartItem::new("sku", "Lace Bralette", Money::from_minor(100_000, iso::INR), 2)?;
        let items = [bralette.with_size("M").with_color("Black")];

        let input = PricingInput::new(&items).with_payment_method(PaymentMethod::Cod);
        let breakdown = price_checkout(&PricingPolicy::default(), &input)?;
        let output = render(&items, &breakdown)?;

        assert!(output.contains("Lace Bralette"));
        assert!(output.contains("M / Black"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Shipping:"));
        assert!(output.contains("Free"));
        assert!(output.contains("COD charge:"));
        assert!(output.contains("Total:"));
        assert!(!output.contains("Coupon:"));
        assert!(!output.contains("Gift wrap:"));

        Ok(())
    }

    #[test]
    fn renders_coupon_and_discount_rows_when_present() -> TestResult {
        let robe = CartItem::new("sku", "Silk Robe", Money::from_minor(30_000, iso::INR), 1)?;
        let items = [robe.with_discount(Money::from_minor(5_000, iso::INR))?];

        let input = PricingInput::new(&items)
            .with_coupon_discount(Some(Money::from_minor(2_000, iso::INR)));
        let breakdown = price_checkout(&PricingPolicy::default(), &input)?;
        let output = render(&items, &breakdown)?;

        assert!(output.contains("Product discount:"));
        assert!(output.contains("Coupon:"));
        assert!(!output.contains("Free"));

        Ok(())
    }

    #[test]
    fn summary_rows_follow_pricing_order() -> TestResult {
        let robe = CartItem::new("sku", "Silk Robe", Money::from_minor(30_000, iso::INR), 1)?;
        let items = [robe.with_discount(Money::from_minor(5_000, iso::INR))?];
        let wrap = GiftWrap::new("gw", "Ribbon", Money::from_minor(4_900, iso::INR), None)?;

        let input = PricingInput::new(&items)
            .with_payment_method(PaymentMethod::Cod)
            .with_gift_wrap(Some(&wrap))
            .with_coupon_discount(Some(Money::from_minor(2_000, iso::INR)));
        let breakdown = price_checkout(&PricingPolicy::default(), &input)?;

        let labels: Vec<&str> = summary_rows(&breakdown)
            .into_iter()
            .map(|(label, _)| label)
            .collect();

        assert_eq!(
            labels,
            [
                "Subtotal:",
                "Product discount:",
                "Shipping:",
                "COD charge:",
                "Gift wrap:",
                "Coupon:",
                "Total:",
            ]
        );

        Ok(())
    }

    #[test]
    fn summary_total_is_last_and_signed() -> TestResult {
        let items = [CartItem::new("sku", "Slip", Money::from_minor(10_000, iso::INR), 1)?];
        let input = PricingInput::new(&items)
            .with_coupon_discount(Some(Money::from_minor(20_000, iso::INR)));
        let breakdown = price_checkout(&PricingPolicy::default(), &input)?;
        let rows = summary_rows(&breakdown);

        assert_eq!(rows.last().map(|(label, _)| *label), Some("Total:"));
        assert!(rows.iter().any(|(label, value)| *label == "Coupon:" && value.starts_with('-')));

        Ok(())
    }
}
