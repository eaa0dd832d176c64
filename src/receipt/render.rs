//! Plain-text receipt layout

use std::io;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::builder::Builder;

use super::{Receipt, ReceiptError, ReceiptLine, StoreInfo};
use crate::{
    prices::format_price,
    pricing::TAX_RATE,
    tables::{self, display_width},
};

pub(super) fn write_receipt(
    out: &mut impl io::Write,
    receipt: &Receipt,
    store: &StoreInfo,
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let table = item_table(receipt.lines(), currency);
    let width = table.lines().map(display_width).max().unwrap_or_default();

    write_centered(out, &store.name, width)?;
    write_centered(out, &store.address, width)?;
    write_centered(out, &format!("Phone: {}", store.phone), width)?;
    writeln!(out)?;

    writeln!(out, "Order: {}", receipt.order_number())?;
    writeln!(out, "Date: {} {}", receipt.date(), receipt.time())?;
    writeln!(out, "Customer: {}", receipt.customer_name())?;
    writeln!(out, "Payment: {}", receipt.payment_method().label())?;

    writeln!(out, "\n{table}\n")?;

    write_totals(out, receipt, currency, width)?;

    writeln!(out)?;
    write_centered(out, "Thank you for your order!", width)?;
    write_centered(out, "Please come again", width)?;

    Ok(())
}

fn item_table(lines: &[ReceiptLine], currency: &'static Currency) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Qty", "Price", "Total"]);

    for line in lines {
        builder.push_record([
            item_cell(line),
            line.quantity.to_string(),
            format_price(line.unit_price, currency),
            format_price(line.total, currency),
        ]);
    }

    tables::render(builder, 1..4)
}

fn item_cell(line: &ReceiptLine) -> String {
    let mut cell = line.name.clone();

    if let Some(notes) = &line.notes {
        cell.push_str("\n  ");
        cell.push_str(notes);
    }

    if !line.discount.is_zero() {
        cell.push_str(&format!("\n  {} OFF", line.discount));
    }

    cell
}

fn write_totals(
    out: &mut impl io::Write,
    receipt: &Receipt,
    currency: &'static Currency,
    width: usize,
) -> Result<(), ReceiptError> {
    let totals = receipt.totals();
    let tax_label = format!("Tax ({}%):", (TAX_RATE * Decimal::ONE_HUNDRED).normalize());

    let mut rows = vec![(
        "Subtotal:".to_string(),
        format_price(totals.subtotal, currency),
    )];

    if totals.item_discounts > Decimal::ZERO {
        rows.push((
            "Item Discounts:".to_string(),
            format_price(-totals.item_discounts, currency),
        ));
    }

    if totals.cart_discount > Decimal::ZERO {
        rows.push((
            "Cart Discount:".to_string(),
            format_price(-totals.cart_discount, currency),
        ));
    }

    rows.push((tax_label, format_price(totals.tax, currency)));
    rows.push(("TOTAL:".to_string(), format_price(totals.total, currency)));

    let value_width = rows
        .iter()
        .map(|(_, value)| display_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &rows {
        write_summary_line(out, label, value, width, value_width)?;
    }

    Ok(())
}

/// Writes a line with the label and value pushed to the right edge of the receipt.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    line_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    // 2 chars of spacing between label and value column.
    let label_col_width = line_width.saturating_sub(value_col_width + 2);
    let label_pad = label_col_width.saturating_sub(display_width(label));
    let value_pad = value_col_width.saturating_sub(display_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )?;

    Ok(())
}

fn write_centered(out: &mut impl io::Write, text: &str, width: usize) -> Result<(), ReceiptError> {
    let pad = width.saturating_sub(display_width(text)) / 2;

    writeln!(out, "{:pad$}{text}", "")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;
    use crate::discounts::DiscountPercent;

    fn line(notes: Option<&str>, discount: u8) -> ReceiptLine {
        ReceiptLine {
            name: "Burger".to_string(),
            notes: notes.map(str::to_string),
            discount: DiscountPercent::from(discount),
            quantity: 2,
            unit_price: Decimal::from(10),
            total: Decimal::from(20),
        }
    }

    #[test]
    fn item_cell_lists_notes_and_discount_under_name() {
        assert_eq!(item_cell(&line(None, 0)), "Burger");
        assert_eq!(
            item_cell(&line(Some("no onions"), 15)),
            "Burger\n  no onions\n  15% OFF"
        );
    }

    #[test]
    fn item_table_has_header_and_rounded_prices() {
        let table = item_table(&[line(None, 0)], USD);

        assert!(table.contains("Item"));
        assert!(table.contains("Qty"));
        assert!(table.contains("$10.00"));
        assert!(table.contains("$20.00"));
    }

    #[test]
    fn summary_line_is_right_aligned() -> Result<(), ReceiptError> {
        let mut out = Vec::new();

        write_summary_line(&mut out, "TOTAL:", "$5.00", 20, 6)?;

        assert_eq!(String::from_utf8_lossy(&out), "      TOTAL:   $5.00\n");

        Ok(())
    }

    #[test]
    fn centered_text_is_padded_on_the_left() -> Result<(), ReceiptError> {
        let mut out = Vec::new();

        write_centered(&mut out, "abc", 9)?;

        assert_eq!(String::from_utf8_lossy(&out), "   abc\n");

        Ok(())
    }

    #[test]
    fn wide_characters_are_measured_by_display_width() -> Result<(), ReceiptError> {
        let mut out = Vec::new();

        write_centered(&mut out, "🍔🍔", 10)?;
        write_summary_line(&mut out, "🍔:", "$5.00", 12, 5)?;

        assert_eq!(String::from_utf8_lossy(&out), "   🍔🍔\n  🍔:  $5.00\n");

        Ok(())
    }

    #[test]
    fn totals_line_up_with_an_emoji_item_table() -> Result<(), ReceiptError> {
        let mut noted = line(Some("🔥 extra hot"), 0);
        noted.name = "🍔 Burger".to_string();

        let table = item_table(&[noted, line(None, 0)], USD);
        let widths: Vec<usize> = table.lines().map(display_width).collect();
        let width = widths.iter().copied().max().unwrap_or_default();

        let mut out = Vec::new();
        write_summary_line(&mut out, "TOTAL:", "$20.00", width, 6)?;
        let summary = String::from_utf8_lossy(&out);

        assert!(widths.iter().all(|&line_width| line_width == width));
        assert_eq!(display_width(summary.trim_end_matches('\n')), width);

        Ok(())
    }
}
