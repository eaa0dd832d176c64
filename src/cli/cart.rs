use std::io;

use anyhow::anyhow;
use bistro::{
    cart::Cart, discounts::DiscountPercent, prices::format_price, pricing::TAX_RATE, tables,
};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::builder::Builder;

use super::Till;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart and its totals
    Show,

    /// Add a menu product to the cart
    Add {
        /// Product id
        product: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Kitchen note; noted lines are kept apart from plain ones
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Set the quantity of a line; zero or less removes it
    Quantity {
        /// Line id
        line: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a line
    Remove {
        /// Line id
        line: String,
    },

    /// Empty the cart
    Clear,

    /// Set the cart-wide discount percentage (0 clears it)
    Discount {
        /// Percentage, e.g. `10` or `12.5%`
        #[arg(allow_negative_numbers = true)]
        percent: String,
    },

    /// Set the discount percentage of one line (0 clears it)
    ItemDiscount {
        /// Line id
        line: String,

        /// Percentage, e.g. `10` or `12.5%`
        #[arg(allow_negative_numbers = true)]
        percent: String,
    },
}

pub(crate) fn run(
    command: CartCommand,
    till: &mut Till,
    out: &mut impl io::Write,
) -> anyhow::Result<()> {
    let cart = till.register.cart_store();

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add {
            product,
            quantity,
            notes,
        } => {
            let product = till
                .catalog
                .product(&product)
                .ok_or_else(|| anyhow!("no product {product} on the menu"))?;

            cart.try_update(|cart| cart.add(product, quantity, notes).map(|_line| ()))?;
        }
        CartSubcommand::Quantity { line, quantity } => {
            cart.try_update(|cart| cart.update_quantity(&line, quantity))?;
        }
        CartSubcommand::Remove { line } => {
            cart.try_update(|cart| cart.remove(&line).map(|_line| ()))?;
        }
        CartSubcommand::Clear => cart.update(Cart::clear),
        CartSubcommand::Discount { percent } => {
            cart.update(|cart| cart.set_cart_discount(DiscountPercent::parse(&percent)));
        }
        CartSubcommand::ItemDiscount { line, percent } => {
            cart.try_update(|cart| {
                cart.set_item_discount(&line, DiscountPercent::parse(&percent))
            })?;
        }
    }

    write_cart(out, till.register.cart(), till.currency)
}

pub(crate) fn write_cart(
    out: &mut impl io::Write,
    cart: &Cart,
    currency: &'static Currency,
) -> anyhow::Result<()> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Line", "Item", "Qty", "Price", "Discount", "Total"]);

    for item in cart.iter() {
        let name = match &item.notes {
            Some(notes) => format!("{}\n  {notes}", item.name),
            None => item.name.clone(),
        };

        builder.push_record([
            item.id.clone(),
            name,
            item.quantity.to_string(),
            format_price(item.price, currency),
            if item.discount.is_zero() {
                String::new()
            } else {
                item.discount.to_string()
            },
            format_price(item.net(), currency),
        ]);
    }

    writeln!(out, "{}", tables::render(builder, 2..6))?;

    let totals = cart.totals();
    let tax_percent = (TAX_RATE * Decimal::ONE_HUNDRED).normalize();
    let price = |amount| format_price(amount, currency);

    let (lines, units) = (cart.total_items(), cart.total_quantity());
    writeln!(out, "{lines} lines, {units} items")?;
    writeln!(out, "Subtotal: {}", price(totals.subtotal))?;

    if !totals.item_discounts.is_zero() {
        writeln!(out, "Item discounts: -{}", price(totals.item_discounts))?;
    }

    let cart_discount = cart.cart_discount();
    if !cart_discount.is_zero() {
        let amount = price(totals.cart_discount_amount);
        writeln!(out, "Cart discount ({cart_discount}): -{amount}")?;
    }

    writeln!(out, "Tax ({tax_percent}%): {}", price(totals.tax))?;
    writeln!(out, "Total: {}", price(totals.total))?;

    Ok(())
}
