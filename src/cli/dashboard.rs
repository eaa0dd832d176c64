use std::io;

use bistro::{analytics::AnalyticsSnapshot, prices::format_price, tables};
use clap::Args;
use jiff::Zoned;
use rusty_money::iso::Currency;
use tabled::builder::Builder;

use super::Till;

#[derive(Debug, Args)]
pub(crate) struct DashboardArgs {
    /// Print the raw figures as JSON
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(
    args: DashboardArgs,
    till: &Till,
    out: &mut impl io::Write,
) -> anyhow::Result<()> {
    let DashboardArgs { json } = args;
    let snapshot = till.register.analytics(&Zoned::now());

    if json {
        serde_json::to_writer_pretty(&mut *out, &snapshot)?;
        writeln!(out)?;

        return Ok(());
    }

    write_dashboard(out, &snapshot, till.currency)
}

fn write_dashboard(
    out: &mut impl io::Write,
    snapshot: &AnalyticsSnapshot,
    currency: &'static Currency,
) -> anyhow::Result<()> {
    let price = |amount| format_price(amount, currency);

    writeln!(out, "Total sales:     {}", price(snapshot.total_sales))?;
    writeln!(out, "Total orders:    {}", snapshot.total_orders)?;
    writeln!(
        out,
        "Average order:   {}",
        price(snapshot.average_order_value)
    )?;
    writeln!(out, "Customers:       {}", snapshot.customer_count())?;

    let mut days = Builder::default();
    days.push_record(["Day", "Orders", "Sales"]);

    for day in &snapshot.sales_by_day {
        days.push_record([
            day.date.strftime("%a %-m/%-d").to_string(),
            day.orders.to_string(),
            price(day.sales),
        ]);
    }

    writeln!(out, "\nSales, last 7 days\n{}", tables::render(days, 1..3))?;

    if !snapshot.top_products.is_empty() {
        let mut products = Builder::default();
        products.push_record(["Product", "Sold", "Revenue"]);

        for product in &snapshot.top_products {
            products.push_record([
                product.name.clone(),
                product.quantity.to_string(),
                price(product.revenue),
            ]);
        }

        writeln!(out, "\nTop products\n{}", tables::render(products, 1..3))?;
    }

    if !snapshot.top_customers.is_empty() {
        let mut customers = Builder::default();
        customers.push_record(["Customer", "Orders", "Spent"]);

        for customer in &snapshot.top_customers {
            customers.push_record([
                customer.name.clone(),
                customer.orders.to_string(),
                price(customer.total),
            ]);
        }

        writeln!(out, "\nTop customers\n{}", tables::render(customers, 1..3))?;
    }

    if !snapshot.sales_by_payment_method.is_empty() {
        let mut methods = Builder::default();
        methods.push_record(["Payment", "Orders", "Amount"]);

        for method in &snapshot.sales_by_payment_method {
            methods.push_record([
                method.method.label().to_string(),
                method.count.to_string(),
                price(method.amount),
            ]);
        }

        writeln!(out, "\nPayment methods\n{}", tables::render(methods, 1..3))?;
    }

    Ok(())
}
