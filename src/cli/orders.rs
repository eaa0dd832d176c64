use std::io;

use anyhow::anyhow;
use bistro::{
    orders::{Order, OrderHistory, OrderId, OrderStatus},
    prices::format_price,
    receipt::Receipt,
    tables,
};
use clap::{Args, Subcommand};
use tabled::builder::Builder;

use super::Till;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, newest first
    List {
        /// Only list orders with this status (completed, pending, cancelled)
        #[arg(long)]
        status: Option<OrderStatus>,
    },

    /// Change the status of an order
    Status {
        /// Order id or order number
        order: String,

        /// New status (completed, pending, cancelled)
        status: OrderStatus,
    },

    /// Print the receipt of an order
    Receipt {
        /// Order id or order number
        order: String,
    },
}

pub(crate) fn run(
    command: OrdersCommand,
    till: &mut Till,
    out: &mut impl io::Write,
) -> anyhow::Result<()> {
    match command.command {
        OrdersSubcommand::List { status } => write_orders(out, till, status),
        OrdersSubcommand::Status { order, status } => {
            let id = find_order(till.register.orders(), &order)?.id;

            till.register.update_order_status(id, status)?;

            writeln!(out, "{order} is now {status}")?;

            Ok(())
        }
        OrdersSubcommand::Receipt { order } => {
            let order = find_order(till.register.orders(), &order)?;

            Receipt::from_order(order).write_to(out, &till.store, till.currency)?;

            Ok(())
        }
    }
}

fn find_order<'a>(history: &'a OrderHistory, needle: &str) -> anyhow::Result<&'a Order> {
    let by_id = needle
        .parse::<OrderId>()
        .ok()
        .and_then(|id| history.get(id));

    by_id
        .or_else(|| history.find_by_number(needle))
        .ok_or_else(|| anyhow!("no order {needle}"))
}

fn write_orders(
    out: &mut impl io::Write,
    till: &Till,
    status: Option<OrderStatus>,
) -> anyhow::Result<()> {
    let mut builder = Builder::default();
    builder.push_record([
        "Order", "Date", "Time", "Customer", "Items", "Total", "Payment", "Status",
    ]);

    let orders = till
        .register
        .orders()
        .iter()
        .filter(|order| status.is_none_or(|status| order.status == status));

    let mut listed = 0_usize;

    for order in orders {
        let units: u64 = order
            .items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum();

        builder.push_record([
            order.order_number.to_string(),
            order.date.clone(),
            order.time.clone(),
            order.customer_name.clone(),
            units.to_string(),
            format_price(order.total, till.currency),
            order.payment_method.label().to_string(),
            order.status.to_string(),
        ]);

        listed += 1;
    }

    if listed == 0 {
        writeln!(out, "No orders yet")?;
        return Ok(());
    }

    writeln!(out, "{}", tables::render(builder, 4..6))?;

    Ok(())
}
