use std::io;

use bistro::{checkout::GUEST, orders::PaymentMethod, receipt::Receipt};
use clap::Args;
use jiff::Zoned;
use tracing::info;

use super::Till;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name
    #[arg(short, long, default_value = GUEST)]
    customer: String,

    /// Payment method (cash, card, mobile)
    #[arg(short, long, default_value = "cash")]
    payment: PaymentMethod,
}

pub(crate) fn run(
    args: CheckoutArgs,
    till: &mut Till,
    out: &mut impl io::Write,
) -> anyhow::Result<()> {
    let CheckoutArgs { customer, payment } = args;
    let order = till.register.checkout(&customer, payment, &Zoned::now())?;

    info!(order = %order.order_number, "checked out");

    Receipt::from_order(&order).write_to(out, &till.store, till.currency)?;

    Ok(())
}
