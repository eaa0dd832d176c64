use std::io;

use bistro::{catalog::ALL_CATEGORY, prices::format_price, tables};
use clap::Args;
use tabled::builder::Builder;

use super::Till;

#[derive(Debug, Args)]
pub(crate) struct MenuArgs {
    /// Only show products in this category
    #[arg(long, default_value = ALL_CATEGORY)]
    category: String,

    /// Only show products whose name, category, or description contains this text
    #[arg(long, default_value = "")]
    search: String,
}

pub(crate) fn run(args: MenuArgs, till: &Till, out: &mut impl io::Write) -> anyhow::Result<()> {
    let MenuArgs { category, search } = args;

    let categories = till
        .catalog
        .categories()
        .iter()
        .map(|entry| format!("{} {} ({})", entry.icon, entry.name, entry.count))
        .collect::<Vec<_>>()
        .join("  ");

    writeln!(out, "{}", categories.trim())?;

    let mut builder = Builder::default();
    builder.push_record(["Id", "Item", "Category", "Price"]);

    let mut found = 0_usize;

    for product in till.catalog.filter(&category, &search) {
        builder.push_record([
            product.id.clone(),
            format!("{} {}", product.icon, product.name)
                .trim()
                .to_string(),
            product.category.clone(),
            format_price(product.price, till.currency),
        ]);

        found += 1;
    }

    if found == 0 {
        writeln!(
            out,
            "No items found; try adjusting your search or category filter"
        )?;
        return Ok(());
    }

    writeln!(out, "{}", tables::render(builder, 3..4))?;

    Ok(())
}
