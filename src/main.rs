//! Bistro till

use std::io;

use clap::Parser;

use crate::cli::{Cli, logging};

mod cli;

fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    logging::init_subscriber(&cli.logging)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    cli.run(&mut out)
}
