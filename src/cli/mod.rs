use std::{io, rc::Rc};

use anyhow::{Context, anyhow};
use bistro::{
    catalog::Catalog,
    receipt::StoreInfo,
    register::Register,
    storage::{FileStorage, Storage},
};
use clap::{Parser, Subcommand};
use rusty_money::iso::{self, Currency};
use tracing::debug;

use crate::cli::config::{DataConfig, LoggingConfig, StoreConfig};

mod cart;
mod checkout;
pub(crate) mod config;
mod dashboard;
pub(crate) mod logging;
mod menu;
mod orders;

#[derive(Debug, Parser)]
#[command(
    name = "bistro",
    about = "Restaurant point-of-sale till",
    long_about = None
)]
pub(crate) struct Cli {
    /// Data and catalog settings.
    #[command(flatten)]
    data: DataConfig,

    /// Receipt header settings.
    #[command(flatten)]
    store: StoreConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the menu
    Menu(menu::MenuArgs),

    /// Inspect and change the current cart
    Cart(cart::CartCommand),

    /// Place an order for the current cart and print its receipt
    Checkout(checkout::CheckoutArgs),

    /// Review placed orders
    Orders(orders::OrdersCommand),

    /// Sales dashboard
    Dashboard(dashboard::DashboardArgs),
}

/// Everything a command needs to run.
#[derive(Debug)]
pub(crate) struct Till {
    pub(crate) catalog: Catalog,
    pub(crate) register: Register,
    pub(crate) currency: &'static Currency,
    pub(crate) store: StoreInfo,
}

impl Till {
    fn open(data: &DataConfig, store: &StoreConfig) -> anyhow::Result<Self> {
        let catalog = Catalog::from_path(&data.catalog)
            .with_context(|| format!("failed to load catalog {}", data.catalog.display()))?;

        let currency = match &data.currency {
            Some(code) => iso::find(code.trim()).ok_or_else(|| anyhow!("unknown currency {code}"))?,
            None => catalog.currency(),
        };

        let storage: Rc<dyn Storage> = Rc::new(FileStorage::new(&data.data_dir));

        debug!(
            data_dir = %data.data_dir.display(),
            currency = currency.iso_alpha_code,
            "opened till"
        );

        Ok(Self {
            catalog,
            register: Register::persisted(storage),
            currency,
            store: store.store_info(),
        })
    }
}

impl Cli {
    pub(crate) fn run(self, out: &mut impl io::Write) -> anyhow::Result<()> {
        let mut till = Till::open(&self.data, &self.store)?;

        match self.command {
            Commands::Menu(args) => menu::run(args, &till, out),
            Commands::Cart(command) => cart::run(command, &mut till, out),
            Commands::Checkout(args) => checkout::run(args, &mut till, out),
            Commands::Orders(command) => orders::run(command, &mut till, out),
            Commands::Dashboard(args) => dashboard::run(args, &till, out),
        }
    }
}
