//! Till configuration

use std::path::PathBuf;

use bistro::receipt::StoreInfo;
use clap::Args;

/// Where the till keeps its data.
#[derive(Debug, Args)]
pub(crate) struct DataConfig {
    /// Directory the cart and order history are persisted in
    #[arg(long, env = "BISTRO_DATA_DIR", default_value = ".bistro")]
    pub data_dir: PathBuf,

    /// Menu catalog (YAML)
    #[arg(long, env = "BISTRO_CATALOG", default_value = "fixtures/menu.yml")]
    pub catalog: PathBuf,

    /// ISO currency code prices are displayed in; defaults to the catalog's currency
    #[arg(long, env = "BISTRO_CURRENCY")]
    pub currency: Option<String>,
}

/// Receipt header settings.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// Restaurant name
    #[arg(long, env = "BISTRO_STORE_NAME", default_value = "RestaurantPOS")]
    pub store_name: String,

    /// Restaurant address
    #[arg(long, env = "BISTRO_STORE_ADDRESS", default_value = "123 Main Street")]
    pub store_address: String,

    /// Restaurant phone number
    #[arg(long, env = "BISTRO_STORE_PHONE", default_value = "(555) 123-4567")]
    pub store_phone: String,
}

impl StoreConfig {
    pub(crate) fn store_info(&self) -> StoreInfo {
        StoreInfo {
            name: self.store_name.clone(),
            address: self.store_address.clone(),
            phone: self.store_phone.clone(),
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact
    )]
    pub log_format: LogFormat,
}
