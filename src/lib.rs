pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::PokeApiSource;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    export::OutputFormat,
    fetcher::{CatalogFetcher, FetchOptions},
    filter::apply_filters,
};
pub use domain::model::{
    Catalog, CatalogEntry, CatalogRecord, Category, FilterCriteria, Rarity, Stat,
};
pub use domain::ports::FailurePolicy;
pub use utils::error::{CatalogError, Result};
