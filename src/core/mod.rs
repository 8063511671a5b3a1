pub mod export;
pub mod fetcher;
pub mod filter;
pub mod mapper;
pub mod schema;
pub mod species;

pub use crate::domain::model::{Catalog, CatalogRecord, FilterCriteria};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, FailurePolicy, Storage};
pub use crate::utils::error::Result;
