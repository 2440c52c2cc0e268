pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{Backends, MemoryStore, SqliteStore, StaticCatalog};
pub use crate::api::{router, start_server};
pub use crate::config::SiteConfig;
pub use crate::core::{catalog::CatalogService, reviews::ReviewService, SiteServices};
pub use crate::utils::error::{Result, SiteError};
