// Adapters layer: concrete storage backends behind the domain ports.

pub mod memory;
pub mod sqlite;
pub mod static_catalog;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use static_catalog::{default_plans, StaticCatalog};

use crate::config::toml_config::{CatalogSource, SiteConfig, StorageBackend};
use crate::domain::ports::{PlanStore, ReviewStore};
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use std::sync::Arc;

/// The storage handles one deployment runs with.
#[derive(Clone)]
pub struct Backends {
    pub plans: Arc<dyn PlanStore>,
    pub reviews: Arc<dyn ReviewStore>,
}

/// Builds the configured backends. Exactly one plan source is chosen.
pub async fn connect(config: &SiteConfig) -> Result<Backends> {
    let static_catalog = || -> Arc<dyn PlanStore> {
        Arc::new(StaticCatalog::new(config.catalog.plans_or_default()))
    };

    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            let (store, plans) = match config.catalog.source {
                CatalogSource::Static => (MemoryStore::new(), static_catalog()),
                CatalogSource::Storage => {
                    let store = MemoryStore::with_plans(default_plans());
                    let plans: Arc<dyn PlanStore> = Arc::new(store.clone());
                    (store, plans)
                }
            };
            Ok(Backends {
                plans,
                reviews: Arc::new(store),
            })
        }
        StorageBackend::Sqlite => {
            let path = validate_required_field("storage.path", &config.storage.path)?;
            tracing::info!("Using libSQL storage at {}", path);
            let store = Arc::new(SqliteStore::open(path).await?);
            let plans: Arc<dyn PlanStore> = match config.catalog.source {
                CatalogSource::Static => static_catalog(),
                CatalogSource::Storage => store.clone(),
            };
            Ok(Backends {
                plans,
                reviews: store,
            })
        }
    }
}
