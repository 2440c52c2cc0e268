pub mod catalog;
pub mod reviews;

pub use crate::domain::model::{NewReview, Plan, Rating, Review};
pub use crate::domain::ports::{ConfigProvider, PlanStore, ReviewStore};
pub use crate::utils::error::Result;

use crate::adapters::Backends;
use catalog::CatalogService;
use reviews::ReviewService;

/// Everything a request handler needs, shared across requests.
#[derive(Clone)]
pub struct SiteServices {
    pub catalog: CatalogService,
    pub reviews: ReviewService,
}

impl SiteServices {
    pub fn new<C: ConfigProvider>(backends: Backends, config: &C) -> Self {
        Self {
            catalog: CatalogService::new(backends.plans),
            reviews: ReviewService::new(
                backends.reviews,
                config.default_author(),
                config.public_review_limit(),
            ),
        }
    }
}
