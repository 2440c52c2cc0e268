use crate::domain::model::{NewReview, Plan, Review};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read access to the plan catalog.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Every plan in canonical display order.
    async fn list_plans(&self) -> Result<Vec<Plan>>;
}

/// Read/insert access to the review board.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Reviews newest first, ties broken by descending id. `None` means no limit.
    async fn list_reviews(&self, limit: Option<usize>) -> Result<Vec<Review>>;

    /// Inserts exactly one review and returns it with its assigned id.
    async fn insert_review(&self, review: NewReview) -> Result<Review>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn allowed_origins(&self) -> &[String];
    fn default_author(&self) -> &str;
    fn public_review_limit(&self) -> usize;
}
