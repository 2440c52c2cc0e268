use crate::domain::model::{NewReview, Plan, Review};
use crate::domain::ports::{PlanStore, ReviewStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    plans: Vec<Plan>,
    reviews: Vec<Review>,
    next_review_id: i64,
}

/// In-process storage backend. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plans(plans: Vec<Plan>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables {
                plans,
                ..Tables::default()
            })),
        }
    }

    pub async fn review_count(&self) -> usize {
        self.tables.lock().await.reviews.len()
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn list_plans(&self) -> Result<Vec<Plan>> {
        Ok(self.tables.lock().await.plans.clone())
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn list_reviews(&self, limit: Option<usize>) -> Result<Vec<Review>> {
        let tables = self.tables.lock().await;
        let mut reviews = tables.reviews.clone();
        reviews.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        if let Some(limit) = limit {
            reviews.truncate(limit);
        }
        Ok(reviews)
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review> {
        let mut tables = self.tables.lock().await;
        tables.next_review_id += 1;
        let stored = review.into_review(tables.next_review_id);
        tables.reviews.push(stored.clone());
        Ok(stored)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
