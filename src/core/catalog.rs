use crate::core::{Plan, PlanStore, Result};
use std::sync::Arc;

/// Serves the subscription plans from whichever source the deployment chose.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn PlanStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self { store }
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>> {
        let plans = self.store.list_plans().await?;
        tracing::debug!("Listed {} plans", plans.len());
        Ok(plans)
    }
}
