use crate::domain::model::Plan;
use crate::domain::ports::PlanStore;
use crate::utils::error::Result;
use async_trait::async_trait;

/// The compiled-in pricing tiers, in display order.
pub fn default_plans() -> Vec<Plan> {
    vec![
        Plan::new("Basic", "$0", &["1 user", "Basic analytics"]),
        Plan::new(
            "Pro",
            "$9.99",
            &["5 users", "Advanced analytics", "Priority support"],
        ),
        Plan::new(
            "Enterprise",
            "$49.99",
            &["Unlimited users", "Full analytics suite", "Dedicated support"],
        ),
    ]
}

/// Plan catalog fixed at deployment time. Never touches storage, never fails.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    plans: Vec<Plan>,
}

impl StaticCatalog {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(default_plans())
    }
}

#[async_trait]
impl PlanStore for StaticCatalog {
    async fn list_plans(&self) -> Result<Vec<Plan>> {
        Ok(self.plans.clone())
    }
}
