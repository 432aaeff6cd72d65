use crate::api::{ApiClient, ApiResponse};
use crate::models::budget::BudgetAllocation;
use crate::models::dashboard::DashboardSummary;

#[derive(Clone)]
pub struct DashboardService {
    api: ApiClient,
}

impl DashboardService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn summary(&self) -> ApiResponse<DashboardSummary> {
        self.api.get("/dashboard/summary", &[]).await
    }

    /// Current month's 50/30/20 allocation.
    pub async fn budget(&self) -> ApiResponse<BudgetAllocation> {
        self.api.get("/dashboard/budget", &[]).await
    }
}
