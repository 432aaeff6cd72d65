use serde::Serialize;
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::models::budget::BudgetAllocation;
use crate::models::dashboard::DashboardSummary;
use crate::providers::store::{ProviderState, Store};
use crate::services::DashboardService;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardState {
    pub summary: Option<DashboardSummary>,
    pub budget: Option<BudgetAllocation>,
}

#[derive(Clone)]
pub struct DashboardProvider {
    service: DashboardService,
    store: Store<DashboardState>,
}

impl DashboardProvider {
    pub fn new(api: ApiClient) -> Self {
        Self {
            service: DashboardService::new(api),
            store: Store::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProviderState<DashboardState>> {
        self.store.subscribe()
    }

    pub fn state(&self) -> ProviderState<DashboardState> {
        self.store.snapshot()
    }

    /// Fetches summary and budget together. Whatever loads is kept even
    /// when the other call fails.
    pub async fn refresh(&self) -> Result<(), String> {
        let (summary, budget) = tokio::join!(self.load_summary(), self.load_budget());

        let result = summary.map(|_| ()).and(budget.map(|_| ()));
        if let Err(message) = &result {
            self.store.fail(message.clone());
        }
        result
    }

    pub async fn load_summary(&self) -> Result<DashboardSummary, String> {
        self.store.start_loading();
        let response = self.service.summary().await;
        self.store
            .settle(response, |state, summary| state.summary = Some(summary.clone()))
    }

    pub async fn load_budget(&self) -> Result<BudgetAllocation, String> {
        self.store.start_loading();
        let response = self.service.budget().await;
        self.store
            .settle(response, |state, budget| state.budget = Some(budget.clone()))
    }
}
