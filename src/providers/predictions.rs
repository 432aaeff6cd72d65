use serde::Serialize;
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::models::budget::BudgetHealth;
use crate::models::dashboard::CategoryAnalytics;
use crate::models::prediction::{BudgetPredictionResult, PredictionResult, SavingsPrediction};
use crate::models::transaction::TransactionType;
use crate::providers::store::{ProviderState, Store};
use crate::services::predictions::{clamp_days, DEFAULT_PREDICTION_DAYS};
use crate::services::PredictionService;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionState {
    pub days: u32,
    pub income: Option<PredictionResult>,
    pub expense: Option<PredictionResult>,
    pub budget: Option<BudgetPredictionResult>,
    pub savings: Option<SavingsPrediction>,
    pub budget_health: Option<BudgetHealth>,
    pub category_breakdown: Option<CategoryAnalytics>,
}

impl Default for PredictionState {
    fn default() -> Self {
        Self {
            days: DEFAULT_PREDICTION_DAYS,
            income: None,
            expense: None,
            budget: None,
            savings: None,
            budget_health: None,
            category_breakdown: None,
        }
    }
}

impl PredictionState {
    /// Forecast income minus forecast expense over the window.
    pub fn projected_net(&self) -> Option<f64> {
        match (&self.income, &self.expense) {
            (Some(income), Some(expense)) => {
                Some(income.total_predicted() - expense.total_predicted())
            }
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct PredictionProvider {
    service: PredictionService,
    store: Store<PredictionState>,
}

impl PredictionProvider {
    pub fn new(api: ApiClient) -> Self {
        Self {
            service: PredictionService::new(api),
            store: Store::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProviderState<PredictionState>> {
        self.store.subscribe()
    }

    pub fn state(&self) -> ProviderState<PredictionState> {
        self.store.snapshot()
    }

    pub async fn load_income(&self, days: u32) -> Result<PredictionResult, String> {
        let days = self.begin(days);
        let response = self.service.income(days).await;
        self.store
            .settle(response, |state, result| state.income = Some(result.clone()))
    }

    pub async fn load_expense(&self, days: u32) -> Result<PredictionResult, String> {
        let days = self.begin(days);
        let response = self.service.expense(days).await;
        self.store
            .settle(response, |state, result| state.expense = Some(result.clone()))
    }

    pub async fn load_budget(&self, days: u32) -> Result<BudgetPredictionResult, String> {
        let days = self.begin(days);
        let response = self.service.budget(days).await;
        self.store
            .settle(response, |state, result| state.budget = Some(result.clone()))
    }

    pub async fn load_savings(&self, days: u32) -> Result<SavingsPrediction, String> {
        let days = self.begin(days);
        let response = self.service.savings(days).await;
        self.store
            .settle(response, |state, result| state.savings = Some(result.clone()))
    }

    pub async fn load_budget_health(&self) -> Result<BudgetHealth, String> {
        self.store.start_loading();
        let response = self.service.budget_health().await;
        self.store
            .settle(response, |state, health| state.budget_health = Some(health.clone()))
    }

    pub async fn load_category_breakdown(
        &self,
        transaction_type: TransactionType,
    ) -> Result<CategoryAnalytics, String> {
        self.store.start_loading();
        let response = self.service.category_breakdown(transaction_type).await;
        self.store.settle(response, |state, breakdown| {
            state.category_breakdown = Some(breakdown.clone())
        })
    }

    /// Loads every forecast and the budget health concurrently. Each result
    /// is applied independently; the first failure is returned.
    pub async fn load_all(&self, days: u32) -> Result<(), String> {
        let (income, expense, budget, savings, health) = tokio::join!(
            self.load_income(days),
            self.load_expense(days),
            self.load_budget(days),
            self.load_savings(days),
            self.load_budget_health(),
        );
        let result = income
            .and(expense)
            .and(budget)
            .and(savings)
            .map(|_| ())
            .and(health.map(|_| ()));
        if let Err(message) = &result {
            self.store.fail(message.clone());
        }
        result
    }

    fn begin(&self, days: u32) -> u32 {
        let days = clamp_days(days);
        self.store.start_loading();
        self.store.update(|state| state.data.days = days);
        days
    }
}
