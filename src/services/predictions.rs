use std::fmt;
use std::str::FromStr;

use crate::api::{ApiClient, ApiResponse};
use crate::models::budget::BudgetHealth;
use crate::models::dashboard::CategoryAnalytics;
use crate::models::prediction::{BudgetPredictionResult, PredictionResult, SavingsPrediction};
use crate::models::transaction::TransactionType;

pub const DEFAULT_PREDICTION_DAYS: u32 = 30;
pub const MAX_PREDICTION_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    Income,
    Expense,
    Budget,
    Savings,
}

impl PredictionKind {
    pub fn path(&self) -> &'static str {
        match self {
            PredictionKind::Income => "/predictions/income",
            PredictionKind::Expense => "/predictions/expense",
            PredictionKind::Budget => "/predictions/budget",
            PredictionKind::Savings => "/predictions/savings",
        }
    }
}

impl fmt::Display for PredictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PredictionKind::Income => "income",
            PredictionKind::Expense => "expense",
            PredictionKind::Budget => "budget",
            PredictionKind::Savings => "savings",
        };
        f.write_str(name)
    }
}

impl FromStr for PredictionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(PredictionKind::Income),
            "expense" => Ok(PredictionKind::Expense),
            "budget" => Ok(PredictionKind::Budget),
            "savings" => Ok(PredictionKind::Savings),
            other => Err(format!("unknown prediction kind: {}", other)),
        }
    }
}

/// Forecasts under `/predictions/*` and analytics under `/analytics/*`.
/// Everything is computed server-side.
#[derive(Clone)]
pub struct PredictionService {
    api: ApiClient,
}

impl PredictionService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn income(&self, days: u32) -> ApiResponse<PredictionResult> {
        self.forecast(PredictionKind::Income, days).await
    }

    pub async fn expense(&self, days: u32) -> ApiResponse<PredictionResult> {
        self.forecast(PredictionKind::Expense, days).await
    }

    pub async fn budget(&self, days: u32) -> ApiResponse<BudgetPredictionResult> {
        self.forecast(PredictionKind::Budget, days).await
    }

    pub async fn savings(&self, days: u32) -> ApiResponse<SavingsPrediction> {
        self.forecast(PredictionKind::Savings, days).await
    }

    pub async fn budget_health(&self) -> ApiResponse<BudgetHealth> {
        self.api.get("/analytics/budget-health", &[]).await
    }

    pub async fn category_breakdown(
        &self,
        transaction_type: TransactionType,
    ) -> ApiResponse<CategoryAnalytics> {
        let query = [("transaction_type", transaction_type.as_str().to_string())];
        self.api.get("/analytics/category-breakdown", &query).await
    }

    async fn forecast<T: crate::utils::json::FromJson>(
        &self,
        kind: PredictionKind,
        days: u32,
    ) -> ApiResponse<T> {
        let query = [("days", clamp_days(days).to_string())];
        self.api.get(kind.path(), &query).await
    }
}

/// Forecast horizon in 1..=365 days.
pub fn clamp_days(days: u32) -> u32 {
    days.clamp(1, MAX_PREDICTION_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Budget".parse::<PredictionKind>(), Ok(PredictionKind::Budget));
        assert!("weather".parse::<PredictionKind>().is_err());
        assert_eq!(PredictionKind::Savings.to_string(), "savings");
        assert_eq!(PredictionKind::Expense.path(), "/predictions/expense");
    }

    #[test]
    fn test_clamp_days() {
        assert_eq!(clamp_days(0), 1);
        assert_eq!(clamp_days(30), 30);
        assert_eq!(clamp_days(1000), MAX_PREDICTION_DAYS);
    }
}
