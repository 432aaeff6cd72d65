use serde::{Deserialize, Serialize};

use crate::impl_from_json;
use crate::models::budget::BudgetHealth;
use crate::models::transaction::{Transaction, TransactionType};
use crate::utils::json::lenient;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    #[serde(default, deserialize_with = "lenient::string")]
    pub category_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category_icon: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category_color: String,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub percentage: f64,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub transaction_count: u32,
}

/// `GET /analytics/category-breakdown`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryAnalytics {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub transaction_type: TransactionType,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient::list")]
    pub categories: Vec<CategoryBreakdown>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub period: String,
}

impl CategoryAnalytics {
    /// Largest `limit` categories by amount.
    pub fn top(&self, limit: usize) -> Vec<&CategoryBreakdown> {
        let mut sorted: Vec<&CategoryBreakdown> = self.categories.iter().collect();
        sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        sorted.truncate(limit);
        sorted
    }

    /// Share of `total_amount`, recomputed when the server omitted it.
    pub fn share_of(&self, breakdown: &CategoryBreakdown) -> f64 {
        if breakdown.percentage > 0.0 || self.total_amount <= 0.0 {
            return breakdown.percentage;
        }
        breakdown.amount / self.total_amount * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub current_balance: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub monthly_income: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub monthly_expense: f64,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub transaction_count: u32,
    #[serde(default, deserialize_with = "lenient::list")]
    pub recent_transactions: Vec<Transaction>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub top_categories: Vec<CategoryBreakdown>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_model",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_health: Option<BudgetHealth>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub period: String,
}

impl DashboardSummary {
    pub fn monthly_net(&self) -> f64 {
        self.monthly_income - self.monthly_expense
    }

    /// Percent of this month's income kept; zero without income.
    pub fn savings_rate(&self) -> f64 {
        if self.monthly_income <= 0.0 {
            return 0.0;
        }
        self.monthly_net() / self.monthly_income * 100.0
    }
}

impl_from_json!(CategoryBreakdown, CategoryAnalytics, DashboardSummary);
