use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_from_json;
use crate::utils::json::{lenient, safe_map, FromJson};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Excellent,
    Good,
    #[default]
    Fair,
    Poor,
}

impl HealthLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            HealthLevel::Excellent => "Sangat Baik",
            HealthLevel::Good => "Baik",
            HealthLevel::Fair => "Cukup",
            HealthLevel::Poor => "Perlu Perhatian",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthLevel::Excellent | HealthLevel::Good)
    }
}

/// Server-computed budget health. `category_variance` maps category name to
/// the percentage deviation of actual from planned spending.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetHealth {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub health_level: HealthLevel,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub health_score: f64,
    #[serde(default, deserialize_with = "lenient::f64_map")]
    pub category_variance: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub recommendations: Vec<String>,
}

impl BudgetHealth {
    /// Categories spending above plan, largest overrun first.
    pub fn overspent_categories(&self) -> Vec<(&str, f64)> {
        let mut overspent: Vec<(&str, f64)> = self
            .category_variance
            .iter()
            .filter(|(_, variance)| **variance > 0.0)
            .map(|(name, variance)| (name.as_str(), *variance))
            .collect();
        overspent.sort_by(|a, b| b.1.total_cmp(&a.1));
        overspent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    #[default]
    Needs,
    Wants,
    Savings,
}

impl BudgetType {
    pub const ALL: [BudgetType; 3] = [BudgetType::Needs, BudgetType::Wants, BudgetType::Savings];

    pub fn display_name(&self) -> &'static str {
        match self {
            BudgetType::Needs => "Kebutuhan",
            BudgetType::Wants => "Keinginan",
            BudgetType::Savings => "Tabungan",
        }
    }

    /// Share of income under the 50/30/20 rule.
    pub fn share(&self) -> f64 {
        match self {
            BudgetType::Needs => 0.5,
            BudgetType::Wants => 0.3,
            BudgetType::Savings => 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetBucket {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub budget_type: BudgetType,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub allocated: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub spent: f64,
}

impl BudgetBucket {
    pub fn remaining(&self) -> f64 {
        self.allocated - self.spent
    }

    pub fn usage_percentage(&self) -> f64 {
        if self.allocated <= 0.0 {
            return if self.spent > 0.0 { 100.0 } else { 0.0 };
        }
        self.spent / self.allocated * 100.0
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.allocated
    }

    pub fn budget_type_name(&self) -> &'static str {
        self.budget_type.display_name()
    }
}

/// 50/30/20 allocation for the current month. Each bucket's type follows
/// the field it sits in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub monthly_income: f64,
    #[serde(default, deserialize_with = "lenient::model")]
    pub needs: BudgetBucket,
    #[serde(default, deserialize_with = "lenient::model")]
    pub wants: BudgetBucket,
    #[serde(default, deserialize_with = "lenient::model")]
    pub savings: BudgetBucket,
    #[serde(default, deserialize_with = "lenient::string")]
    pub period: String,
}

impl Default for BudgetAllocation {
    fn default() -> Self {
        Self::from_income(0.0)
    }
}

impl BudgetAllocation {
    /// Allocation with empty spending derived locally from income.
    pub fn from_income(monthly_income: f64) -> Self {
        let bucket = |budget_type: BudgetType| BudgetBucket {
            budget_type,
            allocated: monthly_income * budget_type.share(),
            spent: 0.0,
        };
        Self {
            monthly_income,
            needs: bucket(BudgetType::Needs),
            wants: bucket(BudgetType::Wants),
            savings: bucket(BudgetType::Savings),
            period: String::new(),
        }
    }

    pub fn buckets(&self) -> [&BudgetBucket; 3] {
        [&self.needs, &self.wants, &self.savings]
    }

    pub fn bucket(&self, budget_type: BudgetType) -> &BudgetBucket {
        match budget_type {
            BudgetType::Needs => &self.needs,
            BudgetType::Wants => &self.wants,
            BudgetType::Savings => &self.savings,
        }
    }

    pub fn total_allocated(&self) -> f64 {
        self.buckets().iter().map(|b| b.allocated).sum()
    }

    pub fn total_spent(&self) -> f64 {
        self.buckets().iter().map(|b| b.spent).sum()
    }

    pub fn over_budget_buckets(&self) -> Vec<BudgetType> {
        self.buckets()
            .iter()
            .filter(|b| b.is_over_budget())
            .map(|b| b.budget_type)
            .collect()
    }
}

impl_from_json!(BudgetHealth, BudgetBucket);

impl FromJson for BudgetAllocation {
    fn from_json(value: &Value) -> Self {
        let mut allocation: BudgetAllocation =
            serde_json::from_value(Value::Object(safe_map(value))).unwrap_or_default();
        allocation.needs.budget_type = BudgetType::Needs;
        allocation.wants.budget_type = BudgetType::Wants;
        allocation.savings.budget_type = BudgetType::Savings;
        allocation
    }
}
