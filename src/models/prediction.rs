use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_from_json;
use crate::utils::format::{format_currency, format_percentage};
use crate::utils::json::lenient;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// One forecast day: point estimate plus confidence bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    #[serde(default = "today", deserialize_with = "lenient::date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub yhat: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub yhat_lower: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub yhat_upper: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub formatted_value: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub formatted_range: String,
}

impl Default for PredictionPoint {
    fn default() -> Self {
        Self {
            date: today(),
            yhat: 0.0,
            yhat_lower: 0.0,
            yhat_upper: 0.0,
            formatted_value: String::new(),
            formatted_range: String::new(),
        }
    }
}

impl PredictionPoint {
    /// Server-formatted value, or a locally formatted one when absent.
    pub fn display_value(&self) -> String {
        if self.formatted_value.is_empty() {
            format_currency(self.yhat)
        } else {
            self.formatted_value.clone()
        }
    }

    pub fn display_range(&self) -> String {
        if self.formatted_range.is_empty() {
            format!(
                "{} - {}",
                format_currency(self.yhat_lower),
                format_currency(self.yhat_upper)
            )
        } else {
            self.formatted_range.clone()
        }
    }

    pub fn interval_width(&self) -> f64 {
        (self.yhat_upper - self.yhat_lower).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    #[default]
    OnTrack,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "Sesuai Anggaran",
            BudgetStatus::Warning => "Mendekati Batas",
            BudgetStatus::OverBudget => "Melebihi Anggaran",
        }
    }
}

/// Budget forecast day. Carries the plain point fields rather than embedding
/// a [`PredictionPoint`] so the wire shape stays flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPredictionPoint {
    #[serde(default = "today", deserialize_with = "lenient::date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub yhat: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub yhat_lower: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub yhat_upper: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub formatted_value: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub formatted_range: String,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub daily_budget: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub usage_percentage: f64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub budget_status: BudgetStatus,
}

impl Default for BudgetPredictionPoint {
    fn default() -> Self {
        Self {
            date: today(),
            yhat: 0.0,
            yhat_lower: 0.0,
            yhat_upper: 0.0,
            formatted_value: String::new(),
            formatted_range: String::new(),
            daily_budget: 0.0,
            usage_percentage: 0.0,
            budget_status: BudgetStatus::default(),
        }
    }
}

impl BudgetPredictionPoint {
    pub fn point(&self) -> PredictionPoint {
        PredictionPoint {
            date: self.date,
            yhat: self.yhat,
            yhat_lower: self.yhat_lower,
            yhat_upper: self.yhat_upper,
            formatted_value: self.formatted_value.clone(),
            formatted_range: self.formatted_range.clone(),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.budget_status == BudgetStatus::OverBudget
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "Tinggi",
            ConfidenceLevel::Medium => "Sedang",
            ConfidenceLevel::Low => "Rendah",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelPerformance {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub mae: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub mape: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub rmse: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub r2_score: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub accuracy_score: f64,
}

impl ModelPerformance {
    /// Accuracy as a 0..=1 ratio. Values above 1 are read as percentages.
    pub fn normalized_accuracy(&self) -> f64 {
        let score = if self.accuracy_score > 1.0 {
            self.accuracy_score / 100.0
        } else {
            self.accuracy_score
        };
        score.clamp(0.0, 1.0)
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        let accuracy = self.normalized_accuracy();
        if accuracy >= 0.8 {
            ConfidenceLevel::High
        } else if accuracy >= 0.6 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn formatted_accuracy(&self) -> String {
        format_percentage(self.normalized_accuracy() * 100.0, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl Trend {
    pub fn display_name(&self) -> &'static str {
        match self {
            Trend::Increasing => "Meningkat",
            Trend::Decreasing => "Menurun",
            Trend::Stable => "Stabil",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionSummary {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub total_predicted: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub average_daily: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub min_value: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub max_value: f64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub trend: Trend,
}

/// Income or expense forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default, deserialize_with = "lenient::string")]
    pub prediction_type: String,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub period_days: u32,
    #[serde(default, deserialize_with = "lenient::list")]
    pub predictions: Vec<PredictionPoint>,
    #[serde(default, deserialize_with = "lenient::model")]
    pub summary: PredictionSummary,
    #[serde(default, deserialize_with = "lenient::model")]
    pub model_performance: ModelPerformance,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub generated_at: DateTime<Utc>,
}

impl Default for PredictionResult {
    fn default() -> Self {
        Self {
            prediction_type: String::new(),
            period_days: 0,
            predictions: Vec::new(),
            summary: PredictionSummary::default(),
            model_performance: ModelPerformance::default(),
            generated_at: Utc::now(),
        }
    }
}

impl PredictionResult {
    /// Sum of point estimates; prefers the server total when provided.
    pub fn total_predicted(&self) -> f64 {
        if self.summary.total_predicted > 0.0 {
            return self.summary.total_predicted;
        }
        self.predictions.iter().map(|p| p.yhat).sum()
    }

    pub fn peak(&self) -> Option<&PredictionPoint> {
        self.predictions.iter().max_by(|a, b| a.yhat.total_cmp(&b.yhat))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPredictionResult {
    #[serde(default, deserialize_with = "lenient::u32")]
    pub period_days: u32,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub monthly_budget: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub projected_spending: f64,
    #[serde(default, deserialize_with = "lenient::list")]
    pub predictions: Vec<BudgetPredictionPoint>,
    #[serde(default, deserialize_with = "lenient::model")]
    pub summary: PredictionSummary,
    #[serde(default, deserialize_with = "lenient::model")]
    pub model_performance: ModelPerformance,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub recommendations: Vec<String>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub generated_at: DateTime<Utc>,
}

impl Default for BudgetPredictionResult {
    fn default() -> Self {
        Self {
            period_days: 0,
            monthly_budget: 0.0,
            projected_spending: 0.0,
            predictions: Vec::new(),
            summary: PredictionSummary::default(),
            model_performance: ModelPerformance::default(),
            recommendations: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

impl BudgetPredictionResult {
    pub fn days_over_budget(&self) -> usize {
        self.predictions.iter().filter(|p| p.is_over_budget()).count()
    }

    /// Worst status across the forecast window.
    pub fn overall_status(&self) -> BudgetStatus {
        self.predictions
            .iter()
            .map(|p| p.budget_status)
            .max()
            .unwrap_or_default()
    }

    pub fn projected_usage_percentage(&self) -> f64 {
        if self.monthly_budget <= 0.0 {
            return 0.0;
        }
        self.projected_spending / self.monthly_budget * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsPrediction {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub current_savings: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub target_amount: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub predicted_savings: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub monthly_savings_rate: f64,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub months_to_target: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub target_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_achievable: bool,
    #[serde(default, deserialize_with = "lenient::list")]
    pub predictions: Vec<PredictionPoint>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub recommendations: Vec<String>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub generated_at: DateTime<Utc>,
}

impl Default for SavingsPrediction {
    fn default() -> Self {
        Self {
            current_savings: 0.0,
            target_amount: 0.0,
            predicted_savings: 0.0,
            monthly_savings_rate: 0.0,
            months_to_target: None,
            target_date: None,
            is_achievable: false,
            predictions: Vec::new(),
            recommendations: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}

impl SavingsPrediction {
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_savings / self.target_amount * 100.0).clamp(0.0, 100.0)
    }

    pub fn remaining_amount(&self) -> f64 {
        (self.target_amount - self.current_savings).max(0.0)
    }
}

impl_from_json!(
    PredictionPoint,
    BudgetPredictionPoint,
    ModelPerformance,
    PredictionSummary,
    PredictionResult,
    BudgetPredictionResult,
    SavingsPrediction,
);
