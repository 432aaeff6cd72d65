use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_from_json;
use crate::utils::format::format_signed_amount;
use crate::utils::json::lenient;
use crate::validation::validate_enum;

const TRANSACTION_TYPE_NAMES: &[&str] = &["income", "pemasukan", "expense", "pengeluaran"];
const SORT_ORDER_NAMES: &[&str] = &[
    "newest",
    "date_newest",
    "oldest",
    "date_oldest",
    "highest",
    "amount_highest",
    "lowest",
    "amount_lowest",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TransactionType::Income => "Pemasukan",
            TransactionType::Expense => "Pengeluaran",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        validate_enum("transaction_type", "Tipe transaksi", &name, TRANSACTION_TYPE_NAMES)
            .map_err(|e| e.message)?;
        match name.as_str() {
            "income" | "pemasukan" => Ok(TransactionType::Income),
            _ => Ok(TransactionType::Expense),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category_id: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub transaction_type: TransactionType,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub transaction_date: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_icon: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_color: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    /// Positive for income, negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        if self.is_income() {
            self.amount.abs()
        } else {
            -self.amount.abs()
        }
    }

    pub fn formatted_amount(&self) -> String {
        format_signed_amount(self.amount, self.is_income())
    }

    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or("Tanpa Kategori")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionSortOrder {
    #[default]
    DateNewest,
    DateOldest,
    AmountHighest,
    AmountLowest,
}

impl FromStr for TransactionSortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        validate_enum("sort", "Urutan", &name, SORT_ORDER_NAMES).map_err(|e| e.message)?;
        match name.as_str() {
            "newest" | "date_newest" => Ok(TransactionSortOrder::DateNewest),
            "oldest" | "date_oldest" => Ok(TransactionSortOrder::DateOldest),
            "highest" | "amount_highest" => Ok(TransactionSortOrder::AmountHighest),
            _ => Ok(TransactionSortOrder::AmountLowest),
        }
    }
}

/// Stable in-place sort.
pub fn sort_transactions(transactions: &mut [Transaction], order: TransactionSortOrder) {
    match order {
        TransactionSortOrder::DateNewest => {
            transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date))
        }
        TransactionSortOrder::DateOldest => {
            transactions.sort_by(|a, b| a.transaction_date.cmp(&b.transaction_date))
        }
        TransactionSortOrder::AmountHighest => {
            transactions.sort_by(|a, b| b.amount.total_cmp(&a.amount))
        }
        TransactionSortOrder::AmountLowest => {
            transactions.sort_by(|a, b| a.amount.total_cmp(&b.amount))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionSummary {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub total_income: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub total_expense: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub net_amount: f64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub transaction_count: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub income_count: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub expense_count: i64,
}

impl TransactionSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut summary = TransactionSummary::default();
        for tx in transactions {
            if tx.is_income() {
                summary.total_income += tx.amount;
                summary.income_count += 1;
            } else {
                summary.total_expense += tx.amount;
                summary.expense_count += 1;
            }
        }
        summary.net_amount = summary.total_income - summary.total_expense;
        summary.transaction_count = transactions.len() as i64;
        summary
    }

    /// Share of income kept, in percent. Zero when there is no income.
    pub fn savings_rate(&self) -> f64 {
        if self.total_income <= 0.0 {
            return 0.0;
        }
        (self.net_amount / self.total_income) * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionCreate {
    pub category_id: String,
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub description: String,
    /// Serialized as `yyyy-MM-dd`.
    pub transaction_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TransactionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl TransactionFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(kind) = self.transaction_type {
            query.push(("transaction_type", kind.as_str().to_string()));
        }
        if let Some(category_id) = self.category_id.as_ref().filter(|s| !s.is_empty()) {
            query.push(("category_id", category_id.clone()));
        }
        if let Some(start) = self.start_date {
            query.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            query.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.trim().to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            query.push(("per_page", per_page.to_string()));
        }
        query
    }
}

impl_from_json!(Transaction, TransactionSummary);
