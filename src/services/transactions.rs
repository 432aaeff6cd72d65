use chrono::NaiveDate;

use crate::api::{resource_path, ApiClient, ApiResponse};
use crate::models::transaction::{
    Transaction, TransactionCreate, TransactionFilter, TransactionSummary, TransactionUpdate,
};
use crate::models::Paginated;

#[derive(Clone)]
pub struct TransactionService {
    api: ApiClient,
}

impl TransactionService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filter: &TransactionFilter) -> ApiResponse<Paginated<Transaction>> {
        self.api.get("/transactions", &filter.to_query()).await
    }

    pub async fn get(&self, id: &str) -> ApiResponse<Transaction> {
        self.api.get(&resource_path(&["transactions", id]), &[]).await
    }

    pub async fn create(&self, transaction: &TransactionCreate) -> ApiResponse<Transaction> {
        self.api.post("/transactions", transaction).await
    }

    pub async fn update(&self, id: &str, update: &TransactionUpdate) -> ApiResponse<Transaction> {
        self.api.put(&resource_path(&["transactions", id]), update).await
    }

    pub async fn delete(&self, id: &str) -> ApiResponse<()> {
        self.api.delete(&resource_path(&["transactions", id])).await
    }

    pub async fn summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ApiResponse<TransactionSummary> {
        let query: Vec<(&str, String)> = [("start_date", start_date), ("end_date", end_date)]
            .into_iter()
            .filter_map(|(key, date)| date.map(|d| (key, d.format("%Y-%m-%d").to_string())))
            .collect();
        self.api.get("/transactions/summary", &query).await
    }
}
