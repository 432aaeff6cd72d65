use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::models::transaction::{
    sort_transactions, Transaction, TransactionCreate, TransactionFilter, TransactionSortOrder,
    TransactionSummary, TransactionUpdate,
};
use crate::providers::store::{ProviderState, Store};
use crate::services::TransactionService;
use crate::validation::{
    collect_errors, validate_amount, validate_description, validate_required,
    validate_transaction_form,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TransactionState {
    pub items: Vec<Transaction>,
    pub total: u64,
    pub page: u32,
    pub has_next: bool,
    #[serde(skip)]
    pub filter: TransactionFilter,
    #[serde(skip)]
    pub sort_order: TransactionSortOrder,
    pub summary: Option<TransactionSummary>,
}

impl TransactionState {
    /// Summary of the loaded page, for when the server summary is absent.
    pub fn local_summary(&self) -> TransactionSummary {
        TransactionSummary::from_transactions(&self.items)
    }
}

#[derive(Clone)]
pub struct TransactionProvider {
    service: TransactionService,
    store: Store<TransactionState>,
}

impl TransactionProvider {
    pub fn new(api: ApiClient) -> Self {
        Self {
            service: TransactionService::new(api),
            store: Store::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProviderState<TransactionState>> {
        self.store.subscribe()
    }

    pub fn state(&self) -> ProviderState<TransactionState> {
        self.store.snapshot()
    }

    /// Replaces the list with the first page matching `filter`.
    pub async fn load(&self, filter: TransactionFilter) -> Result<(), String> {
        self.store.start_loading();
        let response = self.service.list(&filter).await;
        self.store
            .settle(response, |state, page| {
                state.items = page.items.clone();
                state.total = page.total;
                state.page = page.page;
                state.has_next = page.has_next;
                state.filter = filter.clone();
                sort_transactions(&mut state.items, state.sort_order);
            })
            .map(|_| ())
    }

    /// Appends the next page. No-op once the last page is loaded.
    pub async fn load_more(&self) -> Result<(), String> {
        let (has_next, mut filter, page) = self
            .store
            .read(|state| (state.has_next, state.filter.clone(), state.page));
        let Some(next_page) = page.checked_add(1).filter(|_| has_next) else {
            return Ok(());
        };
        filter.page = Some(next_page);

        self.store.start_loading();
        let response = self.service.list(&filter).await;
        self.store
            .settle(response, |state, next| {
                state.items.extend(next.items.iter().cloned());
                state.total = next.total;
                state.page = next.page;
                state.has_next = next.has_next;
                state.filter = filter.clone();
                sort_transactions(&mut state.items, state.sort_order);
            })
            .map(|_| ())
    }

    pub fn set_sort_order(&self, order: TransactionSortOrder) {
        self.store.update(|state| {
            state.data.sort_order = order;
            sort_transactions(&mut state.data.items, order);
        });
    }

    pub async fn create(&self, transaction: TransactionCreate) -> Result<Transaction, String> {
        self.store
            .check_form(validate_transaction_form(&transaction))?;
        self.store.start_loading();
        let response = self.service.create(&transaction).await;
        self.store.settle(response, |state, created| {
            state.items.push(created.clone());
            state.total += 1;
            sort_transactions(&mut state.items, state.sort_order);
        })
    }

    pub async fn update(&self, id: &str, update: TransactionUpdate) -> Result<Transaction, String> {
        self.store.check_form(collect_errors([
            update
                .category_id
                .as_deref()
                .map_or(Ok(()), |c| validate_required("category_id", "Kategori", c)),
            update.amount.map_or(Ok(()), validate_amount),
            update.description.as_deref().map_or(Ok(()), validate_description),
        ]))?;

        self.store.start_loading();
        let response = self.service.update(id, &update).await;
        self.store.settle(response, |state, updated| {
            if let Some(slot) = state.items.iter_mut().find(|t| t.id == updated.id) {
                *slot = updated.clone();
            }
            sort_transactions(&mut state.items, state.sort_order);
        })
    }

    pub async fn delete(&self, id: &str) -> Result<(), String> {
        self.store.start_loading();
        let response = self.service.delete(id).await;
        self.store.settle(response, |state, _| {
            let before = state.items.len();
            state.items.retain(|t| t.id != id);
            if state.items.len() < before {
                state.total = state.total.saturating_sub(1);
            }
        })
    }

    pub async fn load_summary(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<TransactionSummary, String> {
        self.store.start_loading();
        let response = self.service.summary(start_date, end_date).await;
        self.store
            .settle(response, |state, summary| state.summary = Some(summary.clone()))
    }
}
