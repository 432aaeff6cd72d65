use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::api::ApiResponse;
use crate::validation::{summarize_errors, FieldErrors};

/// Snapshot published to subscribers after every mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProviderState<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Observable state holder shared by a provider and its subscribers.
///
/// Built on `tokio::sync::watch`: receivers always see the latest snapshot
/// and never block the provider.
///
/// Concurrent calls are counted: `is_loading` stays set until the last one
/// settles, and an error recorded by one of them survives the others'
/// successes. The error is cleared when a new round of calls starts.
#[derive(Clone)]
pub struct Store<T> {
    tx: Arc<watch::Sender<ProviderState<T>>>,
    pending: Arc<AtomicUsize>,
}

impl<T: Clone + Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Default> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(ProviderState {
            data: initial,
            is_loading: false,
            error: None,
        });
        Self {
            tx: Arc::new(tx),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProviderState<T>> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> ProviderState<T> {
        self.tx.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow().data)
    }

    pub fn update(&self, f: impl FnOnce(&mut ProviderState<T>)) {
        self.tx.send_modify(f);
    }

    pub fn in_flight(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn start_loading(&self) {
        self.update(|state| {
            if self.pending.fetch_add(1, Ordering::SeqCst) == 0 {
                state.error = None;
            }
            state.is_loading = true;
        });
    }

    /// Records an error without ending any call still in flight.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|state| {
            state.is_loading = self.in_flight() > 0;
            state.error = Some(message);
        });
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }

    pub fn reset(&self) {
        self.pending.store(0, Ordering::SeqCst);
        self.update(|state| *state = ProviderState::default());
    }

    /// Marks one call as finished. Unmatched calls saturate at zero.
    fn finish(&self, state: &mut ProviderState<T>) {
        let previous = match self.pending.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
            Some(n.saturating_sub(1))
        }) {
            Ok(n) | Err(n) => n,
        };
        state.is_loading = previous > 1;
    }

    /// Records a form's validation errors. Returns them as one message, or
    /// `Ok` when the form is valid.
    pub fn check_form(&self, errors: FieldErrors) -> Result<(), String> {
        if errors.is_empty() {
            return Ok(());
        }
        let message = summarize_errors(&errors);
        self.fail(message.clone());
        Err(message)
    }

    /// Applies a finished call: `apply` runs on success, the message is
    /// recorded on failure. Either way the call stops counting as loading.
    pub fn settle<R>(
        &self,
        response: ApiResponse<R>,
        apply: impl FnOnce(&mut T, &R),
    ) -> Result<R, String> {
        match response.into_result() {
            Ok(value) => {
                self.update(|state| {
                    apply(&mut state.data, &value);
                    self.finish(state);
                });
                Ok(value)
            }
            Err(message) => {
                self.update(|state| {
                    state.error = Some(message.clone());
                    self.finish(state);
                });
                Err(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_success_applies_and_clears_loading() {
        let store: Store<Vec<u32>> = Store::default();
        store.start_loading();
        assert!(store.snapshot().is_loading);

        let result = store.settle(ApiResponse::ok(7, "", 200), |items, value| items.push(*value));
        assert_eq!(result, Ok(7));
        let state = store.snapshot();
        assert_eq!(state.data, vec![7]);
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_settle_failure_keeps_data() {
        let store = Store::new(vec![1u32]);
        let result = store.settle(
            ApiResponse::<u32>::failure("Gagal memuat", Some(500)),
            |items, value| items.push(*value),
        );
        assert_eq!(result, Err("Gagal memuat".to_string()));
        let state = store.snapshot();
        assert_eq!(state.data, vec![1]);
        assert_eq!(state.error.as_deref(), Some("Gagal memuat"));
    }

    #[test]
    fn test_check_form_records_errors() {
        let store: Store<()> = Store::default();
        assert_eq!(store.check_form(FieldErrors::new()), Ok(()));

        let mut errors = FieldErrors::new();
        errors.insert("amount", "Jumlah harus lebih dari 0".to_string());
        assert!(store.check_form(errors).is_err());
        assert_eq!(store.snapshot().error.as_deref(), Some("Jumlah harus lebih dari 0"));

        store.clear_error();
        assert_eq!(store.snapshot().error, None);
    }

    #[test]
    fn test_concurrent_failure_survives_later_success() {
        let store: Store<Vec<u32>> = Store::default();
        store.start_loading();
        store.start_loading();

        let failed = store.settle(ApiResponse::<u32>::failure("Gagal", Some(500)), |_, _| {});
        assert!(failed.is_err());
        assert!(store.snapshot().is_loading);

        let loaded = store.settle(ApiResponse::ok(3, "", 200), |items, value| items.push(*value));
        assert_eq!(loaded, Ok(3));
        let state = store.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Gagal"));
        assert_eq!(state.data, vec![3]);

        store.start_loading();
        assert_eq!(store.snapshot().error, None);
    }

    #[test]
    fn test_unmatched_settle_does_not_underflow() {
        let store: Store<u32> = Store::default();
        let _ = store.settle(ApiResponse::ok(1, "", 200), |data, value| *data = *value);
        assert_eq!(store.in_flight(), 0);
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_subscribers_see_latest_snapshot() {
        let store: Store<u32> = Store::default();
        let mut rx = store.subscribe();

        store.update(|state| state.data = 1);
        store.update(|state| state.data = 2);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().data, 2);
    }
}
