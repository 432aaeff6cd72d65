//! Observable state containers, one per screen family.
//!
//! Every provider method validates its input, calls the matching service,
//! and records the outcome (data, loading flag, user-facing error) in its
//! [`Store`]. Failures come back as `Err(String)` ready to display.

pub mod auth;
pub mod categories;
pub mod chat;
pub mod dashboard;
pub mod predictions;
pub mod store;
pub mod transactions;
pub mod universities;

pub use auth::AuthProvider;
pub use categories::CategoryProvider;
pub use chat::{ChatProvider, ConnectionStatus};
pub use dashboard::DashboardProvider;
pub use predictions::PredictionProvider;
pub use store::{ProviderState, Store};
pub use transactions::TransactionProvider;
pub use universities::UniversityProvider;
