pub mod auth;
pub mod categories;
pub mod chat;
pub mod dashboard;
pub mod predictions;
pub mod transactions;
pub mod universities;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use chat::ChatService;
pub use dashboard::DashboardService;
pub use predictions::PredictionService;
pub use transactions::TransactionService;
pub use universities::UniversityService;
