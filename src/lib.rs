pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod models;
pub mod providers;
pub mod services;
pub mod startup;
pub mod utils;
pub mod validation;

pub use api::{ApiClient, ApiResponse};
pub use config::Config;
pub use error::ClientError;
