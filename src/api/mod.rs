pub mod client;
pub mod response;

pub use client::{resource_path, ApiClient, DEFAULT_TIMEOUT_SECS};
pub use response::ApiResponse;
