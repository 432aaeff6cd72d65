pub mod auth;
pub mod budget;
pub mod category;
pub mod chat;
pub mod dashboard;
pub mod pagination;
pub mod prediction;
pub mod transaction;
pub mod university;
pub mod user;

pub use pagination::Paginated;
