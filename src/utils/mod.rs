pub mod format;
pub mod json;
pub mod sanitize;
pub mod timezone;
