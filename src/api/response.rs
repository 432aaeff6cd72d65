use serde::Serialize;
use serde_json::Value;

use crate::error::{fallback_message, ClientError};
use crate::utils::json::FromJson;

/// Uniform outcome of every remote call. Failures never escape as errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    /// HTTP status when a response was received.
    pub status: Option<u16>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>, status: u16) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            status: Some(status),
        }
    }

    pub fn failure(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            status,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            message: self.message,
            data: self.data.map(f),
            status: self.status,
        }
    }

    /// Collapses to the provider-facing shape: data or a user message.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.message),
        }
    }
}

impl<T> From<ClientError> for ApiResponse<T> {
    fn from(error: ClientError) -> Self {
        ApiResponse::failure(error.user_message(), error.status_code())
    }
}

/// Maps a received status and decoded body onto an [`ApiResponse`].
pub fn map_response<T: FromJson>(status: u16, body: &Value) -> ApiResponse<T> {
    if (200..300).contains(&status) {
        let payload = match body.get("data") {
            Some(data) => data,
            None => body,
        };
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return ApiResponse::ok(T::from_json(payload), message, status);
    }

    let message = server_message(body).unwrap_or_else(|| fallback_message(status).to_string());
    ClientError::from_status(status, message).into()
}

/// `message`, then `detail`. A list-shaped `detail` (field validation
/// errors) contributes its first `msg`.
fn server_message(body: &Value) -> Option<String> {
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    if let Some(message) = body.get("message").and_then(Value::as_str).and_then(non_empty) {
        return Some(message);
    }

    match body.get("detail")? {
        Value::String(detail) => non_empty(detail),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str).and_then(non_empty)),
        Value::Object(map) => map.get("message").and_then(Value::as_str).and_then(non_empty),
        _ => None,
    }
}
