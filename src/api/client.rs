use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};
use url::Url;
use uuid::Uuid;

use crate::api::response::{map_response, ApiResponse};
use crate::config::Config;
use crate::error::ClientError;
use crate::utils::json::FromJson;
use crate::utils::sanitize::sanitize_json;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

pub type Query<'a> = &'a [(&'a str, String)];

/// Joins path segments into an absolute path, percent-encoding each one so
/// an id can never escape its segment.
pub fn resource_path(segments: &[&str]) -> String {
    let Ok(mut url) = Url::parse("http://localhost") else {
        return format!("/{}", segments.join("/"));
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

/// HTTP client for the Lunance REST API.
///
/// Cloning is cheap; clones share the connection pool and the bearer token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        ApiClient {
            client,
            base_url: base_url.into(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut client = Self::with_timeout(
            config.api_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        );
        client.token = Arc::new(RwLock::new(config.access_token.clone()));
        client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    pub async fn get<T: FromJson>(&self, path: &str, query: Query<'_>) -> ApiResponse<T> {
        self.send(Method::GET, path, query, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResponse<T>
    where
        T: FromJson,
        B: Serialize + ?Sized,
    {
        match serde_json::to_value(body) {
            Ok(body) => self.send(Method::POST, path, &[], Some(body)).await,
            Err(e) => ClientError::from(e).into(),
        }
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResponse<T>
    where
        T: FromJson,
        B: Serialize + ?Sized,
    {
        match serde_json::to_value(body) {
            Ok(body) => self.send(Method::PUT, path, &[], Some(body)).await,
            Err(e) => ClientError::from(e).into(),
        }
    }

    pub async fn delete<T: FromJson>(&self, path: &str) -> ApiResponse<T> {
        self.send(Method::DELETE, path, &[], None).await
    }

    async fn send<T: FromJson>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<Value>,
    ) -> ApiResponse<T> {
        let request_id = Uuid::new_v4();
        match self.execute(&method, path, query, body, request_id).await {
            Ok(response) => {
                if !response.success {
                    warn!(
                        method = %method,
                        path,
                        status = ?response.status,
                        request_id = %request_id,
                        "request rejected: {}",
                        response.message
                    );
                }
                response
            }
            Err(e) => {
                warn!(method = %method, path, request_id = %request_id, "request failed: {}", e);
                e.into()
            }
        }
    }

    async fn execute<T: FromJson>(
        &self,
        method: &Method,
        path: &str,
        query: Query<'_>,
        body: Option<Value>,
        request_id: Uuid,
    ) -> Result<ApiResponse<T>, ClientError> {
        let url = self.endpoint(path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            trace!(request_id = %request_id, payload = %sanitize_json(body), "request body");
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(
            method = %method,
            path,
            status = status.as_u16(),
            request_id = %request_id,
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );

        let payload = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => value,
                // Error pages (proxies, HTML 502s) still map by status.
                Err(_) if !status.is_success() => Value::Null,
                Err(e) => return Err(e.into()),
            }
        };
        trace!(request_id = %request_id, payload = %sanitize_json(&payload), "response body");

        Ok(map_response(status.as_u16(), &payload))
    }
}
