use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::api::{ApiClient, ApiResponse};
use crate::utils::json::safe_string;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub client_version: String,
    pub api_url: String,
    pub api: DependencyStatus,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyStatus {
    Healthy {
        status: String,
        latency_ms: u64,
        server_status: String,
        server_version: String,
    },
    Unhealthy {
        status: String,
        error: String,
    },
}

impl DependencyStatus {
    fn unhealthy(error: impl Into<String>) -> Self {
        DependencyStatus::Unhealthy {
            status: "unhealthy".to_string(),
            error: error.into(),
        }
    }
}

#[async_trait]
pub trait DependencyChecker: Send + Sync {
    async fn check(&self) -> DependencyStatus;
}

/// Probes `GET /health` on the configured API.
pub struct ApiChecker {
    api: ApiClient,
}

impl ApiChecker {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DependencyChecker for ApiChecker {
    async fn check(&self) -> DependencyStatus {
        let start = Instant::now();
        let response: ApiResponse<Value> = self.api.get("/health", &[]).await;
        match (response.success, response.data) {
            (true, Some(body)) => DependencyStatus::Healthy {
                status: "healthy".to_string(),
                latency_ms: start.elapsed().as_millis() as u64,
                server_status: safe_string(&body["status"], "unknown"),
                server_version: safe_string(&body["version"], "unknown"),
            },
            _ => DependencyStatus::unhealthy(response.message),
        }
    }
}

pub async fn check_health(
    checker: &dyn DependencyChecker,
    api_url: &str,
    timeout_duration: Duration,
) -> HealthReport {
    let api = timeout(timeout_duration, checker.check())
        .await
        .unwrap_or_else(|_| DependencyStatus::unhealthy("timeout"));

    HealthReport {
        status: determine_overall_status(&api),
        client_version: env!("CARGO_PKG_VERSION").to_string(),
        api_url: api_url.to_string(),
        api,
    }
}

/// Reachable but self-reporting a problem counts as degraded.
fn determine_overall_status(api: &DependencyStatus) -> String {
    match api {
        DependencyStatus::Unhealthy { .. } => "unhealthy".to_string(),
        DependencyStatus::Healthy { server_status, .. } => {
            match server_status.to_lowercase().as_str() {
                "healthy" | "ok" | "up" | "unknown" => "healthy".to_string(),
                _ => "degraded".to_string(),
            }
        }
    }
}
