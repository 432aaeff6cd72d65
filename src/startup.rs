use crate::api::ApiClient;
use crate::config::Config;
use crate::health::{check_health, ApiChecker, DependencyStatus};
use anyhow::Result;
use std::time::Duration;

const PROBE_TIMEOUT_SECS: u64 = 5;

pub struct ValidationReport {
    pub environment: bool,
    pub api: bool,
    pub authenticated: Option<bool>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.environment && self.api && self.authenticated != Some(false)
    }

    pub fn print(&self) {
        println!("\n=== Lunance Client Check ===");
        println!("Environment Variables: {}", status(self.environment));
        println!("API Reachability:      {}", status(self.api));
        match self.authenticated {
            Some(ok) => println!("Access Token:          {}", status(ok)),
            None => println!("Access Token:          - (not set)"),
        }

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  ❌ {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "✅ PASS" } else { "❌ FAIL" });
        println!("============================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ OK" } else { "❌ FAIL" }
}

pub async fn validate_environment(config: &Config, api: &ApiClient) -> Result<ValidationReport> {
    let mut report = ValidationReport {
        environment: true,
        api: true,
        authenticated: None,
        errors: Vec::new(),
    };

    if let Err(e) = validate_env_vars(config) {
        report.environment = false;
        report.errors.push(format!("Environment: {}", e));
    }

    let checker = ApiChecker::new(api.clone());
    let health = check_health(
        &checker,
        &config.api_url,
        Duration::from_secs(PROBE_TIMEOUT_SECS),
    )
    .await;
    if let DependencyStatus::Unhealthy { error, .. } = &health.api {
        report.api = false;
        report.errors.push(format!("API: {}", error));
    }

    if report.api && config.access_token.is_some() {
        let me = crate::services::AuthService::new(api.clone()).me().await;
        report.authenticated = Some(me.success);
        if !me.success {
            report.errors.push(format!("Access token: {}", me.message));
        }
    }

    Ok(report)
}

fn validate_env_vars(config: &Config) -> Result<()> {
    if config.api_url.is_empty() {
        anyhow::bail!("LUNANCE_API_URL is empty");
    }
    if config.request_timeout_secs > 300 {
        anyhow::bail!(
            "LUNANCE_REQUEST_TIMEOUT_SECS is {}s; keep it at or below 300s",
            config.request_timeout_secs
        );
    }
    Ok(())
}
