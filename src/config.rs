use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Serialize;
use std::env;
use url::Url;

use crate::api::DEFAULT_TIMEOUT_SECS;
use crate::error::ClientError;
use crate::validation::EmailPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub academic_email_only: bool,
}

impl Config {
    pub fn new(api_url: impl Into<String>) -> Self {
        Config {
            api_url: api_url.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            access_token: None,
            academic_email_only: true,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = parse_api_url(
            &lookup("LUNANCE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let request_timeout_secs = match lookup("LUNANCE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("LUNANCE_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if request_timeout_secs == 0 {
            return Err(ClientError::Config(
                "LUNANCE_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            )
            .into());
        }

        let academic_email_only = match lookup("LUNANCE_ACADEMIC_EMAIL_ONLY") {
            Some(raw) => parse_flag(&raw)
                .context("LUNANCE_ACADEMIC_EMAIL_ONLY must be true or false")?,
            None => true,
        };

        Ok(Config {
            api_url,
            request_timeout_secs,
            access_token: lookup("LUNANCE_ACCESS_TOKEN").filter(|t| !t.trim().is_empty()),
            academic_email_only,
        })
    }

    pub fn email_policy(&self) -> EmailPolicy {
        if self.academic_email_only {
            EmailPolicy::AcademicOnly
        } else {
            EmailPolicy::Any
        }
    }
}

fn parse_api_url(raw: &str) -> Result<String> {
    let value = raw.trim();
    let parsed = Url::parse(value).with_context(|| format!("invalid LUNANCE_API_URL: {}", value))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "LUNANCE_API_URL must use http or https, got {}",
            parsed.scheme()
        ))
        .into());
    }
    if parsed.host_str().is_none() {
        return Err(ClientError::Config("LUNANCE_API_URL must include a host".to_string()).into());
    }

    Ok(value.trim_end_matches('/').to_string())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
