use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api-inference.huggingface.co/models/";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Provider
    pub provider_base_url: String,
    pub provider_api_token: Option<String>,
    /// `None` leaves the outbound call without a timeout
    pub provider_timeout: Option<Duration>,
    /// Skip TLS certificate validation for the provider (self-signed/private endpoints only)
    pub provider_accept_invalid_certs: bool,

    // CORS
    pub allowed_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let provider_timeout_secs: u64 = match std::env::var("PROVIDER_TIMEOUT_SECS") {
            Ok(v) => v
                .trim()
                .parse()
                .with_context(|| format!("PROVIDER_TIMEOUT_SECS is not a number: '{}'", v))?,
            Err(_) => 30,
        };

        Ok(Self {
            // Server
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match std::env::var("PORT") {
                Ok(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT is not a valid port: '{}'", v))?,
                Err(_) => 8000,
            },

            // Provider
            provider_base_url: normalize_base_url(
                &std::env::var("PROVIDER_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_PROVIDER_BASE_URL.to_string()),
            ),
            provider_api_token: std::env::var("PROVIDER_API_TOKEN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            provider_timeout: (provider_timeout_secs > 0)
                .then(|| Duration::from_secs(provider_timeout_secs)),
            provider_accept_invalid_certs: std::env::var("PROVIDER_ACCEPT_INVALID_CERTS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),

            // CORS
            allowed_origin: std::env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string()),
        })
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            provider_base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            provider_api_token: None,
            provider_timeout: Some(Duration::from_secs(30)),
            provider_accept_invalid_certs: false,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}

/// Model identifiers are appended directly to the base URL, so it must end with '/'
fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
