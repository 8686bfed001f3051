//! Configuration module for environment variable parsing.
//!
//! The four deployment variables are required for the bot to do anything
//! useful, but their absence only fails requests, never the process.

use std::env;
use thiserror::Error;
use tracing::warn;

/// Default Telegram Bot API endpoint.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,

    /// Hosting project identifier
    pub project: String,

    /// Hosting region
    pub region: String,

    /// Deployed function/service name
    pub service: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Base URL of the Bot API
    pub telegram_api_url: String,

    /// HTTP request timeout in milliseconds for outbound Bot API calls
    pub request_timeout_ms: u64,

    /// Secret token Telegram echoes back in `X-Telegram-Bot-Api-Secret-Token`
    pub webhook_secret_token: Option<String>,
}

/// Validated subset of [`Config`] needed to talk to the Bot API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    pub bot_token: String,
    pub webhook_url: String,
}

/// Raised when required deployment variables are empty or unset.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("missing environment variables: {}", .missing.join(", "))]
pub struct ConfigError {
    pub missing: Vec<&'static str>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            bot_token: env::var("BOT_API_TOKEN").unwrap_or_default(),

            project: env::var("GCP_PROJECT").unwrap_or_default(),

            region: env::var("FUNCTION_REGION").unwrap_or_default(),

            service: env::var("K_SERVICE").unwrap_or_default(),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            telegram_api_url: env::var("TELEGRAM_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),

            request_timeout_ms: parse_u64("REQUEST_TIMEOUT_MS", 8000),

            webhook_secret_token: env::var("WEBHOOK_SECRET_TOKEN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// Check the required variables and derive the webhook URL.
    pub fn bot_settings(&self) -> Result<BotSettings, ConfigError> {
        let missing: Vec<&'static str> = [
            ("BOT_API_TOKEN", &self.bot_token),
            ("GCP_PROJECT", &self.project),
            ("FUNCTION_REGION", &self.region),
            ("K_SERVICE", &self.service),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError { missing });
        }

        Ok(BotSettings {
            bot_token: self.bot_token.clone(),
            webhook_url: webhook_url(&self.region, &self.project, &self.service),
        })
    }
}

/// Public URL Telegram should deliver updates to.
pub fn webhook_url(region: &str, project: &str, service: &str) -> String {
    format!("https://{}-{}.cloudfunctions.net/{}", region, project, service)
}

/// Parse an unsigned integer variable, falling back on absent or bad input.
fn parse_u64(name: &str, default: u64) -> u64 {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<u64>() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid integer value, using default");
            default
        }
    }
}
