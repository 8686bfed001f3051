//! Async Bot API client.
//!
//! Every method is a JSON `POST` to `{base}/bot{token}/{method}`; the
//! response envelope is unwrapped into either the result or a
//! [`BotApiError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::types::{ApiResponse, DeleteWebhook, SendMessage, SetWebhook, User};

/// Failure talking to the Bot API.
#[derive(Debug, Error)]
pub enum BotApiError {
    #[error("invalid Bot API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Bot API request failed: {0}")]
    Http(reqwest::Error),

    #[error("Bot API error: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },

    #[error("Bot API response for {0} had no result")]
    MissingResult(&'static str),
}

impl From<reqwest::Error> for BotApiError {
    // reqwest errors carry the request URL, which embeds the token.
    fn from(err: reqwest::Error) -> Self {
        BotApiError::Http(err.without_url())
    }
}

/// The Bot API operations the webhook needs.
///
/// Implemented by [`TelegramClient`]; tests substitute an in-memory fake.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Fetch the bot's own account, which also proves the token is valid.
    async fn get_me(&self) -> Result<User, BotApiError>;

    async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<(), BotApiError>;

    async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), BotApiError>;

    async fn send_message(&self, message: &SendMessage) -> Result<(), BotApiError>;
}

/// reqwest-backed Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    base: Url,
}

impl std::fmt::Debug for TelegramClient {
    // The base URL embeds the token.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("host", &self.base.host_str())
            .finish()
    }
}

impl TelegramClient {
    /// Create a client for `token` against the Bot API at `api_url`.
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, BotApiError> {
        // Tokens contain a colon, so they cannot go through `Url::join`.
        let base = Url::parse(&format!("{}/bot{}/", api_url.trim_end_matches('/'), token))?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    fn method_url(&self, method: &str) -> Result<Url, BotApiError> {
        Ok(self.base.join(method)?)
    }

    async fn call<P, R>(&self, method: &'static str, params: &P) -> Result<R, BotApiError>
    where
        P: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.method_url(method)?;
        debug!(method = method, "bot_api_request");

        // Telegram reports failures with a non-2xx status *and* a JSON
        // envelope, so the body is parsed regardless of status.
        let response = self.http.post(url).json(params).send().await?;
        let status = response.status().as_u16();
        let envelope: ApiResponse<R> = response.json().await?;

        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| format!("HTTP {}", status));
            warn!(
                method = method,
                status_code = status,
                error_code = envelope.error_code,
                description = %description,
                "bot_api_error"
            );
            return Err(BotApiError::Api {
                code: envelope.error_code,
                description,
            });
        }

        envelope.result.ok_or(BotApiError::MissingResult(method))
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn get_me(&self) -> Result<User, BotApiError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<(), BotApiError> {
        let _: bool = self
            .call("setWebhook", &SetWebhook { url, secret_token })
            .await?;
        Ok(())
    }

    async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), BotApiError> {
        let _: bool = self
            .call("deleteWebhook", &DeleteWebhook { drop_pending_updates })
            .await?;
        Ok(())
    }

    async fn send_message(&self, message: &SendMessage) -> Result<(), BotApiError> {
        let _: serde_json::Value = self.call("sendMessage", message).await?;
        Ok(())
    }
}
