//! Webhook endpoint handlers.
//!
//! A single route serves both Telegram deliveries and the two
//! administrative actions, selected by the raw query string:
//! 1. `?register` sets the webhook to this deployment's URL
//! 2. `?unregister` deletes it, dropping pending updates
//! 3. Anything else is decoded as an update and answered

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::{BotSettings, Config};
use crate::reply::{build_reply, BotName};
use crate::telegram::{BotApi, BotApiError, Update, UpdateKind};
use crate::web::secret::{verify_secret_token, SECRET_TOKEN_HEADER};

/// Shared application state.
///
/// `bot` is `None` when required configuration was missing at startup; every
/// webhook request then fails with 500 without touching the Bot API.
#[derive(Clone)]
pub struct AppState {
    bot: Option<Arc<BotContext>>,
}

/// Everything a request needs once the bot is authenticated.
pub struct BotContext {
    pub api: Arc<dyn BotApi>,
    pub webhook_url: String,
    pub bot_name: BotName,
    pub secret_token: Option<String>,
}

impl AppState {
    /// State that answers every webhook request with 500.
    pub fn unconfigured() -> Self {
        Self { bot: None }
    }

    /// Validate `config`, build the Bot API client with `connect` and
    /// authenticate with `getMe`.
    ///
    /// Missing configuration is not an error here: it yields
    /// [`AppState::unconfigured`] and `connect` is never called. A client
    /// that fails to authenticate is an error, since no request could
    /// succeed without the bot's identity.
    pub async fn bootstrap<F>(config: &Config, connect: F) -> Result<Self, BotApiError>
    where
        F: FnOnce(&BotSettings) -> Result<Arc<dyn BotApi>, BotApiError>,
    {
        let settings = match config.bot_settings() {
            Ok(settings) => settings,
            Err(e) => {
                error!(error = %e, "config_incomplete");
                return Ok(Self::unconfigured());
            }
        };

        info!(webhook_url = %settings.webhook_url, "webhook_url_resolved");

        let api = connect(&settings)?;
        let me = api.get_me().await?;
        let bot_name = BotName::from_username(me.username.as_deref().unwrap_or_default());

        info!(bot_name = %bot_name, bot_id = me.id, "bot_authorized");

        Ok(Self {
            bot: Some(Arc::new(BotContext {
                api,
                webhook_url: settings.webhook_url,
                bot_name,
                secret_token: config.webhook_secret_token.clone(),
            })),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.bot.is_some()
    }
}

/// Build the router serving the webhook and health check.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(webhook))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Webhook
// =============================================================================

pub const WEBHOOK_REGISTERED: &str = "Webhook registered";
pub const WEBHOOK_REGISTER_FAILED: &str = "Failed to register webhook";
pub const WEBHOOK_UNREGISTERED: &str = "Webhook unregistered";
pub const WEBHOOK_UNREGISTER_FAILED: &str = "Failed to unregister webhook";

/// Webhook endpoint.
pub async fn webhook(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(bot) = state.bot.as_deref() else {
        error!("webhook_unconfigured");
        return status_text(StatusCode::INTERNAL_SERVER_ERROR);
    };

    debug!(webhook_url = %bot.webhook_url, query = ?query, "webhook_request_received");

    match query.as_deref() {
        Some("register") => register(bot).await.into_response(),
        Some("unregister") => unregister(bot).await.into_response(),
        _ => process_update(bot, &headers, &body).await,
    }
}

async fn register(bot: &BotContext) -> (StatusCode, &'static str) {
    info!(webhook_url = %bot.webhook_url, "webhook_registering");

    match bot
        .api
        .set_webhook(&bot.webhook_url, bot.secret_token.as_deref())
        .await
    {
        Ok(()) => {
            info!(webhook_url = %bot.webhook_url, "webhook_registered");
            (StatusCode::OK, WEBHOOK_REGISTERED)
        }
        Err(e) => {
            error!(error = %e, "webhook_register_failed");
            (StatusCode::OK, WEBHOOK_REGISTER_FAILED)
        }
    }
}

async fn unregister(bot: &BotContext) -> (StatusCode, &'static str) {
    info!("webhook_unregistering");

    match bot.api.delete_webhook(true).await {
        Ok(()) => {
            info!("webhook_unregistered");
            (StatusCode::OK, WEBHOOK_UNREGISTERED)
        }
        Err(e) => {
            error!(error = %e, "webhook_unregister_failed");
            (StatusCode::OK, WEBHOOK_UNREGISTER_FAILED)
        }
    }
}

async fn process_update(bot: &BotContext, headers: &HeaderMap, body: &[u8]) -> Response {
    if let Some(expected) = &bot.secret_token {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if !verify_secret_token(expected, provided) {
            return status_text(StatusCode::UNAUTHORIZED);
        }
    }

    let update = match decode_update(body) {
        Ok(update) => update,
        Err(DecodeError::Empty) => return status_text(StatusCode::BAD_REQUEST),
        Err(DecodeError::Json(e)) => {
            warn!(error = %e, body_length = body.len(), "update_json_error");
            return status_text(StatusCode::BAD_REQUEST);
        }
    };

    if let Some(msg) = &update.message {
        if let Some(reply) = build_reply(msg, &bot.bot_name) {
            match bot.api.send_message(&reply).await {
                Ok(()) => debug!(chat_id = reply.chat_id, "reply_sent"),
                Err(e) => error!(error = %e, chat_id = reply.chat_id, "reply_send_failed"),
            }
        }
    }

    let parts: Vec<&str> = update.kinds().into_iter().map(UpdateKind::as_str).collect();
    info!(update_id = update.update_id, parts = ?parts, "update_received");

    (StatusCode::OK, "OK").into_response()
}

/// Why a request body could not be turned into an [`Update`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty request body")]
    Empty,

    #[error("invalid update JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode the first JSON document in `body`; anything after it is ignored.
///
/// A bare `null` document decodes to an empty update.
pub fn decode_update(body: &[u8]) -> Result<Update, DecodeError> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<Update>>()
        .next()
    {
        None => Err(DecodeError::Empty),
        Some(result) => Ok(result?.unwrap_or_default()),
    }
}

/// Respond with the status code's canonical reason as the body.
fn status_text(status: StatusCode) -> Response {
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}
