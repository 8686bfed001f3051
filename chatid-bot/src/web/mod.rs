//! Web server module for the Telegram webhook.
//!
//! This module provides the single webhook route that:
//! - Registers or unregisters the webhook on request
//! - Decodes inbound updates
//! - Replies with chat and user IDs
//! - Returns 200 OK for every well-formed update

pub mod handlers;
pub mod secret;

pub use handlers::{
    decode_update, health, router, webhook, AppState, BotContext, DecodeError, HealthResponse,
    WEBHOOK_REGISTERED, WEBHOOK_REGISTER_FAILED, WEBHOOK_UNREGISTERED, WEBHOOK_UNREGISTER_FAILED,
};
pub use secret::{verify_secret_token, SECRET_TOKEN_HEADER};
