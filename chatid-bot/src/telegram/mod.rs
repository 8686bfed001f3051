//! Telegram Bot API module.
//!
//! This module provides:
//! - Wire types for inbound updates and outbound method parameters
//! - The [`BotApi`] seam and its reqwest-backed implementation

pub mod client;
pub mod types;

pub use client::{BotApi, BotApiError, TelegramClient};
pub use types::{Chat, Message, SendMessage, Update, UpdateKind, User, PRIVATE_CHAT};
