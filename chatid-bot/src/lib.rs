//! Chat ID bot - Telegram webhook that reports chat and user IDs.
//!
//! Forward a message to the bot in a private chat to learn who it came
//! from, or mention the bot in a group to learn the group's ID.
//!
//! ## Architecture
//!
//! ```text
//! Telegram → webhook → decode Update → select reply → sendMessage
//! ```

pub mod config;
pub mod reply;
pub mod telegram;
pub mod web;

// Re-export commonly used types
pub use config::{BotSettings, Config, ConfigError};
pub use reply::{build_reply, BotName, IdentityReport, ReplyTarget};
pub use telegram::{BotApi, BotApiError, SendMessage, TelegramClient, Update, UpdateKind};
pub use web::{router, AppState};
