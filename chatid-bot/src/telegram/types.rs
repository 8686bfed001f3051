//! Bot API wire types.
//!
//! Only the fields the bot inspects are modelled in detail. The remaining
//! update payloads are kept as raw JSON objects so that classification can
//! see them without this crate tracking every Bot API schema change.

use serde::{Deserialize, Deserializer, Serialize};

/// An update payload the bot never inspects beyond its presence.
pub type RawPayload = serde_json::Map<String, serde_json::Value>;

/// Chat type Telegram uses for one-to-one conversations with the bot.
pub const PRIVATE_CHAT: &str = "private";

// =============================================================================
// Inbound Types
// =============================================================================

/// Read an explicit JSON `null` as the field's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One inbound notification delivered to the webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    #[serde(default, deserialize_with = "null_as_default")]
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub edited_message: Option<Message>,
    #[serde(default)]
    pub channel_post: Option<Message>,
    #[serde(default)]
    pub edited_channel_post: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<RawPayload>,
    #[serde(default)]
    pub inline_query: Option<RawPayload>,
    #[serde(default)]
    pub chosen_inline_result: Option<RawPayload>,
    #[serde(default)]
    pub poll: Option<RawPayload>,
    #[serde(default)]
    pub poll_answer: Option<RawPayload>,
    #[serde(default)]
    pub chat_member: Option<RawPayload>,
    #[serde(default)]
    pub my_chat_member: Option<RawPayload>,
    #[serde(default)]
    pub chat_join_request: Option<RawPayload>,
    #[serde(default)]
    pub pre_checkout_query: Option<RawPayload>,
    #[serde(default)]
    pub shipping_query: Option<RawPayload>,
}

/// Label for each kind of payload an [`Update`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    CallbackQuery,
    ChannelPost,
    ChatJoinRequest,
    ChatMember,
    ChosenInlineResult,
    EditedChannelPost,
    EditedMessage,
    InlineQuery,
    Message,
    MyChatMember,
    Poll,
    PollAnswer,
    PreCheckoutQuery,
    ShippingQuery,
}

impl UpdateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateKind::CallbackQuery => "CallbackQuery",
            UpdateKind::ChannelPost => "ChannelPost",
            UpdateKind::ChatJoinRequest => "ChatJoinRequest",
            UpdateKind::ChatMember => "ChatMember",
            UpdateKind::ChosenInlineResult => "ChosenInlineResult",
            UpdateKind::EditedChannelPost => "EditedChannelPost",
            UpdateKind::EditedMessage => "EditedMessage",
            UpdateKind::InlineQuery => "InlineQuery",
            UpdateKind::Message => "Message",
            UpdateKind::MyChatMember => "MyChatMember",
            UpdateKind::Poll => "Poll",
            UpdateKind::PollAnswer => "PollAnswer",
            UpdateKind::PreCheckoutQuery => "PreCheckoutQuery",
            UpdateKind::ShippingQuery => "ShippingQuery",
        }
    }
}

impl Update {
    /// Every payload present on this update, in alphabetical label order.
    ///
    /// Telegram normally sends exactly one, but nothing here relies on it.
    pub fn kinds(&self) -> Vec<UpdateKind> {
        [
            (self.callback_query.is_some(), UpdateKind::CallbackQuery),
            (self.channel_post.is_some(), UpdateKind::ChannelPost),
            (self.chat_join_request.is_some(), UpdateKind::ChatJoinRequest),
            (self.chat_member.is_some(), UpdateKind::ChatMember),
            (self.chosen_inline_result.is_some(), UpdateKind::ChosenInlineResult),
            (self.edited_channel_post.is_some(), UpdateKind::EditedChannelPost),
            (self.edited_message.is_some(), UpdateKind::EditedMessage),
            (self.inline_query.is_some(), UpdateKind::InlineQuery),
            (self.message.is_some(), UpdateKind::Message),
            (self.my_chat_member.is_some(), UpdateKind::MyChatMember),
            (self.poll.is_some(), UpdateKind::Poll),
            (self.poll_answer.is_some(), UpdateKind::PollAnswer),
            (self.pre_checkout_query.is_some(), UpdateKind::PreCheckoutQuery),
            (self.shipping_query.is_some(), UpdateKind::ShippingQuery),
        ]
        .into_iter()
        .filter_map(|(present, kind)| present.then_some(kind))
        .collect()
    }
}

/// A chat message, trimmed to the fields used for identity lookups.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub chat: Option<Chat>,
    #[serde(default)]
    pub forward_from: Option<User>,
    #[serde(default)]
    pub forward_from_chat: Option<Chat>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn is_private(&self) -> bool {
        self.chat.as_ref().is_some_and(|chat| chat.kind == PRIVATE_CHAT)
    }
}

/// A Telegram user or bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// First and last name joined by a space, skipping empty parts.
    pub fn full_name(&self) -> String {
        [Some(self.first_name.as_str()), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A private chat, group, supergroup or channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Chat {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

// =============================================================================
// Outbound Types
// =============================================================================

/// Parameters for `sendMessage`.
///
/// `reply_to_message_id` is deliberately absent: replying to a message that
/// lives in a group chat fails with "message to be replied not found".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

impl SendMessage {
    pub fn plain(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: None,
        }
    }

    pub fn html(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: Some("HTML"),
        }
    }
}

/// Parameters for `setWebhook`.
#[derive(Debug, Clone, Serialize)]
pub struct SetWebhook<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<&'a str>,
}

/// Parameters for `deleteWebhook`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteWebhook {
    pub drop_pending_updates: bool,
}

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}
