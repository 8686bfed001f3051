//! Identity reply selection.
//!
//! Given an inbound message, decide whose identity (if anyone's) to report
//! back to the sender, and build the outgoing message.
//!
//! ## Precedence
//!
//! ```text
//! directed at the bot (chat known)   → the message's own chat
//! private + forwarded from a chat    → the forwarded-from chat
//! private + forwarded from a user    → the forwarded-from user (+ note)
//! private                            → instructions
//! anything else                      → no reply
//! ```

pub mod format;

use tracing::warn;

use crate::telegram::{Chat, Message, SendMessage, User};

pub use format::IdentityReport;

/// The bot's username prefixed with `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotName(String);

impl BotName {
    pub fn from_username(username: &str) -> Self {
        Self(format!("@{}", username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appended to user reports, since a user ID is not a group ID.
    pub fn group_chat_note(&self) -> String {
        format!("To get the ID for a group chat, invite {} to the chat", self.0)
    }

    /// Reply to a private message that gives the bot nothing to report.
    pub fn instructions(&self) -> String {
        format!(
            "To get the ID of a chat, forward a message to this chat or start your message with {}",
            self.0
        )
    }
}

impl std::fmt::Display for BotName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observable properties of a message that drive reply selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageTraits {
    /// Text starts with the bot's mention-name
    pub directed: bool,
    /// Carries a forwarded-from user
    pub forwarded: bool,
    /// Sent in a private chat with the bot
    pub private: bool,
}

impl MessageTraits {
    pub fn of(msg: &Message, bot_name: &BotName) -> Self {
        Self {
            directed: msg.text().starts_with(bot_name.as_str()),
            forwarded: msg.forward_from.is_some(),
            private: msg.is_private(),
        }
    }
}

/// What the reply should describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTarget<'a> {
    Instructions,
    Chat(&'a Chat),
    User(&'a User),
}

/// Pick the reply target from the message traits and the candidate entities.
pub fn decide<'a>(
    traits: MessageTraits,
    chat: Option<&'a Chat>,
    forward_from: Option<&'a User>,
    forward_from_chat: Option<&'a Chat>,
) -> Option<ReplyTarget<'a>> {
    if let (true, Some(chat)) = (traits.directed, chat) {
        return Some(ReplyTarget::Chat(chat));
    }

    if !traits.private {
        return None;
    }

    if traits.forwarded {
        return match (forward_from_chat, forward_from) {
            (Some(chat), _) => Some(ReplyTarget::Chat(chat)),
            (None, Some(user)) => Some(ReplyTarget::User(user)),
            (None, None) => None,
        };
    }

    Some(ReplyTarget::Instructions)
}

/// Reply target for `msg`.
pub fn select_reply<'a>(msg: &'a Message, bot_name: &BotName) -> Option<ReplyTarget<'a>> {
    decide(
        MessageTraits::of(msg, bot_name),
        msg.chat.as_ref(),
        msg.forward_from.as_ref(),
        msg.forward_from_chat.as_ref(),
    )
}

impl ReplyTarget<'_> {
    /// Build the outgoing message addressed to `recipient`.
    pub fn into_message(self, recipient: i64, bot_name: &BotName) -> SendMessage {
        match self {
            ReplyTarget::Instructions => SendMessage::plain(recipient, bot_name.instructions()),
            ReplyTarget::Chat(chat) => {
                SendMessage::html(recipient, IdentityReport::for_chat(chat).to_html())
            }
            ReplyTarget::User(user) => SendMessage::html(
                recipient,
                IdentityReport::for_user(user, bot_name.group_chat_note()).to_html(),
            ),
        }
    }
}

/// The reply for `msg`, sent privately to its author.
///
/// Returns `None` when there is nothing to report or no author to send to.
pub fn build_reply(msg: &Message, bot_name: &BotName) -> Option<SendMessage> {
    let target = select_reply(msg, bot_name)?;

    let Some(sender) = &msg.from else {
        warn!(message_id = msg.message_id, "reply_without_sender");
        return None;
    };

    Some(target.into_message(sender.id, bot_name))
}
