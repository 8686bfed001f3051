//! HTML rendering of identity reports.

use std::fmt::Write;

use crate::telegram::{Chat, User};

/// Type label used when the reported identity is a user rather than a chat.
pub const USER_TYPE: &str = "user";

/// ID, type, title and username of a chat or user, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityReport {
    pub chat_id: i64,
    pub kind: String,
    pub title: String,
    pub username: String,
    pub note: Option<String>,
}

impl IdentityReport {
    pub fn for_chat(chat: &Chat) -> Self {
        Self {
            chat_id: chat.id,
            kind: chat.kind.clone(),
            title: chat.title.clone().unwrap_or_default(),
            username: chat.username.clone().unwrap_or_default(),
            note: None,
        }
    }

    /// Report for a user, followed by `note` in italics.
    pub fn for_user(user: &User, note: impl Into<String>) -> Self {
        Self {
            chat_id: user.id,
            kind: USER_TYPE.to_string(),
            title: user.full_name(),
            username: user.username.clone().unwrap_or_default(),
            note: Some(note.into()).filter(|n: &String| !n.is_empty()),
        }
    }

    /// Render for Telegram's HTML parse mode.
    pub fn to_html(&self) -> String {
        let mut text = String::new();
        push_key_value(&mut text, "Chat ID", &self.chat_id.to_string());
        push_key_value(&mut text, "Type", &self.kind);
        push_key_value(&mut text, "Title", &self.title);
        push_key_value(&mut text, "Username", &self.username);

        if let Some(note) = &self.note {
            let _ = write!(text, "<i><b>Note:</b> {}</i>", escape_html(note));
        }

        text
    }
}

/// Append one `Key: value` line; empty values render as italic "none".
fn push_key_value(text: &mut String, key: &str, value: &str) {
    let _ = write!(text, "<b>{}: </b>", key);
    if value.is_empty() {
        text.push_str("<i>none</i>\n");
    } else {
        let _ = writeln!(text, "<code>{}</code>", escape_html(value));
    }
}

fn escape_html(text: &str) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut escaped, ch| {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                _ => escaped.push(ch),
            }
            escaped
        })
}
