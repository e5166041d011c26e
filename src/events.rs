//! Boundary types exchanged with the chat transport.
//!
//! The core does not know the transport's wire format. An inbound update is
//! reduced by the transport binding to an [`InboundEvent`]; outbound traffic
//! is plain text plus an opaque [`Keyboard`] spec the transport renders.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Chat identifier. Identifies both user sessions and the destination channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque media identifier, resolvable only by the transport that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef(pub String);

impl Display for MediaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input categories the dialog understands.
///
/// `Unsupported` carries the foreign kind name (voice, sticker, ...) so it
/// can show up in log lines; the dialog only ever rejects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    Text(String),
    Photo(MediaRef),
    Document(MediaRef),
    Button(String),
    Unsupported(String),
}

impl EventPayload {
    /// Short label for log lines.
    pub(crate) fn kind(&self) -> &str {
        match self {
            EventPayload::Text(_) => "text",
            EventPayload::Photo(_) => "photo",
            EventPayload::Document(_) => "document",
            EventPayload::Button(_) => "button",
            EventPayload::Unsupported(kind) => kind,
        }
    }
}

/// One inbound update, already tagged with the originating chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub chat: ChatId,
    pub payload: EventPayload,
}

impl InboundEvent {
    pub fn text(chat: ChatId, text: impl Into<String>) -> Self {
        InboundEvent {
            chat,
            payload: EventPayload::Text(text.into()),
        }
    }

    pub fn button(chat: ChatId, token: impl Into<String>) -> Self {
        InboundEvent {
            chat,
            payload: EventPayload::Button(token.into()),
        }
    }
}

/// A selectable option on an inline keyboard. The transport renders the
/// label; the token comes back verbatim as a [`EventPayload::Button`] press.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub token: String,
}

impl Button {
    pub fn new(label: &str, token: &str) -> Self {
        Button {
            label: label.to_string(),
            token: token.to_string(),
        }
    }
}

/// Opaque keyboard spec attached to an outbound prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Keyboard {
    /// Rows of plain labels; a selection arrives back as a text message.
    Reply(Vec<Vec<String>>),
    /// Rows of token-carrying buttons; a selection arrives as a button press.
    Inline(Vec<Vec<Button>>),
    /// Remove any previously offered reply keyboard.
    Remove,
}

/// Button tokens recognized verbatim by the state machine.
///
/// These are a compatibility surface shared with already deployed clients.
pub mod tokens {
    pub const TAG_IMPORTANT: &str = "tag_важливо";
    pub const TAG_COMPLAINT: &str = "tag_скарга";
    pub const TAG_SUGGESTION: &str = "tag_побажання";
    pub const CONFIRM_SEND: &str = "confirm_send";
    pub const CANCEL_SEND: &str = "cancel_send";
    pub const CONFIRM_ANONYMOUS_SEND: &str = "confirm_anonymous_send";
    pub const CANCEL_ANONYMOUS_SEND: &str = "cancel_anonymous_send";
}
