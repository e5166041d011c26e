//! Per-chat conversation state and the in-memory store that owns it.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::dialog::{DialogState, Flow};
use crate::events::{tokens, ChatId, MediaRef};

/// Category label attached to every submitted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    Important,
    Complaint,
    Suggestion,
}

impl Tag {
    /// Maps a button token back to a tag. Unknown tokens are rejected by the
    /// state machine, not treated as errors.
    pub fn from_token(token: &str) -> Option<Tag> {
        match token {
            tokens::TAG_IMPORTANT => Some(Tag::Important),
            tokens::TAG_COMPLAINT => Some(Tag::Complaint),
            tokens::TAG_SUGGESTION => Some(Tag::Suggestion),
            _ => None,
        }
    }

    /// Label interpolated into the compiled message.
    pub fn label(&self) -> &'static str {
        match self {
            Tag::Important => "важливо",
            Tag::Complaint => "скарга",
            Tag::Suggestion => "побажання",
        }
    }
}

/// Kind of an attached media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Photo,
    Document,
}

/// At most one media item rides along with a submission. The caption, if
/// any, lives in [`Answers::final_message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedMedia {
    pub kind: MediaKind,
    pub media_ref: MediaRef,
}

/// Answers accumulated as the flow progresses. Fields are only ever gained,
/// never removed, until the session clears.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answers {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub group: Option<String>,
    pub final_message: Option<String>,
    pub tag: Option<Tag>,
    pub media: Option<AttachedMedia>,
}

/// Partial answer set produced by a transition; merged into the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswersPatch {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub group: Option<String>,
    pub final_message: Option<String>,
    pub tag: Option<Tag>,
    pub media: Option<AttachedMedia>,
}

impl AnswersPatch {
    pub fn name(value: &str) -> Self {
        AnswersPatch {
            name: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn contact(value: &str) -> Self {
        AnswersPatch {
            contact: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn group(value: &str) -> Self {
        AnswersPatch {
            group: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn final_message(value: &str) -> Self {
        AnswersPatch {
            final_message: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn tag(value: Tag) -> Self {
        AnswersPatch {
            tag: Some(value),
            ..Default::default()
        }
    }

    pub fn media(kind: MediaKind, media_ref: MediaRef) -> Self {
        AnswersPatch {
            media: Some(AttachedMedia { kind, media_ref }),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == AnswersPatch::default()
    }

    /// Merges set fields into `answers`, leaving the rest untouched.
    pub fn apply_to(self, answers: &mut Answers) {
        if let Some(name) = self.name {
            answers.name = Some(name);
        }
        if let Some(contact) = self.contact {
            answers.contact = Some(contact);
        }
        if let Some(group) = self.group {
            answers.group = Some(group);
        }
        if let Some(final_message) = self.final_message {
            answers.final_message = Some(final_message);
        }
        if let Some(tag) = self.tag {
            answers.tag = Some(tag);
        }
        if let Some(media) = self.media {
            answers.media = Some(media);
        }
    }
}

/// One in-progress dialog. Absence of a session means the chat is idle.
#[derive(Debug, Clone)]
pub struct Session {
    pub flow: Flow,
    pub state: DialogState,
    pub answers: Answers,
    pub started_at: OffsetDateTime,
}

impl Session {
    pub fn new(flow: Flow) -> Self {
        Session {
            flow,
            state: flow.entry_state(),
            answers: Answers::default(),
            started_at: OffsetDateTime::now_utc(),
        }
    }

    /// Seconds since the session was opened. Used for log lines on clear.
    pub fn age_seconds(&self) -> i64 {
        (OffsetDateTime::now_utc() - self.started_at).whole_seconds()
    }
}

/// In-memory table of active sessions, keyed by chat id.
///
/// A missing entry is an idle chat, never an error. Mutation of a single
/// session is serialized upstream by the event bus; the lock here only
/// guards the table across sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<ChatId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    pub async fn get(&self, chat: ChatId) -> Option<Session> {
        self.sessions.read().await.get(&chat).cloned()
    }

    /// Installs a fresh session, discarding any stale one for the chat.
    pub async fn set(&self, chat: ChatId, session: Session) {
        let previous = self.sessions.write().await.insert(chat, session);
        if let Some(previous) = previous {
            debug!("chat {chat}: discarded stale {:?} session", previous.flow);
        }
    }

    /// Merges answer fields into the session. Flow and state are never
    /// touched through this path. A missing session is a no-op.
    pub async fn update(&self, chat: ChatId, patch: AnswersPatch) {
        if let Some(session) = self.sessions.write().await.get_mut(&chat) {
            patch.apply_to(&mut session.answers);
        }
    }

    /// Moves the session to the next dialog state.
    pub async fn advance(&self, chat: ChatId, state: DialogState) {
        if let Some(session) = self.sessions.write().await.get_mut(&chat) {
            debug!("chat {chat}: {:?} -> {:?}", session.state, state);
            session.state = state;
        }
    }

    /// Returns the chat to idle. Subsequent `get` returns `None`.
    pub async fn clear(&self, chat: ChatId) {
        if let Some(session) = self.sessions.write().await.remove(&chat) {
            debug!("chat {chat}: session cleared after {}s", session.age_seconds());
        }
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_from_token() {
        assert_eq!(Tag::from_token("tag_важливо"), Some(Tag::Important));
        assert_eq!(Tag::from_token("tag_скарга"), Some(Tag::Complaint));
        assert_eq!(Tag::from_token("tag_побажання"), Some(Tag::Suggestion));

        assert_eq!(Tag::from_token("tag_unknown"), None);
        assert_eq!(Tag::from_token("confirm_send"), None);
        assert_eq!(Tag::from_token(""), None);
    }

    #[test]
    fn test_patch_merges_without_clobbering() {
        let mut answers = Answers::default();

        AnswersPatch::name("Тарас Іваненко").apply_to(&mut answers);
        AnswersPatch::contact("@taras").apply_to(&mut answers);

        assert_eq!(answers.name.as_deref(), Some("Тарас Іваненко"));
        assert_eq!(answers.contact.as_deref(), Some("@taras"));
        assert_eq!(answers.group, None);

        // An empty patch leaves everything in place.
        AnswersPatch::default().apply_to(&mut answers);
        assert_eq!(answers.name.as_deref(), Some("Тарас Іваненко"));
    }

    #[tokio::test]
    async fn test_store_missing_session_is_idle() {
        let store = SessionStore::new();
        let chat = ChatId(7);

        assert!(store.get(chat).await.is_none());

        // Updates and clears against an idle chat are no-ops, not failures.
        store.update(chat, AnswersPatch::name("x")).await;
        store.clear(chat).await;
        assert!(store.get(chat).await.is_none());
    }

    #[tokio::test]
    async fn test_store_set_discards_stale_session() {
        let store = SessionStore::new();
        let chat = ChatId(7);

        let mut stale = Session::new(Flow::Regular);
        stale.answers.name = Some("left over".to_string());
        store.set(chat, stale).await;

        store.set(chat, Session::new(Flow::Anonymous)).await;

        let session = store.get(chat).await.unwrap();
        assert_eq!(session.flow, Flow::Anonymous);
        assert_eq!(session.answers, Answers::default());
    }

    #[tokio::test]
    async fn test_store_clear_returns_to_idle() {
        let store = SessionStore::new();
        let chat = ChatId(9);

        store.set(chat, Session::new(Flow::Regular)).await;
        assert_eq!(store.active_sessions().await, 1);

        store.clear(chat).await;
        assert!(store.get(chat).await.is_none());
        assert_eq!(store.active_sessions().await, 0);
    }
}
