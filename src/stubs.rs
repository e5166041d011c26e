use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::dispatch::ChatTransport;
use crate::errors::Error;
use crate::events::{ChatId, Keyboard, MediaRef};

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outbound {
    Text {
        chat: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Photo {
        chat: ChatId,
        media: MediaRef,
        caption: String,
    },
    Document {
        chat: ChatId,
        media: MediaRef,
        caption: String,
    },
}

#[derive(Debug, Default)]
enum Behavior {
    #[default]
    Record,
    Fail(String),
    /// Fail sends to one chat, record the rest. Lets a test break the
    /// destination channel while prompts still flow.
    FailFor(ChatId, String),
    Stall,
}

/// Transport double that records outbound traffic for assertions.
#[derive(Debug, Default)]
pub(crate) struct TransportStub {
    sent: Mutex<Vec<Outbound>>,
    behavior: Behavior,
}

impl TransportStub {
    pub(crate) fn new() -> Self {
        TransportStub::default()
    }

    /// Every send fails with a transport error carrying `message`.
    pub(crate) fn failing(message: &str) -> Self {
        TransportStub {
            behavior: Behavior::Fail(message.to_string()),
            ..Default::default()
        }
    }

    /// Sends to `chat` fail; everything else records normally.
    pub(crate) fn failing_for(chat: ChatId, message: &str) -> Self {
        TransportStub {
            behavior: Behavior::FailFor(chat, message.to_string()),
            ..Default::default()
        }
    }

    /// Every send hangs well past any reasonable timeout.
    pub(crate) fn stalled() -> Self {
        TransportStub {
            behavior: Behavior::Stall,
            ..Default::default()
        }
    }

    pub(crate) fn outbound(&self) -> Vec<Outbound> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts sent to `chat`, in order.
    pub(crate) fn texts_to(&self, chat: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|outbound| match outbound {
                Outbound::Text { chat: to, text, .. } if *to == chat => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, outbound: Outbound) -> Result<(), Error> {
        match &self.behavior {
            Behavior::Record => {
                self.sent.lock().unwrap().push(outbound);
                Ok(())
            }
            Behavior::Fail(message) => Err(Error::Transport(message.clone())),
            Behavior::FailFor(chat, message) => {
                let to = match &outbound {
                    Outbound::Text { chat, .. } | Outbound::Photo { chat, .. } | Outbound::Document { chat, .. } => *chat,
                };
                if to == *chat {
                    return Err(Error::Transport(message.clone()));
                }
                self.sent.lock().unwrap().push(outbound);
                Ok(())
            }
            Behavior::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ChatTransport for TransportStub {
    async fn send_text(&self, chat: ChatId, text: &str, keyboard: Option<Keyboard>) -> Result<(), Error> {
        self.record(Outbound::Text {
            chat,
            text: text.to_string(),
            keyboard,
        })
        .await
    }

    async fn send_photo(&self, chat: ChatId, media: &MediaRef, caption: &str) -> Result<(), Error> {
        self.record(Outbound::Photo {
            chat,
            media: media.clone(),
            caption: caption.to_string(),
        })
        .await
    }

    async fn send_document(&self, chat: ChatId, media: &MediaRef, caption: &str) -> Result<(), Error> {
        self.record(Outbound::Document {
            chat,
            media: media.clone(),
            caption: caption.to_string(),
        })
        .await
    }
}
