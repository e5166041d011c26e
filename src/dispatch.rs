//! Outbound side: the transport trait and the submit facade.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use tokio::time::timeout;

use crate::dialog::Flow;
use crate::errors::Error;
use crate::events::{ChatId, Keyboard, MediaRef};
use crate::format;
use crate::session::{Answers, MediaKind};

/// Upper bound on any single outbound send. The core never retries; retry
/// policy, if any, belongs to the transport binding.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Abstract chat transport the core talks through.
///
/// Implementations adapt a concrete chat platform: render [`Keyboard`]
/// specs, resolve [`MediaRef`]s, pick the markup mode. All texts handed to
/// the transport are MarkdownV2-ready.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat: ChatId, text: &str, keyboard: Option<Keyboard>) -> Result<(), Error>;
    async fn send_photo(&self, chat: ChatId, media: &MediaRef, caption: &str) -> Result<(), Error>;
    async fn send_document(&self, chat: ChatId, media: &MediaRef, caption: &str) -> Result<(), Error>;
}

/// Applies the send timeout to one outbound operation.
pub(crate) async fn bounded<F>(limit: Duration, operation: F) -> Result<(), Error>
where
    F: Future<Output = Result<(), Error>>,
{
    match timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(limit)),
    }
}

/// Sends a confirmed submission to the destination channel.
pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    destination: ChatId,
    send_timeout: Duration,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn ChatTransport>, destination: ChatId) -> Self {
        Dispatcher {
            transport,
            destination,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    pub fn destination(&self) -> ChatId {
        self.destination
    }

    /// Renders the compiled message and sends it to the destination. With
    /// an attached medium the text rides along as its caption; otherwise it
    /// goes out as a plain message. Failures are returned, never swallowed.
    pub async fn submit(&self, flow: Flow, answers: &Answers) -> Result<(), Error> {
        let text = format::render(flow, answers)?;

        debug!("submitting {:?} message to chat {}", flow, self.destination);

        let send = async {
            match &answers.media {
                Some(media) => match media.kind {
                    MediaKind::Photo => self.transport.send_photo(self.destination, &media.media_ref, &text).await,
                    MediaKind::Document => self.transport.send_document(self.destination, &media.media_ref, &text).await,
                },
                None => self.transport.send_text(self.destination, &text, None).await,
            }
        };

        bounded(self.send_timeout, send).await?;

        info!("delivered {:?} submission to chat {}", flow, self.destination);
        Ok(())
    }
}
