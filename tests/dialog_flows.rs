//! End-to-end dialog scenarios through the public API: events enter via the
//! bus, prompts and submissions leave through a recording transport.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use radabot::prelude::*;
use radabot::prompts;

const USER: ChatId = ChatId(42);
const DESTINATION: ChatId = ChatId(-1001);

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Text { chat: ChatId, text: String },
    Photo { chat: ChatId, media: String, caption: String },
}

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingTransport {
    fn to_chat(&self, chat: ChatId) -> Vec<Sent> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|sent| match sent {
                Sent::Text { chat: to, .. } | Sent::Photo { chat: to, .. } => *to == chat,
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, chat: ChatId, text: &str, _keyboard: Option<Keyboard>) -> Result<(), Error> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_photo(&self, chat: ChatId, media: &MediaRef, caption: &str) -> Result<(), Error> {
        self.sent.lock().unwrap().push(Sent::Photo {
            chat,
            media: media.0.clone(),
            caption: caption.to_string(),
        });
        Ok(())
    }

    async fn send_document(&self, chat: ChatId, media: &MediaRef, caption: &str) -> Result<(), Error> {
        // The scenarios below only attach photos; reuse the photo record so
        // an unexpected document still shows up in assertions.
        self.send_photo(chat, media, caption).await
    }
}

struct Harness {
    transport: Arc<RecordingTransport>,
    engine: Arc<DialogEngine>,
    sender: mpsc::UnboundedSender<InboundEvent>,
    bus: tokio::task::JoinHandle<()>,
}

impl Harness {
    fn start() -> Self {
        let transport = Arc::new(RecordingTransport::default());
        let engine = Arc::new(DialogEngine::new(transport.clone(), DESTINATION));
        let (sender, receiver) = mpsc::unbounded_channel();
        let bus = EventBus::new(engine.clone()).run(receiver);

        Harness {
            transport,
            engine,
            sender,
            bus,
        }
    }

    fn feed(&self, events: &[InboundEvent]) {
        for event in events {
            self.sender.send(event.clone()).unwrap();
        }
    }

    /// Waits until outbound traffic to `chat` stops growing.
    async fn settled(&self, chat: ChatId) -> Vec<Sent> {
        let mut last = self.transport.to_chat(chat);
        for _ in 0..250 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let now = self.transport.to_chat(chat);
            if now == last && !now.is_empty() {
                return now;
            }
            last = now;
        }
        panic!("chat {chat}: outbound traffic never settled");
    }

    async fn shutdown(self) {
        drop(self.sender);
        self.bus.await.unwrap();
    }
}

#[tokio::test]
async fn regular_submission_reaches_destination() {
    let harness = Harness::start();

    harness.feed(&[
        InboundEvent::text(USER, prompts::MENU_SEND),
        InboundEvent::text(USER, "Тарас Іваненко"),
        InboundEvent::text(USER, "@taras"),
        InboundEvent::text(USER, "Е-14"),
        InboundEvent::text(USER, "Вітаю"),
        InboundEvent::button(USER, tokens::TAG_COMPLAINT),
        InboundEvent::button(USER, tokens::CONFIRM_SEND),
    ]);

    harness.settled(USER).await;

    let submits = harness.settled(DESTINATION).await;
    assert_eq!(submits.len(), 1);
    match &submits[0] {
        Sent::Text { text, .. } => {
            assert!(text.starts_with("Нове повідомлення:"));
            assert!(text.contains("Тарас Іваненко"));
            assert!(text.contains("@taras"));
            assert!(text.contains("Е\\-14"));
            assert!(text.contains("Вітаю"));
            assert!(text.contains("скарга"));
        }
        other => panic!("expected plain text submission, got {other:?}"),
    }

    assert!(harness.engine.store().get(USER).await.is_none());
    harness.shutdown().await;
}

#[tokio::test]
async fn anonymous_cancel_discards_submission() {
    let harness = Harness::start();

    harness.feed(&[
        InboundEvent::text(USER, prompts::MENU_SEND_ANONYMOUS),
        InboundEvent {
            chat: USER,
            payload: EventPayload::Photo(MediaRef("photo-123".to_string())),
        },
        InboundEvent::text(USER, "важливе оголошення"),
        InboundEvent::text(USER, "telegram:@x"),
        InboundEvent::button(USER, tokens::TAG_IMPORTANT),
        InboundEvent::button(USER, tokens::CANCEL_ANONYMOUS_SEND),
    ]);

    let texts = harness.settled(USER).await;

    assert!(harness.transport.to_chat(DESTINATION).is_empty());
    assert!(harness.engine.store().get(USER).await.is_none());

    // The user got the cancel acknowledgment and is back at the menu.
    let last_two: Vec<_> = texts
        .iter()
        .rev()
        .take(2)
        .map(|sent| match sent {
            Sent::Text { text, .. } => text.clone(),
            other => panic!("unexpected outbound: {other:?}"),
        })
        .collect();
    assert!(last_two[1].contains("Повертаємося до головного меню"));

    harness.shutdown().await;
}

#[tokio::test]
async fn anonymous_photo_submission_rides_as_caption() {
    let harness = Harness::start();

    harness.feed(&[
        InboundEvent::text(USER, prompts::MENU_SEND_ANONYMOUS),
        InboundEvent {
            chat: USER,
            payload: EventPayload::Photo(MediaRef("photo-123".to_string())),
        },
        InboundEvent::text(USER, "Пропустити"),
        InboundEvent::text(USER, "telegram:@x"),
        InboundEvent::button(USER, tokens::TAG_SUGGESTION),
        InboundEvent::button(USER, tokens::CONFIRM_ANONYMOUS_SEND),
    ]);

    harness.settled(USER).await;

    let submits = harness.settled(DESTINATION).await;
    assert_eq!(submits.len(), 1);
    match &submits[0] {
        Sent::Photo { media, caption, .. } => {
            assert_eq!(media, "photo-123");
            // Caption skipped, so the message line carries the placeholder.
            assert!(caption.contains("Не вказано"));
            assert!(caption.contains("telegram:@x"));
        }
        other => panic!("expected photo submission, got {other:?}"),
    }

    harness.shutdown().await;
}

#[tokio::test]
async fn unsupported_input_reprompts_without_advancing() {
    let harness = Harness::start();

    harness.feed(&[
        InboundEvent::text(USER, prompts::MENU_SEND_ANONYMOUS),
        InboundEvent {
            chat: USER,
            payload: EventPayload::Unsupported("voice".to_string()),
        },
    ]);

    let texts = harness.settled(USER).await;

    match texts.last().unwrap() {
        Sent::Text { text, .. } => assert!(text.contains("Підтримуються лише")),
        other => panic!("expected retry prompt, got {other:?}"),
    }

    let session = harness.engine.store().get(USER).await.unwrap();
    assert_eq!(session.state, DialogState::AwaitingMediaOrText);
    assert_eq!(session.answers, Answers::default());

    harness.shutdown().await;
}
