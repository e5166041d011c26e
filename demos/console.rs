//! Interactive console walkthrough of the intake dialog.
//!
//! To run:
//! ```bash
//! DESTINATION_CHAT_ID=-1001 cargo run --example console
//! ```
//!
//! Plain lines are text messages. Prefixed lines map to the other input
//! kinds:
//! - `/photo <ref>` attaches a photo
//! - `/doc <ref>` attaches a document
//! - `/btn <token>` presses an inline button
//!
//! Outbound traffic for both the user chat and the destination channel is
//! printed to stdout. End with Ctrl-D.

use std::io::BufRead;
use std::sync::Arc;

use async_trait::async_trait;
use radabot::prelude::*;

struct ConsoleTransport;

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send_text(&self, chat: ChatId, text: &str, keyboard: Option<Keyboard>) -> Result<(), Error> {
        println!("\n[{chat}] {text}");
        if let Some(keyboard) = keyboard {
            print_keyboard(&keyboard);
        }
        Ok(())
    }

    async fn send_photo(&self, chat: ChatId, media: &MediaRef, caption: &str) -> Result<(), Error> {
        println!("\n[{chat}] photo {media}\n{caption}");
        Ok(())
    }

    async fn send_document(&self, chat: ChatId, media: &MediaRef, caption: &str) -> Result<(), Error> {
        println!("\n[{chat}] document {media}\n{caption}");
        Ok(())
    }
}

fn print_keyboard(keyboard: &Keyboard) {
    match keyboard {
        Keyboard::Reply(rows) => {
            for row in rows {
                println!("  [{}]", row.join("] ["));
            }
        }
        Keyboard::Inline(rows) => {
            for button in rows.iter().flatten() {
                println!("  ({}) -> /btn {}", button.label, button.token);
            }
        }
        Keyboard::Remove => {}
    }
}

fn parse_line(chat: ChatId, line: &str) -> InboundEvent {
    if let Some(media) = line.strip_prefix("/photo ") {
        InboundEvent {
            chat,
            payload: EventPayload::Photo(MediaRef(media.trim().to_string())),
        }
    } else if let Some(media) = line.strip_prefix("/doc ") {
        InboundEvent {
            chat,
            payload: EventPayload::Document(MediaRef(media.trim().to_string())),
        }
    } else if let Some(token) = line.strip_prefix("/btn ") {
        InboundEvent::button(chat, token.trim())
    } else {
        InboundEvent::text(chat, line)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let destination = std::env::var("DESTINATION_CHAT_ID")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(-1);
    let user = ChatId(1);

    let engine = Arc::new(DialogEngine::new(Arc::new(ConsoleTransport), ChatId(destination)));
    let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
    let bus = EventBus::new(engine).run(receiver);

    sender.send(InboundEvent::text(user, "/start"))?;

    // Blocking stdin reader on its own thread; the unbounded sender never
    // blocks. EOF drops the sender, which closes the ingress channel and
    // stops the bus.
    let stdin = std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if sender.send(parse_line(user, line)).is_err() {
                break;
            }
        }
    });

    bus.await?;
    let _ = stdin.join();

    Ok(())
}
