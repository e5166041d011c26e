//! Conversational intake bot core.
//!
//! Walks a user through one of two fixed dialogs, regular (name, contact,
//! group, message) or anonymous (message, contact), optionally attaching
//! one photo or document and a category tag, then relays the compiled
//! message to a destination channel after explicit confirmation.
//!
//! The crate is transport-agnostic: a binding adapts a concrete chat
//! platform by implementing [`dispatch::ChatTransport`] and feeding
//! [`events::InboundEvent`]s into the [`bus::EventBus`]. Events for the
//! same chat are handled strictly in arrival order; different chats
//! proceed concurrently.
//!
//!```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use radabot::bus::EventBus;
//! use radabot::dispatch::ChatTransport;
//! use radabot::engine::DialogEngine;
//! use radabot::events::{ChatId, InboundEvent, Keyboard, MediaRef};
//! use radabot::Error;
//!
//! struct StdoutTransport;
//!
//! #[async_trait]
//! impl ChatTransport for StdoutTransport {
//!     async fn send_text(&self, chat: ChatId, text: &str, _keyboard: Option<Keyboard>) -> Result<(), Error> {
//!         println!("[{chat}] {text}");
//!         Ok(())
//!     }
//!
//!     async fn send_photo(&self, chat: ChatId, media: &MediaRef, caption: &str) -> Result<(), Error> {
//!         println!("[{chat}] photo {media}: {caption}");
//!         Ok(())
//!     }
//!
//!     async fn send_document(&self, chat: ChatId, media: &MediaRef, caption: &str) -> Result<(), Error> {
//!         println!("[{chat}] document {media}: {caption}");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let destination = ChatId(-1001234);
//!     let engine = Arc::new(DialogEngine::new(Arc::new(StdoutTransport), destination));
//!
//!     let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
//!     let bus = EventBus::new(engine).run(receiver);
//!
//!     // The transport binding feeds inbound updates into `sender`.
//!     sender.send(InboundEvent::text(ChatId(1), "/start")).unwrap();
//!
//!     drop(sender);
//!     bus.await.unwrap();
//! }
//!```

/// Ingress routing with per-session ordering guarantees.
pub mod bus;

/// The dialog state machine: flows, states, and the pure transition function.
pub mod dialog;

/// The transport trait and the submit facade.
pub mod dispatch;

pub mod errors;

/// Boundary types exchanged with the chat transport.
pub mod events;

/// Applies transitions to the session store and performs outbound effects.
pub mod engine;

/// Renders accumulated answers into the final message text.
pub mod format;

pub mod prelude;

/// Prompt texts and keyboard specs.
pub mod prompts;

/// Per-chat conversation state and its in-memory store.
pub mod session;

#[cfg(test)]
pub(crate) mod stubs;

pub use errors::Error;
