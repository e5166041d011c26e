//! Ingress routing with per-session ordering.
//!
//! A single unbounded channel feeds the bus; the bus fans events out to one
//! worker task per chat. A worker drains its own channel one event at a
//! time, so events for the same session are handled strictly in arrival
//! order and never concurrently, while different sessions proceed in
//! parallel on the runtime.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::engine::DialogEngine;
use crate::events::{ChatId, InboundEvent};

/// Routes inbound events to per-session workers.
pub struct EventBus {
    engine: Arc<DialogEngine>,
}

impl EventBus {
    pub fn new(engine: Arc<DialogEngine>) -> Self {
        EventBus { engine }
    }

    /// Consumes the ingress channel until it closes. The returned handle
    /// resolves when every queued event has been handed to its worker.
    pub fn run(self, mut ingress: mpsc::UnboundedReceiver<InboundEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut workers: HashMap<ChatId, mpsc::UnboundedSender<InboundEvent>> = HashMap::new();

            while let Some(event) = ingress.recv().await {
                let chat = event.chat;
                let worker = workers.entry(chat).or_insert_with(|| spawn_worker(self.engine.clone(), chat));

                // The sender side is held in the map, so the worker cannot
                // have hung up on its own.
                if let Err(err) = worker.send(event) {
                    warn!("chat {chat}: dropping event, worker gone: {err}");
                    workers.remove(&chat);
                }
            }

            info!("ingress channel closed, event bus stopping");
        })
    }
}

fn spawn_worker(engine: Arc<DialogEngine>, chat: ChatId) -> mpsc::UnboundedSender<InboundEvent> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<InboundEvent>();

    tokio::spawn(async move {
        debug!("chat {chat}: worker started");
        while let Some(event) = receiver.recv().await {
            if let Err(err) = engine.handle_event(event).await {
                error!("chat {chat}: {err}");
            }
        }
        debug!("chat {chat}: worker stopped");
    });

    sender
}
