//! Applies dialog transitions to the session store and performs the
//! outbound side effects: prompts, summaries, dispatch on confirmation.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};

use crate::dialog::{self, DialogState, Flow, Prompt, Step};
use crate::dispatch::{self, ChatTransport, Dispatcher, DEFAULT_SEND_TIMEOUT};
use crate::errors::Error;
use crate::events::{ChatId, EventPayload, InboundEvent, Keyboard};
use crate::format;
use crate::prompts;
use crate::session::{Session, SessionStore};

/// Per-event dialog driver. One engine serves every session; per-session
/// serialization is the event bus's responsibility.
pub struct DialogEngine {
    store: SessionStore,
    transport: Arc<dyn ChatTransport>,
    dispatcher: Dispatcher,
    send_timeout: Duration,
}

impl DialogEngine {
    /// `destination` is the channel that receives confirmed submissions.
    pub fn new(transport: Arc<dyn ChatTransport>, destination: ChatId) -> Self {
        DialogEngine {
            store: SessionStore::new(),
            dispatcher: Dispatcher::new(transport.clone(), destination),
            transport,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Overrides the bound applied to every outbound send.
    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self.dispatcher = self.dispatcher.with_timeout(send_timeout);
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Handles one inbound event. Events for the same chat must arrive here
    /// sequentially; see [`crate::bus::EventBus`].
    ///
    /// A returned error means an outbound send or the final dispatch failed;
    /// the session is always left in a defined state first.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<(), Error> {
        let chat = event.chat;
        debug!("chat {chat}: inbound {} event", event.payload.kind());

        // Top-level commands work in any state. A menu selection mid-flow
        // discards the in-progress session and starts over.
        if let EventPayload::Text(text) = &event.payload {
            match text.trim() {
                prompts::START_COMMAND => {
                    return self.send(chat, prompts::GREETING, Some(prompts::main_menu())).await;
                }
                text if text == prompts::MENU_SEND => return self.start_flow(chat, Flow::Regular).await,
                text if text == prompts::MENU_SEND_ANONYMOUS => return self.start_flow(chat, Flow::Anonymous).await,
                _ => {}
            }
        }

        let Some(session) = self.store.get(chat).await else {
            debug!("chat {chat}: no active session, offering menu");
            return self.send(chat, prompts::CHOOSE_OPTION, Some(prompts::main_menu())).await;
        };

        match dialog::transition(session.flow, session.state, &event.payload) {
            Step::Advance { next, patch, prompt } => {
                if !patch.is_empty() {
                    self.store.update(chat, patch).await;
                }
                self.store.advance(chat, next).await;
                self.send_prompt(chat, prompt, session.flow).await
            }

            Step::Reject { retry } => {
                debug!("chat {chat}: {} not accepted in {:?}", event.payload.kind(), session.state);
                self.send_prompt(chat, retry, session.flow).await
            }

            Step::Summarize { patch } => {
                let mut answers = session.answers.clone();
                patch.clone().apply_to(&mut answers);
                self.store.update(chat, patch).await;
                self.store.advance(chat, DialogState::AwaitingConfirmation).await;

                let compiled = format::render(session.flow, &answers)?;
                self.send(
                    chat,
                    &prompts::summary(&compiled),
                    Some(prompts::confirmation_keyboard(session.flow)),
                )
                .await
            }

            Step::Submit => self.finish(chat, &session).await,

            Step::Cancel => {
                info!("chat {chat}: submission cancelled");
                self.store.clear(chat).await;
                self.send(chat, prompts::ACK_CANCELLED, None).await?;
                self.send(chat, prompts::CHOOSE_OPTION, Some(prompts::main_menu())).await
            }
        }
    }

    async fn start_flow(&self, chat: ChatId, flow: Flow) -> Result<(), Error> {
        info!("chat {chat}: starting {flow:?} flow");
        self.store.set(chat, Session::new(flow)).await;

        // Entering a flow also withdraws the menu's reply keyboard.
        let prompt = flow.entry_prompt();
        self.send(chat, prompts::prompt_text(prompt, flow), Some(Keyboard::Remove)).await
    }

    /// Dispatches the confirmed submission. The session clears on both
    /// outcomes; there is no retry-resume, so a failed delivery is reported
    /// and the user starts over from the menu.
    async fn finish(&self, chat: ChatId, session: &Session) -> Result<(), Error> {
        let result = self.dispatcher.submit(session.flow, &session.answers).await;

        self.store.clear(chat).await;

        match &result {
            Ok(()) => self.send(chat, prompts::success_ack(session.flow), None).await?,
            Err(err) => {
                error!("chat {chat}: submission failed: {err}");
                self.send(chat, prompts::SEND_FAILED, None).await?;
            }
        }
        self.send(chat, prompts::CHOOSE_OPTION, Some(prompts::main_menu())).await?;

        result
    }

    async fn send_prompt(&self, chat: ChatId, prompt: Prompt, flow: Flow) -> Result<(), Error> {
        self.send(chat, prompts::prompt_text(prompt, flow), prompts::prompt_keyboard(prompt, flow))
            .await
    }

    async fn send(&self, chat: ChatId, text: &str, keyboard: Option<Keyboard>) -> Result<(), Error> {
        dispatch::bounded(self.send_timeout, self.transport.send_text(chat, text, keyboard)).await
    }
}
