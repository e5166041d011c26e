//! The dialog state machine.
//!
//! Two fixed conversation trees share one transition function parameterized
//! by [`Flow`]: the regular tree collects name, contact and group before the
//! message; the anonymous tree collects the message first and only a contact
//! afterwards. The media-or-text fork, caption handling, tag selection and
//! confirmation are common to both.
//!
//! `transition` is pure. It looks at the current state and the inbound
//! payload and returns a [`Step`]: what to merge into the session, where to
//! go next, and which prompt to emit. All I/O and store mutation happen in
//! the engine, so every legal (and illegal) move is unit-testable without a
//! transport.

use crate::events::{tokens, EventPayload};
use crate::session::{AnswersPatch, MediaKind, Tag};

/// Which conversation tree a session is walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Regular,
    Anonymous,
}

impl Flow {
    /// First state after the top-level menu selection.
    pub fn entry_state(&self) -> DialogState {
        match self {
            Flow::Regular => DialogState::AwaitingName,
            Flow::Anonymous => DialogState::AwaitingMediaOrText,
        }
    }

    pub(crate) fn entry_prompt(&self) -> Prompt {
        match self {
            Flow::Regular => Prompt::AskName,
            Flow::Anonymous => Prompt::AskMediaOrText,
        }
    }

    pub fn confirm_token(&self) -> &'static str {
        match self {
            Flow::Regular => tokens::CONFIRM_SEND,
            Flow::Anonymous => tokens::CONFIRM_ANONYMOUS_SEND,
        }
    }

    pub fn cancel_token(&self) -> &'static str {
        match self {
            Flow::Regular => tokens::CANCEL_SEND,
            Flow::Anonymous => tokens::CANCEL_ANONYMOUS_SEND,
        }
    }
}

/// A named point in the dialog graph. Idle is the absence of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    AwaitingName,
    AwaitingContact,
    AwaitingGroup,
    AwaitingMediaOrText,
    AwaitingMediaCaption,
    AwaitingTag,
    AwaitingConfirmation,
}

/// Identifies a fixed prompt from the catalog in [`crate::prompts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    AskName,
    AskContact,
    AskGroup,
    AskMediaOrText,
    AskMediaCaption,
    AskTag,
    AskConfirmation,
    UnsupportedMedia,
}

/// Outcome of feeding one event into the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Merge the patch, move to `next`, emit `prompt`.
    Advance {
        next: DialogState,
        patch: AnswersPatch,
        prompt: Prompt,
    },
    /// Tag chosen. The engine merges the patch, renders the compiled
    /// message and asks for confirmation; the move to
    /// [`DialogState::AwaitingConfirmation`] is automatic, not input-driven.
    Summarize { patch: AnswersPatch },
    /// User confirmed. Dispatch, then clear to idle.
    Submit,
    /// User declined. Clear to idle without dispatching.
    Cancel,
    /// Input not valid in this state. No mutation; re-prompt.
    Reject { retry: Prompt },
}

impl Step {
    fn advance(next: DialogState, patch: AnswersPatch, prompt: Prompt) -> Step {
        Step::Advance { next, patch, prompt }
    }

    fn reject(retry: Prompt) -> Step {
        Step::Reject { retry }
    }
}

/// State and prompt that follow once the message text is settled (sent as
/// text, captioned, or caption skipped). This is where the two trees
/// diverge: regular goes straight to tagging, anonymous still needs a
/// contact.
fn after_message(flow: Flow) -> (DialogState, Prompt) {
    match flow {
        Flow::Regular => (DialogState::AwaitingTag, Prompt::AskTag),
        Flow::Anonymous => (DialogState::AwaitingContact, Prompt::AskContact),
    }
}

/// State and prompt that follow a collected contact.
fn after_contact(flow: Flow) -> (DialogState, Prompt) {
    match flow {
        Flow::Regular => (DialogState::AwaitingGroup, Prompt::AskGroup),
        Flow::Anonymous => (DialogState::AwaitingTag, Prompt::AskTag),
    }
}

/// Literal that leaves the caption unset. Case-insensitive; both the
/// neutral "skip" and the Ukrainian UI label are honored.
fn is_skip(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    text == "skip" || text == "пропустити"
}

/// Feed one inbound payload into the state machine.
pub fn transition(flow: Flow, state: DialogState, payload: &EventPayload) -> Step {
    match state {
        DialogState::AwaitingName => match payload {
            EventPayload::Text(text) => {
                Step::advance(DialogState::AwaitingContact, AnswersPatch::name(text), Prompt::AskContact)
            }
            _ => Step::reject(Prompt::AskName),
        },

        DialogState::AwaitingContact => match payload {
            EventPayload::Text(text) => {
                let (next, prompt) = after_contact(flow);
                Step::advance(next, AnswersPatch::contact(text), prompt)
            }
            _ => Step::reject(Prompt::AskContact),
        },

        DialogState::AwaitingGroup => match payload {
            EventPayload::Text(text) => {
                Step::advance(DialogState::AwaitingMediaOrText, AnswersPatch::group(text), Prompt::AskMediaOrText)
            }
            _ => Step::reject(Prompt::AskGroup),
        },

        DialogState::AwaitingMediaOrText => match payload {
            EventPayload::Text(text) => {
                let (next, prompt) = after_message(flow);
                Step::advance(next, AnswersPatch::final_message(text), prompt)
            }
            EventPayload::Photo(media_ref) => Step::advance(
                DialogState::AwaitingMediaCaption,
                AnswersPatch::media(MediaKind::Photo, media_ref.clone()),
                Prompt::AskMediaCaption,
            ),
            EventPayload::Document(media_ref) => Step::advance(
                DialogState::AwaitingMediaCaption,
                AnswersPatch::media(MediaKind::Document, media_ref.clone()),
                Prompt::AskMediaCaption,
            ),
            _ => Step::reject(Prompt::UnsupportedMedia),
        },

        DialogState::AwaitingMediaCaption => match payload {
            EventPayload::Text(text) => {
                let (next, prompt) = after_message(flow);
                let patch = if is_skip(text) {
                    AnswersPatch::default()
                } else {
                    AnswersPatch::final_message(text)
                };
                Step::advance(next, patch, prompt)
            }
            _ => Step::reject(Prompt::AskMediaCaption),
        },

        DialogState::AwaitingTag => match payload {
            EventPayload::Button(token) => match Tag::from_token(token) {
                Some(tag) => Step::Summarize {
                    patch: AnswersPatch::tag(tag),
                },
                None => Step::reject(Prompt::AskTag),
            },
            _ => Step::reject(Prompt::AskTag),
        },

        DialogState::AwaitingConfirmation => match payload {
            EventPayload::Button(token) if token == flow.confirm_token() => Step::Submit,
            EventPayload::Button(token) if token == flow.cancel_token() => Step::Cancel,
            _ => Step::reject(Prompt::AskConfirmation),
        },
    }
}
