//! A prelude module for convenient importing of commonly used types and traits.
//!
//! Instead of importing each type individually:
//!
//! ```rust
//! use radabot::engine::DialogEngine;
//! use radabot::events::{ChatId, InboundEvent};
//! use radabot::dispatch::ChatTransport;
//! ```
//!
//! You can simply use:
//!
//! ```rust
//! use radabot::prelude::*;
//! ```

pub use crate::Error;

// Wiring
pub use crate::bus::EventBus;
pub use crate::dispatch::{ChatTransport, Dispatcher};
pub use crate::engine::DialogEngine;

// Boundary types
pub use crate::events::{tokens, Button, ChatId, EventPayload, InboundEvent, Keyboard, MediaRef};

// Dialog and session types
pub use crate::dialog::{DialogState, Flow};
pub use crate::session::{Answers, AttachedMedia, MediaKind, Session, SessionStore, Tag};
