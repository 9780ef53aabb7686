//! Dialogue - per-user conversation engine
//!
//! - [`input`] - Field parsers with typed errors
//! - [`entry`] - Trade-entry state machine (`/trade`)
//! - [`close`] - Trade-close state machine (`/close`)
//! - [`engine`] - Command routing, conversation table and ledger effects
//!
//! The state machines are pure: `step(state, text)` returns a [`Transition`]
//! and never touches the ledger. The engine applies commits.

pub mod close;
pub mod engine;
pub mod entry;
pub mod input;

pub use close::{CloseState, CloseTrade};
pub use engine::{DialogueEngine, DialogueKind};
pub use entry::EntryState;
pub use input::InputError;

/// Outcome of feeding one message to a dialogue state
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<S, E> {
    /// Input rejected; same state, re-prompt
    Retry {
        state: S,
        error: InputError,
        reply: &'static str,
    },
    /// Field accepted; prompt for the next one
    Advance { state: S, reply: &'static str },
    /// Last field accepted; the dialogue ends with this ledger effect
    Commit(E),
}

impl<S, E> Transition<S, E> {
    fn retry(state: S, error: InputError, reply: &'static str) -> Self {
        Self::Retry { state, error, reply }
    }

    fn advance(state: S, reply: &'static str) -> Self {
        Self::Advance { state, reply }
    }
}
