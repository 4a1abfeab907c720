//! Client chat session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! The reducer never performs I/O; the runtime executes its effects.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{SessionState, SessionStatus};
pub use transition::{transition, TransitionError, TransitionResult};
