//! Pure state transition function

use super::{Effect, Event, SessionState, SessionStatus};
use crate::conversation::Turn;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Rejected events. The caller keeps the previous state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A response is still in progress")]
    Busy,
    #[error("Nothing to send")]
    EmptyInput,
}

/// Pure transition function
///
/// Given the same state and event it always produces the same result and
/// performs no I/O. Events for a request that is no longer outstanding
/// leave the state untouched.
pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    if let Some(request_id) = event.request_id() {
        if !state.is_current(request_id) {
            tracing::debug!(
                request_id,
                current = state.request_id,
                "Ignoring event for stale request"
            );
            return Ok(TransitionResult::new(state.clone()));
        }
    }

    match event {
        Event::InputChanged { text } => Ok(TransitionResult::new(SessionState {
            input: text,
            ..state.clone()
        })),

        Event::Submit if state.status.is_busy() => Err(TransitionError::Busy),

        Event::Submit => {
            if state.input.trim().is_empty() {
                return Err(TransitionError::EmptyInput);
            }

            let mut conversation = state.conversation.clone();
            conversation.push(Turn::user(state.input.clone()));

            let request_id = state.request_id + 1;
            let effect = Effect::OpenRequest {
                request_id,
                conversation: conversation.clone(),
            };

            Ok(TransitionResult::new(SessionState {
                conversation,
                status: SessionStatus::Submitted,
                input: String::new(),
                request_id,
            })
            .with_effect(effect))
        }

        Event::ResponseChunk { text, .. } => {
            let mut next = state.clone();
            if next.status == SessionStatus::Submitted {
                next.conversation.push(Turn::assistant(text));
                next.status = SessionStatus::Streaming;
            } else if let Some(turn) = next.conversation.last_mut() {
                turn.push_text(&text);
            }
            Ok(TransitionResult::new(next))
        }

        Event::StreamEnded { .. } => {
            let mut next = state.clone();
            // No bytes at all still completes the exchange with an empty answer
            if next.status == SessionStatus::Submitted {
                next.conversation.push(Turn::assistant(""));
            }
            next.status = SessionStatus::Idle;
            Ok(TransitionResult::new(next))
        }

        Event::TransportError { message, .. } => Ok(TransitionResult::new(SessionState {
            status: SessionStatus::Error { message },
            ..state.clone()
        })),
    }
}
