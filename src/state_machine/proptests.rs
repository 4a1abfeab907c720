//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::transition::*;
use super::*;
use crate::conversation::{Role, Turn};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Request ids drawn near the live range so both current and stale ids occur
fn arb_request_id() -> impl Strategy<Value = u64> {
    0u64..4
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z ?]{0,12}".prop_map(|text| Event::InputChanged { text }),
        Just(Event::Submit),
        (arb_request_id(), "[a-z ]{0,8}")
            .prop_map(|(request_id, text)| Event::ResponseChunk { request_id, text }),
        arb_request_id().prop_map(|request_id| Event::StreamEnded { request_id }),
        (arb_request_id(), "[a-z]{1,8}")
            .prop_map(|(request_id, message)| Event::TransportError { request_id, message }),
    ]
}

fn step(state: &SessionState, event: Event) -> (SessionState, Vec<Effect>) {
    match transition(state, event) {
        Ok(result) => (result.new_state, result.effects),
        Err(_) => (state.clone(), vec![]),
    }
}

// ============================================================================
// Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The conversation only grows, and existing turns keep their role
    #[test]
    fn conversation_is_append_only(events in prop::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::new();
        for event in events {
            let (next, _) = step(&state, event);
            prop_assert!(next.conversation.len() >= state.conversation.len());
            for (before, after) in state.conversation.iter().zip(&next.conversation) {
                prop_assert_eq!(before.role, after.role);
                prop_assert!(after.text().starts_with(&before.text()));
            }
            state = next;
        }
    }

    /// A request is only opened from a non-busy state, and never twice at once
    #[test]
    fn at_most_one_request_outstanding(events in prop::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::new();
        for event in events {
            let was_busy = state.status.is_busy();
            let (next, effects) = step(&state, event);
            if !effects.is_empty() {
                prop_assert!(!was_busy);
                prop_assert_eq!(effects.len(), 1);
                prop_assert_eq!(next.status.clone(), SessionStatus::Submitted);
            }
            state = next;
        }
    }

    /// Request ids increase by one per opened request
    #[test]
    fn request_ids_are_monotonic(events in prop::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::new();
        let mut opened = 0u64;
        for event in events {
            let (next, effects) = step(&state, event);
            for effect in effects {
                let Effect::OpenRequest { request_id, conversation } = effect;
                opened += 1;
                prop_assert_eq!(request_id, opened);
                prop_assert_eq!(&conversation, &next.conversation);
            }
            prop_assert_eq!(next.request_id, opened);
            state = next;
        }
    }

    /// Busy states always end with a user turn (submitted) or an assistant
    /// turn (streaming) at the tail
    #[test]
    fn status_matches_transcript_tail(events in prop::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::new();
        for event in events {
            state = step(&state, event).0;
            match state.status {
                SessionStatus::Submitted => {
                    prop_assert_eq!(state.conversation.last().map(|t| t.role), Some(Role::User));
                }
                SessionStatus::Streaming => {
                    prop_assert_eq!(state.conversation.last().map(|t| t.role), Some(Role::Assistant));
                }
                SessionStatus::Idle | SessionStatus::Error { .. } => {}
            }
        }
    }

    /// Each assistant turn holds exactly one text part
    #[test]
    fn assistant_turns_have_one_part(events in prop::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::new();
        for event in events {
            state = step(&state, event).0;
        }
        for turn in state.conversation.iter().filter(|t| t.role == Role::Assistant) {
            prop_assert_eq!(turn.parts.len(), 1);
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

fn run(events: Vec<Event>) -> SessionState {
    events
        .into_iter()
        .fold(SessionState::new(), |state, event| step(&state, event).0)
}

fn chunk(request_id: u64, text: &str) -> Event {
    Event::ResponseChunk {
        request_id,
        text: text.to_string(),
    }
}

#[test]
fn partial_text_survives_transport_error() {
    let state = run(vec![
        Event::InputChanged {
            text: "Say hello".to_string(),
        },
        Event::Submit,
        chunk(1, "Hel"),
        chunk(1, "lo"),
        Event::TransportError {
            request_id: 1,
            message: "connection reset".to_string(),
        },
    ]);

    assert_eq!(
        state.status,
        SessionStatus::Error {
            message: "connection reset".to_string()
        }
    );
    assert_eq!(state.conversation.len(), 2);
    assert_eq!(state.conversation[1].text(), "Hello");
}

#[test]
fn question_and_answer_round() {
    let state = run(vec![
        Event::InputChanged {
            text: "What is Z360?".to_string(),
        },
        Event::Submit,
        chunk(1, "Z360 is "),
        chunk(1, "a VoIP platform."),
        Event::StreamEnded { request_id: 1 },
    ]);

    assert_eq!(state.status, SessionStatus::Idle);
    assert_eq!(
        state.conversation,
        vec![
            Turn::user("What is Z360?"),
            Turn::assistant("Z360 is a VoIP platform.")
        ]
    );
}

#[test]
fn submit_while_streaming_adds_nothing() {
    let state = run(vec![
        Event::InputChanged {
            text: "first".to_string(),
        },
        Event::Submit,
        chunk(1, "par"),
        Event::InputChanged {
            text: "second".to_string(),
        },
    ]);

    assert!(matches!(
        transition(&state, Event::Submit),
        Err(TransitionError::Busy)
    ));
    assert_eq!(state.conversation.len(), 2);
    assert_eq!(state.status, SessionStatus::Streaming);
}
