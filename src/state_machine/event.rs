//! Events that drive the session

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    /// The input buffer was edited
    InputChanged { text: String },
    /// Send the current input buffer
    Submit,

    // Transport events, tagged with the request they belong to
    ResponseChunk { request_id: u64, text: String },
    StreamEnded { request_id: u64 },
    TransportError { request_id: u64, message: String },
}

impl Event {
    /// Request id for transport events
    pub fn request_id(&self) -> Option<u64> {
        match self {
            Event::InputChanged { .. } | Event::Submit => None,
            Event::ResponseChunk { request_id, .. }
            | Event::StreamEnded { request_id }
            | Event::TransportError { request_id, .. } => Some(*request_id),
        }
    }
}
