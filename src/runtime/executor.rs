//! Session runtime executor

use super::traits::ChatTransport;
use crate::conversation::Conversation;
use crate::state_machine::{transition, Effect, Event, SessionState};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

const EVENT_BUFFER: usize = 64;

/// Event loop that owns one chat session
pub struct SessionRuntime<T>
where
    T: ChatTransport + 'static,
{
    state: SessionState,
    transport: Arc<T>,
    /// Events from the user, closed when the handle is dropped
    user_rx: mpsc::Receiver<Event>,
    /// Events from in-flight requests
    transport_rx: mpsc::Receiver<Event>,
    transport_tx: mpsc::Sender<Event>,
    snapshot_tx: watch::Sender<SessionState>,
}

/// Handle to interact with a running session
pub struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    snapshots: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl<T> SessionRuntime<T>
where
    T: ChatTransport + 'static,
{
    /// Start a session on the current tokio runtime
    pub fn spawn(transport: T) -> SessionHandle {
        let (event_tx, user_rx) = mpsc::channel(EVENT_BUFFER);
        let (transport_tx, transport_rx) = mpsc::channel(EVENT_BUFFER);
        let (snapshot_tx, snapshots) = watch::channel(SessionState::new());

        let runtime = Self {
            state: SessionState::new(),
            transport: Arc::new(transport),
            user_rx,
            transport_rx,
            transport_tx,
            snapshot_tx,
        };

        SessionHandle {
            event_tx,
            snapshots,
            task: tokio::spawn(runtime.run()),
        }
    }

    async fn run(mut self) {
        tracing::debug!("Starting session runtime");

        loop {
            tokio::select! {
                event = self.user_rx.recv() => match event {
                    Some(event) => self.process_event(event),
                    None => break,
                },
                Some(event) = self.transport_rx.recv() => self.process_event(event),
            }
        }

        tracing::debug!(request_id = self.state.request_id, "Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        match transition(&self.state, event) {
            Ok(result) => {
                if result.new_state != self.state {
                    self.state = result.new_state;
                    self.snapshot_tx.send_replace(self.state.clone());
                }
                for effect in result.effects {
                    self.execute_effect(effect);
                }
            }
            // Rejected submissions leave the session as it was
            Err(e) => tracing::debug!(error = %e, "Event rejected"),
        }
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::OpenRequest {
                request_id,
                conversation,
            } => {
                tracing::info!(request_id, turns = conversation.len(), "Opening chat request");
                tokio::spawn(stream_response(
                    self.transport.clone(),
                    self.transport_tx.clone(),
                    request_id,
                    conversation,
                ));
            }
        }
    }
}

/// Forward one response into the event loop. Once the loop is gone there is
/// nobody left to render, so the task stops at the next send.
async fn stream_response<T: ChatTransport>(
    transport: Arc<T>,
    tx: mpsc::Sender<Event>,
    request_id: u64,
    conversation: Conversation,
) {
    let mut stream = match transport.open(&conversation).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(request_id, error = %e, "Chat request failed");
            let _ = tx
                .send(Event::TransportError {
                    request_id,
                    message: e.to_string(),
                })
                .await;
            return;
        }
    };

    while let Some(item) = stream.next().await {
        let event = match item {
            Ok(text) => Event::ResponseChunk { request_id, text },
            Err(e) => {
                tracing::warn!(request_id, error = %e, "Chat response interrupted");
                let _ = tx
                    .send(Event::TransportError {
                        request_id,
                        message: e.to_string(),
                    })
                    .await;
                return;
            }
        };
        if tx.send(event).await.is_err() {
            return;
        }
    }

    let _ = tx.send(Event::StreamEnded { request_id }).await;
}

impl SessionHandle {
    /// Queue an event for the session
    pub async fn send(&self, event: Event) {
        if self.event_tx.send(event).await.is_err() {
            tracing::warn!("Session runtime is gone, dropping event");
        }
    }

    /// Replace the input buffer and submit it
    pub async fn submit(&self, text: impl Into<String>) {
        self.send(Event::InputChanged { text: text.into() }).await;
        self.send(Event::Submit).await;
    }

    /// The latest state
    pub fn snapshot(&self) -> SessionState {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.snapshots.clone()
    }

    /// Stop the event loop and wait for it to exit
    pub async fn shutdown(self) {
        let Self { event_tx, task, .. } = self;
        drop(event_tx);
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Session runtime panicked");
        }
    }
}
