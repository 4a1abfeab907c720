//! HTTP transport for the chat endpoint

use super::traits::{ChatTransport, ResponseStream, TransportError};
use crate::api::ErrorResponse;
use crate::conversation::Conversation;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::json;
use std::time::Duration;

/// Path of the chat endpoint relative to the site origin
pub const CHAT_PATH: &str = "/api/ai";

/// Talks to a running docs server over HTTP
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(origin: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}{CHAT_PATH}", origin.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn open(&self, conversation: &Conversation) -> Result<ResponseStream, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "messages": conversation }))
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(decode_text(response.bytes_stream().boxed()))
    }
}

/// Turn raw body bytes into text chunks without splitting characters
fn decode_text<E: std::fmt::Display + Send + 'static>(
    bytes: BoxStream<'static, Result<axum::body::Bytes, E>>,
) -> ResponseStream {
    futures::stream::unfold(Some((bytes, Utf8Decoder::default())), |state| async move {
        let (mut bytes, mut decoder) = state?;
        loop {
            match bytes.next().await {
                Some(Ok(chunk)) => {
                    let text = decoder.push(&chunk);
                    if !text.is_empty() {
                        return Some((Ok(text), Some((bytes, decoder))));
                    }
                }
                Some(Err(e)) => return Some((Err(TransportError::Body(e.to_string())), None)),
                None => return decoder.finish().map(|text| (Ok(text), None)),
            }
        }
    })
    .boxed()
}

/// Incremental UTF-8 decoder
///
/// Holds back the bytes of a character that is split across chunks.
/// Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();

        loop {
            let (valid, error_len) = match std::str::from_utf8(&self.pending) {
                Ok(_) => (self.pending.len(), None),
                Err(e) => (e.valid_up_to(), e.error_len()),
            };

            if let Some(len) = error_len {
                let rest = self.pending.split_off(valid + len);
                out.push_str(&String::from_utf8_lossy(&self.pending));
                self.pending = rest;
            } else {
                let tail = self.pending.split_off(valid);
                out.push_str(&String::from_utf8_lossy(&self.pending));
                self.pending = tail;
                return out;
            }
        }
    }

    /// Flush a truncated trailing character, if any
    pub fn finish(self) -> Option<String> {
        (!self.pending.is_empty()).then(|| String::from_utf8_lossy(&self.pending).into_owned())
    }
}
