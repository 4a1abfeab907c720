//! Azure `OpenAI` streaming chat-completions provider

use super::types::{GenerationRequest, TextStream};
use super::{GenerationError, GenerationService};
use crate::conversation::{Role, Turn};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Model deployment used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-5.2";

/// API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Credentials and deployment for an Azure `OpenAI` resource
#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub resource_name: String,
    pub api_key: String,
    pub api_version: String,
    pub model: String,
}

impl AzureConfig {
    fn endpoint(&self) -> String {
        format!(
            "https://{}.openai.azure.com/openai/deployments/{}/chat/completions?api-version={}",
            self.resource_name, self.model, self.api_version
        )
    }
}

/// Azure `OpenAI` service implementation
pub struct AzureService {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl AzureService {
    pub fn new(config: &AzureConfig) -> Result<Self, GenerationError> {
        Self::with_endpoint(config, config.endpoint())
    }

    /// Point the service at an explicit chat-completions URL
    pub fn with_endpoint(
        config: &AzureConfig,
        endpoint: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GenerationError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: endpoint.into(),
            model: config.model.clone(),
        })
    }

    fn translate_request(request: &GenerationRequest) -> AzureRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(AzureMessage {
            role: "system",
            content: request.system.clone(),
        });
        messages.extend(request.messages.iter().map(translate_turn));

        AzureRequest {
            messages,
            stream: true,
        }
    }
}

fn translate_turn(turn: &Turn) -> AzureMessage {
    AzureMessage {
        role: match turn.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        },
        content: turn.text(),
    }
}

#[async_trait]
impl GenerationService for AzureService {
    async fn generate(&self, request: &GenerationRequest) -> Result<TextStream, GenerationError> {
        let body = Self::translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    GenerationError::network(format!("Connection failed: {e}"))
                } else {
                    GenerationError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::from_status(status.as_u16(), &body));
        }

        let (tx, rx) = mpsc::channel(64);

        // Reader task: parse the SSE body into text chunks. It stops as soon
        // as the consumer goes away, which drops the upstream connection.
        tokio::spawn(async move {
            let mut events = response.bytes_stream().eventsource();

            loop {
                let next = tokio::select! {
                    next = events.next() => next,
                    () = tx.closed() => {
                        tracing::debug!("Generation consumer dropped, abandoning stream");
                        return;
                    }
                };

                let event = match next {
                    Some(Ok(event)) => event,
                    Some(Err(e)) => {
                        let _ = tx
                            .send(Err(GenerationError::network(format!("Stream interrupted: {e}"))))
                            .await;
                        return;
                    }
                    None => break,
                };

                match parse_data(&event.data) {
                    Ok(StreamItem::Done) => return,
                    Ok(StreamItem::Text(text)) => {
                        if tx.send(Ok(text)).await.is_err() {
                            return;
                        }
                    }
                    Ok(StreamItem::Empty) => {}
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                }
            }

            let _ = tx
                .send(Err(GenerationError::malformed(
                    "Stream ended without a completion marker",
                )))
                .await;
        });

        Ok(ReceiverStream::new(rx).boxed())
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// One decoded `data:` payload
#[derive(Debug, PartialEq, Eq)]
enum StreamItem {
    Text(String),
    /// Metadata-only chunk (role header, content filter results, finish reason)
    Empty,
    Done,
}

fn parse_data(data: &str) -> Result<StreamItem, GenerationError> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(StreamItem::Empty);
    }
    if data == "[DONE]" {
        return Ok(StreamItem::Done);
    }

    let chunk: AzureStreamChunk = serde_json::from_str(data)
        .map_err(|e| GenerationError::malformed(format!("Unparseable stream chunk: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(GenerationError::unknown(format!("Provider error: {}", error.message)));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|text| !text.is_empty())
        .map_or(StreamItem::Empty, StreamItem::Text))
}

// Azure OpenAI API types

#[derive(Debug, Serialize)]
struct AzureRequest {
    messages: Vec<AzureMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct AzureMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AzureStreamChunk {
    #[serde(default)]
    choices: Vec<AzureChoice>,
    error: Option<AzureError>,
}

#[derive(Debug, Deserialize)]
struct AzureChoice {
    #[serde(default)]
    delta: AzureDelta,
}

#[derive(Debug, Default, Deserialize)]
struct AzureDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AzureError {
    message: String,
}
