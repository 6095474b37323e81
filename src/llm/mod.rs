//! Language model backend.
//!
//! The orchestrator's top-k passages are the only contract with the backend:
//! any OpenAI-compatible chat-completions server works (hosted API or local
//! inference server).

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ChatBackendError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::HISTORY_WINDOW;
use crate::history::ChatMessage;

/// Grounding instructions sent as the system message.
const SYSTEM_PROMPT: &str = "Bạn là một trợ lý AI hữu ích, nhiệm vụ của bạn là trả lời câu hỏi \
dựa trên ngữ cảnh được cung cấp.\n\nNếu ngữ cảnh không chứa thông tin để trả lời câu hỏi, hãy \
nói \"Tôi không tìm thấy thông tin về điều này trong tài liệu.\"";

/// Default chat model when `/models` discovery fails.
pub const DEFAULT_MODEL: &str = "Qwen2.5-7B-Instruct";

const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Answer generator over retrieved context.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Produces an answer to `question` grounded in `context`, taking recent
    /// `history` turns into account.
    async fn generate(
        &self,
        context: &str,
        question: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatBackendError>;
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompatBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ModelsResponse {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

impl OpenAiCompatBackend {
    /// Creates a backend with an explicit model name (no discovery request).
    pub fn new_with_model<U: Into<String>, M: Into<String>>(base_url: U, model: M) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Creates a backend, discovering the served model via `GET /models`.
    /// Falls back to `fallback_model` when the server is unreachable or
    /// reports no models.
    pub async fn connect<U: Into<String>>(base_url: U, fallback_model: &str) -> Self {
        let mut backend = Self::new_with_model(base_url, fallback_model);

        match backend.discover_model().await {
            Some(model) => {
                info!(model = %model, "Connected to model backend");
                backend.model = model;
            }
            None => {
                warn!(
                    fallback = %backend.model,
                    "Could not retrieve model information, using fallback"
                );
            }
        }

        backend
    }

    async fn discover_model(&self) -> Option<String> {
        let url = format!("{}/models", self.base_url);
        let response = self.client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let models: ModelsResponse = response.json().await.ok()?;
        models.data.into_iter().next().map(|m| m.id)
    }

    /// Returns the active model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_messages<'a>(
        &self,
        question_block: &'a str,
        history: &'a [ChatMessage],
    ) -> Vec<RequestMessage<'a>> {
        let mut messages = vec![RequestMessage {
            role: "system",
            content: SYSTEM_PROMPT,
        }];

        // Only the tail of the conversation; older turns add tokens without
        // adding grounding.
        let start = history.len().saturating_sub(HISTORY_WINDOW);
        for turn in &history[start..] {
            messages.push(RequestMessage {
                role: &turn.role,
                content: &turn.content,
            });
        }

        messages.push(RequestMessage {
            role: "user",
            content: question_block,
        });

        messages
    }
}

#[async_trait]
impl ChatBackend for OpenAiCompatBackend {
    async fn generate(
        &self,
        context: &str,
        question: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatBackendError> {
        let question_block = format!("Ngữ cảnh:\n{context}\n\nCâu hỏi: {question}");
        let messages = self.build_messages(&question_block, history);

        debug!(
            model = %self.model,
            context_len = context.len(),
            history_turns = messages.len().saturating_sub(2),
            "Requesting completion"
        );

        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatBackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse =
            response
                .json()
                .await
                .map_err(|e| ChatBackendError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ChatBackendError::MalformedResponse {
                reason: "no choices in response".to_string(),
            })
    }
}

/// Canned backend for tests: echoes the question and records calls.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MockChatBackend {
    answer: Option<String>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "mock"))]
impl MockChatBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer<S: Into<String>>(answer: S) -> Self {
        Self {
            answer: Some(answer.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn generate(
        &self,
        _context: &str,
        question: &str,
        _history: &[ChatMessage],
    ) -> Result<String, ChatBackendError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self
            .answer
            .clone()
            .unwrap_or_else(|| format!("Trả lời cho: {question}")))
    }
}
