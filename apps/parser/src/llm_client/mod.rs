//! LLM client: the single point of entry for all chat-completion calls.
//!
//! No other module talks to the provider directly. The orchestrator only sees the
//! `ModelClient` trait, so tests can swap in a scripted client.
//!
//! Two call shapes are supported:
//! - `complete`: one unconstrained chat completion, optionally forced to a JSON object.
//! - `extract`: schema-guided extraction, the schema is declared as a tool and every
//!   matching tool call is one extracted object.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::ErrorKind;

pub mod lenient;
pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-1106";
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(8);
const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(5);
const EXTRACTION_RETRIES: u32 = 1;
const RETRY_BACKOFF_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Request timed out after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::Timeout { .. } => ErrorKind::Timeout,
            LlmError::Parse(_) | LlmError::EmptyContent => ErrorKind::ParseError,
            LlmError::Http(_) | LlmError::Api { .. } => ErrorKind::UpstreamError,
        }
    }

    /// Failures worth a second attempt on the schema-guided chain.
    fn is_retryable(&self) -> bool {
        match self {
            LlmError::Timeout { .. } => true,
            LlmError::Http(e) => e.is_connect(),
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::Parse(_) | LlmError::EmptyContent => false,
        }
    }

    fn from_transport(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            LlmError::Timeout { timeout }
        } else {
            LlmError::Http(e)
        }
    }
}

/// Raw model output plus how long the call took. Used for logging and
/// immediate parsing only.
#[derive(Debug, Clone)]
pub struct Completion<T> {
    pub output: T,
    pub elapsed: Duration,
}

impl<T> Completion<T> {
    pub fn new(output: T, elapsed: Duration) -> Self {
        Self { output, elapsed }
    }
}

/// A declared object schema for schema-guided extraction.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema of a single object.
    pub parameters: Value,
}

/// Knobs for every model call of a run. Built once from the CLI and passed in.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub completion_timeout: Duration,
    pub extraction_timeout: Duration,
    pub extraction_retries: u32,
}

impl LlmSettings {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model,
            completion_timeout: COMPLETION_TIMEOUT,
            extraction_timeout: EXTRACTION_TIMEOUT,
            extraction_retries: EXTRACTION_RETRIES,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// The seam between the orchestrator and the hosted model.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn model(&self) -> &str;

    /// One chat completion. `json_mode` forces a single JSON object response.
    async fn complete(&self, prompt: &str, json_mode: bool) -> Result<Completion<String>, LlmError>;

    /// Extracts every object matching `schema` from `input`.
    async fn extract(
        &self,
        schema: &ObjectSchema,
        input: &str,
    ) -> Result<Completion<Vec<Value>>, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition<'a>>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ToolDefinition<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: FunctionDefinition<'a>,
}

#[derive(Debug, Serialize)]
struct FunctionDefinition<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }

    /// Parsed arguments of every tool call on the first choice named `tool`.
    pub fn tool_arguments(&self, tool: &str) -> Result<Vec<Value>, LlmError> {
        let Some(choice) = self.choices.first() else {
            return Ok(Vec::new());
        };
        choice
            .message
            .tool_calls
            .iter()
            .flatten()
            .filter(|call| call.function.name == tool)
            .map(|call| serde_json::from_str(&call.function.arguments).map_err(LlmError::Parse))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Chat Completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder().build()?;
        Ok(Self { client, settings })
    }

    async fn send(
        &self,
        request: &ChatRequest<'_>,
        timeout: Duration,
    ) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.settings.base_url))
            .bearer_auth(&self.settings.api_key)
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::from_transport(e, timeout))?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat)
    }
}

#[async_trait]
impl ModelClient for LlmClient {
    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn complete(&self, prompt: &str, json_mode: bool) -> Result<Completion<String>, LlmError> {
        let started = Instant::now();
        let request = build_completion_request(&self.settings.model, prompt, json_mode);

        let response = self
            .send(&request, self.settings.completion_timeout)
            .await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?.to_string();

        Ok(Completion::new(text, started.elapsed()))
    }

    async fn extract(
        &self,
        schema: &ObjectSchema,
        input: &str,
    ) -> Result<Completion<Vec<Value>>, LlmError> {
        let started = Instant::now();
        let request = build_extraction_request(&self.settings.model, schema, input);
        let retries = self.settings.extraction_retries;

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=retries {
            if attempt > 0 {
                let delay = Duration::from_millis(RETRY_BACKOFF_MS * (1 << (attempt - 1)));
                warn!(
                    "Extraction of {} attempt {} failed, retrying after {}ms...",
                    schema.name,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.send(&request, self.settings.extraction_timeout).await {
                Ok(response) => {
                    let objects = response.tool_arguments(schema.name)?;
                    return Ok(Completion::new(objects, started.elapsed()));
                }
                Err(e) if e.is_retryable() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::Timeout {
            timeout: self.settings.extraction_timeout,
        }))
    }
}

fn build_completion_request<'a>(model: &'a str, prompt: &'a str, json_mode: bool) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        response_format: json_mode.then_some(ResponseFormat {
            format_type: "json_object",
        }),
        tools: None,
    }
}

fn build_extraction_request<'a>(
    model: &'a str,
    schema: &'a ObjectSchema,
    input: &'a str,
) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: prompts::EXTRACTION_SYSTEM,
            },
            ChatMessage {
                role: "user",
                content: input,
            },
        ],
        response_format: None,
        tools: Some(vec![ToolDefinition {
            tool_type: "function",
            function: FunctionDefinition {
                name: schema.name,
                description: schema.description,
                parameters: &schema.parameters,
            },
        }]),
    }
}
