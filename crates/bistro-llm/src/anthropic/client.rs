// Anthropic Messages API client (HTTP direct, no SDK)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use super::wire::{MessagesRequest, MessagesResponse, WireMessage};
use crate::config::ModelConfig;
use crate::error::{LlmError, Result};
use crate::retry::with_retries;
use crate::traits::{ChatClient, ChatRequest, ChatResponse, TokenUsage};
use crate::types::Message;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    http_client: reqwest::Client,
    config: ModelConfig,
}

impl AnthropicClient {
    pub fn new(config: ModelConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential(
                "Anthropic API key is empty".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        let mut api_key = HeaderValue::from_str(config.api_key.trim())
            .map_err(|_| LlmError::InvalidHeader("x-api-key".to_string()))?;
        api_key.set_sensitive(true);
        headers.insert("x-api-key", api_key);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self { http_client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the request body. System messages move to the top-level
    /// `system` field; the rest keep their order.
    fn build_payload<'a>(&self, request: &'a ChatRequest) -> Result<MessagesRequest<'a>> {
        let mut system_parts = Vec::new();
        let mut messages = Vec::with_capacity(request.messages.len());

        for message in &request.messages {
            match message {
                Message::System { content } => system_parts.push(content.as_str()),
                Message::Human { content } => messages.push(WireMessage {
                    role: "user",
                    content: content.clone(),
                }),
                Message::AI { content } => messages.push(WireMessage {
                    role: "assistant",
                    content: content.clone(),
                }),
            }
        }

        if messages.is_empty() {
            return Err(LlmError::EmptyConversation);
        }

        Ok(MessagesRequest {
            model: &request.model,
            max_tokens: request.options.max_tokens.unwrap_or(self.config.max_tokens),
            messages,
            system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
            temperature: request.options.temperature,
        })
    }

    async fn send_once(&self, payload: &MessagesRequest<'_>) -> Result<ChatResponse> {
        let response = self
            .http_client
            .post(self.endpoint())
            .json(payload)
            .send()
            .await
            .map_err(LlmError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let content = raw
            .text()
            .ok_or_else(|| LlmError::MalformedResponse("response has no text content".to_string()))?;

        Ok(ChatResponse {
            content,
            stop_reason: raw.stop_reason,
            usage: raw.usage.map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
        })
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_payload(&request)?;

        tracing::debug!(
            model = %request.model,
            messages = payload.messages.len(),
            has_system = payload.system.is_some(),
            "Sending chat request"
        );

        let response = with_retries(self.config.max_retries, self.config.retry_min_delay, || {
            self.send_once(&payload)
        })
        .await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %request.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                total_tokens = usage.total_tokens(),
                "Chat request completed"
            );
        }

        Ok(response)
    }
}
