// src/api.rs

use crate::{
    config::Config,
    constants::FALLBACK_REPLY,
    errors::{ChatError, ChatResult},
    logging::log_api_call,
    models::{ApiCallLog, ChatRequest, ChatResponse, Message, WireMessage},
};
use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Instant;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("paragraph break pattern is valid"));

/// Something that can turn a conversation history into the next bot reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends the whole history and returns display-ready reply text.
    ///
    /// Makes exactly one request per call. There is no retry or cache.
    async fn request_completion(&self, history: &[Message]) -> ChatResult<String>;
}

/// Client for Groq's OpenAI-compatible chat-completions endpoint.
///
/// Built once at startup and shared for the session. The inner
/// `reqwest::Client` pools connections across turns.
#[derive(Clone)]
pub struct GroqClient {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_url, &config.api_key, &config.model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(&'a self, history: &'a [Message]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: history.iter().map(WireMessage::from).collect(),
        }
    }

    fn record_call(&self, history_len: usize, status: u16, start: Instant) {
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: self.api_url.clone(),
            request_summary: format!("{} messages to {}", history_len, self.model),
            response_status: status,
            response_time_ms: start.elapsed().as_millis(),
        });
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn request_completion(&self, history: &[Message]) -> ChatResult<String> {
        if history.is_empty() {
            return Err(ChatError::EmptyHistory);
        }

        let payload = self.build_request(history);
        let start = Instant::now();

        let response = match self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.record_call(history.len(), 0, start);
                return Err(e.into());
            }
        };

        let status = response.status();
        self.record_call(history.len(), status.as_u16(), start);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::api_error(status.as_u16(), error_text));
        }

        let body = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&body)?;

        Ok(match parsed.first_content() {
            Some(content) => normalize_reply(content),
            None => {
                log::warn!("completion response carried no content, using fallback");
                FALLBACK_REPLY.to_string()
            }
        })
    }
}

/// Prepares provider text for the markdown renderer.
///
/// Any run of two or more newlines becomes one paragraph break. Each remaining
/// single newline becomes a hard break (two trailing spaces), so it stays a
/// visible line break after rendering.
pub fn normalize_reply(content: &str) -> String {
    PARAGRAPH_BREAK
        .split(content)
        .map(|paragraph| paragraph.replace('\n', "  \n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
