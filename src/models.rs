// src/models.rs

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// Role vocabulary of the chat-completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl From<Sender> for Role {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => Role::User,
            Sender::Bot => Role::Assistant,
        }
    }
}

/// One turn of the conversation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
    sender: Sender,
    sent_at: DateTime<Local>,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            sent_at: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn sent_at(&self) -> DateTime<Local> {
        self.sent_at
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct WireMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.sender().into(),
            content: message.text(),
        }
    }
}

/// The slice of the provider's response we read.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if it carries any text.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
            .filter(|content| !content.is_empty())
    }
}

/// Logs details of each API call.
#[derive(Debug, Clone)]
pub struct ApiCallLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    pub response_status: u16,
    pub response_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sender_maps_to_api_role() {
        assert_eq!(Role::from(Sender::User), Role::User);
        assert_eq!(Role::from(Sender::Bot), Role::Assistant);
    }

    #[test]
    fn request_serializes_roles_in_lowercase() {
        let history = vec![Message::bot("hi there"), Message::user("hello")];
        let request = ChatRequest {
            model: "m",
            messages: history.iter().map(WireMessage::from).collect(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "m",
                "messages": [
                    { "role": "assistant", "content": "hi there" },
                    { "role": "user", "content": "hello" }
                ]
            })
        );
    }

    #[test]
    fn first_content_skips_missing_and_empty() {
        let missing: ChatResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "role": "assistant" } }] }))
                .unwrap();
        assert_eq!(missing.first_content(), None);

        let empty: ChatResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "content": "" } }] }))
                .unwrap();
        assert_eq!(empty.first_content(), None);

        let none: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(none.first_content(), None);

        let some: ChatResponse = serde_json::from_value(json!({
            "choices": [
                { "message": { "content": "first" } },
                { "message": { "content": "second" } }
            ]
        }))
        .unwrap();
        assert_eq!(some.first_content(), Some("first"));
    }
}
