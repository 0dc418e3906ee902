// src/lib.rs

pub mod api;
pub mod app;
pub mod chat;
pub mod chat_message;
pub mod clipboard;
pub mod code_snippet;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod errors;
pub mod key_handlers;
pub mod logging;
pub mod markdown;
pub mod models;
pub mod status_indicator;
pub mod ui;
pub mod utils;

pub use api::{normalize_reply, CompletionClient, GroqClient};
pub use chat::{ChatSession, SubmitRejection, SubmitState};
pub use conversation::Conversation;
pub use errors::{ChatError, ChatResult};
pub use models::{Message, Role, Sender};
