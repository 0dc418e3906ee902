// src/constants.rs

// Conversation text
pub const SEED_GREETING: &str = "Hello! How can I help you today?";
pub const FALLBACK_REPLY: &str = "I'm not sure how to respond.";
pub const ERROR_REPLY: &str = "Error: Unable to get response.";

// API Constants
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

// Environment
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const MODEL_ENV: &str = "CHATPANE_MODEL";
pub const API_URL_ENV: &str = "CHATPANE_API_URL";
pub const LOG_ENV: &str = "CHATPANE_LOG";

pub const DEFAULT_LOG_FILE: &str = "chatpane.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// UI Constants
pub const HIGHLIGHT_THEME: &str = "base16-ocean.dark";
pub const INPUT_PLACEHOLDER: &str = "Type here!";
pub const COPIED_NOTICE: &str = "Copied to clipboard! ✅";
pub const BUSY_NOTICE: &str = "Still waiting for the last reply...";
pub const USER_INDENT: &str = "  ";
pub const TICK_RATE_MS: u64 = 250;
pub const NOTICE_TTL_MS: u64 = 3000;
