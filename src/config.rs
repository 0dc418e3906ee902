// src/config.rs

use crate::constants::{
    API_KEY_ENV, API_URL_ENV, DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL, DEFAULT_MODEL, GROQ_API_URL,
    MODEL_ENV,
};
use crate::errors::{ChatError, ChatResult};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::{env, fmt, fs, path::Path, path::PathBuf};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: GROQ_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

// Keeps the key out of debug output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("Config")
            .field("api_key", &api_key)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .finish()
    }
}

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Loads the configuration once for the process and returns it.
pub fn initialize_config() -> ChatResult<&'static Config> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = load_config()?;
    Ok(CONFIG.get_or_init(|| config))
}

/// Defaults, then the config file, then `.env`, then the environment.
pub fn load_config() -> ChatResult<Config> {
    let mut config = match get_config_path() {
        Some(path) if path.exists() => read_config_file(&path)?,
        _ => Config::default(),
    };

    // A missing .env is normal.
    let _ = dotenv::dotenv();
    apply_env_overrides(&mut config, |key| env::var(key).ok());

    validate_config(&config)?;
    Ok(config)
}

pub fn read_config_file(path: &Path) -> ChatResult<Config> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        ChatError::config_error(format!("Failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&config_str).map_err(|e| {
        ChatError::config_error(format!("Failed to parse {}: {}", path.display(), e))
    })
}

fn get_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("chatpane").join("config.json"))
}

fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup(API_KEY_ENV) {
        config.api_key = key.trim().to_string();
    }
    if let Some(model) = lookup(MODEL_ENV) {
        config.model = model;
    }
    if let Some(url) = lookup(API_URL_ENV) {
        config.api_url = url;
    }
}

/// An empty API key is allowed; requests then fail like any other error.
pub fn validate_config(config: &Config) -> ChatResult<()> {
    if config.model.trim().is_empty() {
        return Err(ChatError::config_error("Model name is required"));
    }

    if !(config.api_url.starts_with("http://") || config.api_url.starts_with("https://")) {
        return Err(ChatError::config_error(format!(
            "API URL must be http(s): {:?}",
            config.api_url
        )));
    }

    let level = config.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ChatError::config_error(format!(
            "Unknown log level {:?}, expected one of {}",
            config.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_validate_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_config_allows_missing_api_key() {
        let config = Config {
            api_key: String::new(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_invalid_model() {
        let config = Config {
            model: "  ".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_url() {
        let config = Config {
            api_url: "api.groq.com".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_log_level() {
        let config = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_read_partial_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "model": "llama-3.1-8b-instant" }"#).unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.api_url, GROQ_API_URL);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_read_malformed_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = HashMap::from([
            (API_KEY_ENV, " gsk_test \n"),
            (MODEL_ENV, "mixtral-8x7b-32768"),
        ]);
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_key, "gsk_test");
        assert_eq!(config.model, "mixtral-8x7b-32768");
        assert_eq!(config.api_url, GROQ_API_URL);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config {
            api_key: "gsk_secret".to_string(),
            ..Config::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("gsk_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
