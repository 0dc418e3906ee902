// src/logging.rs

use crate::config::Config;
use crate::constants::LOG_ENV;
use crate::errors::ChatResult;
use crate::models::ApiCallLog;
use flexi_logger::{detailed_format, FileSpec, Logger, LoggerHandle};

/// Starts file logging. The TUI owns stdout, so nothing is written there.
///
/// `CHATPANE_LOG` overrides the configured level. Keep the returned handle
/// alive for as long as logging should run.
pub fn init_logging(config: &Config) -> ChatResult<LoggerHandle> {
    let spec = std::env::var(LOG_ENV).unwrap_or_else(|_| config.log_level.clone());
    let handle = Logger::try_with_str(spec)?
        .log_to_file(FileSpec::try_from(config.log_file.clone())?.suppress_timestamp())
        .append()
        .format(detailed_format)
        .start()?;
    Ok(handle)
}

/// Writes one line describing an API call.
pub fn log_api_call(log: &ApiCallLog) {
    log::info!(
        target: "chatpane::api",
        "[{}] {} - {} - Status: {} - Time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        log.response_status,
        log.response_time_ms
    );
}
