//! Logging configuration: compile-time limits plus runtime preferences
//!
//! Preferences are installed once per process; until then the defaults of
//! [`LoggingPreferences`] (which read `WEBPUB_LOGGING_*` variables) apply.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences; fails if they were already installed
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

pub(crate) fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

/// Minimum level an event needs to reach the logger
pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

/// Whether stage completion events carry durations
pub fn log_performance_events() -> bool {
    get_runtime_preferences().log_performance_events
}

/// Whether events carry the source name of the current document
pub fn include_document_context() -> bool {
    get_runtime_preferences().include_document_context
}

/// Maximum events kept by the in-memory logger
pub fn get_event_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Validate compile-time limits
pub fn validate_config() -> Result<(), String> {
    if LOG_BUFFER_SIZE > 100_000 {
        return Err(format!("Log buffer size too large: {}", LOG_BUFFER_SIZE));
    }

    if LOG_BUFFER_SIZE < 100 {
        return Err(format!("Log buffer size too small: {}", LOG_BUFFER_SIZE));
    }

    if MAX_LOG_MESSAGE_LENGTH < 80 {
        return Err(format!(
            "Log message length too small: {}",
            MAX_LOG_MESSAGE_LENGTH
        ));
    }

    Ok(())
}

/// Configuration summary for diagnostics
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration:\n\
         === Limits (Compile-time) ===\n\
         - Event buffer size: {}\n\
         - Max message length: {}\n\
         === Preferences (Runtime) ===\n\
         - Min log level: {}\n\
         - Structured logging: {}\n\
         - Console logging: {}\n\
         - Performance events: {}\n\
         - Include document context: {}",
        LOG_BUFFER_SIZE,
        MAX_LOG_MESSAGE_LENGTH,
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.enable_console_logging,
        preferences.log_performance_events,
        preferences.include_document_context,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_buffer_limits() {
        assert_eq!(get_event_buffer_size(), LOG_BUFFER_SIZE);
        assert_eq!(get_max_log_message_length(), MAX_LOG_MESSAGE_LENGTH);
    }

    #[test]
    fn test_config_summary() {
        let summary = get_config_summary();
        assert!(summary.contains("Event buffer size"));
        assert!(summary.contains("Min log level"));
    }
}
