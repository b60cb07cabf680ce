// RUNTIME PREFERENCES (caller-tunable behaviour)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPreferences {
    /// Encoding label tried when the bytes are not valid UTF-8
    pub default_encoding: String,

    /// Whether to log size and timing details for loaded documents
    pub enable_performance_logging: bool,
}

impl Default for DocumentPreferences {
    fn default() -> Self {
        Self {
            default_encoding: env::var(env_vars::DOCUMENT_DEFAULT_ENCODING)
                .unwrap_or_else(|_| {
                    crate::config::compile_time::document::DEFAULT_ENCODING.to_string()
                }),
            enable_performance_logging: env_flag(env_vars::DOCUMENT_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxPreferences {
    /// Keep unknown keys as opaque `extra` data instead of dropping them
    pub preserve_extra_fields: bool,

    /// Accept the strings "true"/"false" where a boolean is expected
    pub allow_boolean_strings: bool,

    /// Emit a debug event for every recorded field error
    pub log_field_errors: bool,
}

impl Default for SyntaxPreferences {
    fn default() -> Self {
        Self {
            preserve_extra_fields: env_flag(env_vars::SYNTAX_PRESERVE_EXTRA_FIELDS, true),
            allow_boolean_strings: env_flag(env_vars::SYNTAX_ALLOW_BOOLEAN_STRINGS, true),
            log_field_errors: env_flag(env_vars::SYNTAX_LOG_FIELD_ERRORS, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticPreferences {
    /// Check that every non-templated link href is a URI reference
    pub check_link_hrefs: bool,

    /// Emit a debug event for every recorded rule violation
    pub log_rule_violations: bool,
}

impl Default for SemanticPreferences {
    fn default() -> Self {
        Self {
            check_link_hrefs: env_flag(env_vars::SEMANTIC_CHECK_LINK_HREFS, true),
            log_rule_violations: env_flag(env_vars::SEMANTIC_LOG_RULE_VIOLATIONS, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to write events to stdout/stderr at all
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether stage completion events carry timing information
    pub log_performance_events: bool,

    /// Whether events carry the source name of the document being parsed
    pub include_document_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env_flag(env_vars::LOGGING_LOG_PERFORMANCE, true),
            include_document_context: env_flag(env_vars::LOGGING_INCLUDE_DOCUMENT_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub document: DocumentPreferences,
    pub syntax: SyntaxPreferences,
    pub semantic: SemanticPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Load a configuration from TOML text; absent sections keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Document
    pub const DOCUMENT_DEFAULT_ENCODING: &str = "WEBPUB_DOCUMENT_DEFAULT_ENCODING";
    pub const DOCUMENT_PERFORMANCE_LOGGING: &str = "WEBPUB_DOCUMENT_PERFORMANCE_LOGGING";

    // Syntax
    pub const SYNTAX_PRESERVE_EXTRA_FIELDS: &str = "WEBPUB_SYNTAX_PRESERVE_EXTRA_FIELDS";
    pub const SYNTAX_ALLOW_BOOLEAN_STRINGS: &str = "WEBPUB_SYNTAX_ALLOW_BOOLEAN_STRINGS";
    pub const SYNTAX_LOG_FIELD_ERRORS: &str = "WEBPUB_SYNTAX_LOG_FIELD_ERRORS";

    // Semantic
    pub const SEMANTIC_CHECK_LINK_HREFS: &str = "WEBPUB_SEMANTIC_CHECK_LINK_HREFS";
    pub const SEMANTIC_LOG_RULE_VIOLATIONS: &str = "WEBPUB_SEMANTIC_LOG_RULE_VIOLATIONS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "WEBPUB_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "WEBPUB_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "WEBPUB_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "WEBPUB_LOGGING_LOG_PERFORMANCE";
    pub const LOGGING_INCLUDE_DOCUMENT_CONTEXT: &str = "WEBPUB_LOGGING_INCLUDE_DOCUMENT_CONTEXT";
}
