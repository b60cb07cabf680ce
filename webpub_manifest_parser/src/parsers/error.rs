use crate::logging::codes::{self, Code};
use crate::utils::display_value;
use serde_json::Value;

/// A raw JSON value did not conform to the parser applied to it
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ValueParsingError {
    /// The offending raw value
    pub value: Value,
    pub message: String,
    nesting_limit: bool,
}

impl ValueParsingError {
    pub fn new(value: &Value, message: impl Into<String>) -> Self {
        Self {
            value: value.clone(),
            message: crate::utils::truncate_message(
                &message.into(),
                crate::config::compile_time::semantic::MAX_ERROR_MESSAGE_LENGTH,
            ),
            nesting_limit: false,
        }
    }

    /// Nested nodes went deeper than the analyzer allows
    pub fn nesting_too_deep(value: &Value, max_depth: usize) -> Self {
        Self {
            nesting_limit: true,
            ..Self::new(
                value,
                format!("Nodes are nested deeper than {} levels", max_depth),
            )
        }
    }

    pub fn is_nesting_too_deep(&self) -> bool {
        self.nesting_limit
    }

    /// Shorthand for the "must be a ..." family of messages
    pub(crate) fn expected(value: &Value, what: &str) -> Self {
        Self::new(
            value,
            format!("Value '{}' must be {}", display_value(value), what),
        )
    }

    /// Shorthand for the "is not a '<format>'" family of messages
    pub(crate) fn not_a_format(value: &Value, format: &str) -> Self {
        Self::new(
            value,
            format!("'{}' is not a '{}'", display_value(value), format),
        )
    }

    pub fn error_code(&self) -> Code {
        if self.nesting_limit {
            codes::syntax::NESTING_TOO_DEEP
        } else {
            codes::syntax::VALUE_PARSING_ERROR
        }
    }
}
