use crate::document::DocumentError;
use crate::logging::codes::{self, Code, Severity};
use crate::registry::RegistryError;

/// Failures that stop a parse before a result can be built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Document loading failed: {0}")]
    Document(#[from] DocumentError),

    #[error("Malformed JSON at line {line}, column {column}: {message}")]
    Json {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Document root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Parser contract violated: {0}")]
    Contract(#[from] RegistryError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::Document(inner) => inner.error_code(),
            PipelineError::Json { .. } => codes::document::MALFORMED_JSON,
            PipelineError::NotAnObject { .. } => codes::document::ROOT_NOT_OBJECT,
            PipelineError::Contract(inner) => inner.error_code(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            PipelineError::Document(inner) => inner.error_type(),
            PipelineError::Json { .. } => "MalformedJson",
            PipelineError::NotAnObject { .. } => "RootNotObject",
            PipelineError::Contract(inner) => inner.error_type(),
        }
    }

    pub fn severity(&self) -> Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(error: serde_json::Error) -> Self {
        PipelineError::Json {
            message: error.to_string(),
            line: error.line(),
            column: error.column(),
        }
    }
}

/// JSON type name used in [`PipelineError::NotAnObject`]
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
