use crate::logging::codes::{self, Code, Severity};

/// Failures while turning a file or byte stream into manifest text
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("Document not found: {path}")]
    NotFound { path: String },

    #[error("Document too large: {size} bytes (max: {max_size})")]
    TooLarge { size: u64, max_size: u64 },

    #[error("Document is empty")]
    Empty,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Unknown encoding: {encoding}")]
    InvalidEncoding { encoding: String },

    #[error("I/O error reading document: {message}")]
    Io { message: String },

    #[error("Invalid document path: {path}")]
    InvalidPath { path: String },
}

impl DocumentError {
    pub fn error_code(&self) -> Code {
        match self {
            DocumentError::NotFound { .. } => codes::document::DOCUMENT_NOT_FOUND,
            DocumentError::TooLarge { .. } => codes::document::DOCUMENT_TOO_LARGE,
            DocumentError::Empty => codes::document::EMPTY_DOCUMENT,
            DocumentError::PermissionDenied { .. } => codes::document::PERMISSION_DENIED,
            DocumentError::InvalidEncoding { .. } => codes::document::INVALID_ENCODING,
            DocumentError::Io { .. } => codes::document::IO_ERROR,
            DocumentError::InvalidPath { .. } => codes::document::INVALID_PATH,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            DocumentError::NotFound { .. } => "DocumentNotFound",
            DocumentError::TooLarge { .. } => "DocumentTooLarge",
            DocumentError::Empty => "EmptyDocument",
            DocumentError::PermissionDenied { .. } => "PermissionDenied",
            DocumentError::InvalidEncoding { .. } => "InvalidEncoding",
            DocumentError::Io { .. } => "IoError",
            DocumentError::InvalidPath { .. } => "InvalidPath",
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

    pub(crate) fn from_io(error: &std::io::Error, path: &str) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => DocumentError::NotFound {
                path: path.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => DocumentError::PermissionDenied {
                path: path.to_string(),
            },
            _ => DocumentError::Io {
                message: format!("{}: {}", path, error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_map_to_variants() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(
            DocumentError::from_io(&missing, "a.json"),
            DocumentError::NotFound {
                path: "a.json".to_string()
            }
        );

        let other = std::io::Error::new(std::io::ErrorKind::Interrupted, "stop");
        let error = DocumentError::from_io(&other, "a.json");
        assert_eq!(error.error_code(), codes::document::IO_ERROR);
        assert_eq!(error.to_string(), "I/O error reading document: a.json: stop");
    }

    #[test]
    fn test_codes() {
        let error = DocumentError::TooLarge {
            size: 20,
            max_size: 10,
        };
        assert_eq!(error.error_code(), codes::document::DOCUMENT_TOO_LARGE);
        assert_eq!(error.error_type(), "DocumentTooLarge");
        assert_eq!(DocumentError::Empty.error_code(), codes::document::EMPTY_DOCUMENT);
    }
}
