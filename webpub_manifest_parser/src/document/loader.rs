//! Reading manifest bytes from disk or a stream and decoding them to text

use super::DocumentError;
use crate::config::compile_time::document::{
    LARGE_DOCUMENT_THRESHOLD, MAX_DOCUMENT_SIZE,
};
use crate::config::runtime::DocumentPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success, log_warning};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Decoded manifest text and where it came from
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// File path, or a caller-supplied name for streams
    pub source: String,
    /// Decoded text with surrounding whitespace removed
    pub text: String,
    /// Name of the encoding that decoded the bytes
    pub encoding: &'static str,
    /// Size of the raw bytes
    pub size: u64,
    pub load_duration: Duration,
}

impl LoadedDocument {
    pub fn is_large(&self) -> bool {
        self.size > LARGE_DOCUMENT_THRESHOLD
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentLoader {
    preferences: DocumentPreferences,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preferences(preferences: &DocumentPreferences) -> Self {
        Self {
            preferences: preferences.clone(),
        }
    }

    /// Load and decode a manifest file. `encoding` overrides the preferred fallback encoding.
    pub fn load_file(
        &self,
        file_path: &str,
        encoding: Option<&str>,
    ) -> Result<LoadedDocument, DocumentError> {
        let start = Instant::now();
        log_debug!("Loading document", "file" => file_path);

        let path = self.validate_path(file_path)?;

        let size = fs::metadata(&path)
            .map_err(|e| self.io_failure(&e, file_path))?
            .len();
        self.check_size(size, file_path)?;

        let bytes = fs::read(&path).map_err(|e| self.io_failure(&e, file_path))?;
        self.finish(file_path, &bytes, encoding, start)
    }

    /// Load from any reader, stopping once the size limit is exceeded
    pub fn load_reader<R: Read>(
        &self,
        reader: R,
        source: &str,
        encoding: Option<&str>,
    ) -> Result<LoadedDocument, DocumentError> {
        let start = Instant::now();
        log_debug!("Loading document from reader", "source" => source);

        let mut bytes = Vec::new();
        reader
            .take(MAX_DOCUMENT_SIZE + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| self.io_failure(&e, source))?;
        self.check_size(bytes.len() as u64, source)?;

        self.finish(source, &bytes, encoding, start)
    }

    /// Decode bytes already in memory
    pub fn load_bytes(
        &self,
        bytes: &[u8],
        source: &str,
        encoding: Option<&str>,
    ) -> Result<LoadedDocument, DocumentError> {
        let start = Instant::now();
        self.check_size(bytes.len() as u64, source)?;
        self.finish(source, bytes, encoding, start)
    }

    fn finish(
        &self,
        source: &str,
        bytes: &[u8],
        encoding: Option<&str>,
        start: Instant,
    ) -> Result<LoadedDocument, DocumentError> {
        let (text, encoding) = self.decode(bytes, encoding)?;
        let text = text.trim();
        if text.is_empty() {
            let error = DocumentError::Empty;
            log_error!(error.error_code(), "Document is empty", "source" => source);
            return Err(error);
        }

        let document = LoadedDocument {
            source: source.to_string(),
            text: text.to_string(),
            encoding,
            size: bytes.len() as u64,
            load_duration: start.elapsed(),
        };

        if self.preferences.enable_performance_logging {
            log_success!(
                codes::success::DOCUMENT_LOAD_SUCCESS,
                "Document loaded",
                "source" => source,
                "size_bytes" => document.size,
                "encoding" => document.encoding,
                "is_large" => document.is_large(),
                "duration_ms" => format!("{:.2}", document.load_duration.as_secs_f64() * 1000.0)
            );
        } else {
            log_success!(
                codes::success::DOCUMENT_LOAD_SUCCESS,
                "Document loaded",
                "source" => source
            );
        }

        Ok(document)
    }

    /// UTF-8 (honouring a BOM) first, then the named encoding, then Windows-1252
    pub fn decode(
        &self,
        bytes: &[u8],
        encoding: Option<&str>,
    ) -> Result<(String, &'static str), DocumentError> {
        let (text, detected, malformed) = UTF_8.decode(bytes);
        if !malformed {
            return Ok((text.into_owned(), detected.name()));
        }

        let label = encoding.unwrap_or(self.preferences.default_encoding.as_str());
        let named = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            let error = DocumentError::InvalidEncoding {
                encoding: label.to_string(),
            };
            log_error!(error.error_code(), "Unknown encoding label", "encoding" => label);
            error
        })?;

        if named != UTF_8 {
            let (text, used, malformed) = named.decode(bytes);
            if !malformed {
                log_debug!("Decoded with named encoding", "encoding" => used.name());
                return Ok((text.into_owned(), used.name()));
            }
        }

        log_warning!("Falling back to Windows-1252", "requested" => label);
        let (text, used, _) = WINDOWS_1252.decode(bytes);
        Ok((text.into_owned(), used.name()))
    }

    fn validate_path(&self, file_path: &str) -> Result<PathBuf, DocumentError> {
        if file_path.trim().is_empty() {
            let error = DocumentError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Empty document path provided");
            return Err(error);
        }

        let path = Path::new(file_path);
        if !path.exists() {
            let error = DocumentError::NotFound {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Document not found", "path" => file_path);
            return Err(error);
        }
        if !path.is_file() {
            let error = DocumentError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => file_path);
            return Err(error);
        }

        let canonical = path
            .canonicalize()
            .map_err(|e| self.io_failure(&e, file_path))?;
        log_debug!("Path validation successful", "canonical_path" => canonical.display());
        Ok(canonical)
    }

    fn check_size(&self, size: u64, source: &str) -> Result<(), DocumentError> {
        if size > MAX_DOCUMENT_SIZE {
            let error = DocumentError::TooLarge {
                size,
                max_size: MAX_DOCUMENT_SIZE,
            };
            log_error!(error.error_code(), "Document exceeds maximum size",
                "source" => source,
                "size_bytes" => size,
                "limit_bytes" => MAX_DOCUMENT_SIZE
            );
            return Err(error);
        }
        if size == 0 {
            let error = DocumentError::Empty;
            log_error!(error.error_code(), "Document is empty", "source" => source);
            return Err(error);
        }
        Ok(())
    }

    fn io_failure(&self, error: &std::io::Error, source: &str) -> DocumentError {
        let mapped = DocumentError::from_io(error, source);
        log_error!(mapped.error_code(), "Failed to read document",
            "source" => source,
            "io_error" => error
        );
        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn loader() -> DocumentLoader {
        let _ = crate::logging::init_global_logging();
        DocumentLoader::new()
    }

    fn temp_file(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(bytes).expect("write temp file");
        file
    }

    #[test]
    fn test_load_file_trims_and_strips_bom() {
        let file = temp_file(b"\xEF\xBB\xBF  {\"metadata\": {}}\n\n");
        let path = file.path().to_string_lossy().to_string();

        let document = loader().load_file(&path, None).expect("load");
        assert_eq!(document.text, "{\"metadata\": {}}");
        assert_eq!(document.encoding, "UTF-8");
        assert!(!document.is_large());
    }

    #[test]
    fn test_named_encoding_and_fallback() {
        // "café" in Latin-1
        let bytes = b"{\"title\": \"caf\xE9\"}";

        let document = loader()
            .load_bytes(bytes, "latin1", Some("iso-8859-1"))
            .expect("load");
        assert_eq!(document.text, "{\"title\": \"café\"}");
        assert_eq!(document.encoding, "windows-1252");

        let fallback = loader().load_bytes(bytes, "fallback", Some("utf-8")).expect("load");
        assert_eq!(fallback.text, document.text);
    }

    #[test]
    fn test_unknown_encoding_label() {
        let result = loader().load_bytes(b"{\"a\": \"\xFF\"}", "bad", Some("no-such-encoding"));
        assert_matches!(result, Err(DocumentError::InvalidEncoding { encoding }) if encoding == "no-such-encoding");
    }

    #[test]
    fn test_missing_and_invalid_paths() {
        assert_matches!(
            loader().load_file("/definitely/not/here.json", None),
            Err(DocumentError::NotFound { .. })
        );
        assert_matches!(loader().load_file("", None), Err(DocumentError::InvalidPath { .. }));

        let dir = tempfile::tempdir().expect("temp dir");
        let dir_path = dir.path().to_string_lossy().to_string();
        assert_matches!(
            loader().load_file(&dir_path, None),
            Err(DocumentError::InvalidPath { .. })
        );
    }

    #[test]
    fn test_empty_documents() {
        let file = temp_file(b"");
        let path = file.path().to_string_lossy().to_string();
        assert_matches!(loader().load_file(&path, None), Err(DocumentError::Empty));

        assert_matches!(
            loader().load_reader(&b"   \n\t"[..], "blank", None),
            Err(DocumentError::Empty)
        );
    }

    #[test]
    fn test_reader_size_limit() {
        let oversized = std::io::repeat(b' ').take(MAX_DOCUMENT_SIZE + 16);
        assert_matches!(
            loader().load_reader(oversized, "stream", None),
            Err(DocumentError::TooLarge { size, .. }) if size == MAX_DOCUMENT_SIZE + 1
        );
    }
}
