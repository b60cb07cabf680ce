//! Global logging for the manifest parser
//!
//! A process-wide [`LoggingService`] plus a per-thread document context so
//! that every event emitted while parsing a document names its source.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::config::runtime::LoggingPreferences;
use crate::utils::Location;
use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, Logger, LoggingService, MemoryLogger, NullLogger, StructuredLogger,
};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static DOCUMENT_CONTEXT: RefCell<Option<DocumentContext>> = const { RefCell::new(None) };
}

/// The document currently being parsed on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    /// File path, URL or caller-supplied name
    pub source: String,
    pub document_id: usize,
}

impl DocumentContext {
    pub fn new(source: impl Into<String>, document_id: usize) -> Self {
        Self {
            source: source.into(),
            document_id,
        }
    }
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the runtime configuration
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    codes::validate_codes(&[
        codes::system::INTERNAL_ERROR,
        codes::document::MALFORMED_JSON,
        codes::syntax::MISSING_PROPERTY,
        codes::semantic::MISSING_SELF_LINK,
        codes::success::MANIFEST_PARSING_COMPLETE,
    ])?;

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized".to_string())?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Install `preferences` process-wide, then initialize global logging from them
///
/// Fails without changing anything once logging or its preferences are installed.
pub fn init_global_logging_with_config(preferences: &LoggingPreferences) -> Result<(), String> {
    if is_initialized() {
        return Err("Global logger already initialized".to_string());
    }
    config::init_runtime_preferences(preferences.clone())?;
    init_global_logging()
}

/// Initialize with a caller-provided service
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// DOCUMENT CONTEXT MANAGEMENT
// ============================================================================

pub fn set_document_context(context: DocumentContext) {
    DOCUMENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

pub fn clear_document_context() {
    DOCUMENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with a document context, restoring the previous one afterwards
pub fn with_document_context<F, R>(source: impl Into<String>, document_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = DOCUMENT_CONTEXT.with(|ctx| {
        ctx.borrow_mut()
            .replace(DocumentContext::new(source, document_id))
    });
    let result = f();
    DOCUMENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = previous;
    });
    result
}

pub fn get_current_document_context() -> Option<DocumentContext> {
    DOCUMENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn with_document_fields(mut event: LogEvent) -> LogEvent {
    if !config::include_document_context() {
        return event;
    }
    if let Some(doc) = get_current_document_context() {
        event = event
            .with_source(&doc.source)
            .with_context("document_id", &doc.document_id.to_string());
    }
    event
}

fn dispatch(mut event: LogEvent, context: Vec<(&str, &str)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    if !logger.should_log(event.level) {
        return;
    }
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    logger.log_event(with_document_fields(event));
}

/// Used by `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    location: Option<Location>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(location) = location {
        event = event.with_location(location);
    }
    dispatch(event, context);
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::success(code, message), context);
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::info(message), context);
}

/// Used by `log_warning!`
pub fn log_warning_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::warning(message), context);
}

/// Used by `log_debug!`
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(LogEvent::debug(message), context);
}

/// Error logging that falls back to stderr when logging is not initialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(with_document_fields(LogEvent::error(code, message)));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

/// Diagnostics for embedding applications
pub fn get_system_diagnostics() -> String {
    format!(
        "=== Logging System Diagnostics ===\nInitialized: {}\n\n{}",
        is_initialized(),
        config::get_config_summary()
    )
}
