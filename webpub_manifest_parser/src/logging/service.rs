//! Logging service and the loggers it can write to

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use crate::config::runtime::LoggingPreferences;
use crate::utils::Location;
use std::sync::{Arc, Mutex, MutexGuard};

/// Sink for log events
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Context keys that carry timing information
pub const PERFORMANCE_CONTEXT_KEYS: &[&str] = &["duration_ms"];

/// Main logging service with configuration awareness
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
    performance_events: bool,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self {
            logger,
            min_level,
            performance_events: true,
        }
    }

    /// Create service from the installed runtime preferences
    pub fn with_config() -> Self {
        Self::from_preferences(&config::get_runtime_preferences())
    }

    pub fn from_preferences(preferences: &LoggingPreferences) -> Self {
        let min_level = preferences.min_log_level.to_events_log_level();
        let logger: Arc<dyn Logger> = if !preferences.enable_console_logging {
            Arc::new(NullLogger)
        } else if preferences.use_structured_logging {
            Arc::new(StructuredLogger::new(min_level))
        } else {
            Arc::new(ConsoleLogger::new(min_level))
        };

        Self::new(logger, min_level).with_performance_events(preferences.log_performance_events)
    }

    /// Keep or strip [`PERFORMANCE_CONTEXT_KEYS`] from logged events
    pub fn with_performance_events(mut self, enabled: bool) -> Self {
        self.performance_events = enabled;
        self
    }

    pub fn performance_events(&self) -> bool {
        self.performance_events
    }

    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, mut event: LogEvent) {
        if !self.should_log(event.level) {
            return;
        }
        if !self.performance_events {
            event
                .context
                .retain(|key, _| !PERFORMANCE_CONTEXT_KEYS.contains(&key.as_str()));
        }
        self.logger.log(&event);
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    pub fn log_error_with_context(
        &self,
        error_code: Code,
        message: &str,
        context: Vec<(&str, &str)>,
    ) {
        let mut event = LogEvent::error(error_code, message);
        for (key, value) in context {
            event = event.with_context(key, value);
        }
        self.log_event(event);
    }

    pub fn log_error_at(&self, error_code: Code, message: &str, location: Location) {
        self.log_event(LogEvent::error(error_code, message).with_location(location));
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }

    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }

    pub fn log_success_with_context(
        &self,
        success_code: Code,
        message: &str,
        context: Vec<(&str, &str)>,
    ) {
        let mut event = LogEvent::success(success_code, message);
        for (key, value) in context {
            event = event.with_context(key, value);
        }
        self.log_event(event);
    }

    pub fn log_warning(&self, message: &str) {
        self.log_event(LogEvent::warning(message));
    }

    pub fn log_debug(&self, message: &str) {
        self.log_event(LogEvent::debug(message));
    }
}

/// Plain-text logger writing errors to stderr and everything else to stdout
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            match event.level {
                LogLevel::Error => eprintln!("{}", event.format()),
                _ => println!("{}", event.format()),
            }
        }
    }
}

/// Structured logger for JSON output
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level > self.min_level {
            return;
        }
        let line = event.format_json().unwrap_or_else(|_| event.format());
        match event.level {
            LogLevel::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

/// Discards every event; used when console output is disabled
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// In-memory logger, mainly for tests and embedding applications
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        // A panicking test thread must not hide the events from the others
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn get_events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.lock()
            .iter()
            .filter(|e| e.code == code)
            .cloned()
            .collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_error() && e.code == code)
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_info() && e.code == code)
    }

    pub fn get_events_by_category(&self, category: &str) -> Vec<LogEvent> {
        self.lock()
            .iter()
            .filter(|e| e.category() == category)
            .cloned()
            .collect()
    }

    pub fn get_summary(&self) -> EventSummary {
        let events = self.lock();
        EventSummary {
            total_count: events.len(),
            error_count: events.iter().filter(|e| e.is_error()).count(),
            warning_count: events.iter().filter(|e| e.is_warning()).count(),
            info_count: events.iter().filter(|e| e.is_info()).count(),
            debug_count: events.iter().filter(|e| e.is_debug()).count(),
        }
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();

        let max_events = config::get_event_buffer_size();
        if events.len() >= max_events {
            let remove_count = events.len() - max_events + 1;
            events.drain(0..remove_count);
        }

        events.push(event.clone());
    }
}

/// Summary of events in memory logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub total_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub debug_count: usize,
}

impl EventSummary {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }
}

/// Create logging service based on current configuration
pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::info("Message 1"));
        logger.log(&LogEvent::error(codes::syntax::MISSING_PROPERTY, "Missing href"));

        assert_eq!(logger.event_count(), 2);
        assert_eq!(logger.get_errors().len(), 1);
        assert!(logger.has_error_with_code(codes::syntax::MISSING_PROPERTY));

        let summary = logger.get_summary();
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.info_count, 1);
        assert!(summary.has_errors());
        assert!(!summary.has_warnings());

        logger.clear();
        assert_eq!(logger.event_count(), 0);
    }

    #[test]
    fn test_logging_service() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);

        service.log_error(codes::document::PERMISSION_DENIED, "Denied");
        service.log_success(codes::success::DOCUMENT_LOAD_SUCCESS, "Loaded");
        service.log_info("Info");

        assert_eq!(logger.event_count(), 3);
        assert!(logger.has_error_with_code(codes::document::PERMISSION_DENIED));
        assert!(logger.has_success_with_code(codes::success::DOCUMENT_LOAD_SUCCESS));
    }

    #[test]
    fn test_log_level_filtering() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Error);

        service.log_debug("Debug message");
        service.log_info("Info message");
        service.log_warning("Warning message");
        service.log_error(codes::system::INTERNAL_ERROR, "Error message");

        assert_eq!(logger.event_count(), 1);
        assert!(logger.has_error_with_code(codes::system::INTERNAL_ERROR));
    }

    #[test]
    fn test_event_categorization() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::error(codes::document::DOCUMENT_NOT_FOUND, "Missing"));
        logger.log(&LogEvent::error(
            codes::semantic::MISSING_SELF_LINK,
            "No self",
        ));

        assert_eq!(logger.get_events_by_category("Document").len(), 1);
        assert_eq!(logger.get_events_by_category("Semantic").len(), 1);
    }

    #[test]
    fn test_context_and_location() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);

        service.log_error_with_context(
            codes::document::DOCUMENT_TOO_LARGE,
            "Too large",
            vec![("size", "1024"), ("limit", "512")],
        );
        service.log_success_with_context(
            codes::success::SYNTAX_ANALYSIS_COMPLETE,
            "Done",
            vec![("errors", "0")],
        );
        service.log_error_at(
            codes::syntax::VALUE_PARSING_ERROR,
            "Bad value",
            Location::root().child_key("metadata"),
        );

        let events = logger.get_events();
        assert!(events[0].context.contains_key("size"));
        assert!(events[1].context.contains_key("errors"));
        assert_eq!(
            events[2].location.as_ref().map(|l| l.to_string()),
            Some("/metadata".to_string())
        );
        assert_eq!(
            logger
                .get_events_with_code(codes::syntax::VALUE_PARSING_ERROR)
                .len(),
            1
        );
    }

    #[test]
    fn test_timing_context_follows_performance_flag() {
        let logger = Arc::new(MemoryLogger::new());
        let quiet = LoggingService::new(logger.clone(), LogLevel::Debug).with_performance_events(false);
        quiet.log_success_with_context(
            codes::success::MANIFEST_PARSING_COMPLETE,
            "Done",
            vec![("errors", "0"), ("duration_ms", "1.25")],
        );

        let timed = LoggingService::new(logger.clone(), LogLevel::Debug);
        timed.log_success_with_context(
            codes::success::MANIFEST_PARSING_COMPLETE,
            "Done",
            vec![("duration_ms", "1.25")],
        );

        let events = logger.get_events();
        assert!(events[0].context.contains_key("errors"));
        assert!(!events[0].context.contains_key("duration_ms"));
        assert_eq!(events[1].context.get("duration_ms").map(String::as_str), Some("1.25"));
    }

    #[test]
    fn test_service_from_preferences() {
        let preferences = LoggingPreferences {
            use_structured_logging: false,
            enable_console_logging: false,
            min_log_level: crate::config::runtime::LogLevel::Debug,
            log_performance_events: false,
            include_document_context: true,
        };

        let service = LoggingService::from_preferences(&preferences);
        assert_eq!(service.min_level(), LogLevel::Debug);
        assert!(!service.performance_events());
        assert!(service.should_log(LogLevel::Debug));
    }

    #[test]
    fn test_console_and_null_loggers_do_not_panic() {
        ConsoleLogger::new(LogLevel::Info).log(&LogEvent::info("console"));
        StructuredLogger::new(LogLevel::Info).log(&LogEvent::info("structured"));
        NullLogger.log(&LogEvent::info("discarded"));
    }
}
