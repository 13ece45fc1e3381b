//! Logger trait definition

use std::sync::Arc;

use super::file_logger::LogLevel;

/// Logger abstraction for runtime-agnostic logging
///
/// Implementations:
/// - `NoOpLogger`: Silent logger for testing
/// - `ConsoleLogger`: Logs to stdout/stderr
/// - `MemoryLogger`: Keeps records in memory for assertions
/// - Host adapters: e.g. forwarding to a JavaScript console
pub trait Logger: Send + Sync {
    /// Log a debug message
    fn debug(&self, message: &str);

    /// Log an info message
    fn info(&self, message: &str);

    /// Log a warning message
    fn warn(&self, message: &str);

    /// Log an error message
    fn error(&self, message: &str);

    /// Log at a runtime-selected level
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace | LogLevel::Debug => self.debug(message),
            LogLevel::Info => self.info(message),
            LogLevel::Warn => self.warn(message),
            LogLevel::Error => self.error(message),
        }
    }
}

/// Type alias for an Arc-wrapped logger
pub type SharedLogger = Arc<dyn Logger>;

/// Convenience macros for logging
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(&format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;

    #[test]
    fn test_log_macros_format_at_each_level() {
        let memory = Arc::new(MemoryLogger::new());
        let logger: SharedLogger = memory.clone();

        crate::log_debug!(logger, "{} -> {}", "idle", "generating");
        crate::log_info!(logger, "Registered tool: {}", "get_weather");
        crate::log_warn!(logger, "budget {} exhausted", 3);
        crate::log_error!(logger, "model failed");

        assert_eq!(memory.messages_at(LogLevel::Debug), vec!["idle -> generating"]);
        assert_eq!(memory.messages_at(LogLevel::Info), vec!["Registered tool: get_weather"]);
        assert_eq!(memory.messages_at(LogLevel::Warn), vec!["budget 3 exhausted"]);
        assert_eq!(memory.messages_at(LogLevel::Error), vec!["model failed"]);
    }
}
