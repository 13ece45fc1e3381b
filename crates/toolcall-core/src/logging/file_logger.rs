//! File-based debug logger for troubleshooting
//!
//! A process-wide sink that appends to a log file. Useful when the host
//! (a mobile or Node.js runtime) swallows stdout/stderr.
//!
//! Environment:
//! - `TOOLCALL_DEBUG=1|true` enables writing (off by default)
//! - `TOOLCALL_LOG_LEVEL=trace|debug|info|warn|error` sets the minimum level
//! - `TOOLCALL_LOG_FILE=/path` overrides the log file location

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::SystemTime;

use super::traits::Logger;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Parse a level name, case-insensitive
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO "),
            LogLevel::Warn => write!(f, "WARN "),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

struct FileSink {
    path: PathBuf,
    file: Option<File>,
    min_level: LogLevel,
    enabled: bool,
}

impl FileSink {
    fn from_env() -> Self {
        let path = std::env::var("TOOLCALL_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_log_path());
        let enabled = std::env::var("TOOLCALL_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let min_level = std::env::var("TOOLCALL_LOG_LEVEL")
            .ok()
            .and_then(|v| LogLevel::parse(&v))
            .unwrap_or(LogLevel::Debug);

        // Only touch the filesystem when logging is on
        let file = if enabled { open_append(&path) } else { None };

        Self { path, file, min_level, enabled }
    }

    fn write(&mut self, level: LogLevel, module: &str, message: &str) {
        if !self.enabled || level < self.min_level {
            return;
        }

        if let Some(ref mut file) = self.file {
            let _ = writeln!(file, "[{}] [{}] [{}] {}", timestamp(), level, module, message);
            let _ = file.flush();
        }
    }
}

fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("toolcall-debug.log")
}

fn open_append(path: &PathBuf) -> Option<File> {
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Wall-clock time of day as HH:MM:SS.mmm (UTC)
fn timestamp() -> String {
    match SystemTime::now().duration_since(SystemTime::UNIX_EPOCH) {
        Ok(d) => {
            let secs = d.as_secs();
            format!(
                "{:02}:{:02}:{:02}.{:03}",
                (secs % 86400) / 3600,
                (secs % 3600) / 60,
                secs % 60,
                d.subsec_millis()
            )
        }
        Err(_) => "??:??:??.???".to_string(),
    }
}

static SINK: OnceLock<Mutex<FileSink>> = OnceLock::new();

fn sink() -> &'static Mutex<FileSink> {
    SINK.get_or_init(|| Mutex::new(FileSink::from_env()))
}

/// Log a message at the specified level
pub fn log(level: LogLevel, module: &str, message: &str) {
    if let Ok(mut sink) = sink().lock() {
        sink.write(level, module, message);
    }
}

pub fn trace(module: &str, message: &str) {
    log(LogLevel::Trace, module, message);
}

pub fn debug(module: &str, message: &str) {
    log(LogLevel::Debug, module, message);
}

pub fn info(module: &str, message: &str) {
    log(LogLevel::Info, module, message);
}

pub fn warn(module: &str, message: &str) {
    log(LogLevel::Warn, module, message);
}

pub fn error(module: &str, message: &str) {
    log(LogLevel::Error, module, message);
}

/// Turn file logging on or off at runtime, overriding `TOOLCALL_DEBUG`
pub fn set_enabled(enabled: bool) {
    if let Ok(mut sink) = sink().lock() {
        sink.enabled = enabled;
        if enabled && sink.file.is_none() {
            sink.file = open_append(&sink.path);
        }
    }
}

/// Get the path to the log file
pub fn log_file_path() -> PathBuf {
    sink()
        .lock()
        .map(|s| s.path.clone())
        .unwrap_or_else(|_| default_log_path())
}

/// Truncate the log file
pub fn clear_log() {
    if let Ok(mut sink) = sink().lock() {
        if File::create(&sink.path).is_ok() && sink.enabled {
            sink.file = open_append(&sink.path);
        }
    }
}

/// `Logger` that writes through the process-wide file sink
#[derive(Debug, Clone)]
pub struct FileLogger {
    module: String,
}

impl FileLogger {
    /// Create a logger tagging every line with `module`
    pub fn new(module: impl Into<String>) -> Self {
        Self { module: module.into() }
    }
}

impl Logger for FileLogger {
    fn debug(&self, message: &str) {
        debug(&self.module, message);
    }

    fn info(&self, message: &str) {
        info(&self.module, message);
    }

    fn warn(&self, message: &str) {
        warn(&self.module, message);
    }

    fn error(&self, message: &str) {
        error(&self.module, message);
    }
}

/// Convenience macros for logging with automatic module name
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::logging::file_logger::debug(module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        $crate::logging::file_logger::info(module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::logging::file_logger::warn(module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::logging::file_logger::error(module_path!(), &format!($($arg)*))
    };
}
