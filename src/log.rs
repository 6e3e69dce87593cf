//! Structured logging for debugging the analyzer.
//!
//! Log levels:
//! - ERROR: Failures that abort a command
//! - WARN: Rejected batches and other recoverable conditions
//! - INFO: Command start and completion
//! - DEBUG: Pipeline stage summaries (batch size, edges, cycles)
//! - TRACE: Per-task scores and components
//!
//! Debug mode can be enabled with `--debug` flag or `TASK_ANALYZER_DEBUG=1`;
//! `-dd` or `TASK_ANALYZER_DEBUG=trace` also records per-task scores.
//! Until `init` is called every log call is a no-op, so library users and
//! tests never touch the filesystem.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

use crate::config::Config;

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// Environment variable that turns on debug (`1`) or trace (`trace`) logging.
pub const DEBUG_ENV: &str = "TASK_ANALYZER_DEBUG";

/// Log levels for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

fn env_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Level for a `-d` count and the value of `TASK_ANALYZER_DEBUG`.
///
/// `-d` or `TASK_ANALYZER_DEBUG=1` selects DEBUG; `-dd` or
/// `TASK_ANALYZER_DEBUG=trace` selects TRACE. The more verbose source wins.
pub fn level_for(verbosity: u8, env: Option<&str>) -> LogLevel {
    let from_flag = match verbosity {
        0 => LogLevel::Info,
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };
    let from_env = match env.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("trace") => LogLevel::Trace,
        Some(v) if env_flag(v) => LogLevel::Debug,
        _ => LogLevel::Info,
    };
    from_flag.max(from_env)
}

/// Initialize logging to ~/.task-analyzer/analyzer.log
pub fn init(verbosity: u8) {
    let env = std::env::var(DEBUG_ENV).ok();
    set_level(level_for(verbosity, env.as_deref()));

    if let Ok(path) = Config::log_path() {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        // Truncate file on startup
        let _ = std::fs::write(&path, "");
        LOG_PATH.set(path).ok();
    }
}

/// Set the minimum log level for output.
pub fn set_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Get the current log level.
pub fn get_level() -> LogLevel {
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Log a message at the specified level.
pub fn log_at(level: LogLevel, msg: &str) {
    if level > get_level() {
        return;
    }

    if let Some(path) = LOG_PATH.get() {
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] [{}] {}", timestamp, level.as_str(), msg);
        }
    }
}

pub fn error(msg: &str) {
    log_at(LogLevel::Error, msg);
}

pub fn warn(msg: &str) {
    log_at(LogLevel::Warn, msg);
}

pub fn info(msg: &str) {
    log_at(LogLevel::Info, msg);
}

pub fn debug(msg: &str) {
    log_at(LogLevel::Debug, msg);
}

pub fn trace(msg: &str) {
    log_at(LogLevel::Trace, msg);
}

/// Log macro for INFO level.
#[macro_export]
macro_rules! alog {
    ($($arg:tt)*) => {
        $crate::log::info(&format!($($arg)*))
    };
}

/// Log macro for ERROR level.
#[macro_export]
macro_rules! alog_error {
    ($($arg:tt)*) => {
        $crate::log::error(&format!($($arg)*))
    };
}

/// Log macro for WARN level.
#[macro_export]
macro_rules! alog_warn {
    ($($arg:tt)*) => {
        $crate::log::warn(&format!($($arg)*))
    };
}

/// Log macro for DEBUG level (only logs with `-d` or above).
#[macro_export]
macro_rules! alog_debug {
    ($($arg:tt)*) => {
        $crate::log::debug(&format!($($arg)*))
    };
}

/// Log macro for TRACE level (only logs with `-dd`).
#[macro_export]
macro_rules! alog_trace {
    ($($arg:tt)*) => {
        $crate::log::trace(&format!($($arg)*))
    };
}
