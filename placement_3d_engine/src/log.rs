//! Engine log sink
//!
//! Every component reports through the `engine_*!` macros into one
//! process-wide sink, the only global state in the crate. The host can
//! replace the sink (`set_logger`) and raise the severity floor
//! (`set_min_severity`); filtered entries are never formatted.

use colored::*;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Lowest severity that reaches the sink (`LogSeverity as u8`)
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(LogSeverity::Trace as u8);

/// Destination of engine log entries (host console, file, telemetry or a
/// test capture).
///
/// # Example
///
/// ```no_run
/// use placement_3d_engine::placement3d::log::{Logger, LogEntry, set_logger};
///
/// struct QuietLogger;
///
/// impl Logger for QuietLogger {
///     fn log(&self, _entry: &LogEntry) {}
/// }
///
/// set_logger(QuietLogger);
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One log record
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component, `placement3d::<Component>`
    pub source: String,
    pub message: String,
    /// Call site, recorded for errors only
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogSeverity {
    Trace = 0,
    Debug = 1,
    /// Placement, eviction and quality changes
    Info = 2,
    /// Rejected gestures, low accuracy, repaired catalog entries
    Warn = 3,
    /// Failed operations
    Error = 4,
}

impl LogEntry {
    /// `file:line` of the call site, when recorded
    pub fn location(&self) -> Option<String> {
        match (self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        }
    }
}

impl LogSeverity {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogSeverity::Trace,
            1 => LogSeverity::Debug,
            2 => LogSeverity::Info,
            3 => LogSeverity::Warn,
            _ => LogSeverity::Error,
        }
    }

    fn label(&self) -> ColoredString {
        match self {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        }
    }
}

/// Console logger.
///
/// Trace to Info go to stdout, Warn and Error to stderr:
/// `[time] [SEVERITY] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let time: DateTime<Local> = entry.timestamp.into();
        let mut line = format!(
            "[{}] [{}] [{}] {}",
            time.format("%H:%M:%S%.3f"),
            entry.severity.label(),
            entry.source.bright_blue(),
            entry.message
        );
        if let Some(location) = entry.location() {
            line.push_str(&format!(" ({})", location.dimmed()));
        }

        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

fn sink() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Route every entry to `logger_impl` from now on
pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
    if let Ok(mut slot) = sink().write() {
        *slot = Box::new(logger_impl);
    }
}

/// Restore the console logger and let every severity through
pub fn reset_logger() {
    if let Ok(mut slot) = sink().write() {
        *slot = Box::new(DefaultLogger);
    }
    set_min_severity(LogSeverity::Trace);
}

/// Drop entries below `severity` before they are formatted
pub fn set_min_severity(severity: LogSeverity) {
    MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
}

pub fn min_severity() -> LogSeverity {
    LogSeverity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
}

/// Whether an entry of this severity would reach the sink
pub fn enabled(severity: LogSeverity) -> bool {
    severity >= min_severity()
}

/// Send one entry to the sink. `message` is only built when the severity
/// passes the filter. Used by the engine_* macros.
#[doc(hidden)]
pub fn emit<F: FnOnce() -> String>(
    severity: LogSeverity,
    source: &str,
    message: F,
    location: Option<(&'static str, u32)>,
) {
    if !enabled(severity) {
        return;
    }
    let entry = LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message: message(),
        file: location.map(|(file, _)| file),
        line: location.map(|(_, line)| line),
    };
    if let Ok(logger) = sink().read() {
        logger.log(&entry);
    }
}

/// Log a preformatted message without call-site location
pub fn dispatch(severity: LogSeverity, source: &str, message: String) {
    emit(severity, source, || message, None);
}

// ===== LOGGING MACROS =====

/// Per-gesture and per-frame detail
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::emit($crate::log::LogSeverity::Trace, $source, || format!($($arg)*), None)
    };
}

#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::emit($crate::log::LogSeverity::Debug, $source, || format!($($arg)*), None)
    };
}

#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::emit($crate::log::LogSeverity::Info, $source, || format!($($arg)*), None)
    };
}

/// ```ignore
/// engine_warn!("placement3d::Scale", "Low accuracy ({:.1}%) for '{}'", err * 100.0, id);
/// ```
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::emit($crate::log::LogSeverity::Warn, $source, || format!($($arg)*), None)
    };
}

/// Errors also record the call site
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::emit(
            $crate::log::LogSeverity::Error,
            $source,
            || format!($($arg)*),
            Some((file!(), line!())),
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
