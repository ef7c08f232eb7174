//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The call site's
//! file, line and module are attached as the record source.
//!
//! # Examples
//!
//! ```
//! use rust_log_pipeline::core::handler::{FormatHandler, HandlerOptions};
//! use rust_log_pipeline::writers::MemoryWriter;
//! use rust_log_pipeline::{info, Level, Logger, OutputFormat};
//! use std::sync::Arc;
//!
//! let out = MemoryWriter::new();
//! let logger = Logger::new(Arc::new(FormatHandler::new(
//!     OutputFormat::Text,
//!     out.clone(),
//!     HandlerOptions::new(Level::INFO),
//! )));
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! assert!(out.contents().contains("msg=\"Server listening on port 8080\""));
//! ```

/// Log a message at an explicit level.
///
/// ```
/// # use rust_log_pipeline::core::handler::{FormatHandler, HandlerOptions};
/// # use rust_log_pipeline::writers::MemoryWriter;
/// # use rust_log_pipeline::{Level, Logger, OutputFormat};
/// # use std::sync::Arc;
/// # let logger = Logger::new(Arc::new(FormatHandler::new(OutputFormat::Text, MemoryWriter::new(), HandlerOptions::new(Level::INFO))));
/// use rust_log_pipeline::log;
/// log!(logger, Level::INFO, "Simple message");
/// log!(logger, Level::new(6), "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let level: $crate::Level = $level;
        if $logger.enabled(level) {
            $logger.log_record(
                $crate::Record::new(level, format!($($arg)+)).with_source(
                    $crate::Source::new(file!(), line!()).with_module(module_path!()),
                ),
            );
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::TRACE, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::INFO, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::NOTICE, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::WARN, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::ERROR, $($arg)+)
    };
}

/// Log a fatal-level message. Does not terminate the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::FATAL, $($arg)+)
    };
}
