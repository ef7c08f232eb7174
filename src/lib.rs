//! # Rust Log Pipeline
//!
//! Turns a declarative logging configuration into a live record pipeline.
//!
//! ## Features
//!
//! - **Level specs**: `"info"`, `"WARN+2"`, `"-4"`, resolved once and cached
//! - **Per-sink handlers**: level, TEXT/JSON format, source policy, attribute
//!   rewriters and middleware for the console and file sinks
//! - **Rotation**: size, count and age bounded log files with optional gzip
//! - **Fan-out**: several sinks fused into one handler with aggregated errors
//! - **Config files**: JSON, YAML or TOML, plus a generated JSON Schema
//!
//! ```no_run
//! use rust_log_pipeline::{configured_logger, Config, ConfigFormat};
//!
//! let config = Config::from_str(
//!     r#"{"Console": {"Level": "debug"}, "File": {"Path": "./logs", "Format": "json"}}"#,
//!     ConfigFormat::Json,
//! )?;
//! let logger = configured_logger(&config)?;
//! logger.notice("ready");
//! # Ok::<(), rust_log_pipeline::LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod writers;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::core::LevelColors;
    pub use crate::core::{
        attribute_fn, configured_logger, inline_middleware, logger, Attr, Config, ConfigFormat,
        ConsoleSinkConfig, FileSinkConfig, Handler, Level, LevelSpec, LogContext, Logger,
        LoggerError, MiddlewareFn, OutputFormat, Record, Result, ResultExt, RotationPolicy,
        SharedHandler, SinkConfig, Value,
    };
}

#[cfg(feature = "console")]
pub use crate::core::LevelColors;
pub use crate::core::{
    compose, configured_logger, debug_logger, logger, set_debug_logger, set_default_logger, Attr,
    AttributeChain, AttributeFn, Config, ConfigFormat, ConsoleSinkConfig, ContextGuard, FanOut,
    FileSinkConfig, FormatHandler, Handler, HandlerOptions, Level, LevelSpec, LevelVar,
    LogContext, Logger, LoggerError, LoggerMetrics, MiddlewareFn, OutputFormat, Record, Result,
    ResultExt, RotationPolicy, SharedHandler, SinkConfig, Source, Value,
};
pub use writers::{ConsoleWriter, FileWriter, MemoryWriter, RotatingFileWriter};
