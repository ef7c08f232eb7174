//! Error types for the log pipeline

use std::num::ParseIntError;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Malformed or unrecognized severity specification
    #[error("invalid log level \"{level}\"")]
    InvalidLevel {
        level: String,
        #[source]
        source: Option<ParseIntError>,
    },

    /// Output format outside of {TEXT, JSON}
    #[error("invalid format: {format}")]
    InvalidFormat { format: String },

    /// A rotation bound below its minimum
    #[error("invalid rotation policy: {field} must be at least 1, got {value}")]
    InvalidRotationPolicy { field: &'static str, value: i64 },

    /// A directory component of a path is missing or not a directory
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// The sink is switched off; callers skip it
    #[error("[{format}] handler disabled")]
    HandlerDisabled { format: String },

    /// Rotation is switched off; callers open a plain writer instead
    #[error("log rotation disabled")]
    RotatorDisabled,

    /// Every sink ended up disabled
    #[error("no log handlers enabled")]
    NoHandlersEnabled,

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration document could not be decoded
    #[error("parse {format} configuration: {message}")]
    ConfigParse { format: String, message: String },

    /// A handler panicked while processing a record
    #[error("handler '{handler}' panicked: {message}")]
    HandlerPanicked { handler: String, message: String },

    /// Failures collected from several fan-out members
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Aggregate(Vec<LoggerError>),

    /// One layer of context around an inner error
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<LoggerError>,
    },
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(level: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            level: level.into(),
            source: None,
        }
    }

    /// Create an invalid format error
    pub fn invalid_format(format: impl Into<String>) -> Self {
        LoggerError::InvalidFormat {
            format: format.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration parse error
    pub fn config_parse(format: impl Into<String>, message: impl ToString) -> Self {
        LoggerError::ConfigParse {
            format: format.into(),
            message: message.to_string(),
        }
    }

    /// Wrap this error in one more layer of context
    pub fn context(self, context: impl Into<String>) -> Self {
        LoggerError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error beneath all context layers
    pub fn root(&self) -> &LoggerError {
        let mut current = self;
        while let LoggerError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    pub fn is_invalid_level(&self) -> bool {
        matches!(self.root(), LoggerError::InvalidLevel { .. })
    }

    pub fn is_invalid_format(&self) -> bool {
        matches!(self.root(), LoggerError::InvalidFormat { .. })
    }

    pub fn is_invalid_rotation_policy(&self) -> bool {
        matches!(self.root(), LoggerError::InvalidRotationPolicy { .. })
    }

    pub fn is_invalid_path(&self) -> bool {
        matches!(self.root(), LoggerError::InvalidPath { .. })
    }

    pub fn is_handler_disabled(&self) -> bool {
        matches!(self.root(), LoggerError::HandlerDisabled { .. })
    }

    pub fn is_rotator_disabled(&self) -> bool {
        matches!(self.root(), LoggerError::RotatorDisabled)
    }

    pub fn is_no_handlers_enabled(&self) -> bool {
        matches!(self.root(), LoggerError::NoHandlersEnabled)
    }
}

/// Attach context to the error side of a [`Result`]
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}
