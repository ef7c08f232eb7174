//! Logger front-end over a composed handler

use super::error::Result;
use super::handler::SharedHandler;
use super::level::Level;
use super::metrics::LoggerMetrics;
use super::record::{Attr, Record, Source};
use std::sync::Arc;

/// Cheap-to-clone handle that builds records and hands them to a handler.
///
/// Write failures never reach the caller of `info`/`error`/...; they are
/// counted in [`LoggerMetrics`] and reported on stderr.
///
/// # Example
///
/// ```
/// use rust_log_pipeline::core::handler::{FormatHandler, HandlerOptions};
/// use rust_log_pipeline::writers::MemoryWriter;
/// use rust_log_pipeline::{Attr, Level, Logger, OutputFormat};
/// use std::sync::Arc;
///
/// let out = MemoryWriter::new();
/// let handler = FormatHandler::new(OutputFormat::Text, out.clone(), HandlerOptions::new(Level::INFO));
/// let logger = Logger::new(Arc::new(handler)).with([Attr::new("service", "api")]);
///
/// logger.info("started");
/// assert!(out.contents().contains("msg=started service=api"));
/// ```
#[derive(Clone)]
pub struct Logger {
    handler: SharedHandler,
    attrs: Vec<Attr>,
    groups: Vec<String>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    pub fn new(handler: SharedHandler) -> Self {
        Self {
            handler,
            attrs: Vec::new(),
            groups: Vec::new(),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn handler(&self) -> &SharedHandler {
        &self.handler
    }

    /// Counters shared by this logger and every logger derived from it
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// Derived logger adding `attrs` to every record
    #[must_use]
    pub fn with<I: IntoIterator<Item = Attr>>(&self, attrs: I) -> Logger {
        let mut logger = self.clone();
        logger.attrs.extend(attrs);
        logger
    }

    /// Derived logger qualifying record attributes with `name`
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Logger {
        let mut logger = self.clone();
        logger.groups.push(name.into());
        logger
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.log_record(Record::new(level, message).with_source(Source::caller()));
    }

    #[track_caller]
    pub fn log_attrs<I>(&self, level: Level, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        let mut record = Record::new(level, message).with_source(Source::caller());
        record.add_attrs(attrs);
        self.log_record(record);
    }

    /// Complete `record` with this logger's attributes and groups, then
    /// deliver it
    pub fn log_record(&self, mut record: Record) {
        if !self.handler.enabled(record.level) {
            self.metrics.record_filtered();
            return;
        }

        if !self.attrs.is_empty() {
            let call_attrs = std::mem::take(&mut record.attrs);
            record.attrs = self.attrs.clone();
            record.attrs.extend(call_attrs);
        }
        if !self.groups.is_empty() {
            let mut groups = self.groups.clone();
            groups.append(&mut record.groups);
            record.groups = groups;
        }

        match self.handler.handle(&record) {
            Ok(()) => {
                self.metrics.record_logged();
            }
            Err(e) => {
                self.metrics.record_failed();
                eprintln!("[LOGGER ERROR] Failed to write log record: {}", e);
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::TRACE, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::DEBUG, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::INFO, message);
    }

    #[track_caller]
    pub fn notice(&self, message: impl Into<String>) {
        self.log(Level::NOTICE, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::WARN, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::ERROR, message);
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(Level::FATAL, message);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("handler", &self.handler.name())
            .field("attrs", &self.attrs)
            .field("groups", &self.groups)
            .finish()
    }
}
