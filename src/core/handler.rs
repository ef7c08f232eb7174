//! Handler trait for record destinations and the base formatting handler

use super::attribute::AttributeChain;
use super::error::{LoggerError, Result};
use super::format::OutputFormat;
use super::level::{Level, LevelVar};
use super::record::{Attr, Record, LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};
use chrono::SecondsFormat;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// A record destination. Implementations are shared between threads, so
/// any mutable state lives behind interior locking.
pub trait Handler: Send + Sync {
    /// Whether records at `level` would be emitted
    fn enabled(&self, level: Level) -> bool;

    /// Process one record
    fn handle(&self, record: &Record) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

pub type SharedHandler = Arc<dyn Handler>;

/// Any byte sink a formatter can write into
pub type Destination = Box<dyn Write + Send>;

/// Settings of a [`FormatHandler`]
#[derive(Debug, Clone, Default)]
pub struct HandlerOptions {
    /// Emit the call-site position as the `source` attribute
    pub include_source: bool,
    /// Minimum severity; lower records are dropped before formatting
    pub level: LevelVar,
    /// Per-attribute rewrite hook
    pub replace_attr: AttributeChain,
}

impl HandlerOptions {
    pub fn new(level: Level) -> Self {
        Self {
            level: LevelVar::new(level),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_source(mut self, include_source: bool) -> Self {
        self.include_source = include_source;
        self
    }

    #[must_use]
    pub fn with_level_var(mut self, level: LevelVar) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_replace_attr(mut self, chain: AttributeChain) -> Self {
        self.replace_attr = chain;
        self
    }
}

/// Encodes records in one [`OutputFormat`] and writes them, one line each,
/// into a destination.
pub struct FormatHandler {
    name: String,
    format: OutputFormat,
    options: HandlerOptions,
    writer: Mutex<Destination>,
}

impl FormatHandler {
    pub fn new<W: Write + Send + 'static>(
        format: OutputFormat,
        writer: W,
        options: HandlerOptions,
    ) -> Self {
        Self {
            name: format.as_str().to_lowercase(),
            format,
            options,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Live threshold; updates apply to subsequent records
    pub fn level_var(&self) -> &LevelVar {
        &self.options.level
    }

    fn encode(&self, record: &Record) -> String {
        let chain = &self.options.replace_attr;

        let mut builtins = Vec::with_capacity(4);
        builtins.push(chain.apply(
            &[],
            Attr::new(TIME_KEY, record.time.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ));
        builtins.push(chain.apply(&[], Attr::new(LEVEL_KEY, record.level)));
        if self.options.include_source {
            if let Some(ref source) = record.source {
                builtins.push(chain.apply(&[], Attr::new(SOURCE_KEY, source.to_string())));
            }
        }
        builtins.push(chain.apply(&[], Attr::new(MESSAGE_KEY, record.message.as_str())));

        let attrs: Vec<Attr> = record
            .attrs
            .iter()
            .map(|attr| chain.apply(&record.groups, attr.clone()))
            .collect();

        self.format.render(&builtins, &record.groups, &attrs)
    }
}

impl Handler for FormatHandler {
    fn enabled(&self, level: Level) -> bool {
        level >= self.options.level.level()
    }

    fn handle(&self, record: &Record) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }

        let mut line = self.encode(record);
        line.push('\n');

        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::io_operation("writing log record", format!("{} handler", self.name), e)
        })?;
        writer.flush().map_err(|e| {
            LoggerError::io_operation("flushing log record", format!("{} handler", self.name), e)
        })
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush().map_err(|e| {
            LoggerError::io_operation("flushing handler", format!("{} handler", self.name), e)
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
