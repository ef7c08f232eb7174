//! Per-sink configuration and handler construction
//!
//! A sink is one destination (console or file) with its own level, format,
//! source policy, attribute rewriters and middleware. [`SinkConfig`] holds
//! the shared settings; [`ConsoleSinkConfig`] and [`FileSinkConfig`] add the
//! destination-specific ones and know how to open their writer.

use super::attribute::{AttributeChain, AttributeFn};
use super::error::{LoggerError, Result, ResultExt};
use super::format::OutputFormat;
use super::handler::{FormatHandler, HandlerOptions, SharedHandler};
use super::level::{LevelSpec, LevelVar};
use super::middleware::{wrap_middleware, MiddlewareFn};
use super::rotation::{self, RotationPolicy};
use super::schema::validate_path;
use crate::writers::ConsoleWriter;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Settings shared by every sink
#[derive(Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct SinkConfig {
    /// Disable this sink
    pub disable: bool,
    /// Minimum severity; records below it are dropped
    pub level: LevelSpec,
    /// Record encoding, TEXT (default) or JSON
    pub format: OutputFormat,
    /// Include the source position of the log call
    pub include_source: bool,
    /// Keep the directory part of the source position
    pub include_full_source: bool,
    /// Handler wrappers; the first entry sees records first
    #[serde(skip)]
    pub middleware: Vec<MiddlewareFn>,
    /// Attribute rewriters run after the built-in ones
    #[serde(skip)]
    pub attribute_fns: Vec<AttributeFn>,
    #[serde(skip)]
    level_var: LevelVar,
}

/// Clones start from the current threshold but own it; handlers built from
/// one copy do not follow `set_level` on another.
impl Clone for SinkConfig {
    fn clone(&self) -> Self {
        Self {
            disable: self.disable,
            level: self.level.clone(),
            format: self.format,
            include_source: self.include_source,
            include_full_source: self.include_full_source,
            middleware: self.middleware.clone(),
            attribute_fns: self.attribute_fns.clone(),
            level_var: LevelVar::new(self.level_var.level()),
        }
    }
}

impl SinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<LevelSpec>) -> Self {
        self.level = level.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_source(mut self, include_source: bool, include_full_source: bool) -> Self {
        self.include_source = include_source;
        self.include_full_source = include_full_source;
        self
    }

    #[must_use]
    pub fn with_middleware(mut self, middleware: MiddlewareFn) -> Self {
        self.middleware.push(middleware);
        self
    }

    #[must_use]
    pub fn with_attribute_fn(mut self, f: AttributeFn) -> Self {
        self.attribute_fns.push(f);
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disable = true;
        self
    }

    /// Check level and format. A disabled sink is always valid.
    pub fn validate(&self) -> Result<()> {
        if self.disable {
            return Ok(());
        }
        self.level.level().context("validate config [log level]")?;
        Ok(())
    }

    /// Live threshold of handlers built from this config
    pub fn level_var(&self) -> &LevelVar {
        &self.level_var
    }

    /// Replace the level. Handlers already built from this config follow the
    /// change; on error nothing changes.
    pub fn set_level(&mut self, raw: impl Into<String>) -> Result<()> {
        self.level.set_raw(raw)?;
        self.level_var.set(self.level.level()?);
        Ok(())
    }

    /// Build the handler for this sink writing into `writer`.
    ///
    /// Fails with [`LoggerError::HandlerDisabled`] when the sink is switched
    /// off; callers composing several sinks skip it.
    pub fn build_handler<W: Write + Send + 'static>(&self, writer: W) -> Result<SharedHandler> {
        let options = self.handler_options().context("get handler")?;
        Ok(self.assemble(self.format.as_str().to_lowercase(), writer, options))
    }

    fn handler_options(&self) -> Result<HandlerOptions> {
        if self.disable {
            return Err(LoggerError::HandlerDisabled {
                format: self.format.to_string(),
            });
        }
        let level = self.level.level()?;
        self.level_var.set(level);

        Ok(HandlerOptions::default()
            .with_level_var(self.level_var.clone())
            .with_source(self.include_source)
            .with_replace_attr(AttributeChain::for_sink(
                self.include_full_source,
                &self.attribute_fns,
            )))
    }

    fn assemble<W: Write + Send + 'static>(
        &self,
        name: String,
        writer: W,
        options: HandlerOptions,
    ) -> SharedHandler {
        let base: SharedHandler =
            Arc::new(FormatHandler::new(self.format, writer, options).with_name(name));
        wrap_middleware(base, &self.middleware)
    }
}

impl fmt::Debug for SinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkConfig")
            .field("disable", &self.disable)
            .field("level", &self.level.raw())
            .field("format", &self.format)
            .field("include_source", &self.include_source)
            .field("include_full_source", &self.include_full_source)
            .field("middleware", &self.middleware.len())
            .field("attribute_fns", &self.attribute_fns.len())
            .finish()
    }
}

/// Console sink settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConsoleSinkConfig {
    #[serde(flatten)]
    pub sink: SinkConfig,
    /// User preference for interactive output on stdout. Log records
    /// always go to stderr.
    pub std_out: bool,
}

impl ConsoleSinkConfig {
    pub fn validate(&self) -> Result<()> {
        self.sink.validate()
    }

    /// Handler writing to stderr
    pub fn build_handler(&self) -> Result<SharedHandler> {
        let options = self.sink.handler_options().context("get handler")?;
        Ok(self
            .sink
            .assemble("console".to_string(), ConsoleWriter::stderr(), options))
    }
}

/// File sink settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct FileSinkConfig {
    #[serde(flatten)]
    pub sink: SinkConfig,
    /// Directory the log file is written to; empty means the current directory
    pub path: String,
    /// File name; defaults to the program name with a `.log` extension
    pub filename: String,
    /// Rotation settings
    pub rotate: RotationPolicy,
    #[serde(skip)]
    log_path: OnceLock<PathBuf>,
}

impl FileSinkConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self.log_path = OnceLock::new();
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotate: RotationPolicy) -> Self {
        self.rotate = rotate;
        self
    }

    /// Location of the log file.
    ///
    /// Resolved on first use and cached; later edits to `path` or `filename`
    /// do not move an already resolved file.
    pub fn log_path(&self) -> &Path {
        self.log_path.get_or_init(|| {
            let name = if self.filename.is_empty() {
                default_file_name()
            } else if Path::new(&self.filename).extension().is_none() {
                format!("{}.log", self.filename)
            } else {
                self.filename.clone()
            };
            Path::new(&self.path).join(name)
        })
    }

    /// Check level, format, rotation bounds and the log directory
    pub fn validate(&self) -> Result<()> {
        if self.sink.disable {
            return Ok(());
        }
        self.sink.validate()?;
        self.rotate
            .validate()
            .context("validate config [rotate]")?;
        validate_path(self.log_path()).context("validate config [log path]")
    }

    /// Handler writing to [`Self::log_path`], rotating unless disabled
    pub fn build_handler(&self) -> Result<SharedHandler> {
        let options = self.sink.handler_options().context("get handler")?;
        let destination = rotation::destination(self.log_path(), &self.rotate)
            .context("get handler")?;
        Ok(self.sink.assemble("file".to_string(), destination, options))
    }
}

/// `<program>.log`, from the running executable's name
fn default_file_name() -> String {
    program_log_name(std::env::current_exe().ok().as_deref())
}

/// Full base name of `exe` plus `.log`; dots in the name are kept
fn program_log_name(exe: Option<&Path>) -> String {
    let base = exe
        .and_then(Path::file_name)
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "app".to_string());
    format!("{}.log", base)
}
