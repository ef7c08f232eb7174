//! Root configuration and composition into a single dispatcher

use super::dispatcher::FanOut;
use super::error::{LoggerError, Result, ResultExt};
use super::handler::SharedHandler;
use super::logger::Logger;
use super::sink::{ConsoleSinkConfig, FileSinkConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Document syntax of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Pick the syntax from a file extension (`json`, `yaml`, `yml`,
    /// `toml`, `tml`; case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "json" => Ok(ConfigFormat::Json),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" | "tml" => Ok(ConfigFormat::Toml),
            _ => Err(LoggerError::config_parse(
                "unknown",
                format!("invalid file format [.{}]", ext),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "JSON",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Toml => "TOML",
        }
    }
}

/// Root logging configuration
///
/// # Example
///
/// ```no_run
/// use rust_log_pipeline::{Config, ConfigFormat};
///
/// let config = Config::from_str(
///     r#"
///     [Console]
///     Level = "debug"
///
///     [File]
///     Path = "./logs"
///     Format = "json"
///     Rotate = { MaxSize = 10, Keep = 3 }
///     "#,
///     ConfigFormat::Toml,
/// )
/// .unwrap();
///
/// let logger = config.logger().unwrap();
/// logger.info("configured");
/// ```
#[derive(Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct Config {
    pub console: ConsoleSinkConfig,
    pub file: FileSinkConfig,
    /// Pre-built handlers added to the composed set unchanged
    #[serde(skip)]
    pub handlers: Vec<SharedHandler>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_handler(mut self, handler: SharedHandler) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Load a configuration file, choosing the syntax by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("load config \"{}\"", path.display()))?;
        let text = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading config file",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_str(&text, format)
            .with_context(|| format!("load config \"{}\"", path.display()))
    }

    /// Parse configuration text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Json => {
                serde_json::from_str(text).map_err(|e| LoggerError::config_parse("JSON", e))
            }
            ConfigFormat::Yaml => {
                serde_yaml::from_str(text).map_err(|e| LoggerError::config_parse("YAML", e))
            }
            ConfigFormat::Toml => {
                toml::from_str(text).map_err(|e| LoggerError::config_parse("TOML", e))
            }
        }
    }

    /// Serialize in the given syntax
    pub fn to_document(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ConfigFormat::Yaml => {
                serde_yaml::to_string(self).map_err(|e| LoggerError::config_parse("YAML", e))
            }
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| LoggerError::config_parse("TOML", e))
            }
        }
    }

    /// Check the whole tree before anything is opened
    pub fn validate(&self) -> Result<()> {
        self.console
            .validate()
            .context("validate config [console output]")?;
        self.file
            .validate()
            .context("validate config [file output]")?;
        Ok(())
    }

    /// Validate, build every enabled sink and fuse them into one handler.
    ///
    /// Pre-built handlers come first, then console, then file. A single
    /// active handler is returned as is; several are wrapped in a
    /// [`FanOut`]. No active handler at all is
    /// [`LoggerError::NoHandlersEnabled`].
    pub fn dispatcher(&self) -> Result<SharedHandler> {
        self.validate()?;

        let mut handlers = self.handlers.clone();
        if let Some(console) = skip_disabled(self.console.build_handler())
            .context("get handler [console output]")?
        {
            handlers.push(console);
        }
        if let Some(file) =
            skip_disabled(self.file.build_handler()).context("get handler [file output]")?
        {
            handlers.push(file);
        }

        match handlers.len() {
            0 => Err(LoggerError::NoHandlersEnabled),
            1 => Ok(handlers.remove(0)),
            _ => Ok(Arc::new(FanOut::new(handlers))),
        }
    }

    /// [`Self::dispatcher`] behind a [`Logger`] front-end
    pub fn logger(&self) -> Result<Logger> {
        self.dispatcher().map(Logger::new)
    }
}

/// Turn the expected "sink switched off" signal into `None`
fn skip_disabled(result: Result<SharedHandler>) -> Result<Option<SharedHandler>> {
    match result {
        Ok(handler) => Ok(Some(handler)),
        Err(e) if e.is_handler_disabled() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Validate `config` and compose its dispatcher
pub fn compose(config: &Config) -> Result<SharedHandler> {
    config.dispatcher()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("console", &self.console)
            .field("file", &self.file)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
