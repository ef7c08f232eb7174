//! Process-wide default and debug loggers

use super::attribute::AttributeChain;
use super::compose::Config;
use super::error::{Result, ResultExt};
use super::format::OutputFormat;
use super::handler::{FormatHandler, HandlerOptions};
use super::level::Level;
use super::logger::Logger;
use crate::writers::ConsoleWriter;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

static DEFAULT_LOGGER: LazyLock<ArcSwap<Logger>> =
    LazyLock::new(|| ArcSwap::from_pointee(stderr_logger(Level::INFO, false)));

static DEBUG_LOGGER: LazyLock<ArcSwap<Logger>> =
    LazyLock::new(|| ArcSwap::from_pointee(stderr_logger(Level::DEBUG, true)));

/// TEXT logger on stderr
fn stderr_logger(level: Level, include_source: bool) -> Logger {
    let options = HandlerOptions::new(level)
        .with_source(include_source)
        .with_replace_attr(AttributeChain::for_sink(false, &[]));
    let handler = FormatHandler::new(OutputFormat::Text, ConsoleWriter::stderr(), options)
        .with_name("console");
    Logger::new(Arc::new(handler))
}

/// The default logger; INFO on stderr until replaced
pub fn logger() -> Arc<Logger> {
    DEFAULT_LOGGER.load_full()
}

/// Replace the default logger, returning the installed one
pub fn set_default_logger(logger: Logger) -> Arc<Logger> {
    let logger = Arc::new(logger);
    DEFAULT_LOGGER.store(Arc::clone(&logger));
    logger
}

/// The debug logger; DEBUG with source positions on stderr until replaced
pub fn debug_logger() -> Arc<Logger> {
    DEBUG_LOGGER.load_full()
}

/// Replace the debug logger, returning the installed one
pub fn set_debug_logger(logger: Logger) -> Arc<Logger> {
    let logger = Arc::new(logger);
    DEBUG_LOGGER.store(Arc::clone(&logger));
    logger
}

/// Validate `config` and build a logger over its composed sinks
pub fn configured_logger(config: &Config) -> Result<Logger> {
    config
        .validate()
        .context("invalid logger configuration")?;
    config.logger().context("get configured logger")
}
