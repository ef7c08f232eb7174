//! Core pipeline types: levels, records, handlers and composition

pub mod attribute;
#[cfg(feature = "console")]
pub mod colors;
pub mod compose;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod flags;
pub mod format;
pub mod global;
pub mod handler;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod middleware;
pub mod record;
pub mod rotation;
pub mod schema;
pub mod sink;

pub use attribute::{attribute_fn, AttributeChain, AttributeFn};
#[cfg(feature = "console")]
pub use colors::LevelColors;
pub use compose::{compose, Config, ConfigFormat};
pub use context::{ContextGuard, LogContext};
pub use dispatcher::FanOut;
pub use error::{LoggerError, Result, ResultExt};
pub use format::OutputFormat;
pub use global::{configured_logger, debug_logger, logger, set_debug_logger, set_default_logger};
pub use handler::{Destination, FormatHandler, Handler, HandlerOptions, SharedHandler};
pub use level::{resolve, Level, LevelSpec, LevelVar, ResolvedLevel};
pub use logger::Logger;
pub use metrics::LoggerMetrics;
pub use middleware::{inline_middleware, middleware_fn, wrap_middleware, MiddlewareFn};
pub use record::{Attr, Record, Source, Value};
pub use rotation::RotationPolicy;
pub use schema::{config_schema, generate_schema, validate_config_file, validate_path};
pub use sink::{ConsoleSinkConfig, FileSinkConfig, SinkConfig};
