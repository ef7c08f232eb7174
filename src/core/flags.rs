//! Command-line flag names for binding the configuration to a CLI layer

use std::fmt::Display;

/// Shape of the error raised when a flag cannot be read
pub const ERROR_FORMAT: &str = "read flag --{flag} Error: {error}";

pub const DEVELOPMENT: &str = "dev";
pub const LOG_CONSOLE_DISABLE: &str = "log-console-disable";
pub const LOG_CONSOLE_LEVEL: &str = "log-console-level";
pub const LOG_CONSOLE_FORMAT: &str = "log-console-format";
pub const LOG_CONSOLE_SOURCE: &str = "log-console-source";
pub const LOG_CONSOLE_FULL_SOURCE: &str = "log-console-full-source";
pub const LOG_FILE_ENABLE: &str = "log-file-enable";
pub const LOG_FILE_PATH: &str = "log-file-path";
pub const LOG_FILE_LEVEL: &str = "log-file-level";
pub const LOG_FILE_FORMAT: &str = "log-file-format";
pub const LOG_FILE_SOURCE: &str = "log-file-source";
pub const LOG_FILE_FULL_SOURCE: &str = "log-file-full-source";
pub const LOG_FILE_ROTATE_ENABLE: &str = "log-file-rotate-enable";
pub const LOG_FILE_ROTATE_START: &str = "log-file-rotate-start";
pub const LOG_FILE_ROTATE_SIZE: &str = "log-file-rotate-size";
pub const LOG_FILE_ROTATE_KEEP: &str = "log-file-rotate-keep";
pub const LOG_FILE_ROTATE_AGE: &str = "log-file-rotate-age";

/// Every flag name, in declaration order
pub const ALL: [&str; 17] = [
    DEVELOPMENT,
    LOG_CONSOLE_DISABLE,
    LOG_CONSOLE_LEVEL,
    LOG_CONSOLE_FORMAT,
    LOG_CONSOLE_SOURCE,
    LOG_CONSOLE_FULL_SOURCE,
    LOG_FILE_ENABLE,
    LOG_FILE_PATH,
    LOG_FILE_LEVEL,
    LOG_FILE_FORMAT,
    LOG_FILE_SOURCE,
    LOG_FILE_FULL_SOURCE,
    LOG_FILE_ROTATE_ENABLE,
    LOG_FILE_ROTATE_START,
    LOG_FILE_ROTATE_SIZE,
    LOG_FILE_ROTATE_KEEP,
    LOG_FILE_ROTATE_AGE,
];

/// Render [`ERROR_FORMAT`] for `flag`
pub fn flag_error(flag: &str, error: impl Display) -> String {
    ERROR_FORMAT
        .replace("{flag}", flag)
        .replace("{error}", &error.to_string())
}
