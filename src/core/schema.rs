//! JSON Schema generation and configuration file checks

use super::compose::Config;
use super::error::{LoggerError, Result, ResultExt};
use super::level::LevelSpec;
use schemars::gen::SchemaGenerator;
use schemars::schema::{
    InstanceType, Metadata, RootSchema, Schema, SchemaObject, SingleOrVec, StringValidation,
};
use schemars::JsonSchema;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Accepted spellings of a level in configuration documents
pub const LEVEL_PATTERN: &str = r"^(?i)(trace|debug|info|notice|warning|warn|error|fatal|emerg|emergency)([+-][1-9][0-9]*)?$|^(-?\d+)$";

impl JsonSchema for LevelSpec {
    fn schema_name() -> String {
        "Level".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(SingleOrVec::Vec(vec![
                InstanceType::String,
                InstanceType::Integer,
            ])),
            string: Some(Box::new(StringValidation {
                pattern: Some(LEVEL_PATTERN.to_string()),
                ..Default::default()
            })),
            metadata: Some(Box::new(Metadata {
                description: Some(
                    "Minimum severity: a level name with an optional offset (WARN+2) or an integer"
                        .to_string(),
                ),
                ..Default::default()
            })),
            ..Default::default()
        }
        .into()
    }
}

/// Schema describing [`Config`] documents
pub fn config_schema() -> RootSchema {
    schemars::schema_for!(Config)
}

/// Write the pretty-printed schema to `path`, replacing any existing file
pub fn generate_schema<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let wrap = || format!("generate configuration schema \"{}\"", path.display());

    validate_path(path).with_context(wrap)?;
    let data = serde_json::to_string_pretty(&config_schema())?;
    fs::write(path, data)
        .map_err(|e| {
            LoggerError::io_operation(
                "writing schema",
                format!("Failed to write '{}'", path.display()),
                e,
            )
        })
        .with_context(wrap)
}

/// Load a configuration file and validate it, returning the first problem
pub fn validate_config_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let wrap = || format!("validate configuration \"{}\"", path.display());

    validate_path(path).with_context(wrap)?;
    let config = Config::from_file(path).with_context(wrap)?;
    config.validate().with_context(wrap)
}

/// Check that every directory leading up to `path` exists and is a
/// directory. The final component is not checked.
pub fn validate_path(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };

    let mut current = PathBuf::new();
    for component in parent.components() {
        current.push(component);
        if matches!(component, Component::Prefix(_) | Component::RootDir) {
            continue;
        }
        match fs::metadata(&current) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(LoggerError::invalid_path(
                    current.display().to_string(),
                    "path component is not a directory",
                ))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LoggerError::invalid_path(
                    current.display().to_string(),
                    "directory does not exist",
                ))
            }
            Err(e) => {
                return Err(LoggerError::invalid_path(
                    current.display().to_string(),
                    format!("error accessing directory: {}", e),
                ))
            }
        }
    }
    Ok(())
}
