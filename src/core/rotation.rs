//! File rotation policy and writer selection

use super::error::{LoggerError, Result, ResultExt};
use super::handler::Destination;
use crate::writers::{FileWriter, RotatingFileWriter, RotationLimits};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default max log file size in megabytes
pub const DEFAULT_ROTATE_SIZE: i64 = 5;
/// Default number of rotated files to keep
pub const DEFAULT_ROTATE_KEEP: i64 = 4;
/// Default max age of a rotated file in days
pub const DEFAULT_ROTATE_AGE: i64 = 7;

/// When and how a file sink rolls over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase", default)]
pub struct RotationPolicy {
    /// Disable log rotation, enabled by default
    pub disable: bool,
    /// Rotate once every time the sink is built
    pub on_start: bool,
    /// Max size of the active file in megabytes
    #[schemars(range(min = 1))]
    pub max_size: i64,
    /// Number of rotated files to keep
    #[schemars(range(min = 1))]
    pub keep: i64,
    /// Max age of a rotated file in days
    #[schemars(range(min = 1))]
    pub max_age: i64,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            disable: false,
            on_start: false,
            max_size: DEFAULT_ROTATE_SIZE,
            keep: DEFAULT_ROTATE_KEEP,
            max_age: DEFAULT_ROTATE_AGE,
            compress: false,
        }
    }
}

impl RotationPolicy {
    /// Check the numeric bounds. A disabled policy is always valid.
    pub fn validate(&self) -> Result<()> {
        if self.disable {
            return Ok(());
        }
        self.limits().map(|_| ())
    }

    /// Writer thresholds equivalent to this policy; any bound below one is
    /// an [`LoggerError::InvalidRotationPolicy`]
    pub fn limits(&self) -> Result<RotationLimits> {
        Ok(RotationLimits::new()
            .with_max_size_mb(bound("MaxSize", self.max_size)?)
            .with_max_backups(bound("Keep", self.keep)? as usize)
            .with_max_age_days(bound("MaxAge", self.max_age)?)
            .with_compression(self.compress))
    }
}

fn bound(field: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or(LoggerError::InvalidRotationPolicy { field, value })
}

/// Build a rotating writer for `path`.
///
/// Fails with [`LoggerError::RotatorDisabled`] when rotation is switched off;
/// callers then open the file with [`destination`] semantics instead.
pub fn writer(path: &Path, policy: &RotationPolicy) -> Result<RotatingFileWriter> {
    if policy.disable {
        return Err(LoggerError::RotatorDisabled);
    }

    let limits = policy.limits()?;
    let mut writer = RotatingFileWriter::new(path, limits)
        .with_context(|| format!("open rotating log file \"{}\"", path.display()))?;
    if policy.on_start {
        writer
            .rotate()
            .with_context(|| format!("rotate \"{}\" on start", path.display()))?;
    }
    Ok(writer)
}

/// Byte destination for a file sink: rotating when the policy allows,
/// otherwise a plain append writer.
pub fn destination(path: &Path, policy: &RotationPolicy) -> Result<Destination> {
    match writer(path, policy) {
        Ok(rotating) => Ok(Box::new(rotating)),
        Err(e) if e.is_rotator_disabled() => {
            let file = FileWriter::new(path)
                .with_context(|| format!("open log file \"{}\"", path.display()))?;
            Ok(Box::new(file))
        }
        Err(e) => Err(e),
    }
}
