//! Severity levels and level specifications
//!
//! Severities are plain signed integers on a fixed ladder:
//!
//! | name                      | value |
//! |---------------------------|-------|
//! | TRACE                     | -8    |
//! | DEBUG                     | -4    |
//! | INFO                      | 0     |
//! | NOTICE                    | 2     |
//! | WARN, WARNING             | 4     |
//! | ERROR                     | 8     |
//! | FATAL, EMERG, EMERGENCY   | 12    |
//!
//! A level specification is either a raw integer (`"12"`) or a ladder name
//! with an optional signed offset (`"WARN+2"`, `"error-4"`).

use super::error::{LoggerError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, OnceLock};

/// A numeric log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(i64);

impl Level {
    pub const TRACE: Level = Level(-8);
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const NOTICE: Level = Level(2);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);
    pub const FATAL: Level = Level(12);

    pub const fn new(value: i64) -> Self {
        Level(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// Add a signed offset, failing on overflow
    pub fn checked_offset(self, offset: i64) -> Option<Level> {
        self.0.checked_add(offset).map(Level)
    }

    /// Name used when no custom label exists, relative to the nearest
    /// lower base level (`INFO+2`, `DEBUG-4`, `ERROR+4`)
    pub fn default_name(self) -> String {
        fn relative(base: &str, delta: i64) -> String {
            if delta == 0 {
                base.to_string()
            } else {
                format!("{}{:+}", base, delta)
            }
        }

        let v = self.0;
        if v < Level::INFO.0 {
            relative("DEBUG", v - Level::DEBUG.0)
        } else if v < Level::WARN.0 {
            relative("INFO", v - Level::INFO.0)
        } else if v < Level::ERROR.0 {
            relative("WARN", v - Level::WARN.0)
        } else {
            relative("ERROR", v - Level::ERROR.0)
        }
    }

    /// Label for the severities that have no slot in the default naming
    pub fn custom_name(self) -> Option<&'static str> {
        match self {
            Level::TRACE => Some("TRACE"),
            Level::NOTICE => Some("NOTICE"),
            Level::FATAL => Some("FATAL"),
            _ => None,
        }
    }

    /// Custom label when one exists, default rendering otherwise
    pub fn label(self) -> String {
        self.custom_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.default_name())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.default_name())
    }
}

impl From<i64> for Level {
    fn from(value: i64) -> Self {
        Level(value)
    }
}

fn ladder(name: &str) -> Option<Level> {
    match name.to_uppercase().as_str() {
        "TRACE" => Some(Level::TRACE),
        "DEBUG" => Some(Level::DEBUG),
        "INFO" => Some(Level::INFO),
        "NOTICE" => Some(Level::NOTICE),
        "WARN" | "WARNING" => Some(Level::WARN),
        "ERROR" => Some(Level::ERROR),
        "FATAL" | "EMERG" | "EMERGENCY" => Some(Level::FATAL),
        _ => None,
    }
}

/// Outcome of resolving a level specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLevel {
    pub level: Level,
    /// Uppercased ladder name; `None` for raw integers
    pub name: Option<String>,
}

/// Resolve a level specification into a severity.
///
/// An empty string is INFO. A string that parses entirely as an `i64` is
/// taken verbatim. Anything else is split at the first `+` or `-` into a
/// ladder name and a signed offset.
pub fn resolve(raw: &str) -> Result<ResolvedLevel> {
    if raw.is_empty() {
        return Ok(ResolvedLevel {
            level: Level::INFO,
            name: None,
        });
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(ResolvedLevel {
            level: Level(value),
            name: None,
        });
    }

    let (name, offset) = match raw.find(['+', '-']) {
        Some(i) => {
            let offset = raw[i..]
                .parse::<i64>()
                .map_err(|e| LoggerError::InvalidLevel {
                    level: raw.to_string(),
                    source: Some(e),
                })?;
            (&raw[..i], offset)
        }
        None => (raw, 0),
    };

    let base = ladder(name).ok_or_else(|| LoggerError::invalid_level(raw))?;
    let level = base
        .checked_offset(offset)
        .ok_or_else(|| LoggerError::invalid_level(raw))?;

    Ok(ResolvedLevel {
        level,
        name: Some(name.to_uppercase()),
    })
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        resolve(s).map(|r| r.level)
    }
}

/// A raw level string with a decode-once cache.
///
/// The raw string can only be replaced through [`LevelSpec::set_raw`], which
/// drops the cached result in the same call, so a stale severity is never
/// served.
#[derive(Debug, Clone, Default)]
pub struct LevelSpec {
    raw: String,
    resolved: OnceLock<ResolvedLevel>,
}

impl LevelSpec {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            resolved: OnceLock::new(),
        }
    }

    /// Build a spec that is already decoded
    pub fn from_level(level: Level) -> Self {
        Self {
            raw: level.value().to_string(),
            resolved: OnceLock::from(ResolvedLevel { level, name: None }),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_decoded(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Decode the raw string, reusing the cached result after the first success
    pub fn decode(&self) -> Result<&ResolvedLevel> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }
        let resolved = resolve(&self.raw)
            .map_err(|e| e.context(format!("decode level string \"{}\"", self.raw)))?;
        Ok(self.resolved.get_or_init(|| resolved))
    }

    /// The decoded severity
    pub fn level(&self) -> Result<Level> {
        self.decode()
            .map(|r| r.level)
            .map_err(|e| e.context(format!("get log level \"{}\"", self.raw)))
    }

    /// Replace the raw string. On failure the previous value and cache are kept.
    pub fn set_raw(&mut self, raw: impl Into<String>) -> Result<()> {
        let raw = raw.into();
        let resolved = resolve(&raw)
            .map_err(|e| e.context(format!("set log level \"{}\"", raw)))?;
        self.raw = raw;
        self.resolved = OnceLock::from(resolved);
        Ok(())
    }
}

impl PartialEq for LevelSpec {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl From<&str> for LevelSpec {
    fn from(raw: &str) -> Self {
        LevelSpec::new(raw)
    }
}

impl From<Level> for LevelSpec {
    fn from(level: Level) -> Self {
        LevelSpec::from_level(level)
    }
}

impl Serialize for LevelSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for LevelSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        let raw = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        let spec = LevelSpec::new(raw);
        spec.decode().map_err(serde::de::Error::custom)?;
        Ok(spec)
    }
}

/// A severity threshold shared between a handler and whoever adjusts it
#[derive(Debug, Clone, Default)]
pub struct LevelVar(Arc<AtomicI64>);

impl LevelVar {
    pub fn new(level: Level) -> Self {
        LevelVar(Arc::new(AtomicI64::new(level.value())))
    }

    #[inline]
    pub fn level(&self) -> Level {
        Level(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, level: Level) {
        self.0.store(level.value(), Ordering::Release);
    }

    /// Resolve `spec` and store it; the current threshold stays on error
    pub fn set_from_str(&self, spec: &str) -> Result<()> {
        let resolved = resolve(spec).map_err(|e| e.context(format!("set log level \"{}\"", spec)))?;
        self.set(resolved.level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_empty_is_info() {
        assert_eq!(resolve("").unwrap().level, Level::INFO);
        assert_eq!(resolve("INFO").unwrap().level, Level::INFO);
        assert_eq!(resolve("info").unwrap().level, Level::INFO);
    }

    #[test]
    fn test_resolve_offsets() {
        assert_eq!(resolve("WARN+2").unwrap().level, Level::new(6));
        assert_eq!(resolve("ERROR-4").unwrap().level, Level::new(4));
        assert_eq!(resolve("debug-4").unwrap().level, Level::TRACE);

        let resolved = resolve("warning+1").unwrap();
        assert_eq!(resolved.name.as_deref(), Some("WARNING"));
        assert_eq!(resolved.level, Level::new(5));
    }

    #[test]
    fn test_resolve_raw_integer() {
        let resolved = resolve("12").unwrap();
        assert_eq!(resolved.level, Level::FATAL);
        assert_eq!(resolved.name, None);
        assert_eq!(resolve("-3").unwrap().level, Level::new(-3));
    }

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(resolve("Fatal").unwrap().level, Level::FATAL);
        assert_eq!(resolve("EMERGENCY").unwrap().level, Level::FATAL);
        assert_eq!(resolve("emerg").unwrap().level, Level::FATAL);
        assert_eq!(resolve("notice").unwrap().level, Level::NOTICE);
        assert_eq!(resolve("trace").unwrap().level, Level::TRACE);
    }

    #[test]
    fn test_resolve_errors() {
        let err = resolve("BOGUS").unwrap_err();
        assert!(err.is_invalid_level());

        let err = resolve("WARN+x").unwrap_err();
        assert!(err.is_invalid_level());
        assert!(matches!(
            err,
            LoggerError::InvalidLevel { source: Some(_), .. }
        ));

        assert!(resolve("WARN+").is_err());
        assert!(resolve("WARN+2+3").is_err());
        assert!(resolve(&format!("FATAL+{}", i64::MAX)).is_err());
    }

    #[test]
    fn test_default_and_custom_names() {
        assert_eq!(Level::INFO.default_name(), "INFO");
        assert_eq!(Level::NOTICE.default_name(), "INFO+2");
        assert_eq!(Level::TRACE.default_name(), "DEBUG-4");
        assert_eq!(Level::FATAL.default_name(), "ERROR+4");
        assert_eq!(Level::new(6).default_name(), "WARN+2");

        assert_eq!(Level::NOTICE.label(), "NOTICE");
        assert_eq!(Level::TRACE.label(), "TRACE");
        assert_eq!(Level::FATAL.label(), "FATAL");
        assert_eq!(Level::new(3).label(), "INFO+3");
    }

    #[test]
    fn test_spec_decodes_once() {
        let spec = LevelSpec::new("WARN+2");
        assert!(!spec.is_decoded());

        let first = spec.level().unwrap();
        assert!(spec.is_decoded());
        let second = spec.level().unwrap();
        assert_eq!(first, second);
        assert_eq!(spec.raw(), "WARN+2");
    }

    #[test]
    fn test_spec_set_raw_resets_cache() {
        let mut spec = LevelSpec::new("DEBUG");
        assert_eq!(spec.level().unwrap(), Level::DEBUG);

        spec.set_raw("ERROR").unwrap();
        assert_eq!(spec.level().unwrap(), Level::ERROR);

        assert!(spec.set_raw("nope").is_err());
        assert_eq!(spec.raw(), "ERROR");
        assert_eq!(spec.level().unwrap(), Level::ERROR);
    }

    #[test]
    fn test_spec_error_context() {
        let spec = LevelSpec::new("LOUD");
        let err = spec.level().unwrap_err();
        assert!(err.is_invalid_level());
        assert!(err.to_string().starts_with("get log level \"LOUD\""));
        assert!(!spec.is_decoded());
    }

    #[test]
    fn test_spec_deserialize() {
        let spec: LevelSpec = serde_json::from_str("\"notice\"").unwrap();
        assert_eq!(spec.level().unwrap(), Level::NOTICE);

        let spec: LevelSpec = serde_json::from_str("-8").unwrap();
        assert_eq!(spec.level().unwrap(), Level::TRACE);

        assert!(serde_json::from_str::<LevelSpec>("\"loud\"").is_err());
    }

    #[test]
    fn test_level_var() {
        let var = LevelVar::new(Level::INFO);
        let shared = var.clone();

        shared.set(Level::ERROR);
        assert_eq!(var.level(), Level::ERROR);

        var.set_from_str("debug").unwrap();
        assert_eq!(shared.level(), Level::DEBUG);

        assert!(var.set_from_str("nope").is_err());
        assert_eq!(shared.level(), Level::DEBUG);
    }
}
