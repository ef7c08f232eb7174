//! Output format configuration for log records
//!
//! Provides the two supported record encodings:
//! - Text: logfmt-style `key=value` pairs (default)
//! - Json: one JSON object per line

use super::error::{LoggerError, Result};
use super::record::{Attr, Value};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, JsonSchema)]
#[schemars(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    /// Human-readable key/value format (default)
    ///
    /// Example: `time=2025-01-08T10:30:45.123Z level=INFO msg="Request processed" id=7`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"id":7,"level":"INFO","msg":"Request processed","time":"2025-01-08T10:30:45.123Z"}`
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "TEXT",
            OutputFormat::Json => "JSON",
        }
    }

    /// Render one record line (without the trailing newline).
    ///
    /// `builtins` are top-level attributes (time, level, source, msg);
    /// `attrs` are qualified by `groups`.
    pub fn render(&self, builtins: &[Attr], groups: &[String], attrs: &[Attr]) -> String {
        match self {
            OutputFormat::Text => render_text(builtins, groups, attrs),
            OutputFormat::Json => render_json(builtins, groups, attrs),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TEXT" => Ok(OutputFormat::Text),
            "JSON" => Ok(OutputFormat::Json),
            _ => Err(LoggerError::invalid_format(s)),
        }
    }
}

impl Serialize for OutputFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn render_text(builtins: &[Attr], groups: &[String], attrs: &[Attr]) -> String {
    let prefix = if groups.is_empty() {
        String::new()
    } else {
        format!("{}.", groups.join("."))
    };

    let mut parts = Vec::with_capacity(builtins.len() + attrs.len());
    for attr in builtins.iter().filter(|a| !a.is_empty()) {
        parts.push(format!("{}={}", escape_text_key(&attr.key), text_value(&attr.value)));
    }
    for attr in attrs.iter().filter(|a| !a.is_empty()) {
        parts.push(format!(
            "{}{}={}",
            prefix,
            escape_text_key(&attr.key),
            text_value(&attr.value)
        ));
    }
    parts.join(" ")
}

fn render_json(builtins: &[Attr], groups: &[String], attrs: &[Attr]) -> String {
    let mut leaf = serde_json::Map::new();
    for attr in attrs.iter().filter(|a| !a.is_empty()) {
        leaf.insert(attr.key.clone(), attr.value.to_json_value());
    }

    let mut root = if leaf.is_empty() {
        serde_json::Map::new()
    } else {
        // Fold the group path inside-out: {"g1":{"g2":{...attrs}}}
        groups.iter().rev().fold(leaf, |inner, group| {
            let mut outer = serde_json::Map::new();
            outer.insert(group.clone(), serde_json::Value::Object(inner));
            outer
        })
    };

    // Built-in keys take precedence over user attributes of the same name
    for attr in builtins.iter().filter(|a| !a.is_empty()) {
        root.insert(attr.key.clone(), attr.value.to_json_value());
    }

    serde_json::Value::Object(root).to_string()
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => escape_text_value(s),
        other => escape_text_value(&other.to_string()),
    }
}

/// Escape a text key (remove spaces and special chars)
fn escape_text_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace() && *c != '=' && *c != '"')
        .collect()
}

/// Escape a text value (quote if needed)
fn escape_text_value(value: &str) -> String {
    let needs_quoting = value.is_empty()
        || value
            .chars()
            .any(|c| c == ' ' || c == '"' || c == '=' || c.is_control());
    if needs_quoting {
        quote_text_value(value)
    } else {
        value.to_string()
    }
}

/// Quote a text value
fn quote_text_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&c.escape_unicode().to_string()),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("Text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap().to_string(), "JSON");

        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_serde_roundtrip() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(serde_json::to_string(&format).unwrap(), "\"JSON\"");
        assert!(serde_json::from_str::<OutputFormat>("\"yaml\"").is_err());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_text_render() {
        let builtins = vec![
            Attr::new("level", "INFO"),
            Attr::new("msg", "Request processed"),
        ];
        let attrs = vec![Attr::new("user", "alice"), Attr::new("count", 5)];
        let line = OutputFormat::Text.render(&builtins, &[], &attrs);

        assert_eq!(line, "level=INFO msg=\"Request processed\" user=alice count=5");
    }

    #[test]
    fn test_text_render_groups_and_escapes() {
        let groups = vec!["http".to_string(), "req".to_string()];
        let attrs = vec![
            Attr::new("query", "id=1"),
            Attr::new("body", "line1\nline2"),
            Attr::new("", "dropped"),
        ];
        let line = OutputFormat::Text.render(&[], &groups, &attrs);

        assert_eq!(line, "http.req.query=\"id=1\" http.req.body=\"line1\\nline2\"");
    }

    #[test]
    fn test_text_render_level_value() {
        let line = OutputFormat::Text.render(&[Attr::new("level", Level::NOTICE)], &[], &[]);
        assert_eq!(line, "level=INFO+2");
    }

    #[test]
    fn test_json_render_nests_groups() {
        let builtins = vec![Attr::new("level", "ERROR"), Attr::new("msg", "failed")];
        let groups = vec!["db".to_string()];
        let attrs = vec![Attr::new("latency_ms", 42)];
        let line = OutputFormat::Json.render(&builtins, &groups, &attrs);

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["msg"], "failed");
        assert_eq!(parsed["db"]["latency_ms"], 42);
    }

    #[test]
    fn test_json_render_keeps_builtins_on_key_clash() {
        let builtins = vec![
            Attr::new("level", "INFO"),
            Attr::new("msg", "real message"),
        ];
        let attrs = vec![Attr::new("msg", "user attr"), Attr::new("level", 99)];
        let line = OutputFormat::Json.render(&builtins, &[], &attrs);

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["msg"], "real message");
        assert_eq!(parsed["level"], "INFO");
    }
}
