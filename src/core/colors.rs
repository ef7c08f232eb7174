//! Terminal colours for the rendered level label

use super::attribute::{attribute_fn, AttributeFn};
use super::level::Level;
use super::record::{Attr, Value, LEVEL_KEY};
use colored::{Color, Colorize};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps severities to label colours.
///
/// Install the rewriter from [`LevelColors::attribute_fn`] after the
/// built-in rewriters so it colours the final label (`NOTICE`, `WARN+2`).
#[derive(Debug, Clone, Default)]
pub struct LevelColors {
    colors: HashMap<Level, Color>,
}

impl LevelColors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_colors() -> Self {
        let mut colors = Self::new();
        colors.set_default_colors();
        colors
    }

    pub fn set_default_colors(&mut self) {
        self.set_level_color(Level::TRACE, Color::White);
        self.set_level_color(Level::DEBUG, Color::Cyan);
        self.set_level_color(Level::INFO, Color::Green);
        self.set_level_color(Level::NOTICE, Color::Blue);
        self.set_level_color(Level::WARN, Color::Magenta);
        self.set_level_color(Level::ERROR, Color::Yellow);
        self.set_level_color(Level::FATAL, Color::Red);
    }

    pub fn set_level_color(&mut self, level: Level, color: Color) {
        self.colors.insert(level, color);
    }

    pub fn remove_level_color(&mut self, level: Level) {
        self.colors.remove(&level);
    }

    pub fn color(&self, level: Level) -> Option<Color> {
        self.colors.get(&level).copied()
    }

    /// Rewriter colouring the `level` attribute; severities without a
    /// colour pass through unchanged
    pub fn attribute_fn(&self) -> AttributeFn {
        let colors = Arc::new(self.clone());
        attribute_fn(move |_groups, attr: Attr| colors.colorize(attr))
    }

    fn colorize(&self, mut attr: Attr) -> Attr {
        if attr.key != LEVEL_KEY {
            return attr;
        }
        let (level, label) = match &attr.value {
            Value::Level(level) => (*level, level.default_name()),
            Value::String(label) => match label_level(label) {
                Some(level) => (level, label.clone()),
                None => return attr,
            },
            _ => return attr,
        };
        if let Some(color) = self.color(level) {
            attr.value = Value::String(label.color(color).to_string());
        }
        attr
    }
}

/// Recover the severity from a rendered label such as `NOTICE` or `WARN+2`
fn label_level(label: &str) -> Option<Level> {
    label.parse().ok()
}
