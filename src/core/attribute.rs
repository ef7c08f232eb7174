//! Attribute rewrite chain
//!
//! Every attribute a formatter emits passes through an ordered list of
//! rewrite functions. Each stage receives the group path of the attribute and
//! the output of the previous stage.

use super::record::{Attr, Value, LEVEL_KEY, SOURCE_KEY};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Rewrites a single attribute; `groups` lists the enclosing group names
pub type AttributeFn = Arc<dyn Fn(&[String], Attr) -> Attr + Send + Sync>;

/// Box a closure as an [`AttributeFn`]
pub fn attribute_fn<F>(f: F) -> AttributeFn
where
    F: Fn(&[String], Attr) -> Attr + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Render the level as `TRACE`, `NOTICE` or `FATAL` instead of `DEBUG-4`,
/// `INFO+2` or `ERROR+4`. Other severities keep their default rendering.
pub fn rename_custom_levels(_groups: &[String], mut attr: Attr) -> Attr {
    if attr.key == LEVEL_KEY {
        if let Value::Level(level) = attr.value {
            attr.value = Value::String(level.label());
        }
    }
    attr
}

/// Reduce the source position to its file name
pub fn strip_source_directory(_groups: &[String], mut attr: Attr) -> Attr {
    if attr.key == SOURCE_KEY {
        if let Value::String(ref path) = attr.value {
            if let Some(name) = Path::new(path).file_name().and_then(|n| n.to_str()) {
                attr.value = Value::String(name.to_string());
            }
        }
    }
    attr
}

/// Left-to-right composition of rewrite functions
#[derive(Clone, Default)]
pub struct AttributeChain {
    stages: Vec<AttributeFn>,
}

impl AttributeChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain used by sink handlers: level renaming, then source stripping
    /// unless full paths are wanted, then the caller's rewriters in order.
    pub fn for_sink(include_full_source: bool, user: &[AttributeFn]) -> Self {
        let mut chain = Self::new().with(attribute_fn(rename_custom_levels));
        if !include_full_source {
            chain.push(attribute_fn(strip_source_directory));
        }
        chain.extend(user.iter().cloned());
        chain
    }

    #[must_use]
    pub fn with(mut self, stage: AttributeFn) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn push(&mut self, stage: AttributeFn) {
        self.stages.push(stage);
    }

    pub fn extend<I: IntoIterator<Item = AttributeFn>>(&mut self, stages: I) {
        self.stages.extend(stages);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run `attr` through every stage. An empty chain is the identity.
    pub fn apply(&self, groups: &[String], attr: Attr) -> Attr {
        self.stages.iter().fold(attr, |attr, stage| stage(groups, attr))
    }
}

impl fmt::Debug for AttributeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeChain")
            .field("stages", &self.stages.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;

    fn source(path: &str) -> Attr {
        Attr::new(SOURCE_KEY, path)
    }

    #[test]
    fn test_rename_custom_levels() {
        let attr = rename_custom_levels(&[], Attr::new(LEVEL_KEY, Level::NOTICE));
        assert_eq!(attr.value, Value::from("NOTICE"));

        let attr = rename_custom_levels(&[], Attr::new(LEVEL_KEY, Level::new(6)));
        assert_eq!(attr.value, Value::from("WARN+2"));

        let attr = rename_custom_levels(&[], Attr::new("other", Level::FATAL));
        assert_eq!(attr.value, Value::Level(Level::FATAL));
    }

    #[test]
    fn test_strip_source_directory() {
        let attr = strip_source_directory(&[], source("/a/b/c.go"));
        assert_eq!(attr.key, SOURCE_KEY);
        assert_eq!(attr.value, Value::from("c.go"));

        let attr = strip_source_directory(&[], Attr::new("path", "/a/b/c.go"));
        assert_eq!(attr.value, Value::from("/a/b/c.go"));
    }

    #[test]
    fn test_sink_chain_honors_full_source() {
        let stripped = AttributeChain::for_sink(false, &[]);
        assert_eq!(stripped.len(), 2);
        assert_eq!(
            stripped.apply(&[], source("/a/b/c.go")).value,
            Value::from("c.go")
        );

        let full = AttributeChain::for_sink(true, &[]);
        assert_eq!(full.len(), 1);
        assert_eq!(
            full.apply(&[], source("/a/b/c.go")).value,
            Value::from("/a/b/c.go")
        );
    }

    #[test]
    fn test_user_stages_run_after_builtins() {
        let upper = attribute_fn(|_, mut attr: Attr| {
            if let Value::String(s) = &attr.value {
                attr.value = Value::String(format!("<{}>", s));
            }
            attr
        });
        let chain = AttributeChain::for_sink(false, &[upper]);

        let attr = chain.apply(&[], Attr::new(LEVEL_KEY, Level::TRACE));
        assert_eq!(attr.value, Value::from("<TRACE>"));

        let attr = chain.apply(&[], source("/x/y/z.rs:10"));
        assert_eq!(attr.value, Value::from("<z.rs:10>"));
    }

    #[test]
    fn test_stages_see_groups() {
        let chain = AttributeChain::new().with(attribute_fn(|groups, mut attr: Attr| {
            attr.key = format!("{}/{}", groups.join("/"), attr.key);
            attr
        }));
        let groups = vec!["http".to_string(), "request".to_string()];
        assert_eq!(chain.apply(&groups, Attr::new("id", 1)).key, "http/request/id");
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = AttributeChain::new();
        let attr = Attr::new("k", "v");
        assert_eq!(chain.apply(&[], attr.clone()), attr);
    }
}
