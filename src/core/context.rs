//! Shared contextual attributes
//!
//! This module provides:
//! - `LogContext`: attributes merged into every record passing its middleware
//! - `ContextGuard`: RAII guard for scoped context

use super::middleware::{inline_middleware, MiddlewareFn};
use super::record::{Attr, Record, Value};
use parking_lot::RwLock;
use std::sync::Arc;

/// Persistent attributes such as service name, version or request id.
///
/// Thread-safe: clones share the same attribute set.
///
/// # Example
///
/// ```
/// use rust_log_pipeline::core::LogContext;
///
/// let ctx = LogContext::new();
/// ctx.set("service", "api-gateway");
/// {
///     let _guard = ctx.scoped("request_id", "abc-123");
///     assert_eq!(ctx.len(), 2);
/// }
/// assert_eq!(ctx.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    attrs: Arc<RwLock<Vec<Attr>>>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing an existing one with the same key
    pub fn set<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let attr = Attr::new(key, value);
        let mut attrs = self.attrs.write();
        match attrs.iter_mut().find(|a| a.key == attr.key) {
            Some(existing) => existing.value = attr.value,
            None => attrs.push(attr),
        }
    }

    /// Set an attribute for the lifetime of the returned guard
    #[must_use = "the attribute is removed when the guard is dropped"]
    pub fn scoped<K, V>(&self, key: K, value: V) -> ContextGuard
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        self.set(key.clone(), value);
        ContextGuard {
            attrs: Arc::clone(&self.attrs),
            key,
        }
    }

    pub fn remove(&self, key: &str) {
        self.attrs.write().retain(|a| a.key != key);
    }

    pub fn clear(&self) {
        self.attrs.write().clear();
    }

    /// Snapshot of the current attributes
    pub fn attrs(&self) -> Vec<Attr> {
        self.attrs.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.attrs.read().len()
    }

    /// Merge context attributes into a record.
    ///
    /// Record attributes take priority over context attributes.
    pub fn merge_into(&self, record: &mut Record) {
        let attrs = self.attrs.read();
        for attr in attrs.iter() {
            if !record.attrs.iter().any(|a| a.key == attr.key) {
                record.attrs.push(attr.clone());
            }
        }
    }

    /// Middleware adding the context attributes to each record
    pub fn middleware(&self) -> MiddlewareFn {
        let ctx = self.clone();
        inline_middleware(move |record, next| {
            if ctx.is_empty() {
                return next(record);
            }
            let mut record = record.clone();
            ctx.merge_into(&mut record);
            next(&record)
        })
    }
}

/// RAII guard for scoped context attributes
///
/// When dropped, removes its attribute from the context.
pub struct ContextGuard {
    attrs: Arc<RwLock<Vec<Attr>>>,
    key: String,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        self.attrs.write().retain(|a| a.key != self.key);
    }
}
