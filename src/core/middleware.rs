//! Handler middleware
//!
//! A middleware takes a handler and returns a handler wrapping it. A list of
//! middleware is applied so that its first entry ends up outermost: records
//! reach the middleware in declaration order.

use super::error::Result;
use super::handler::{Handler, SharedHandler};
use super::level::Level;
use super::record::Record;
use std::sync::Arc;

pub type MiddlewareFn = Arc<dyn Fn(SharedHandler) -> SharedHandler + Send + Sync>;

/// Box a closure as a [`MiddlewareFn`]
pub fn middleware_fn<F>(f: F) -> MiddlewareFn
where
    F: Fn(SharedHandler) -> SharedHandler + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap `handler` with `middleware`, last entry innermost
pub fn wrap_middleware(handler: SharedHandler, middleware: &[MiddlewareFn]) -> SharedHandler {
    middleware
        .iter()
        .rev()
        .fold(handler, |wrapped, mw| mw(wrapped))
}

type InlineFn = dyn Fn(&Record, &dyn Fn(&Record) -> Result<()>) -> Result<()> + Send + Sync;

/// Build middleware from a closure that sees each record before the wrapped
/// handler. The closure may pass on a modified copy, or skip `next` to drop
/// the record.
///
/// ```
/// use rust_log_pipeline::core::middleware::inline_middleware;
///
/// let tag = inline_middleware(|record, next| {
///     let mut record = record.clone();
///     record.attrs.push(rust_log_pipeline::Attr::new("service", "api"));
///     next(&record)
/// });
/// ```
pub fn inline_middleware<F>(f: F) -> MiddlewareFn
where
    F: Fn(&Record, &dyn Fn(&Record) -> Result<()>) -> Result<()> + Send + Sync + 'static,
{
    let f: Arc<InlineFn> = Arc::new(f);
    Arc::new(move |next: SharedHandler| -> SharedHandler {
        Arc::new(InlineHandler {
            name: format!("inline({})", next.name()),
            next,
            f: Arc::clone(&f),
        })
    })
}

struct InlineHandler {
    name: String,
    next: SharedHandler,
    f: Arc<InlineFn>,
}

impl Handler for InlineHandler {
    fn enabled(&self, level: Level) -> bool {
        self.next.enabled(level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        let next = |record: &Record| self.next.handle(record);
        (self.f)(record, &next)
    }

    fn flush(&self) -> Result<()> {
        self.next.flush()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
