//! Fan-out of one record to several handlers

use super::error::{LoggerError, Result};
use super::handler::{Handler, SharedHandler};
use super::level::Level;
use super::record::Record;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Forwards every record to each member whose threshold admits it.
///
/// A failing or panicking member does not stop delivery to the others; all
/// member failures come back together as [`LoggerError::Aggregate`].
pub struct FanOut {
    name: String,
    handlers: Vec<SharedHandler>,
}

impl FanOut {
    pub fn new(handlers: Vec<SharedHandler>) -> Self {
        let names: Vec<&str> = handlers.iter().map(|h| h.name()).collect();
        Self {
            name: format!("fanout({})", names.join(", ")),
            handlers,
        }
    }

    pub fn handlers(&self) -> &[SharedHandler] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&SharedHandler) -> Option<Result<()>>,
    {
        let mut errors = Vec::new();
        for handler in &self.handlers {
            match catch_unwind(AssertUnwindSafe(|| f(handler))) {
                Ok(None) | Ok(Some(Ok(()))) => {}
                Ok(Some(Err(e))) => errors.push(e),
                Err(payload) => errors.push(LoggerError::HandlerPanicked {
                    handler: handler.name().to_string(),
                    message: panic_message(payload.as_ref()),
                }),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::Aggregate(errors))
        }
    }
}

impl Handler for FanOut {
    fn enabled(&self, level: Level) -> bool {
        self.handlers.iter().any(|h| h.enabled(level))
    }

    fn handle(&self, record: &Record) -> Result<()> {
        self.for_each(|handler| {
            handler
                .enabled(record.level)
                .then(|| handler.handle(record))
        })
    }

    fn flush(&self) -> Result<()> {
        self.for_each(|handler| Some(handler.flush()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::OutputFormat;
    use crate::core::handler::{FormatHandler, HandlerOptions};
    use crate::writers::MemoryWriter;
    use std::io::{self, Write};
    use std::sync::Arc;

    fn memory(level: Level) -> (SharedHandler, MemoryWriter) {
        let out = MemoryWriter::new();
        let handler = FormatHandler::new(OutputFormat::Text, out.clone(), HandlerOptions::new(level));
        (Arc::new(handler), out)
    }

    struct Refusing;

    impl Write for Refusing {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("read-only file system"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("read-only file system"))
        }
    }

    struct Exploding;

    impl Handler for Exploding {
        fn enabled(&self, _level: Level) -> bool {
            true
        }

        fn handle(&self, _record: &Record) -> Result<()> {
            panic!("exploded");
        }

        fn name(&self) -> &str {
            "exploding"
        }
    }

    #[test]
    fn test_every_member_receives_record() {
        let (a, out_a) = memory(Level::INFO);
        let (b, out_b) = memory(Level::INFO);
        let fanout = FanOut::new(vec![a, b]);

        fanout.handle(&Record::new(Level::INFO, "both")).unwrap();

        assert!(out_a.contents().contains("msg=both"));
        assert!(out_b.contents().contains("msg=both"));
        assert_eq!(fanout.name(), "fanout(text, text)");
    }

    #[test]
    fn test_respects_member_thresholds() {
        let (verbose, out_verbose) = memory(Level::DEBUG);
        let (quiet, out_quiet) = memory(Level::ERROR);
        let fanout = FanOut::new(vec![verbose, quiet]);

        assert!(fanout.enabled(Level::DEBUG));
        assert!(!fanout.enabled(Level::TRACE));

        fanout.handle(&Record::new(Level::INFO, "chatter")).unwrap();
        assert!(out_verbose.contents().contains("chatter"));
        assert!(out_quiet.is_empty());
    }

    #[test]
    fn test_failure_does_not_block_others() {
        let broken: SharedHandler = Arc::new(
            FormatHandler::new(OutputFormat::Text, Refusing, HandlerOptions::new(Level::INFO))
                .with_name("file"),
        );
        let (console, out) = memory(Level::INFO);
        let fanout = FanOut::new(vec![broken, console]);

        let err = fanout.handle(&Record::new(Level::WARN, "disk")).unwrap_err();
        assert!(out.contents().contains("msg=disk"));
        match err {
            LoggerError::Aggregate(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].to_string().contains("file handler"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_panicking_member_is_isolated() {
        let (console, out) = memory(Level::INFO);
        let fanout = FanOut::new(vec![Arc::new(Exploding), console]);

        let err = fanout.handle(&Record::new(Level::INFO, "survives")).unwrap_err();
        assert!(out.contents().contains("msg=survives"));
        assert!(err.to_string().contains("handler 'exploding' panicked: exploded"));
    }

    #[test]
    fn test_flush_aggregates() {
        let broken: SharedHandler = Arc::new(FormatHandler::new(
            OutputFormat::Json,
            Refusing,
            HandlerOptions::new(Level::INFO),
        ));
        let (ok, _) = memory(Level::INFO);
        let fanout = FanOut::new(vec![ok, broken]);

        assert!(matches!(fanout.flush(), Err(LoggerError::Aggregate(ref e)) if e.len() == 1));
    }
}
