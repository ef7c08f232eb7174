//! Standard stream writer

use std::io::{self, Write};

/// Which standard stream a [`ConsoleWriter`] targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleStream {
    #[default]
    Stderr,
    Stdout,
}

/// Writes to stderr (default) or stdout, locking the stream per call
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWriter {
    stream: ConsoleStream,
}

impl ConsoleWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.stream {
            ConsoleStream::Stderr => io::stderr().lock().write(buf),
            ConsoleStream::Stdout => io::stdout().lock().write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        // One lock per line keeps concurrent records from interleaving
        match self.stream {
            ConsoleStream::Stderr => io::stderr().lock().write_all(buf),
            ConsoleStream::Stdout => io::stdout().lock().write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stderr => io::stderr().flush(),
            ConsoleStream::Stdout => io::stdout().flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stderr() {
        assert_eq!(ConsoleWriter::new().stream(), ConsoleStream::Stderr);
        assert_eq!(ConsoleWriter::stdout().stream(), ConsoleStream::Stdout);
    }
}
