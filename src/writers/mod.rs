//! Byte destinations for formatted records

mod console;
mod file;
mod memory;
mod rotating_file;

pub use console::{ConsoleStream, ConsoleWriter};
pub use file::FileWriter;
pub use memory::MemoryWriter;
pub use rotating_file::{RotatingFileWriter, RotationLimits};
