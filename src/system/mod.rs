//! System interface abstractions for testing and development

pub mod filesystem;
pub mod tty;

// Re-export commonly used items
pub use filesystem::count_lines;
pub use tty::{RawTty, TerminalDevice};
