//! Display module for terminal output and formatting

pub mod formatter;
pub mod progress;
pub mod terminal;

// Re-export commonly used items
pub use formatter::{format_count_ratio, format_thousands};
pub use progress::{Glyphs, ProgressBar};
pub use terminal::{CursorPosition, TTY, Terminal};
