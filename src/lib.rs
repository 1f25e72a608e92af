//! Live-updating terminal progress bars driven by a background render thread.
//!
//! The caller advances a counter with [`Bar::update`] from its own thread
//! while a render loop repaints `label[====    ] (current/target) pct%` in
//! place at a fixed interval. When a controlling terminal is available the
//! bar saves its cursor row at start and returns to it on every redraw.
//! Without one (cron, CI) the bar silently discards its output and the
//! caller's code behaves exactly the same.
//!
//! ```no_run
//! use pbar::{Bar, BarConfig};
//!
//! let bar = Bar::new(8_000u64, BarConfig::default().label("File 1: ").bar_length(25));
//! bar.start();
//! for i in 0..=8_000 {
//!     bar.update(i);
//! }
//! bar.finish();
//! ```
//!
//! Only Unix terminals are supported.

pub mod bar;
pub mod display;
pub mod error;
pub mod system;

mod render;


// Re-export commonly used items
pub use bar::config::{
    BAR_COMPLETED_DEFAULT, BAR_LEFT_DEFAULT, BAR_LENGTH_DEFAULT, BAR_RIGHT_DEFAULT,
    BAR_UNCOMPLETED_DEFAULT, REFRESH_INTERVAL_DEFAULT,
};
pub use bar::{Bar, BarConfig, Count, SharedBuffer};
pub use display::{CursorPosition, TTY, format_thousands};
pub use error::{PbarError, PbarResult};
pub use system::count_lines;
