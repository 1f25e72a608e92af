use crate::display::{Glyphs, TTY};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

pub const BAR_LENGTH_DEFAULT: usize = 50;
pub const REFRESH_INTERVAL_DEFAULT: Duration = Duration::from_millis(500);
pub const BAR_LEFT_DEFAULT: char = '[';
pub const BAR_RIGHT_DEFAULT: char = ']';
pub const BAR_UNCOMPLETED_DEFAULT: char = ' ';
pub const BAR_COMPLETED_DEFAULT: char = '=';

/// Appearance and behavior of a [`Bar`](super::Bar).
///
/// Start from [`BarConfig::default`] and chain setters; setting the same
/// option twice keeps the last value.
///
/// ```
/// use pbar::BarConfig;
///
/// let config = BarConfig::default()
///     .label("File 1: ")
///     .bar_length(25)
///     .refresh_interval_ms(750)
///     .left('<')
///     .right('>');
/// assert_eq!(config.get_bar_length(), 25);
/// ```
pub struct BarConfig {
    pub(crate) refresh_interval: Duration,
    pub(crate) bar_length: usize,
    pub(crate) glyphs: Glyphs,
    pub(crate) label: String,
    pub(crate) output: Box<dyn Write + Send>,
    pub(crate) tty: String,
    /// Set once a custom sink is installed; cursor control only makes sense on stdout
    pub(crate) testing: bool,
}

impl BarConfig {
    /// Period of the autonomous redraw
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn refresh_interval_ms(self, millis: u64) -> Self {
        self.refresh_interval(Duration::from_millis(millis))
    }

    /// Number of interior cells between the caps. Should be positive.
    pub fn bar_length(mut self, length: usize) -> Self {
        self.bar_length = length;
        self
    }

    pub fn left(mut self, glyph: char) -> Self {
        self.glyphs.left = glyph;
        self
    }

    pub fn right(mut self, glyph: char) -> Self {
        self.glyphs.right = glyph;
        self
    }

    pub fn uncompleted(mut self, glyph: char) -> Self {
        self.glyphs.uncompleted = glyph;
        self
    }

    pub fn completed(mut self, glyph: char) -> Self {
        self.glyphs.completed = glyph;
        self
    }

    /// Static text printed in front of the bar
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Send frames to `writer` instead of standard output.
    ///
    /// Cursor save/restore is disabled for custom sinks.
    pub fn output(mut self, writer: impl Write + Send + 'static) -> Self {
        self.output = Box::new(writer);
        self.testing = true;
        self
    }

    /// Terminal device queried for the cursor position
    pub fn tty(mut self, device: impl Into<String>) -> Self {
        self.tty = device.into();
        self
    }

    pub fn get_refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn get_bar_length(&self) -> usize {
        self.bar_length
    }

    pub fn get_glyphs(&self) -> Glyphs {
        self.glyphs
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            refresh_interval: REFRESH_INTERVAL_DEFAULT,
            bar_length: BAR_LENGTH_DEFAULT,
            glyphs: Glyphs {
                left: BAR_LEFT_DEFAULT,
                right: BAR_RIGHT_DEFAULT,
                completed: BAR_COMPLETED_DEFAULT,
                uncompleted: BAR_UNCOMPLETED_DEFAULT,
            },
            label: String::new(),
            output: Box::new(io::stdout()),
            tty: TTY.to_string(),
            testing: false,
        }
    }
}

impl fmt::Debug for BarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarConfig")
            .field("refresh_interval", &self.refresh_interval)
            .field("bar_length", &self.bar_length)
            .field("glyphs", &self.glyphs)
            .field("label", &self.label)
            .field("tty", &self.tty)
            .field("testing", &self.testing)
            .finish_non_exhaustive()
    }
}
