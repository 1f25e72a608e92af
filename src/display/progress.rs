use super::formatter::format_count_ratio;
use crate::bar::Count;

/// The four characters a bar is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub left: char,
    pub right: char,
    pub completed: char,
    pub uncompleted: char,
}

/// Fixed-length bar renderer
///
/// Holds only the shape of the bar; the counts come from the caller on every
/// redraw so the renderer itself never needs locking.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    length: usize,
    glyphs: Glyphs,
}

impl ProgressBar {
    pub fn new(length: usize, glyphs: Glyphs) -> Self {
        Self { length, glyphs }
    }

    /// Number of interior cells drawn with the completed glyph.
    ///
    /// Truncates toward zero. A zero target yields NaN or infinity here, which
    /// the saturating cast turns into an empty or full bar instead of a panic.
    pub fn completed_cells<T: Count>(&self, current: T, target: T) -> usize {
        (current.as_f64() * self.length as f64 / target.as_f64()) as usize
    }

    /// Empty visual buffer: caps in place, interior left blank
    pub fn blank_visual(&self) -> Vec<char> {
        let mut visual = vec![self.glyphs.uncompleted; self.length + 2];
        visual[0] = self.glyphs.left;
        visual[self.length + 1] = self.glyphs.right;
        visual
    }

    /// Recompute the interior cells of `visual` in place
    pub fn fill_visual<T: Count>(&self, visual: &mut [char], current: T, target: T) {
        let completed = self.completed_cells(current, target);
        for (i, cell) in visual
            .iter_mut()
            .enumerate()
            .skip(1)
            .take(self.length)
        {
            *cell = if i <= completed {
                self.glyphs.completed
            } else {
                self.glyphs.uncompleted
            };
        }
    }

    /// Render the `(current/target) pct%` label
    pub fn render_percent<T: Count>(current: T, target: T) -> String {
        let percent = (current.as_f64() * 100.0 / target.as_f64()) as i64;
        format!("{} {}%", format_count_ratio(current, target), percent)
    }

    /// Assemble one frame: CR, label, bar, space, percentage, trailing space
    pub fn render_frame(label: &str, visual: &[char], percent: &str) -> String {
        let mut frame = String::with_capacity(label.len() + visual.len() + percent.len() + 3);
        frame.push('\r');
        frame.push_str(label);
        frame.extend(visual.iter());
        frame.push(' ');
        frame.push_str(percent);
        frame.push(' ');
        frame
    }
}
