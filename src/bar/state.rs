use super::config::BarConfig;
use super::count::Count;
use crate::display::{CursorPosition, ProgressBar, Terminal};
use crate::error::{PbarError, PbarResult};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything the caller's thread and the render thread share.
///
/// Always accessed through a single [`Mutex`] so the glyph buffer and the
/// percentage label are computed from the same pair of counts.
pub(crate) struct BarState<T: Count> {
    pub(crate) current: T,
    pub(crate) target: T,
    renderer: ProgressBar,
    visual: Vec<char>,
    percent: String,
    label: String,
    cursor: CursorPosition,
    terminal: Terminal,
    output: Box<dyn Write + Send>,
    testing: bool,
    pub(crate) running: bool,
}

impl<T: Count> BarState<T> {
    pub(crate) fn new(target: T, config: BarConfig) -> Self {
        let renderer = ProgressBar::new(config.bar_length, config.glyphs);
        let visual = renderer.blank_visual();
        Self {
            current: T::default(),
            target,
            renderer,
            visual,
            percent: String::new(),
            label: config.label,
            cursor: CursorPosition::default(),
            terminal: Terminal::new(config.tty),
            output: config.output,
            testing: config.testing,
            running: false,
        }
    }

    /// The terminal to ask for the cursor position, or `None` when cursor
    /// control is off. Cloned out so the query can run without the lock held.
    pub(crate) fn cursor_terminal(&self) -> Option<Terminal> {
        if self.testing {
            None
        } else {
            Some(self.terminal.clone())
        }
    }

    /// Record the outcome of a cursor query.
    ///
    /// With no usable terminal the bar drops to degraded mode: output is
    /// discarded and cursor control is skipped from then on.
    pub(crate) fn apply_cursor_query(&mut self, result: PbarResult<CursorPosition>) {
        match result {
            Ok(position) => self.cursor = position,
            Err(e @ (PbarError::TerminalUnavailable { .. } | PbarError::TerminalMode { .. })) => {
                tracing::debug!(
                    device = self.terminal.device(),
                    error = %e,
                    "no terminal attached, discarding progress output"
                );
                self.degrade();
            }
            Err(e) => {
                tracing::debug!(error = %e, "cursor position unavailable, repainting without restore");
            }
        }
    }

    fn degrade(&mut self) {
        self.testing = true;
        self.cursor = CursorPosition::default();
        self.output = Box::new(io::sink());
    }

    /// Recompute the glyph buffer and percentage label from the current counts
    pub(crate) fn update_bar(&mut self) {
        self.renderer
            .fill_visual(&mut self.visual, self.current, self.target);
        self.percent = ProgressBar::render_percent(self.current, self.target);
    }

    /// Write one frame. Write failures are dropped; progress is best-effort.
    pub(crate) fn repaint(&mut self) {
        if !self.testing {
            if let Err(e) = self.terminal.restore_cursor_position(self.cursor) {
                tracing::trace!(error = %e, "cursor restore failed");
            }
        }

        let frame = ProgressBar::render_frame(&self.label, &self.visual, &self.percent);
        let written = self
            .output
            .write_all(frame.as_bytes())
            .and_then(|_| self.output.flush());
        match written {
            Ok(()) => tracing::trace!(frame = %frame.trim(), "painted"),
            Err(e) => tracing::trace!(error = %e, "frame write failed"),
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.current == self.target
    }

    #[cfg(test)]
    pub(crate) fn is_degraded(&self) -> bool {
        self.testing
    }
}

/// Lock the shared state, recovering it if another thread panicked mid-update
pub(crate) fn lock<S>(mutex: &Mutex<S>) -> MutexGuard<'_, S> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::SharedBuffer;

    fn captured(target: u64, length: usize) -> (BarState<u64>, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let config = BarConfig::default()
            .bar_length(length)
            .output(buffer.clone());
        (BarState::new(target, config), buffer)
    }

    #[test]
    fn test_update_and_repaint() {
        let (mut state, buffer) = captured(1000, 5);
        state.update_bar();
        state.repaint();
        state.current = 500;
        state.update_bar();
        state.repaint();
        assert_eq!(
            buffer.contents(),
            "\r[     ] (0/1,000) 0% \r[==   ] (500/1,000) 50% "
        );
    }

    #[test]
    fn test_label_prefix() {
        let buffer = SharedBuffer::new();
        let config = BarConfig::default()
            .bar_length(4)
            .label("File 1: ")
            .output(buffer.clone());
        let mut state = BarState::new(8_000u32, config);
        state.current = 2_000;
        state.update_bar();
        state.repaint();
        assert_eq!(buffer.contents(), "\rFile 1: [=   ] (2,000/8,000) 25% ");
    }

    #[test]
    fn test_custom_sink_skips_terminal() {
        let (state, _buffer) = captured(10, 5);
        assert!(state.cursor_terminal().is_none());
        assert_eq!(state.cursor, CursorPosition::default());
    }

    #[test]
    fn test_missing_terminal_degrades() {
        let config = BarConfig::default().tty("/nonexistent/pbar-tty");
        let mut state = BarState::new(10u8, config);
        assert!(!state.is_degraded());

        let terminal = state.cursor_terminal().unwrap();
        state.apply_cursor_query(terminal.save_cursor_position());
        assert!(state.is_degraded());
        assert!(!state.cursor.is_known());
        assert!(state.cursor_terminal().is_none());

        // still paints, into the discard sink
        state.update_bar();
        state.repaint();
    }

    #[test]
    fn test_degraded_mode_writes_no_control_bytes() {
        let buffer = SharedBuffer::new();
        let mut config = BarConfig::default()
            .bar_length(5)
            .tty("/nonexistent/pbar-tty")
            .output(buffer.clone());
        // keep the capturing sink but behave like a stdout bar
        config.testing = false;
        let mut state = BarState::new(1000u64, config);
        state.cursor = CursorPosition { row: 4, col: 1 };

        let terminal = state.cursor_terminal().unwrap();
        state.apply_cursor_query(terminal.save_cursor_position());
        assert!(state.is_degraded());
        assert!(!state.cursor.is_known());

        state.current = 500;
        state.update_bar();
        state.repaint();
        assert!(!buffer.contents().contains('\x1b'));
    }

    #[test]
    fn test_failed_query_keeps_output() {
        let (mut state, buffer) = captured(10, 5);
        state.apply_cursor_query(Err(PbarError::malformed_cursor_reply(b"\x1b[12")));
        assert!(!state.cursor.is_known());
        state.update_bar();
        state.repaint();
        assert_eq!(buffer.contents(), "\r[     ] (0/10) 0% ");
    }

    #[test]
    fn test_frames_carry_no_control_bytes() {
        let (mut state, buffer) = captured(10, 5);
        for current in 0..=10 {
            state.current = current;
            state.update_bar();
            state.repaint();
        }
        assert!(!buffer.contents().contains('\x1b'));
    }

    #[test]
    fn test_is_complete() {
        let (mut state, _buffer) = captured(3, 5);
        assert!(!state.is_complete());
        state.current = 3;
        assert!(state.is_complete());
    }

    #[test]
    fn test_lock_recovers_from_poison() {
        let mutex = std::sync::Arc::new(Mutex::new(1));
        let poisoned = mutex.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoned.lock().unwrap();
            panic!("poison");
        })
        .join();
        assert!(mutex.is_poisoned());
        assert_eq!(*lock(&mutex), 1);
    }
}
