//! The public progress bar handle and the state it shares with its render loop

pub mod buffer;
pub mod config;
pub mod count;
pub(crate) mod state;

pub use buffer::SharedBuffer;
pub use config::BarConfig;
pub use count::Count;

use crate::render;
use state::{BarState, lock};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A single-line progress bar redrawn in place by a background thread.
///
/// The intended sequence is [`start`](Bar::start), any number of
/// [`update`](Bar::update) calls from any thread, then [`finish`](Bar::finish).
///
/// The target must be positive. A zero target, or a count above the target,
/// is not rejected; it just draws an empty or over-full bar. Calling `start`
/// twice runs two loops over the same state. A bar that never reaches its
/// target and is never finished keeps its render thread alive until the
/// process exits.
///
/// ```
/// use pbar::{Bar, BarConfig, SharedBuffer};
///
/// let frames = SharedBuffer::new();
/// let bar = Bar::new(
///     1000u64,
///     BarConfig::default()
///         .bar_length(5)
///         .refresh_interval_ms(10)
///         .output(frames.clone()),
/// );
///
/// bar.start();
/// assert_eq!(frames.contents(), "\r[     ] (0/1,000) 0% ");
///
/// bar.update(500);
/// bar.finish();
/// assert!(frames.contents().ends_with("\r[=====] (1,000/1,000) 100% "));
/// ```
pub struct Bar<T: Count> {
    state: Arc<Mutex<BarState<T>>>,
    refresh_interval: Duration,
    render_thread: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Count> Bar<T> {
    /// Build a bar counting from zero to `target`. Never fails.
    pub fn new(target: T, config: BarConfig) -> Self {
        let refresh_interval = config.refresh_interval;
        Self {
            state: Arc::new(Mutex::new(BarState::new(target, config))),
            refresh_interval,
            render_thread: Mutex::new(None),
        }
    }

    /// Build a bar with [`BarConfig::default`]
    pub fn with_defaults(target: T) -> Self {
        Self::new(target, BarConfig::default())
    }

    /// Spawn the render loop. Returns once the initial 0% frame has been written.
    pub fn start(&self) {
        match render::spawn(self.state.clone(), self.refresh_interval) {
            Ok(handle) => *lock(&self.render_thread) = Some(handle),
            Err(e) => {
                // No thread to redraw; at least show where we started
                tracing::warn!(error = %e, "failed to spawn render thread");
                let mut state = lock(&self.state);
                state.update_bar();
                state.repaint();
            }
        }
    }

    /// Set the current count. Does not paint; the render loop picks it up on
    /// its next tick.
    pub fn update(&self, current: T) {
        lock(&self.state).current = current;
    }

    /// Jump to the target, wait one refresh interval for any in-flight redraw,
    /// then paint the final 100% frame before returning.
    pub fn finish(&self) {
        {
            let mut state = lock(&self.state);
            state.current = state.target;
        }

        thread::sleep(self.refresh_interval);

        {
            let mut state = lock(&self.state);
            state.update_bar();
            state.repaint();
        }

        self.reap_render_thread();
    }

    /// Join the render thread if it has already exited, reporting a panic.
    /// A loop that is still running is left alone.
    fn reap_render_thread(&self) {
        let mut slot = lock(&self.render_thread);
        if !slot.as_ref().is_some_and(JoinHandle::is_finished) {
            return;
        }
        if let Some(handle) = slot.take() {
            if handle.join().is_err() {
                tracing::warn!("render thread panicked before finish");
            }
        }
    }

    pub fn current(&self) -> T {
        lock(&self.state).current
    }

    pub fn target(&self) -> T {
        lock(&self.state).target
    }

    /// True once the render loop has observed the target and exited
    pub fn is_finished(&self) -> bool {
        let state = lock(&self.state);
        !state.running && state.is_complete()
    }
}
