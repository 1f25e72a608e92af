//! The background refresh loop behind [`Bar::start`](crate::Bar::start)

use crate::bar::Count;
use crate::bar::state::{BarState, lock};
use std::io;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Spawn the render loop and block until its first frame is on the sink.
pub(crate) fn spawn<T: Count>(
    state: Arc<Mutex<BarState<T>>>,
    refresh_interval: Duration,
) -> io::Result<thread::JoinHandle<()>> {
    let (ready_tx, ready_rx) = mpsc::channel();
    let handle = thread::Builder::new()
        .name("pbar-render".to_string())
        .spawn(move || run(&state, refresh_interval, ready_tx))?;

    // Err only if the loop died before its first paint; nothing left to wait for
    let _ = ready_rx.recv();
    Ok(handle)
}

/// Capture the cursor, paint the initial frame, then repaint every
/// `refresh_interval` until the count reaches the target.
fn run<T: Count>(state: &Mutex<BarState<T>>, refresh_interval: Duration, ready: Sender<()>) {
    let terminal = {
        let mut state = lock(state);
        state.running = true;
        state.cursor_terminal()
    };

    // The query may wait on the device; keep `update` callers unblocked meanwhile
    let query = terminal.map(|terminal| terminal.save_cursor_position());

    let done = {
        let mut state = lock(state);
        if let Some(result) = query {
            state.apply_cursor_query(result);
        }
        paint(&mut state)
    };
    let _ = ready.send(());

    if !done {
        loop {
            thread::sleep(refresh_interval);
            if paint(&mut lock(state)) {
                break;
            }
        }
    }

    lock(state).running = false;
    tracing::trace!("render loop finished");
}

/// One tick: recompute, write, and report completion under the same lock
/// that `update` takes, so a terminal update can't slip past the check.
fn paint<T: Count>(state: &mut BarState<T>) -> bool {
    state.update_bar();
    state.repaint();
    state.is_complete()
}
