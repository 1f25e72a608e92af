use crate::error::{PbarError, PbarResult};
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use nix::sys::termios::{self, SetArg, Termios};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::AsFd;
use std::time::Duration;

/// Abstraction over the terminal device so the cursor query can be tested
/// without a real tty attached
pub trait TerminalDevice: Read + Write {
    /// Block until input is available or `timeout` elapses.
    /// Returns `Ok(false)` on timeout.
    fn wait_readable(&mut self, timeout: Duration) -> PbarResult<bool>;

    /// Put the device back into the mode it was opened in
    fn restore(&mut self) -> PbarResult<()>;
}

/// A terminal device switched into raw mode for the lifetime of the handle
pub struct RawTty {
    file: File,
    device: String,
    original: Option<Termios>,
}

impl RawTty {
    /// Open `device` read/write and switch it to raw mode.
    ///
    /// Fails with [`PbarError::TerminalUnavailable`] when there is no
    /// controlling terminal (cron, CI, detached daemons).
    pub fn open(device: &str) -> PbarResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(device)
            .map_err(|e| PbarError::terminal_unavailable(device, e))?;

        let original =
            termios::tcgetattr(&file).map_err(|e| PbarError::terminal_mode(device, "tcgetattr", e))?;
        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(&file, SetArg::TCSANOW, &raw)
            .map_err(|e| PbarError::terminal_mode(device, "tcsetattr", e))?;

        Ok(Self {
            file,
            device: device.to_string(),
            original: Some(original),
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl Read for RawTty {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for RawTty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl TerminalDevice for RawTty {
    fn wait_readable(&mut self, timeout: Duration) -> PbarResult<bool> {
        let millis = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
        let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];
        let ready = poll(&mut fds, PollTimeout::from(millis))
            .map_err(|e| PbarError::terminal_io(&self.device, "poll", e))?;
        Ok(ready > 0)
    }

    fn restore(&mut self) -> PbarResult<()> {
        if let Some(original) = self.original.take() {
            termios::tcsetattr(&self.file, SetArg::TCSANOW, &original)
                .map_err(|e| PbarError::terminal_mode(&self.device, "restore", e))?;
        }
        Ok(())
    }
}

impl Drop for RawTty {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(device = %self.device, error = %e, "failed to restore terminal mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device_is_unavailable() {
        let result = RawTty::open("/nonexistent/pbar-tty");
        assert!(matches!(
            result,
            Err(PbarError::TerminalUnavailable { ref device, .. }) if device == "/nonexistent/pbar-tty"
        ));
    }

    #[test]
    fn test_open_regular_file_is_not_a_terminal() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let result = RawTty::open(&path);
        assert!(matches!(result, Err(PbarError::TerminalMode { .. })));
    }
}
