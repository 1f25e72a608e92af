use crate::error::{PbarError, PbarResult};
use crate::system::{RawTty, TerminalDevice};
use std::io::{self, ErrorKind};
use std::time::{Duration, Instant};

/// Terminal device used when none is configured. Windows consoles are not supported.
pub const TTY: &str = "/dev/tty";

/// Upper bound on waiting for the terminal to answer a cursor query
pub const CURSOR_QUERY_TIMEOUT: Duration = Duration::from_millis(500);

/// Carriage return followed by Device Status Report 6
const CURSOR_QUERY: &[u8] = b"\r\x1b[6n";

/// A well-formed report is `ESC [ rrrrr ; ccccc R`; anything longer is noise
const MAX_REPLY_LEN: usize = 32;

/// One-based terminal cursor coordinates. The zero value means "unknown".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorPosition {
    pub row: u16,
    pub col: u16,
}

impl CursorPosition {
    pub fn is_known(&self) -> bool {
        !(self.row == 0 && self.col == 0)
    }
}

/// Cursor save/restore against the controlling terminal
#[derive(Debug, Clone)]
pub struct Terminal {
    device: String,
    query_timeout: Duration,
}

impl Terminal {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            query_timeout: CURSOR_QUERY_TIMEOUT,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Open the device in raw mode, ask where the cursor is, then put the
    /// device back the way it was.
    ///
    /// [`PbarError::TerminalUnavailable`] and [`PbarError::TerminalMode`] mean
    /// there is no usable terminal at all; every other error only means the
    /// position could not be learned.
    pub fn save_cursor_position(&self) -> PbarResult<CursorPosition> {
        let mut tty = RawTty::open(&self.device)?;
        tracing::trace!(device = tty.device(), "querying cursor position");
        let position = query_cursor_position(&mut tty, self.query_timeout);
        close(&mut tty);
        position
    }

    /// Move the cursor of the process's standard output back to `position`.
    /// Does nothing while the position is unknown.
    pub fn restore_cursor_position(&self, position: CursorPosition) -> io::Result<()> {
        if !position.is_known() {
            return Ok(());
        }
        // console addresses cells from zero, the terminal report from one
        console::Term::stdout().move_cursor_to(
            usize::from(position.col.saturating_sub(1)),
            usize::from(position.row.saturating_sub(1)),
        )
    }
}

/// Restore the device mode; the caller's work is already done, so failures
/// are only logged.
fn close<D: TerminalDevice>(device: &mut D) {
    if let Err(e) = device.restore() {
        tracing::warn!(error = %e, "failed to restore terminal mode");
    }
}

/// Write a cursor position request to `device` and parse its reply
pub fn query_cursor_position<D: TerminalDevice>(
    device: &mut D,
    timeout: Duration,
) -> PbarResult<CursorPosition> {
    device
        .write_all(CURSOR_QUERY)
        .and_then(|_| device.flush())
        .map_err(|e| PbarError::terminal_io("tty", "write", e))?;

    let deadline = Instant::now() + timeout;
    let mut reply = Vec::with_capacity(MAX_REPLY_LEN);
    let mut byte = [0u8; 1];

    while reply.len() < MAX_REPLY_LEN {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() || !device.wait_readable(remaining)? {
            return Err(PbarError::timeout("cursor position query", timeout));
        }
        match device.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                reply.push(byte[0]);
                if byte[0] == b'R' {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(PbarError::terminal_io("tty", "read", e)),
        }
    }

    parse_cursor_reply(&reply)
}

/// Parse a `ESC [ row ; col R` cursor position report.
///
/// Bytes typed by the user ahead of the report are skipped.
pub fn parse_cursor_reply(reply: &[u8]) -> PbarResult<CursorPosition> {
    let malformed = || PbarError::malformed_cursor_reply(reply);

    let start = reply
        .windows(2)
        .rposition(|w| w == b"\x1b[")
        .ok_or_else(malformed)?;
    let body = reply[start + 2..]
        .strip_suffix(b"R")
        .ok_or_else(malformed)?;
    let body = std::str::from_utf8(body).map_err(|_| malformed())?;

    let (row, col) = body.split_once(';').ok_or_else(malformed)?;
    let row = row.parse::<u16>().map_err(|_| malformed())?;
    let col = col.parse::<u16>().map_err(|_| malformed())?;

    Ok(CursorPosition { row, col })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    /// Scripted terminal: records what was written and answers with `reply`
    struct FakeTty {
        written: Vec<u8>,
        reply: Vec<u8>,
        pos: usize,
        restored: bool,
    }

    impl FakeTty {
        fn replying(reply: &[u8]) -> Self {
            Self {
                written: Vec::new(),
                reply: reply.to_vec(),
                pos: 0,
                restored: false,
            }
        }
    }

    impl Read for FakeTty {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = (&self.reply[self.pos..]).read(buf)?;
            self.pos += n;
            Ok(n)
        }
    }

    impl Write for FakeTty {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl TerminalDevice for FakeTty {
        fn wait_readable(&mut self, _timeout: Duration) -> PbarResult<bool> {
            Ok(self.pos < self.reply.len())
        }

        fn restore(&mut self) -> PbarResult<()> {
            self.restored = true;
            Ok(())
        }
    }

    #[test]
    fn test_query_cursor_position() {
        let mut tty = FakeTty::replying(b"\x1b[12;40R");
        let position = query_cursor_position(&mut tty, Duration::from_millis(50)).unwrap();
        assert_eq!(position, CursorPosition { row: 12, col: 40 });
        assert_eq!(tty.written, b"\r\x1b[6n");
    }

    #[test]
    fn test_query_stops_at_report_terminator() {
        let mut tty = FakeTty::replying(b"\x1b[3;1Rtrailing");
        let position = query_cursor_position(&mut tty, Duration::from_millis(50)).unwrap();
        assert_eq!(position, CursorPosition { row: 3, col: 1 });
        assert_eq!(tty.pos, 6);
    }

    #[test]
    fn test_query_times_out_on_silent_device() {
        let mut tty = FakeTty::replying(b"");
        let result = query_cursor_position(&mut tty, Duration::from_millis(50));
        assert!(matches!(result, Err(PbarError::Timeout { .. })));
    }

    #[test]
    fn test_query_short_reply_fails() {
        let mut tty = FakeTty::replying(b"\x1b[12");
        let result = query_cursor_position(&mut tty, Duration::from_millis(50));
        assert!(result.is_err());
    }

    #[test]
    fn test_close_restores_mode() {
        let mut tty = FakeTty::replying(b"");
        close(&mut tty);
        assert!(tty.restored);
    }

    #[test]
    fn test_parse_cursor_reply() {
        assert_eq!(
            parse_cursor_reply(b"\x1b[1;1R").unwrap(),
            CursorPosition { row: 1, col: 1 }
        );
        assert_eq!(
            parse_cursor_reply(b"abc\x1b[240;320R").unwrap(),
            CursorPosition { row: 240, col: 320 }
        );
    }

    #[test]
    fn test_parse_cursor_reply_malformed() {
        let replies: [&[u8]; 8] = [
            b"",
            b"\x1b[",
            b"\x1b[12R",
            b"\x1b[12;R",
            b"\x1b[a;4R",
            b"\x1b[12;40",
            b"12;40R",
            b"\x1b[99999999;1R",
        ];
        for reply in replies {
            assert!(
                matches!(
                    parse_cursor_reply(reply),
                    Err(PbarError::MalformedCursorReply { .. })
                ),
                "expected malformed for {:?}",
                reply
            );
        }
    }

    #[test]
    fn test_unknown_position_is_not_restored() {
        assert!(!CursorPosition::default().is_known());
        assert!(CursorPosition { row: 0, col: 3 }.is_known());
        let terminal = Terminal::new("/nonexistent/pbar-tty");
        assert!(terminal.restore_cursor_position(CursorPosition::default()).is_ok());
    }

    #[test]
    fn test_save_without_terminal_is_unavailable() {
        let terminal = Terminal::new("/nonexistent/pbar-tty");
        assert!(matches!(
            terminal.save_cursor_position(),
            Err(PbarError::TerminalUnavailable { .. })
        ));
    }
}
