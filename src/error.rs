use std::fmt;
use std::time::Duration;

/// Errors raised while talking to the terminal device or reading helper input.
///
/// None of the terminal variants ever reach callers of [`crate::Bar`]; the render
/// loop turns them into degraded mode. Only [`crate::count_lines`] returns one.
#[derive(Debug)]
pub enum PbarError {
    /// The terminal device could not be opened (no controlling tty)
    TerminalUnavailable {
        device: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Reading or changing the terminal mode failed
    TerminalMode {
        device: String,
        operation: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Reading from or writing to the terminal device failed
    TerminalIo {
        device: String,
        operation: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The cursor position report did not have the `ESC [ row ; col R` shape
    MalformedCursorReply { reply: String },

    /// The device did not answer in time
    Timeout {
        operation: String,
        timeout: Duration,
    },

    /// File system operation failed
    FilesystemError {
        path: String,
        operation: String,
        source: std::io::Error,
    },
}

impl fmt::Display for PbarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PbarError::TerminalUnavailable { device, .. } => {
                write!(f, "Terminal device {} is unavailable", device)
            }
            PbarError::TerminalMode {
                device, operation, ..
            } => {
                write!(f, "Terminal {} failed for device: {}", operation, device)
            }
            PbarError::TerminalIo {
                device, operation, ..
            } => {
                write!(f, "Terminal {} failed for device: {}", operation, device)
            }
            PbarError::MalformedCursorReply { reply } => {
                write!(f, "Malformed cursor position reply: {:?}", reply)
            }
            PbarError::Timeout { operation, timeout } => {
                write!(f, "{} timed out after {:?}", operation, timeout)
            }
            PbarError::FilesystemError {
                path, operation, ..
            } => {
                write!(f, "Filesystem {} failed for path: {}", operation, path)
            }
        }
    }
}

impl std::error::Error for PbarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PbarError::TerminalUnavailable { source, .. } => Some(source.as_ref()),
            PbarError::TerminalMode { source, .. } => Some(source.as_ref()),
            PbarError::TerminalIo { source, .. } => Some(source.as_ref()),
            PbarError::FilesystemError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl PbarError {
    /// Create a terminal unavailable error
    pub fn terminal_unavailable(
        device: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PbarError::TerminalUnavailable {
            device: device.to_string(),
            source: Box::new(source),
        }
    }

    /// Create a terminal mode error
    pub fn terminal_mode(
        device: &str,
        operation: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PbarError::TerminalMode {
            device: device.to_string(),
            operation: operation.to_string(),
            source: Box::new(source),
        }
    }

    /// Create a terminal I/O error
    pub fn terminal_io(
        device: &str,
        operation: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PbarError::TerminalIo {
            device: device.to_string(),
            operation: operation.to_string(),
            source: Box::new(source),
        }
    }

    /// Create a malformed reply error
    pub fn malformed_cursor_reply(reply: &[u8]) -> Self {
        PbarError::MalformedCursorReply {
            reply: String::from_utf8_lossy(reply).into_owned(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: &str, timeout: Duration) -> Self {
        PbarError::Timeout {
            operation: operation.to_string(),
            timeout,
        }
    }

    /// Create a filesystem error
    pub fn filesystem_error(path: &str, operation: &str, source: std::io::Error) -> Self {
        PbarError::FilesystemError {
            path: path.to_string(),
            operation: operation.to_string(),
            source,
        }
    }
}

/// Result type alias for pbar operations
pub type PbarResult<T> = Result<T, PbarError>;
