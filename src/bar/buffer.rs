use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use super::state::lock;

/// Cloneable in-memory sink for capturing frames.
///
/// Every clone writes into the same buffer, so one clone can be handed to
/// [`BarConfig::output`](super::BarConfig::output) while another is read back.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.inner)).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner).is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_contents() {
        let buffer = SharedBuffer::new();
        assert!(buffer.is_empty());

        let mut writer = buffer.clone();
        write!(writer, "\r[=] (1/1) 100% ").unwrap();
        assert_eq!(buffer.contents(), "\r[=] (1/1) 100% ");
    }
}
