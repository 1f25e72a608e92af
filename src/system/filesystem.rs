use crate::error::{PbarError, PbarResult};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

const READ_CHUNK: usize = 64 * 1024;

/// Count newline bytes in a file.
///
/// A final line without a trailing newline is not counted, so the result
/// matches `wc -l`.
pub fn count_lines(path: impl AsRef<Path>) -> PbarResult<usize> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let mut file =
        File::open(path).map_err(|e| PbarError::filesystem_error(&display, "open", e))?;

    let mut buf = vec![0u8; READ_CHUNK];
    let mut count = 0;
    loop {
        let read = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(PbarError::filesystem_error(&display, "read", e)),
        };
        count += buf[..read].iter().filter(|&&b| b == b'\n').count();
    }

    Ok(count)
}
