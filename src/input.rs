//! Line reader for dbBuilder logs.
//!
//! Logs are not guaranteed to be valid UTF-8 (Latin-1 accents are common in
//! French migration logs). Lines are kept as raw bytes so they can be written
//! back untouched; matching works on a lossy decoding from [`decode`].

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Text view of a raw line for pattern matching. Borrowed when valid UTF-8.
pub fn decode(line: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(line)
}

/// Iterator over the raw lines of a log, without their `\n` / `\r\n` terminators.
pub struct LogLines<R> {
    reader: R,
    bytes_read: u64,
}

impl<R: BufRead> LogLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            bytes_read: 0,
        }
    }

    /// Raw bytes consumed so far, terminators included.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(n) => {
                self.bytes_read += n as u64;
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(Ok(buf))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Opens a log file for one sequential pass.
pub fn open_log(path: &Path) -> io::Result<LogLines<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(LogLines::new(BufReader::new(file)))
}
