//! Byte cursor over a seekable stream
//!
//! The scanners never touch the underlying reader directly. They go through
//! [`ByteCursor`], which adds one byte of lookahead, range-checked seeks and
//! a scoped position mark ([`CursorMark`]) that puts the cursor back where it
//! was once a nested excursion is over.

use log::{trace, warn};
use std::io::{self, Read, SeekFrom};
use std::ops::{Deref, DerefMut};

use crate::io::seekable::SeekableReader;
use crate::metadata::errors::{AnalysisError, AnalysisResult};

/// Cursor with lookahead over a seekable byte source
pub struct ByteCursor<'a> {
    /// Underlying stream
    reader: &'a mut dyn SeekableReader,
    /// Position of the underlying stream
    physical: u64,
    /// Byte read ahead by `peek` and not yet consumed
    pushback: Option<u8>,
    /// Total stream length
    len: u64,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor starting at the reader's current position
    ///
    /// The stream length is measured once up front so that every later
    /// seek can be range-checked.
    pub fn new(reader: &'a mut dyn SeekableReader) -> AnalysisResult<Self> {
        let start = reader.stream_position()?;
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(start))?;
        trace!("Cursor created at {} over {} bytes", start, len);

        Ok(ByteCursor {
            reader,
            physical: start,
            pushback: None,
            len,
        })
    }

    /// Logical read position
    pub fn position(&self) -> u64 {
        match self.pushback {
            Some(_) => self.physical - 1,
            None => self.physical,
        }
    }

    /// Total length of the stream
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the stream is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the next byte without consuming it, or `None` at end of stream
    pub fn peek(&mut self) -> AnalysisResult<Option<u8>> {
        if let Some(byte) = self.pushback {
            return Ok(Some(byte));
        }

        let next = self.next_raw_byte()?;
        self.pushback = next;
        Ok(next)
    }

    /// Whether the cursor sits at the end of the stream
    pub fn is_eof(&mut self) -> AnalysisResult<bool> {
        Ok(self.peek()?.is_none())
    }

    /// Consumes one byte, or returns `None` at end of stream
    pub fn next_byte(&mut self) -> AnalysisResult<Option<u8>> {
        match self.pushback.take() {
            Some(byte) => Ok(Some(byte)),
            None => self.next_raw_byte(),
        }
    }

    /// Consumes one byte, failing at end of stream
    ///
    /// # Arguments
    /// * `what` - Description of the structure being read, for the error message
    pub fn read_byte(&mut self, what: &str) -> AnalysisResult<u8> {
        self.next_byte()?
            .ok_or_else(|| AnalysisError::Truncated(what.to_string()))
    }

    /// Reads exactly `N` bytes into an array
    pub fn read_array<const N: usize>(&mut self, what: &str) -> AnalysisResult<[u8; N]> {
        let mut buffer = [0u8; N];
        self.read_exact(&mut buffer)
            .map_err(|e| AnalysisError::from_io(e, what))?;
        Ok(buffer)
    }

    /// Reads exactly `count` bytes
    ///
    /// The buffer grows with the data actually present, so a bogus length
    /// field cannot force a huge allocation before the short read is noticed.
    pub fn read_n(&mut self, count: u64, what: &str) -> AnalysisResult<Vec<u8>> {
        let mut data = Vec::new();
        self.by_ref()
            .take(count)
            .read_to_end(&mut data)
            .map_err(|e| AnalysisError::from_io(e, what))?;

        if (data.len() as u64) < count {
            return Err(AnalysisError::Truncated(what.to_string()));
        }

        Ok(data)
    }

    /// Reads up to `max` bytes, stopping early after a NUL byte
    ///
    /// The NUL itself is consumed but not returned.
    pub fn read_until_nul(&mut self, max: u64, what: &str) -> AnalysisResult<Vec<u8>> {
        let mut data = Vec::new();
        for _ in 0..max {
            match self.read_byte(what)? {
                0 => break,
                byte => data.push(byte),
            }
        }
        Ok(data)
    }

    /// Moves the cursor
    ///
    /// Relative seeks are taken from the logical position. Targets before the
    /// start or past the end of the stream are rejected, never clamped.
    ///
    /// # Returns
    /// The new absolute position
    pub fn seek(&mut self, pos: SeekFrom) -> AnalysisResult<u64> {
        let target: i128 = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(delta) => self.position() as i128 + delta as i128,
            SeekFrom::End(delta) => self.len as i128 + delta as i128,
        };

        if target < 0 || target > self.len as i128 {
            return Err(AnalysisError::SeekOutOfRange { target, len: self.len });
        }

        let target = target as u64;
        self.reader.seek(SeekFrom::Start(target))?;
        self.physical = target;
        self.pushback = None;
        Ok(target)
    }

    /// Saves the current position in a guard that restores it on release or drop
    pub fn mark(&mut self) -> CursorMark<'_, 'a> {
        let saved = self.position();
        trace!("Cursor mark at {}", saved);
        CursorMark {
            cursor: self,
            saved,
            released: false,
        }
    }

    fn next_raw_byte(&mut self) -> AnalysisResult<Option<u8>> {
        let mut buffer = [0u8; 1];
        loop {
            match self.reader.read(&mut buffer) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.physical += 1;
                    return Ok(Some(buffer[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(AnalysisError::IoError(e)),
            }
        }
    }
}

impl Read for ByteCursor<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if let Some(byte) = self.pushback.take() {
            buf[0] = byte;
            return Ok(1);
        }

        let n = self.reader.read(buf)?;
        self.physical += n as u64;
        Ok(n)
    }
}

/// Scoped cursor position
///
/// Dereferences to the cursor it was taken from. Dropping the mark seeks the
/// cursor back to the saved position; [`CursorMark::release`] does the same
/// but reports a failed restore.
pub struct CursorMark<'c, 'a> {
    cursor: &'c mut ByteCursor<'a>,
    saved: u64,
    released: bool,
}

impl CursorMark<'_, '_> {
    /// Position that will be restored
    pub fn saved_position(&self) -> u64 {
        self.saved
    }

    /// Restores the saved position and consumes the mark
    pub fn release(mut self) -> AnalysisResult<()> {
        self.released = true;
        self.cursor.seek(SeekFrom::Start(self.saved)).map(|_| ())
    }
}

impl<'a> Deref for CursorMark<'_, 'a> {
    type Target = ByteCursor<'a>;

    fn deref(&self) -> &Self::Target {
        self.cursor
    }
}

impl<'a> DerefMut for CursorMark<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.cursor
    }
}

impl Drop for CursorMark<'_, '_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Err(e) = self.cursor.seek(SeekFrom::Start(self.saved)) {
            warn!("Failed to restore cursor to {}: {}", self.saved, e);
        }
    }
}
