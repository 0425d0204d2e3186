//! The edit buffer: bytes, point and mark.

use std::collections::TryReserveError;

/// Growth step of the line buffer.
pub const MEM_INC: usize = 64;

/// Text buffer with cursor tracking for line editing operations.
///
/// Holds the bytes being edited, the point (cursor) and the mark. The point always
/// satisfies `0 <= point <= len()`; every mutating method keeps it that way. The mark
/// is a plain saved index and may point past the end after a deletion, region
/// commands check it before use.
///
/// Storage grows by [`MEM_INC`] beyond what an insertion needs and is never shrunk,
/// so a buffer reused across reads keeps its capacity.
///
/// # Examples
///
/// ```
/// use emacsline::LineBuffer;
///
/// let mut buf = LineBuffer::new(16);
/// buf.insert(b"hello").unwrap();
/// buf.set_point(0);
/// buf.insert(b">").unwrap();
/// assert_eq!(buf.as_bytes(), b">hello");
/// assert_eq!(buf.point(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    buffer: Vec<u8>,
    point: usize,
    mark: usize,
}

impl LineBuffer {
    /// Creates a new line buffer with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            point: 0,
            mark: 0,
        }
    }

    /// Empties the buffer and resets point and mark, keeping the storage.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.point = 0;
        self.mark = 0;
    }

    /// Number of bytes in the line (the logical end).
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn point(&self) -> usize {
        self.point
    }

    /// Moves the point, clamped to the end of the line.
    pub fn set_point(&mut self, point: usize) {
        self.point = point.min(self.buffer.len());
    }

    pub fn mark(&self) -> usize {
        self.mark
    }

    pub fn set_mark(&mut self, mark: usize) {
        self.mark = mark;
    }

    pub fn at_end(&self) -> bool {
        self.point == self.buffer.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Bytes from the point to the end.
    pub fn tail(&self) -> &[u8] {
        &self.buffer[self.point..]
    }

    /// Byte at `index`, if inside the line.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.buffer.get(index).copied()
    }

    /// Splices `text` in at the point and moves the point past it.
    ///
    /// # Errors
    ///
    /// Fails without touching the buffer if the storage cannot grow.
    pub fn insert(&mut self, text: &[u8]) -> Result<(), TryReserveError> {
        if self.buffer.len() + text.len() > self.buffer.capacity() {
            self.buffer.try_reserve_exact(text.len() + MEM_INC)?;
        }
        let at = self.point;
        self.buffer.splice(at..at, text.iter().copied());
        self.point += text.len();
        Ok(())
    }

    /// Removes up to `count` bytes starting at the point and returns them.
    pub fn remove(&mut self, count: usize) -> Vec<u8> {
        let end = (self.point + count).min(self.buffer.len());
        self.buffer.drain(self.point..end).collect()
    }

    /// Drops everything from the point onwards.
    pub fn truncate(&mut self) {
        self.buffer.truncate(self.point);
    }

    /// Replaces the byte at `index`.
    pub fn replace(&mut self, index: usize, c: u8) {
        if let Some(slot) = self.buffer.get_mut(index) {
            *slot = c;
        }
    }

    /// Moves the point one byte to the left.
    ///
    /// Returns `true` if the point moved, `false` if already at the start.
    pub fn move_left(&mut self) -> bool {
        if self.point > 0 {
            self.point -= 1;
            true
        } else {
            false
        }
    }

    /// Moves the point one byte to the right.
    ///
    /// Returns `true` if the point moved, `false` if already at the end.
    pub fn move_right(&mut self) -> bool {
        if self.point < self.buffer.len() {
            self.point += 1;
            true
        } else {
            false
        }
    }

    /// Index one past the next word after `from`: skips non-word bytes, then word bytes.
    pub fn forward_word_end(&self, from: usize) -> usize {
        let mut pos = from.min(self.buffer.len());
        while pos < self.buffer.len() && !is_word_char(self.buffer[pos]) {
            pos += 1;
        }
        while pos < self.buffer.len() && is_word_char(self.buffer[pos]) {
            pos += 1;
        }
        pos
    }

    /// Start of the word before `from`: skips non-word bytes backwards, then word bytes.
    pub fn backward_word_start(&self, from: usize) -> usize {
        let mut pos = from.min(self.buffer.len());
        while pos > 0 && !is_word_char(self.buffer[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && is_word_char(self.buffer[pos - 1]) {
            pos -= 1;
        }
        pos
    }
}

/// Word bytes are ASCII letters and digits.
pub(crate) fn is_word_char(c: u8) -> bool {
    c.is_ascii_alphanumeric()
}
