//! Output batching and on-screen representation of line contents.
//!
//! Every byte the editor wants on the terminal goes into a [`Screen`] first and is
//! written out with a single [`Terminal::write`] right before the next blocking read.

use crate::terminal::Terminal;
use crate::Result;

/// Growth step of the output buffer.
pub const SCREEN_INC: usize = 256;

/// Line terminator used for all on-screen line breaks while in raw mode.
pub const NEWLINE: &[u8] = b"\r\n";

pub(crate) const DEL: u8 = 0x7f;

/// Returns `true` for bytes shown as `^X`.
pub(crate) fn is_ctl(c: u8) -> bool {
    c < b' ' || c == DEL
}

/// Returns `true` for bytes with the high bit set.
pub(crate) fn is_meta(c: u8) -> bool {
    c & 0x80 != 0
}

/// Pending terminal output plus the display rules for line contents.
#[derive(Debug)]
pub struct Screen {
    buf: Vec<u8>,
    backspace: Vec<u8>,
    meta_chars: bool,
    no_echo: bool,
}

impl Screen {
    pub fn new(meta_chars: bool, no_echo: bool) -> Self {
        Self {
            buf: Vec::with_capacity(SCREEN_INC),
            backspace: b"\x08".to_vec(),
            meta_chars,
            no_echo,
        }
    }

    /// Whether high-bit bytes are displayed as `M-x`.
    pub fn meta_chars(&self) -> bool {
        self.meta_chars
    }

    pub fn set_meta_chars(&mut self, on: bool) {
        self.meta_chars = on;
    }

    pub fn no_echo(&self) -> bool {
        self.no_echo
    }

    pub fn set_no_echo(&mut self, on: bool) {
        self.no_echo = on;
    }

    pub fn set_backspace(&mut self, seq: &[u8]) {
        self.backspace.clear();
        self.backspace.extend_from_slice(seq);
    }

    /// Bytes waiting to be flushed.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Appends one byte verbatim.
    pub fn put(&mut self, c: u8) {
        if self.buf.len() == self.buf.capacity() && self.buf.try_reserve_exact(SCREEN_INC).is_err() {
            log::warn!("output buffer could not grow, dropping byte {c:#04x}");
            return;
        }
        self.buf.push(c);
    }

    /// Appends bytes verbatim.
    pub fn puts(&mut self, bytes: &[u8]) {
        for &c in bytes {
            self.put(c);
        }
    }

    /// Appends the visible form of one line byte.
    pub fn show(&mut self, c: u8) {
        if c == DEL {
            self.puts(b"^?");
        } else if c < b' ' {
            self.put(b'^');
            self.put(c + 64);
        } else if self.meta_chars && is_meta(c) {
            self.puts(b"M-");
            self.put(c & 0x7f);
        } else {
            self.put(c);
        }
    }

    /// Appends the visible form of every byte.
    pub fn show_all(&mut self, bytes: &[u8]) {
        for &c in bytes {
            self.show(c);
        }
    }

    /// Number of columns [`show`](Self::show) uses for `c`.
    pub fn width(&self, c: u8) -> usize {
        if is_ctl(c) {
            2
        } else if self.meta_chars && is_meta(c) {
            3
        } else {
            1
        }
    }

    /// Total display width of `bytes`.
    pub fn width_of(&self, bytes: &[u8]) -> usize {
        bytes.iter().map(|&c| self.width(c)).sum()
    }

    /// Moves the cursor one column left.
    pub fn back(&mut self) {
        for i in 0..self.backspace.len() {
            let c = self.backspace[i];
            self.put(c);
        }
    }

    pub fn backn(&mut self, n: usize) {
        for _ in 0..n {
            self.back();
        }
    }

    /// Writes everything pending in one call and empties the buffer.
    ///
    /// In no-echo mode the bytes are discarded instead.
    pub fn flush<T: Terminal>(&mut self, terminal: &mut T) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let result = if self.no_echo {
            Ok(())
        } else {
            terminal.write(&self.buf).and_then(|()| terminal.flush())
        };
        self.buf.clear();
        result
    }

    /// Lists `items` in newspaper columns sized for a `width`-column terminal.
    ///
    /// Item `i` lands on row `i % rows`, column `i / rows`.
    pub fn columns(&mut self, items: &[String], width: usize) {
        let longest = items.iter().map(String::len).max().unwrap_or(0);
        let cols = (width / (longest + 3)).max(1);
        let rows = items.len().div_ceil(cols);

        self.puts(NEWLINE);
        for row in 0..rows {
            let mut j = row;
            while j < items.len() {
                let item = items[j].as_bytes();
                self.puts(item);
                if j + rows < items.len() {
                    for _ in item.len()..longest + 2 {
                        self.put(b' ');
                    }
                }
                j += rows;
            }
            self.puts(NEWLINE);
        }
    }
}
