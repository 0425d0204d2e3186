//! A terminal that replays scripted input and records what the editor wrote.

use std::collections::VecDeque;
use std::io;

use crate::terminal::{SpecialChars, Terminal};
use crate::{Error, Result};

/// In-memory [`Terminal`] for tests and for driving the editor from a script.
///
/// Input bytes are handed out in order; once they run out the terminal reports end
/// of input. Everything written is appended to [`output`](Self::output).
///
/// # Examples
///
/// ```
/// use emacsline::{terminals::ScriptedTerminal, LineEditor};
///
/// let mut editor = LineEditor::new(64, 10);
/// let mut term = ScriptedTerminal::new(b"hi\r");
/// assert_eq!(editor.read_line(&mut term, "> ").unwrap().as_deref(), Some("hi"));
/// assert_eq!(term.output(), b"> hi\r\n");
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedTerminal {
    input: VecDeque<u8>,
    output: Vec<u8>,
    writes: usize,
    interactive: bool,
    specials: SpecialChars,
    window: Option<(u16, u16)>,
    fail_raw_mode: bool,
    fail_read_after: Option<usize>,
    reads: usize,
    raw: bool,
    raw_entries: usize,
    raw_exits: usize,
}

impl ScriptedTerminal {
    /// An interactive terminal that will deliver `input`.
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            output: Vec::new(),
            writes: 0,
            interactive: true,
            specials: SpecialChars::default(),
            window: None,
            fail_raw_mode: false,
            fail_read_after: None,
            reads: 0,
            raw: false,
            raw_entries: 0,
            raw_exits: 0,
        }
    }

    /// A redirected (pipe or file) input stream.
    pub fn non_interactive(input: &[u8]) -> Self {
        Self {
            interactive: false,
            ..Self::new(input)
        }
    }

    pub fn with_special_chars(mut self, specials: SpecialChars) -> Self {
        self.specials = specials;
        self
    }

    pub fn with_window_size(mut self, cols: u16, rows: u16) -> Self {
        self.window = Some((cols, rows));
        self
    }

    /// Makes every [`enter_raw_mode`](Terminal::enter_raw_mode) fail.
    pub fn with_failing_raw_mode(mut self) -> Self {
        self.fail_raw_mode = true;
        self
    }

    /// Makes every read after the first `count` bytes fail with a broken pipe.
    pub fn with_failing_read_after(mut self, count: usize) -> Self {
        self.fail_read_after = Some(count);
        self
    }

    /// Queues more input behind whatever is left.
    pub fn push_input(&mut self, input: &[u8]) {
        self.input.extend(input.iter().copied());
    }

    /// Everything written so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Returns and forgets everything written so far.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Number of separate [`write`](Terminal::write) calls.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn raw_entries(&self) -> usize {
        self.raw_entries
    }

    pub fn raw_exits(&self) -> usize {
        self.raw_exits
    }

    /// Input bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Terminal for ScriptedTerminal {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.fail_read_after == Some(self.reads) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "input closed").into());
        }
        self.reads += 1;
        Ok(self.input.pop_front())
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.output.extend_from_slice(data);
        self.writes += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn enter_raw_mode(&mut self) -> Result<SpecialChars> {
        if self.fail_raw_mode {
            return Err(Error::Terminal {
                op: "tcgetattr",
                source: io::Error::new(io::ErrorKind::Unsupported, "not a tty"),
            });
        }
        self.raw = true;
        self.raw_entries += 1;
        Ok(self.specials)
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        if self.raw {
            self.raw = false;
            self.raw_exits += 1;
        }
        Ok(())
    }

    fn window_size(&mut self) -> Option<(u16, u16)> {
        self.window
    }
}
