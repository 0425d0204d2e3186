//! The line editor: read loop, key dispatch and screen updates.

use std::collections::VecDeque;
use std::env;

use crate::complete::Completer;
use crate::config::{EditorConfig, ScreenSize};
use crate::filename::FilenameCompleter;
use crate::history::History;
use crate::keymap::Keymap;
use crate::line::LineBuffer;
use crate::screen::{is_meta, Screen, DEL, NEWLINE};
use crate::signal::PendingSignal;
use crate::terminal::{SpecialChars, Terminal};
use crate::Result;

/// Outcome of one dispatch step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The line was accepted.
    Done,
    /// Input ended, or end-of-file was typed on an empty line.
    Eof,
    /// The point moved in a way the screen has not followed; redraw up to the point.
    Move,
    /// Not handled here; look the byte up in the key tables.
    Dispatch,
    /// Nothing more to do on screen.
    Stay,
    /// Interrupt, quit or suspend was typed.
    Signal,
}

const BELL: u8 = 0x07;

/// Looks up the text of a keyboard macro by variable name.
pub(crate) type MacroSource = fn(&str) -> Option<String>;

fn macro_from_env(name: &str) -> Option<String> {
    env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

/// Emacs-style line editor with history, kill/yank and completion.
///
/// A `LineEditor` owns all editing state: the line, the history, the yank buffer and
/// the key tables. Nothing is global, so several editors can coexist; a given
/// terminal should only be driven by one read at a time.
///
/// # Examples
///
/// ```no_run
/// use emacsline::{terminals::StdioTerminal, LineEditor};
///
/// let mut editor = LineEditor::new(1024, 50);
/// let mut terminal = StdioTerminal::new();
///
/// while let Some(line) = editor.read_line(&mut terminal, "> ")? {
///     println!("Got: {line}");
/// }
/// # Ok::<(), emacsline::Error>(())
/// ```
///
/// # Key Bindings
///
/// - **C-A / C-E**: start / end of line
/// - **C-B / C-F**, arrows: move by character
/// - **M-b / M-f**: move by word
/// - **C-D / DEL**: delete forward / backward
/// - **C-K, C-W, M-d**: kill to end of line, kill word back / forward
/// - **C-Y**: yank the last kill
/// - **C-P / C-N**, arrows: history; **C-R**: history search
/// - **TAB / M-?**: complete / list completions
/// - **ESC digits**: repeat count for the next command
pub struct LineEditor {
    pub(crate) line: LineBuffer,
    pub(crate) history: History,
    pub(crate) screen: Screen,
    pub(crate) keymap: Keymap,
    pub(crate) completer: Option<Box<dyn Completer>>,
    pub(crate) yanked: Option<Vec<u8>>,
    pub(crate) prompt: Vec<u8>,
    pub(crate) specials: SpecialChars,
    pub(crate) size: ScreenSize,
    pub(crate) repeat: Option<usize>,
    pub(crate) old_point: usize,
    pub(crate) pushback: Option<u8>,
    pub(crate) macro_input: VecDeque<u8>,
    pub(crate) pending: Option<PendingSignal>,
    pub(crate) searching: bool,
    pub(crate) macros: MacroSource,
    deliver_signals: bool,
}

impl LineEditor {
    /// Creates a new line editor with the specified capacities.
    ///
    /// # Arguments
    ///
    /// * `buffer_capacity` - Initial capacity for the line buffer in bytes
    /// * `history_capacity` - Maximum number of history entries to store
    ///
    /// # Examples
    ///
    /// ```
    /// use emacsline::LineEditor;
    ///
    /// // 1024 byte buffer, 50 history entries
    /// let editor = LineEditor::new(1024, 50);
    /// ```
    pub fn new(buffer_capacity: usize, history_capacity: usize) -> Self {
        Self::with_config(
            EditorConfig::default()
                .with_buffer_capacity(buffer_capacity)
                .with_history_size(history_capacity),
        )
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            line: LineBuffer::new(config.buffer_capacity),
            history: History::new(config.history_size),
            screen: Screen::new(config.meta_chars, config.no_echo),
            keymap: Keymap::default(),
            completer: Some(Box::new(FilenameCompleter::new())),
            yanked: None,
            prompt: Vec::new(),
            specials: SpecialChars::default(),
            size: ScreenSize::default(),
            repeat: None,
            old_point: 0,
            pushback: None,
            macro_input: VecDeque::new(),
            pending: None,
            searching: false,
            macros: macro_from_env,
            deliver_signals: config.deliver_signals,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Appends a line to the history, skipping empty lines and repeats of the last entry.
    ///
    /// [`read_line`](Self::read_line) already records every accepted line.
    pub fn add_history(&mut self, line: &str) {
        self.history.add(line);
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    /// Installs the completion provider; `None` makes TAB ring the bell.
    ///
    /// A new editor completes file names. The provider is owned by the editor, so
    /// changing the hooks of a [`FnCompleter`](crate::FnCompleter) means installing
    /// a new one here.
    pub fn set_completer(&mut self, completer: Option<Box<dyn Completer>>) {
        self.completer = completer;
    }

    pub fn meta_chars(&self) -> bool {
        self.screen.meta_chars()
    }

    pub fn set_meta_chars(&mut self, on: bool) {
        self.screen.set_meta_chars(on);
    }

    pub fn set_no_echo(&mut self, on: bool) {
        self.screen.set_no_echo(on);
    }

    pub fn set_deliver_signals(&mut self, on: bool) {
        self.deliver_signals = on;
    }

    /// Takes the signal typed during the last read, if it was not re-raised.
    pub fn take_pending_signal(&mut self) -> Option<PendingSignal> {
        self.pending.take()
    }

    /// The text most recently killed or copied.
    pub fn yanked(&self) -> Option<&[u8]> {
        self.yanked.as_deref()
    }

    /// Reads one line from the terminal with full editing support.
    ///
    /// Writes `prompt`, switches the terminal to raw mode and edits until the line
    /// is accepted or input ends. The terminal is restored before this returns, on
    /// every path. An accepted line is recorded in the history unless it is empty or
    /// repeats the previous entry.
    ///
    /// If the terminal is not interactive, no prompt is written and a plain
    /// newline-terminated line is read instead.
    ///
    /// # Returns
    ///
    /// `Ok(Some(line))` for an accepted line, `Ok(None)` at end of input. After an
    /// interrupt, quit or suspend the line is empty and the signal is re-raised once
    /// the terminal is restored (see [`EditorConfig::deliver_signals`]).
    ///
    /// # Errors
    ///
    /// Returns an error if reading from or writing to the terminal fails, or if the
    /// terminal settings cannot be restored.
    pub fn read_line<T: Terminal>(&mut self, terminal: &mut T, prompt: &str) -> Result<Option<String>> {
        if !terminal.is_interactive() {
            self.screen.flush(terminal)?;
            return self.read_redirected(terminal);
        }

        self.size = ScreenSize::resolve(terminal);
        self.screen.set_backspace(terminal.backspace());

        let raw = match terminal.enter_raw_mode() {
            Ok(specials) => {
                log::debug!("raw mode on, special characters {specials:?}");
                self.specials = specials;
                true
            }
            Err(err) => {
                log::warn!("editing without raw mode: {err}");
                self.specials = SpecialChars::default();
                false
            }
        };

        self.history.begin_working();
        self.prompt = prompt.as_bytes().to_vec();

        // Use a closure to ensure we always exit raw mode, even on error
        let result = (|| -> Result<Status> {
            self.screen.puts(prompt.as_bytes());
            if self.screen.no_echo() {
                self.screen.set_no_echo(false);
                let flushed = self.screen.flush(terminal);
                self.screen.set_no_echo(true);
                flushed?;
            }

            let status = self.edit_input(terminal)?;
            if matches!(status, Status::Done | Status::Signal) {
                self.screen.puts(NEWLINE);
                self.screen.flush(terminal)?;
            }
            Ok(status)
        })();

        let restored = if raw {
            log::debug!("raw mode off");
            terminal.exit_raw_mode()
        } else {
            Ok(())
        };
        self.history.end_working();

        let line = match result? {
            Status::Done => Some(String::from_utf8_lossy(self.line.as_bytes()).into_owned()),
            Status::Signal => Some(String::new()),
            _ => None,
        };
        if let Some(line) = &line {
            self.history.add(line);
        }

        if self.deliver_signals {
            if let Some(signal) = self.pending.take() {
                signal.raise();
            }
        }

        if let Err(err) = restored {
            log::warn!("could not restore terminal settings: {err}");
            return Err(err);
        }
        Ok(line)
    }

    /// Reads a newline-terminated line without any editing.
    fn read_redirected<T: Terminal>(&mut self, terminal: &mut T) -> Result<Option<String>> {
        let mut line = Vec::new();
        loop {
            match terminal.read_byte()? {
                Some(b'\n') => return Ok(Some(String::from_utf8_lossy(&line).into_owned())),
                Some(c) => line.push(c),
                None => {
                    if !line.is_empty() {
                        log::debug!("dropping {} bytes of unterminated input", line.len());
                    }
                    return Ok(None);
                }
            }
        }
    }

    /// Runs the dispatch loop on an empty line until a terminal status.
    pub(crate) fn edit_input<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        self.repeat = None;
        self.old_point = 0;
        self.line.clear();
        self.pending = None;

        while let Some(c) = self.get_byte(terminal)? {
            let mut status = self.special(terminal, c)?;
            if status == Status::Dispatch {
                status = self.dispatch(terminal, c)?;
            } else if self.pushback.is_none() {
                self.repeat = None;
            }
            log::trace!("byte {c:#04x} -> {status:?}");

            match status {
                Status::Done | Status::Eof | Status::Signal => return Ok(status),
                Status::Move => self.reposition(),
                Status::Dispatch | Status::Stay => {}
            }
        }
        Ok(Status::Eof)
    }

    /// Next input byte: pushback first, then macro text, then the terminal.
    ///
    /// Pending output is flushed before anything is read.
    pub(crate) fn get_byte<T: Terminal>(&mut self, terminal: &mut T) -> Result<Option<u8>> {
        self.screen.flush(terminal)?;
        if let Some(c) = self.pushback.take() {
            return Ok(Some(c));
        }
        if let Some(c) = self.macro_input.pop_front() {
            return Ok(Some(c));
        }
        let c = terminal.read_byte()?;
        log::trace!("read {c:?}");
        Ok(c)
    }

    /// Handles the terminal's own control characters.
    fn special<T: Terminal>(&mut self, terminal: &mut T, c: u8) -> Result<Status> {
        if self.screen.meta_chars() && is_meta(c) {
            return Ok(Status::Dispatch);
        }

        let specials = self.specials;
        if specials.erase == Some(c) || c == DEL {
            return self.bk_del_char(terminal);
        }
        if specials.kill == Some(c) {
            if self.line.point() != 0 {
                self.line.set_point(0);
                self.reposition();
            }
            self.repeat = None;
            return self.kill_line(terminal);
        }
        if specials.eof == Some(c) && self.line.is_empty() {
            return Ok(Status::Eof);
        }

        let signal = if specials.interrupt == Some(c) {
            PendingSignal::Interrupt
        } else if specials.quit == Some(c) {
            PendingSignal::Quit
        } else if specials.suspend == Some(c) {
            PendingSignal::Suspend
        } else {
            return Ok(Status::Dispatch);
        };
        log::debug!("{signal} typed");
        self.pending = Some(signal);
        Ok(Status::Signal)
    }

    /// Looks `c` up in the primary table, inserting it if unbound.
    fn dispatch<T: Terminal>(&mut self, terminal: &mut T, c: u8) -> Result<Status> {
        self.old_point = self.line.point();

        let status = if self.screen.meta_chars() && is_meta(c) {
            self.pushback = Some(c & 0x7f);
            self.meta(terminal)?
        } else {
            match self.keymap.lookup(c) {
                Some(command) => self.run(terminal, command)?,
                None => self.insert_char(terminal, c)?,
            }
        };

        // A pushback here is the byte after a repeat count.
        if self.pushback.is_none() {
            self.repeat = None;
        }
        Ok(status)
    }

    /// Reads the byte after Escape and dispatches it through the Meta table.
    pub(crate) fn meta<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        let Some(c) = self.get_byte(terminal)? else {
            return Ok(Status::Eof);
        };

        if c == b'[' || c == b'O' {
            return self.ansi_sequence(terminal);
        }

        if c.is_ascii_digit() {
            let mut count = usize::from(c - b'0');
            loop {
                match self.get_byte(terminal)? {
                    Some(d) if d.is_ascii_digit() => {
                        count = count.saturating_mul(10).saturating_add(usize::from(d - b'0'));
                    }
                    Some(next) => {
                        self.pushback = Some(next);
                        break;
                    }
                    None => return Ok(Status::Eof),
                }
            }
            self.repeat = Some(count);
            return Ok(Status::Stay);
        }

        if c.is_ascii_uppercase() {
            return self.do_macro(terminal, c);
        }

        match self.keymap.lookup_meta(c) {
            Some(command) => self.run(terminal, command),
            None => self.ring_bell(terminal),
        }
    }

    /// VT100 cursor keys: `ESC [ x` and `ESC O x`.
    fn ansi_sequence<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        let Some(c) = self.get_byte(terminal)? else {
            return Ok(Status::Eof);
        };
        match c {
            // Insert, PgUp, PgDn
            b'2' | b'5' | b'6' => {
                self.get_byte(terminal)?;
                Ok(Status::Stay)
            }
            b'3' => {
                self.get_byte(terminal)?;
                self.del_char(terminal)
            }
            b'A' => self.h_prev(terminal),
            b'B' => self.h_next(terminal),
            b'C' => self.fd_char(),
            b'D' => self.bk_char(),
            b'F' => Ok(self.end_line()),
            b'H' => Ok(self.beg_line()),
            _ => self.ring_bell(terminal),
        }
    }

    /// Feeds the value of the environment variable `_X_` in as typed input.
    fn do_macro<T: Terminal>(&mut self, terminal: &mut T, c: u8) -> Result<Status> {
        let name = format!("_{}_", char::from(c));
        match (self.macros)(&name) {
            Some(text) => {
                log::debug!("expanding macro {name} to {text:?}");
                self.macro_input = text.bytes().collect();
                Ok(Status::Stay)
            }
            None => {
                self.macro_input.clear();
                self.ring_bell(terminal)
            }
        }
    }

    /// Number of times a repeatable command runs.
    pub(crate) fn repeat_count(&self) -> usize {
        self.repeat.map_or(1, |n| n.max(1))
    }

    pub(crate) fn ring_bell<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        self.screen.put(BELL);
        self.screen.flush(terminal)?;
        Ok(Status::Stay)
    }

    /// Redraws the prompt and the line up to the point.
    pub(crate) fn reposition(&mut self) {
        self.screen.put(b'\r');
        self.screen.puts(&self.prompt);
        let point = self.line.point();
        self.screen.show_all(&self.line.as_bytes()[..point]);
    }

    /// Moves the screen cursor back over the byte before the point.
    pub(crate) fn left(&mut self, advance: bool) {
        let width = self
            .line
            .point()
            .checked_sub(1)
            .and_then(|i| self.line.get(i))
            .map_or(1, |c| self.screen.width(c));
        self.screen.backn(width);
        if advance {
            self.line.move_left();
        }
    }

    /// Echoes the byte under the point, moving the screen cursor past it.
    pub(crate) fn right(&mut self, advance: bool) {
        if let Some(c) = self.line.get(self.line.point()) {
            self.screen.show(c);
        }
        if advance {
            self.line.move_right();
        }
    }

    /// Blanks the screen from the point to the end of the line and returns there.
    pub(crate) fn ceol(&mut self) {
        let blank = self.screen.width_of(self.line.tail()) + 1;
        for _ in 0..blank {
            self.screen.put(b' ');
        }
        self.screen.backn(blank);
    }

    /// Blanks the prompt and line on screen and empties the line.
    pub(crate) fn clear_line(&mut self) {
        self.blank_screen_line(self.screen.width_of(self.line.as_bytes()));
        self.line.clear();
    }

    /// Overwrites the prompt plus `width` columns of text with spaces.
    pub(crate) fn blank_screen_line(&mut self, width: usize) {
        let blank = self.prompt.len() + width + 1;
        self.screen.put(b'\r');
        for _ in 0..blank {
            self.screen.put(b' ');
        }
        self.screen.backn(blank);
    }

    /// Redraws prompt and line on a fresh screen line.
    pub(crate) fn redisplay(&mut self) -> Status {
        self.screen.puts(NEWLINE);
        self.screen.puts(&self.prompt);
        self.screen.show_all(self.line.as_bytes());
        Status::Move
    }

    /// Inserts `text` at the point and echoes the rest of the line.
    pub(crate) fn insert_string<T: Terminal>(&mut self, terminal: &mut T, text: &[u8]) -> Result<Status> {
        let start = self.line.point();
        if let Err(err) = self.line.insert(text) {
            log::warn!("line buffer could not grow by {} bytes: {err}", text.len());
            return self.ring_bell(terminal);
        }
        self.screen.show_all(&self.line.as_bytes()[start..]);
        Ok(if self.line.at_end() {
            Status::Stay
        } else {
            Status::Move
        })
    }

    /// Deletes `count` bytes at the point.
    pub(crate) fn delete_string<T: Terminal>(&mut self, terminal: &mut T, count: usize) -> Result<Status> {
        if count == 0 || self.line.at_end() {
            return self.ring_bell(terminal);
        }

        let point = self.line.point();
        if count == 1 && point + 1 == self.line.len() {
            let removed = self.line.remove(1);
            let width = self.screen.width_of(&removed);
            for _ in 0..width {
                self.screen.put(b' ');
            }
            self.screen.backn(width);
            return Ok(Status::Move);
        }

        let count = count.min(self.line.len() - point);
        if count > 1 {
            self.save_yank(point, count);
        }
        self.ceol();
        self.line.remove(count);
        self.screen.show_all(self.line.tail());
        Ok(Status::Move)
    }

    /// Replaces the yank buffer with `count` bytes starting at `begin`.
    pub(crate) fn save_yank(&mut self, begin: usize, count: usize) {
        self.yanked = None;
        if count < 1 {
            return;
        }
        let end = (begin + count).min(self.line.len());
        if let Some(text) = self.line.as_bytes().get(begin..end) {
            self.yanked = Some(text.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminals::ScriptedTerminal;
    use pretty_assertions::assert_eq;

    fn read(editor: &mut LineEditor, input: &[u8]) -> Option<String> {
        let mut term = ScriptedTerminal::new(input);
        editor.read_line(&mut term, "> ").unwrap()
    }

    fn quiet_editor() -> LineEditor {
        LineEditor::with_config(EditorConfig::default().with_deliver_signals(false))
    }

    #[test]
    fn test_accept_line() {
        let mut editor = quiet_editor();
        assert_eq!(read(&mut editor, b"hello\r").as_deref(), Some("hello"));
        assert_eq!(read(&mut editor, b"world\n").as_deref(), Some("world"));
    }

    #[test]
    fn test_backspace_at_end() {
        let mut editor = quiet_editor();
        let mut term = ScriptedTerminal::new(b"hello\x7f\r");
        assert_eq!(editor.read_line(&mut term, "").unwrap().as_deref(), Some("hell"));
        assert_eq!(term.output(), b"hello\x08 \x08\rhell\r\n");
        assert_eq!(editor.line.point(), 4);
    }

    #[test]
    fn test_insert_mid_line_redraws() {
        let mut editor = quiet_editor();
        let mut term = ScriptedTerminal::new(b"ac\x02b\r");
        assert_eq!(editor.read_line(&mut term, "> ").unwrap().as_deref(), Some("abc"));
        assert_eq!(term.output(), b"> ac\x08bc\r> ab\r\n");
    }

    #[test]
    fn test_eof_on_empty_line() {
        let mut editor = quiet_editor();
        assert_eq!(read(&mut editor, b"\x04"), None);
        assert_eq!(read(&mut editor, b""), None);
        // not empty: C-D deletes under the point instead
        assert_eq!(read(&mut editor, b"ab\x01\x04\r").as_deref(), Some("b"));
    }

    #[test]
    fn test_interrupt_returns_empty_line() {
        let mut editor = quiet_editor();
        let mut term = ScriptedTerminal::new(b"partial\x03");
        assert_eq!(editor.read_line(&mut term, "").unwrap().as_deref(), Some(""));
        assert_eq!(editor.take_pending_signal(), Some(PendingSignal::Interrupt));
        assert!(editor.history().iter().next().is_none());
        assert_eq!((term.raw_entries(), term.raw_exits()), (1, 1));
    }

    #[test]
    fn test_quit_and_suspend_are_signals() {
        let mut editor = quiet_editor();
        assert_eq!(read(&mut editor, b"x\x1c").as_deref(), Some(""));
        assert_eq!(editor.take_pending_signal(), Some(PendingSignal::Quit));
        assert_eq!(read(&mut editor, b"\x1a").as_deref(), Some(""));
        assert_eq!(editor.take_pending_signal(), Some(PendingSignal::Suspend));
    }

    #[test]
    fn test_disabled_special_chars_are_plain_keys() {
        let mut editor = quiet_editor();
        let mut term = ScriptedTerminal::new(b"ab\x03\x04\r").with_special_chars(SpecialChars::none());
        // C-C is unbound and inserts itself, C-D deletes nothing at the end
        assert_eq!(editor.read_line(&mut term, "").unwrap().as_deref(), Some("ab\x03"));
        assert_eq!(editor.take_pending_signal(), None);
    }

    #[test]
    fn test_kill_char_clears_line() {
        let mut editor = quiet_editor();
        assert_eq!(read(&mut editor, b"junk\x15ok\r").as_deref(), Some("ok"));
        assert_eq!(editor.yanked(), Some(&b"junk"[..]));
    }

    #[test]
    fn test_repeat_count_multiplies_insert() {
        let mut editor = quiet_editor();
        assert_eq!(read(&mut editor, b"\x1b3x\r").as_deref(), Some("xxx"));
        assert_eq!(read(&mut editor, b"\x1b12-\r").as_deref(), Some("-".repeat(12).as_str()));
    }

    #[test]
    fn test_repeat_count_resets_after_command() {
        let mut editor = quiet_editor();
        assert_eq!(read(&mut editor, b"\x1b2ab\r").as_deref(), Some("aab"));
    }

    #[test]
    fn test_repeat_count_with_erase() {
        let mut editor = quiet_editor();
        assert_eq!(read(&mut editor, b"abcdef\x1b3\x7fz\r").as_deref(), Some("abcz"));
    }

    #[test]
    fn test_unknown_meta_key_rings_bell() {
        let mut editor = quiet_editor();
        let mut term = ScriptedTerminal::new(b"\x1bxa\r");
        assert_eq!(editor.read_line(&mut term, "").unwrap().as_deref(), Some("a"));
        assert!(term.output().contains(&BELL));
    }

    #[test]
    fn test_meta_chars_mode_treats_high_bit_as_meta() {
        let mut editor = LineEditor::with_config(EditorConfig::default().with_meta_chars(true));
        // M-b as a single byte, then insert at the start
        assert_eq!(read(&mut editor, b"foo bar\xe2X\r").as_deref(), Some("foo Xbar"));
    }

    #[test]
    fn test_high_bit_bytes_insert_without_meta_mode() {
        let mut editor = quiet_editor();
        assert_eq!(
            read(&mut editor, "caf\u{e9}\r".as_bytes()).as_deref(),
            Some("caf\u{e9}")
        );
    }

    fn fake_env(name: &str) -> Option<String> {
        (name == "_Q_").then(|| "expanded".to_owned())
    }

    #[test]
    fn test_macro_expansion() {
        let mut editor = quiet_editor();
        editor.macros = fake_env;
        assert_eq!(read(&mut editor, b"\x1bQ!\r").as_deref(), Some("expanded!"));
    }

    #[test]
    fn test_macro_reads_environment_by_name() {
        assert_eq!(macro_from_env("_EMACSLINE_UNSET_MACRO_"), None);
    }

    #[test]
    fn test_missing_macro_rings_bell() {
        let mut editor = quiet_editor();
        editor.macros = fake_env;
        let mut term = ScriptedTerminal::new(b"\x1bJok\r");
        assert_eq!(editor.read_line(&mut term, "").unwrap().as_deref(), Some("ok"));
        assert!(term.output().contains(&BELL));
    }

    #[test]
    fn test_output_flushed_once_per_read() {
        let mut editor = quiet_editor();
        let mut term = ScriptedTerminal::new(b"abc\r");
        editor.read_line(&mut term, "> ").unwrap();
        // one before each of the four reads, then the final newline
        assert_eq!(term.writes(), 5);
    }

    #[test]
    fn test_no_echo_still_writes_prompt() {
        let mut editor = LineEditor::with_config(EditorConfig::default().with_no_echo(true));
        let mut term = ScriptedTerminal::new(b"secret\r");
        assert_eq!(editor.read_line(&mut term, "pw: ").unwrap().as_deref(), Some("secret"));
        assert_eq!(term.output(), b"pw: ");
    }

    #[test]
    fn test_raw_mode_failure_degrades() {
        let mut editor = quiet_editor();
        let mut term = ScriptedTerminal::new(b"still works\r").with_failing_raw_mode();
        assert_eq!(editor.read_line(&mut term, "").unwrap().as_deref(), Some("still works"));
        assert_eq!(term.raw_exits(), 0);
    }

    #[test]
    fn test_completes_file_names_by_default() {
        // tests run in the package root
        let mut editor = quiet_editor();
        assert_eq!(read(&mut editor, b"vi Cargo.to\t\r").as_deref(), Some("vi Cargo.toml "));

        editor.set_completer(None);
        let mut term = ScriptedTerminal::new(b"vi Cargo.to\t\r");
        assert_eq!(editor.read_line(&mut term, "").unwrap().as_deref(), Some("vi Cargo.to"));
        assert!(term.output().contains(&BELL));
    }

    #[test]
    fn test_read_error_restores_terminal() {
        let mut editor = quiet_editor();
        let mut term = ScriptedTerminal::new(b"abc\r").with_failing_read_after(2);
        assert!(matches!(editor.read_line(&mut term, "> "), Err(crate::Error::Io(_))));
        assert_eq!((term.raw_entries(), term.raw_exits()), (1, 1));
        assert!(!term.is_raw());
        assert!(editor.history().is_empty());
    }

    #[test]
    fn test_non_interactive_reads_plain_line() {
        let mut editor = quiet_editor();
        let mut term = ScriptedTerminal::non_interactive(b"ls -la\x01\nnext\npartial");
        assert_eq!(editor.read_line(&mut term, "> ").unwrap().as_deref(), Some("ls -la\x01"));
        assert_eq!(editor.read_line(&mut term, "> ").unwrap().as_deref(), Some("next"));
        assert_eq!(editor.read_line(&mut term, "> ").unwrap(), None);
        assert!(term.output().is_empty());
        assert_eq!(term.raw_entries(), 0);
        assert!(editor.history().is_empty());
    }
}
