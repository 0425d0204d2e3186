//! The editing commands bound in the key tables.

use crate::complete::{escape_completion, find_word};
use crate::editor::{LineEditor, Status};
use crate::history::Direction;
use crate::keymap::Command;
use crate::terminal::Terminal;
use crate::Result;

const SEARCH_PROMPT: &[u8] = b"Search: ";

impl LineEditor {
    pub(crate) fn run<T: Terminal>(&mut self, terminal: &mut T, command: Command) -> Result<Status> {
        log::trace!("command {command:?} repeat {:?}", self.repeat);
        match command {
            Command::SetMark => Ok(self.mk_set()),
            Command::BeginningOfLine => Ok(self.beg_line()),
            Command::EndOfLine => Ok(self.end_line()),
            Command::BackwardChar => self.bk_char(),
            Command::ForwardChar => self.fd_char(),
            Command::DeleteChar => self.del_char(terminal),
            Command::BackwardDeleteChar => self.bk_del_char(terminal),
            Command::KillLine => self.kill_line(terminal),
            Command::AcceptLine => Ok(Status::Done),
            Command::Redisplay => Ok(self.redisplay()),
            Command::PreviousHistory => self.h_prev(terminal),
            Command::NextHistory => self.h_next(terminal),
            Command::FirstHistory => self.h_first(terminal),
            Command::LastHistory => self.h_last(terminal),
            Command::SearchHistory => self.h_search(terminal),
            Command::TransposeChars => Ok(self.transpose()),
            Command::QuotedInsert => self.quote(terminal),
            Command::ExchangePointAndMark => self.exchange(terminal),
            Command::Yank => self.yank(terminal),
            Command::CopyRegion => self.copy_region(terminal),
            Command::MoveToChar => self.move_to_char(terminal),
            Command::Complete => self.c_complete(terminal),
            Command::ListPossibilities => self.c_possible(terminal),
            Command::BackwardWord => Ok(self.bk_word()),
            Command::ForwardWord => Ok(self.do_forward(true)),
            Command::KillWord => self.fd_kill_word(terminal),
            Command::BackwardKillWord => self.bk_kill_word(terminal),
            Command::DowncaseWord => Ok(self.do_case(false)),
            Command::UpcaseWord => Ok(self.do_case(true)),
            Command::LastArgument => self.last_argument(terminal),
            Command::ToggleMetaChars => Ok(self.toggle_meta_mode()),
            Command::Meta => self.meta(terminal),
            Command::Bell => self.ring_bell(terminal),
        }
    }

    // Motion

    pub(crate) fn beg_line(&mut self) -> Status {
        if self.line.point() != 0 {
            self.line.set_point(0);
            return Status::Move;
        }
        Status::Stay
    }

    pub(crate) fn end_line(&mut self) -> Status {
        if !self.line.at_end() {
            self.line.set_point(self.line.len());
            return Status::Move;
        }
        Status::Stay
    }

    pub(crate) fn fd_char(&mut self) -> Result<Status> {
        for _ in 0..self.repeat_count() {
            if self.line.at_end() {
                break;
            }
            self.right(true);
        }
        Ok(Status::Stay)
    }

    pub(crate) fn bk_char(&mut self) -> Result<Status> {
        for _ in 0..self.repeat_count() {
            if self.line.point() == 0 {
                break;
            }
            self.left(true);
        }
        Ok(Status::Stay)
    }

    /// Moves past the next word `repeat` times, echoing when `echo` is set.
    fn do_forward(&mut self, echo: bool) -> Status {
        for _ in 0..self.repeat_count() {
            let end = self.line.forward_word_end(self.line.point());
            while self.line.point() < end {
                self.step_right(echo);
            }
            if self.line.at_end() {
                break;
            }
        }
        Status::Stay
    }

    fn step_right(&mut self, echo: bool) {
        if echo {
            self.right(true);
        } else {
            self.line.move_right();
        }
    }

    fn bk_word(&mut self) -> Status {
        for _ in 0..self.repeat_count() {
            let start = self.line.backward_word_start(self.line.point());
            while self.line.point() > start {
                self.left(true);
            }
            if self.line.point() == 0 {
                break;
            }
        }
        Status::Stay
    }

    fn move_to_char<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        let Some(c) = self.get_byte(terminal)? else {
            return Ok(Status::Eof);
        };
        let from = self.line.point() + 1;
        let found = self
            .line
            .as_bytes()
            .get(from..)
            .and_then(|rest| rest.iter().position(|&b| b == c));
        match found {
            Some(offset) => {
                self.line.set_point(from + offset);
                Ok(Status::Move)
            }
            None => Ok(Status::Stay),
        }
    }

    // Mark and region

    fn mk_set(&mut self) -> Status {
        self.line.set_mark(self.line.point());
        Status::Stay
    }

    /// `C-X C-X`; any other second key rings the bell.
    fn exchange<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        match self.get_byte(terminal)? {
            None => Ok(Status::Eof),
            Some(0x18) => {
                let mark = self.line.mark();
                if mark <= self.line.len() {
                    self.line.set_mark(self.line.point());
                    self.line.set_point(mark);
                    return Ok(Status::Move);
                }
                Ok(Status::Stay)
            }
            Some(_) => self.ring_bell(terminal),
        }
    }

    fn copy_region<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        let (point, mark) = (self.line.point(), self.line.mark());
        if mark > self.line.len() {
            return self.ring_bell(terminal);
        }
        self.save_yank(point.min(mark), point.abs_diff(mark));
        Ok(Status::Stay)
    }

    // Insertion and deletion

    pub(crate) fn insert_char<T: Terminal>(&mut self, terminal: &mut T, c: u8) -> Result<Status> {
        let count = self.repeat_count();
        if count < 2 {
            return self.insert_string(terminal, &[c]);
        }
        let mut text = Vec::new();
        if text.try_reserve_exact(count).is_err() {
            log::warn!("cannot repeat {c:#04x} {count} times");
            return self.ring_bell(terminal);
        }
        text.resize(count, c);
        self.insert_string(terminal, &text)
    }

    fn quote<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        match self.get_byte(terminal)? {
            Some(c) => self.insert_char(terminal, c),
            None => Ok(Status::Eof),
        }
    }

    pub(crate) fn del_char<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        let count = self.repeat.unwrap_or(1);
        self.delete_string(terminal, count)
    }

    pub(crate) fn bk_del_char<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        let mut moved = 0;
        for _ in 0..self.repeat_count() {
            if self.line.point() == 0 {
                break;
            }
            self.left(true);
            moved += 1;
        }
        self.delete_string(terminal, moved)
    }

    /// Kills to the end of the line; with a repeat count, kills between the point and
    /// that column instead.
    pub(crate) fn kill_line<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        if let Some(column) = self.repeat {
            let point = self.line.point();
            if column < point {
                self.line.set_point(column);
                self.reposition();
                self.delete_string(terminal, point - column)?;
            } else if column > point {
                self.delete_string(terminal, column - point)?;
            }
            return Ok(Status::Move);
        }

        self.save_yank(self.line.point(), self.line.len() - self.line.point());
        self.ceol();
        self.line.truncate();
        Ok(Status::Stay)
    }

    fn transpose(&mut self) -> Status {
        if self.line.point() == 0 || self.line.len() < 2 {
            return Status::Stay;
        }
        if self.line.at_end() {
            self.left(true);
        }
        let point = self.line.point();
        let bytes = self.line.as_bytes();
        let (before, under) = (bytes[point - 1], bytes[point]);

        self.left(false);
        self.line.replace(point - 1, under);
        self.screen.show(under);
        self.line.replace(point, before);
        self.screen.show(before);
        self.line.set_point(point + 1);
        Status::Stay
    }

    fn fd_kill_word<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        self.do_forward(false);
        let point = self.line.point();
        if point != self.old_point {
            self.line.set_point(self.old_point);
            return self.delete_string(terminal, point - self.old_point);
        }
        Ok(Status::Stay)
    }

    fn bk_kill_word<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        self.bk_word();
        let point = self.line.point();
        if point != self.old_point {
            return self.delete_string(terminal, self.old_point - point);
        }
        Ok(Status::Stay)
    }

    /// Up- or downcases up to the end of the next word.
    fn do_case(&mut self, upper: bool) -> Status {
        self.do_forward(false);
        let end = self.line.point();
        if end != self.old_point {
            self.line.set_point(self.old_point);
            for i in self.old_point..end {
                if let Some(c) = self.line.get(i) {
                    let c = if upper {
                        c.to_ascii_uppercase()
                    } else {
                        c.to_ascii_lowercase()
                    };
                    self.line.replace(i, c);
                }
                self.right(true);
            }
        }
        Status::Stay
    }

    fn yank<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        match self.yanked.clone() {
            Some(text) if !text.is_empty() => self.insert_string(terminal, &text),
            _ => Ok(Status::Stay),
        }
    }

    fn toggle_meta_mode(&mut self) -> Status {
        let on = !self.screen.meta_chars();
        self.screen.set_meta_chars(on);
        self.redisplay()
    }

    // History

    /// Replaces the line with a history entry.
    fn do_insert_hist<T: Terminal>(&mut self, terminal: &mut T, entry: &str) -> Result<Status> {
        self.line.set_point(0);
        self.reposition();
        self.ceol();
        self.line.truncate();
        self.insert_string(terminal, entry.as_bytes())
    }

    fn do_hist<T: Terminal>(&mut self, terminal: &mut T, direction: Direction) -> Result<Status> {
        let count = self.repeat_count();
        match self.history.navigate(direction, count).map(str::to_owned) {
            Some(entry) => self.do_insert_hist(terminal, &entry),
            None => self.ring_bell(terminal),
        }
    }

    pub(crate) fn h_prev<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        self.do_hist(terminal, Direction::Older)
    }

    pub(crate) fn h_next<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        self.do_hist(terminal, Direction::Newer)
    }

    fn h_first<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        match self.history.first().map(str::to_owned) {
            Some(entry) => self.do_insert_hist(terminal, &entry),
            None => self.ring_bell(terminal),
        }
    }

    fn h_last<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        match self.history.last_entry().map(str::to_owned) {
            Some(entry) => self.do_insert_hist(terminal, &entry),
            None => self.ring_bell(terminal),
        }
    }

    /// Reads a pattern under a `Search: ` prompt and jumps to the matching entry.
    ///
    /// Searches towards older entries, or towards newer ones when a repeat count is
    /// given. An empty pattern (or end-of-file at the prompt) repeats the last search.
    fn h_search<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        if self.searching {
            return self.ring_bell(terminal);
        }
        let direction = if self.repeat.is_none() {
            Direction::Older
        } else {
            Direction::Newer
        };

        let saved = std::mem::take(&mut self.line);
        self.blank_screen_line(self.screen.width_of(saved.as_bytes()));
        let prompt = std::mem::replace(&mut self.prompt, SEARCH_PROMPT.to_vec());
        self.screen.puts(SEARCH_PROMPT);

        self.searching = true;
        let outcome = self.edit_input(terminal);
        self.searching = false;

        let pattern = String::from_utf8_lossy(self.line.as_bytes()).into_owned();
        self.clear_line();
        self.prompt = prompt;
        self.line = saved;

        let pattern = match outcome? {
            Status::Signal => {
                log::debug!("search cancelled");
                self.pending = None;
                return self.ring_and_restore(terminal);
            }
            Status::Done => pattern,
            _ => String::new(),
        };

        match self.history.search(&pattern, direction).map(str::to_owned) {
            Some(entry) => self.do_insert_hist(terminal, &entry),
            None => self.ring_and_restore(terminal),
        }
    }

    /// Rings the bell and puts the line that was being edited back on screen.
    fn ring_and_restore<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        self.ring_bell(terminal)?;
        self.screen.put(b'\r');
        self.screen.puts(&self.prompt);
        self.screen.show_all(self.line.as_bytes());
        Ok(Status::Move)
    }

    /// Inserts a whitespace-separated argument of the previous line: the last one, or
    /// the one numbered by the repeat count.
    fn last_argument<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        let previous = match self.history.len().checked_sub(2) {
            Some(i) => self.history.get(i).unwrap_or_default().to_owned(),
            None => return self.ring_bell(terminal),
        };
        let args = arguments(&previous);

        match self.repeat {
            Some(n) => match args.get(n) {
                Some(arg) => self.insert_string(terminal, arg.as_bytes()),
                None => self.ring_bell(terminal),
            },
            None => match args.last() {
                Some(arg) => self.insert_string(terminal, arg.as_bytes()),
                None => Ok(Status::Stay),
            },
        }
    }

    // Completion

    fn current_word(&self) -> String {
        let word = find_word(&self.line.as_bytes()[..self.line.point()]);
        String::from_utf8_lossy(&word).into_owned()
    }

    fn c_complete<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        let word = self.current_word();
        let completion = match self.completer.as_mut() {
            Some(completer) => completer.complete(&word),
            None => return self.ring_bell(terminal),
        };
        log::debug!("completing {word:?}: {completion:?}");

        match completion {
            Some(completion) if !completion.text.is_empty() => {
                let text = escape_completion(completion.text.as_bytes(), completion.unique);
                self.insert_string(terminal, &text)
            }
            _ => self.c_possible(terminal),
        }
    }

    fn c_possible<T: Terminal>(&mut self, terminal: &mut T) -> Result<Status> {
        let word = self.current_word();
        let items = match self.completer.as_mut() {
            Some(completer) => completer.possibilities(&word),
            None => Vec::new(),
        };
        log::debug!("{} possibilities for {word:?}", items.len());

        if items.is_empty() {
            return self.ring_bell(terminal);
        }
        self.screen.columns(&items, self.size.cols);
        Ok(Status::Move)
    }
}

/// Splits a line at every whitespace byte after leading whitespace, so a run of
/// separators yields empty arguments. A trailing separator does not start one.
fn arguments(line: &str) -> Vec<&str> {
    let is_space = |c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c');
    let line = line.trim_start_matches(is_space);
    if line.is_empty() {
        return Vec::new();
    }
    let mut args: Vec<&str> = line.split(is_space).collect();
    if line.ends_with(is_space) {
        args.pop();
    }
    args
}

#[cfg(test)]
mod tests {
    use crate::complete::{FnCompleter, WordListCompleter};
    use crate::config::EditorConfig;
    use crate::terminals::ScriptedTerminal;
    use super::arguments;
    use crate::{Completion, LineEditor};
    use pretty_assertions::assert_eq;

    fn editor() -> LineEditor {
        LineEditor::with_config(EditorConfig::default().with_deliver_signals(false))
    }

    fn read(editor: &mut LineEditor, input: &[u8]) -> Option<String> {
        let mut term = ScriptedTerminal::new(input);
        editor.read_line(&mut term, "> ").unwrap()
    }

    #[test]
    fn test_line_motion() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"bc\x01a\x05d\r").as_deref(), Some("abcd"));
        assert_eq!(read(&mut ed, b"ac\x02\x02\x06b\r").as_deref(), Some("abc"));
    }

    #[test]
    fn test_arrow_keys() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"ac\x1b[Db\x1b[H>\x1b[F<\r").as_deref(), Some(">abc<"));
        assert_eq!(read(&mut ed, b"abc\x1b[D\x1b[D\x1b[3~\r").as_deref(), Some("ac"));
        assert_eq!(read(&mut ed, b"ab\x1bOD\x1bOCc\r").as_deref(), Some("abc"));
        assert_eq!(read(&mut ed, b"a\x1b[2~\x1b[5~b\r").as_deref(), Some("ab"));
    }

    #[test]
    fn test_forward_and_backward_char_with_repeat() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"abcdef\x1b4\x02X\r").as_deref(), Some("abXcdef"));
        assert_eq!(read(&mut ed, b"abcdef\x01\x1b9\x06X\r").as_deref(), Some("abcdefX"));
    }

    #[test]
    fn test_delete_char_with_repeat() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"abcdef\x01\x1b3\x04\r").as_deref(), Some("def"));
        assert_eq!(ed.yanked(), Some(&b"abc"[..]));
    }

    #[test]
    fn test_kill_line_and_yank() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"hello world\x1b5\x02\x0b\x01\x19\r").as_deref(), Some("worldhello "));
    }

    #[test]
    fn test_kill_line_towards_column() {
        let mut ed = editor();
        // point 6, kill back to column 2
        assert_eq!(read(&mut ed, b"abcdef\x1b2\x0b\r").as_deref(), Some("ab"));
        // point 1, kill forward to column 4
        assert_eq!(read(&mut ed, b"abcdef\x01\x06\x1b4\x0b\r").as_deref(), Some("aef"));
    }

    #[test]
    fn test_transpose() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"ab\x14\r").as_deref(), Some("ba"));
        assert_eq!(read(&mut ed, b"abc\x01\x06\x14\r").as_deref(), Some("bac"));
        assert_eq!(read(&mut ed, b"a\x14\r").as_deref(), Some("a"));
        assert_eq!(read(&mut ed, b"ab\x01\x14\r").as_deref(), Some("ab"));
    }

    #[test]
    fn test_quoted_insert() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"a\x16\x01b\r").as_deref(), Some("a\x01b"));
        assert_eq!(read(&mut ed, b"\x16\r\r").as_deref(), Some("\r"));
    }

    #[test]
    fn test_quoted_control_char_display() {
        let mut ed = editor();
        let mut term = ScriptedTerminal::new(b"\x16\x01\x7f\r");
        assert_eq!(ed.read_line(&mut term, "").unwrap().as_deref(), Some(""));
        // shown as ^A, erased as two columns
        assert_eq!(term.output(), b"^A\x08\x08  \x08\x08\r\r\n");
    }

    #[test]
    fn test_mark_exchange_and_copy_region() {
        let mut ed = editor();
        let line = read(&mut ed, b"ab\x00cd\x1bw\x18\x18X\r");
        assert_eq!(line.as_deref(), Some("abXcd"));
        assert_eq!(ed.yanked(), Some(&b"cd"[..]));
    }

    #[test]
    fn test_exchange_needs_second_ctrl_x() {
        let mut ed = editor();
        let mut term = ScriptedTerminal::new(b"ab\x18q\r");
        assert_eq!(ed.read_line(&mut term, "").unwrap().as_deref(), Some("ab"));
        assert!(term.output().contains(&0x07));
    }

    #[test]
    fn test_move_to_char() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"a-b-c\x01\x1d-X\r").as_deref(), Some("aX-b-c"));
        assert_eq!(read(&mut ed, b"a-b-c\x01\x1dzX\r").as_deref(), Some("Xa-b-c"));
    }

    #[test]
    fn test_word_motion() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"one two three\x1bb\x1bbX\r").as_deref(), Some("one Xtwo three"));
        assert_eq!(read(&mut ed, b"one two three\x01\x1bfX\r").as_deref(), Some("oneX two three"));
        assert_eq!(read(&mut ed, b"one two three\x01\x1b2\x1bfX\r").as_deref(), Some("one twoX three"));
    }

    #[test]
    fn test_kill_words() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"one two three\x17\r").as_deref(), Some("one two "));
        assert_eq!(ed.yanked(), Some(&b"three"[..]));
        assert_eq!(read(&mut ed, b"one two\x1b\x7f\r").as_deref(), Some("one "));
        assert_eq!(read(&mut ed, b"one two three\x01\x1bd\r").as_deref(), Some(" two three"));
        assert_eq!(read(&mut ed, b"one two\x01\x1bd\x05\x19\r").as_deref(), Some(" twoone"));
    }

    #[test]
    fn test_case_words() {
        let mut ed = editor();
        assert_eq!(read(&mut ed, b"hello world\x01\x1bu\r").as_deref(), Some("HELLO world"));
        assert_eq!(read(&mut ed, b"HELLO WORLD\x01\x1b2\x1bl\r").as_deref(), Some("hello world"));
    }

    #[test]
    fn test_history_navigation() {
        let mut ed = editor();
        for line in ["first", "second", "third"] {
            read(&mut ed, format!("{line}\r").as_bytes());
        }
        assert_eq!(read(&mut ed, b"\x10\r").as_deref(), Some("third"));
        assert_eq!(read(&mut ed, b"\x10\x10\x10\r").as_deref(), Some("first"));
        // history is now first, second, third, first
        assert_eq!(read(&mut ed, b"\x10\x10\x0e\r").as_deref(), Some("first"));
        assert_eq!(read(&mut ed, b"\x1b[A\x1b[A\r").as_deref(), Some("third"));
    }

    #[test]
    fn test_history_repeat_count_out_of_range() {
        let mut ed = editor();
        read(&mut ed, b"only\r");
        let mut term = ScriptedTerminal::new(b"\x1b5\x10\r");
        assert_eq!(ed.read_line(&mut term, "").unwrap().as_deref(), Some(""));
        assert!(term.output().contains(&0x07));
    }

    #[test]
    fn test_first_and_last_history() {
        let mut ed = editor();
        for line in ["a", "b", "c"] {
            read(&mut ed, format!("{line}\r").as_bytes());
        }
        assert_eq!(read(&mut ed, b"\x1b<\r").as_deref(), Some("a"));
        assert_eq!(read(&mut ed, b"\x1b<\x1b>\r").as_deref(), Some(""));
    }

    #[test]
    fn test_search_history() {
        let mut ed = editor();
        for line in ["make foo", "ls", "cat foo.txt", "pwd"] {
            read(&mut ed, format!("{line}\r").as_bytes());
        }
        assert_eq!(read(&mut ed, b"\x12foo\r\r").as_deref(), Some("cat foo.txt"));
        assert_eq!(read(&mut ed, b"\x12^ma\r\r").as_deref(), Some("make foo"));
    }

    #[test]
    fn test_search_reuses_pattern_on_empty_input() {
        let mut ed = editor();
        for line in ["git log", "git push", "ls"] {
            read(&mut ed, format!("{line}\r").as_bytes());
        }
        assert_eq!(read(&mut ed, b"\x12git\r\x12\r\r").as_deref(), Some("git log"));
    }

    #[test]
    fn test_failed_search_restores_line() {
        let mut ed = editor();
        read(&mut ed, b"alpha\r");
        let mut term = ScriptedTerminal::new(b"draft\x12zzz\r!\r");
        assert_eq!(ed.read_line(&mut term, "> ").unwrap().as_deref(), Some("draft!"));
        assert!(term.output().contains(&0x07));
    }

    #[test]
    fn test_failed_search_keeps_point() {
        let mut ed = editor();
        read(&mut ed, b"alpha\r");
        assert_eq!(read(&mut ed, b"draft\x02\x12zzz\r!\r").as_deref(), Some("draf!t"));
    }

    #[test]
    fn test_interrupt_cancels_search_only() {
        let mut ed = editor();
        read(&mut ed, b"alpha\r");
        let mut term = ScriptedTerminal::new(b"draft\x12al\x03\r");
        assert_eq!(ed.read_line(&mut term, "> ").unwrap().as_deref(), Some("draft"));
        assert_eq!(ed.take_pending_signal(), None);
    }

    #[test]
    fn test_search_prompt() {
        let mut ed = editor();
        read(&mut ed, b"alpha\r");
        let mut term = ScriptedTerminal::new(b"\x12al\r\r");
        ed.read_line(&mut term, "> ").unwrap();
        let output = String::from_utf8_lossy(term.output()).into_owned();
        assert!(output.contains("Search: al"), "{output:?}");
    }

    #[test]
    fn test_last_argument() {
        let mut ed = editor();
        read(&mut ed, b"cp src/a.txt  dest/\r");
        assert_eq!(read(&mut ed, b"ls \x1b.\r").as_deref(), Some("ls dest/"));
        read(&mut ed, b"cp src/a.txt  dest/\r");
        assert_eq!(read(&mut ed, b"vi \x1b1\x1b.\r").as_deref(), Some("vi src/a.txt"));
    }

    #[test]
    fn test_last_argument_counts_empty_arguments() {
        let mut ed = editor();
        read(&mut ed, b"a  b c\r");
        assert_eq!(read(&mut ed, b"\x1b2\x1b.\r").as_deref(), Some("b"));
        assert_eq!(arguments("  a  b "), ["a", "", "b"]);
        assert!(arguments("   ").is_empty());
    }

    #[test]
    fn test_last_argument_without_history_rings_bell() {
        let mut ed = editor();
        let mut term = ScriptedTerminal::new(b"\x1b.\r");
        assert_eq!(ed.read_line(&mut term, "").unwrap().as_deref(), Some(""));
        assert!(term.output().contains(&0x07));
    }

    #[test]
    fn test_toggle_meta_mode_redisplays() {
        let mut ed = editor();
        let mut term = ScriptedTerminal::new(b"\xe9\x1bm\r");
        ed.read_line(&mut term, "> ").unwrap();
        assert!(ed.meta_chars());
        assert!(term.output().ends_with(b"\r\n> M-i\r> M-i\r\n"));
    }

    #[test]
    fn test_complete_unique_word() {
        let mut ed = editor();
        ed.set_completer(Some(Box::new(WordListCompleter::new(["foo ", "bar ", "bsd "]))));
        assert_eq!(read(&mut ed, b"run f\t\r").as_deref(), Some("run foo "));
    }

    #[test]
    fn test_complete_ambiguous_lists_possibilities() {
        let mut ed = editor();
        ed.set_completer(Some(Box::new(WordListCompleter::new(["foo", "bar", "bsd"]))));
        let mut term = ScriptedTerminal::new(b"b\t\r").with_window_size(80, 24);
        assert_eq!(ed.read_line(&mut term, "> ").unwrap().as_deref(), Some("b"));
        let output = String::from_utf8_lossy(term.output()).into_owned();
        assert!(output.contains("\r\nbar  bsd\r\n"), "{output:?}");
    }

    #[test]
    fn test_complete_common_extension() {
        let mut ed = editor();
        ed.set_completer(Some(Box::new(WordListCompleter::new(["abc", "abd"]))));
        assert_eq!(read(&mut ed, b"a\t\r").as_deref(), Some("ab"));
    }

    #[test]
    fn test_complete_escapes_separators() {
        let mut ed = editor();
        ed.set_completer(Some(Box::new(
            FnCompleter::new().with_complete_hook(|_: &str| Some(Completion::unique("y file "))),
        )));
        assert_eq!(read(&mut ed, b"my\t\r").as_deref(), Some("myy\\ file "));
    }

    #[test]
    fn test_complete_without_completer_rings_bell() {
        let mut ed = editor();
        ed.set_completer(None);
        let mut term = ScriptedTerminal::new(b"x\t\x1b?\r");
        assert_eq!(ed.read_line(&mut term, "").unwrap().as_deref(), Some("x"));
        assert_eq!(term.output().iter().filter(|&&b| b == 0x07).count(), 2);
    }
}
