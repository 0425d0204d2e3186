//! Key to command tables.
//!
//! Two tables drive dispatch: the primary table, keyed by the raw input byte, and the
//! Meta table, consulted for the byte following an Escape (or a high-bit byte when
//! meta characters are enabled). Bytes missing from the primary table are inserted
//! literally; bytes missing from the Meta table ring the bell.

use std::collections::HashMap;

/// The editing commands a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Set the mark at the point.
    SetMark,
    BeginningOfLine,
    EndOfLine,
    BackwardChar,
    ForwardChar,
    /// Delete the character under the point (repeat-aware).
    DeleteChar,
    /// Delete the character before the point (repeat-aware).
    BackwardDeleteChar,
    /// Kill from the point to the end of the line, or towards a column with a repeat count.
    KillLine,
    /// Finish the read and return the line.
    AcceptLine,
    /// Redraw the prompt and line on a fresh line.
    Redisplay,
    PreviousHistory,
    NextHistory,
    FirstHistory,
    LastHistory,
    /// Interactive history search.
    SearchHistory,
    TransposeChars,
    /// Insert the next byte literally.
    QuotedInsert,
    /// `C-X C-X`: swap point and mark.
    ExchangePointAndMark,
    Yank,
    /// Copy the region between point and mark to the yank buffer.
    CopyRegion,
    /// Move to the next occurrence of the next typed byte.
    MoveToChar,
    Complete,
    ListPossibilities,
    BackwardWord,
    ForwardWord,
    KillWord,
    BackwardKillWord,
    DowncaseWord,
    UpcaseWord,
    /// Insert an argument of the previous history line.
    LastArgument,
    ToggleMetaChars,
    /// Read the next byte through the Meta table.
    Meta,
    Bell,
}

const fn ctl(c: u8) -> u8 {
    c & 0x1f
}

/// The primary and Meta key tables.
///
/// # Examples
///
/// ```
/// use emacsline::{Command, Keymap};
///
/// let mut keymap = Keymap::default();
/// assert_eq!(keymap.lookup(0x01), Some(Command::BeginningOfLine));
///
/// keymap.bind(0x0f, Command::AcceptLine);
/// keymap.bind_meta(b'n', Command::NextHistory);
/// assert_eq!(keymap.lookup_meta(b'n'), Some(Command::NextHistory));
/// ```
#[derive(Debug, Clone)]
pub struct Keymap {
    primary: HashMap<u8, Command>,
    meta: HashMap<u8, Command>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            primary: Self::default_primary(),
            meta: Self::default_meta(),
        }
    }
}

impl Keymap {
    /// A keymap with both tables empty: every byte is inserted literally.
    pub fn empty() -> Self {
        Self {
            primary: HashMap::new(),
            meta: HashMap::new(),
        }
    }

    fn default_primary() -> HashMap<u8, Command> {
        use Command::*;

        let mut bindings = HashMap::new();

        // Motion
        bindings.insert(ctl(b'@'), SetMark);
        bindings.insert(ctl(b'A'), BeginningOfLine);
        bindings.insert(ctl(b'B'), BackwardChar);
        bindings.insert(ctl(b'E'), EndOfLine);
        bindings.insert(ctl(b'F'), ForwardChar);
        bindings.insert(ctl(b'Z'), EndOfLine);
        bindings.insert(ctl(b']'), MoveToChar);
        bindings.insert(ctl(b'X'), ExchangePointAndMark);

        // Editing
        bindings.insert(ctl(b'D'), DeleteChar);
        bindings.insert(ctl(b'H'), BackwardDeleteChar);
        bindings.insert(ctl(b'K'), KillLine);
        bindings.insert(ctl(b'T'), TransposeChars);
        bindings.insert(ctl(b'V'), QuotedInsert);
        bindings.insert(ctl(b'W'), BackwardKillWord);
        bindings.insert(ctl(b'Y'), Yank);
        bindings.insert(ctl(b'I'), Complete);

        // History
        bindings.insert(ctl(b'N'), NextHistory);
        bindings.insert(ctl(b'P'), PreviousHistory);
        bindings.insert(ctl(b'R'), SearchHistory);

        // Line control
        bindings.insert(ctl(b'J'), AcceptLine);
        bindings.insert(ctl(b'M'), AcceptLine);
        bindings.insert(ctl(b'L'), Redisplay);
        bindings.insert(ctl(b'['), Meta);

        for key in [b'G', b'O', b'Q', b'S', b'U', b'^', b'_'] {
            bindings.insert(ctl(key), Bell);
        }

        bindings
    }

    fn default_meta() -> HashMap<u8, Command> {
        use Command::*;

        let mut bindings = HashMap::new();
        bindings.insert(ctl(b'H'), BackwardKillWord);
        bindings.insert(0x7f, BackwardKillWord);
        bindings.insert(b' ', SetMark);
        bindings.insert(b'.', LastArgument);
        bindings.insert(b'<', FirstHistory);
        bindings.insert(b'>', LastHistory);
        bindings.insert(b'?', ListPossibilities);
        bindings.insert(b'b', BackwardWord);
        bindings.insert(b'd', KillWord);
        bindings.insert(b'f', ForwardWord);
        bindings.insert(b'l', DowncaseWord);
        bindings.insert(b'm', ToggleMetaChars);
        bindings.insert(b'u', UpcaseWord);
        bindings.insert(b'y', Yank);
        bindings.insert(b'w', CopyRegion);
        bindings
    }

    pub fn lookup(&self, key: u8) -> Option<Command> {
        self.primary.get(&key).copied()
    }

    pub fn lookup_meta(&self, key: u8) -> Option<Command> {
        self.meta.get(&key).copied()
    }

    /// Binds `key` in the primary table, returning the previous binding.
    pub fn bind(&mut self, key: u8, command: Command) -> Option<Command> {
        self.primary.insert(key, command)
    }

    /// Binds `key` in the Meta table, returning the previous binding.
    pub fn bind_meta(&mut self, key: u8, command: Command) -> Option<Command> {
        self.meta.insert(key, command)
    }

    /// Removes a primary binding so the key inserts itself again.
    pub fn unbind(&mut self, key: u8) -> Option<Command> {
        self.primary.remove(&key)
    }

    pub fn unbind_meta(&mut self, key: u8) -> Option<Command> {
        self.meta.remove(&key)
    }
}
