//! Small embeddable line editor with Emacs key bindings.
//!
//! This library reads one edited line at a time from any device that implements the
//! [`Terminal`] trait. The editing core never touches a file descriptor itself, so it
//! runs unchanged against a Unix tty, a Windows console or scripted input.
//!
//! # Features
//!
//! - **Emacs editing**: character, word and line motion, kill and yank, transpose,
//!   case changes, mark and region
//! - **Repeat counts**: `ESC` followed by digits multiplies the next command
//! - **Command history**: bounded, with `^`-anchored or substring search (`C-R`)
//! - **Completion**: pluggable [`Completer`], with a filesystem default
//! - **Batched output**: one write per keystroke
//! - **Signals done right**: `^C`, `^\` and `^Z` are re-raised only after the
//!   terminal has been restored
//! - **Zero global state**: every editor owns its history, yank buffer and key tables
//!
//! # Quick Start
//!
//! ```no_run
//! use emacsline::{terminals::StdioTerminal, LineEditor};
//!
//! let mut editor = LineEditor::new(1024, 50);  // buffer size, history size
//! let mut terminal = StdioTerminal::new();
//!
//! while let Some(line) = editor.read_line(&mut terminal, "> ")? {
//!     if line == "exit" {
//!         break;
//!     }
//!     println!("You typed: {line}");
//! }
//! # Ok::<(), emacsline::Error>(())
//! ```
//!
//! # Architecture
//!
//! - [`LineEditor`]: the session object; runs the read loop and owns all state
//! - [`LineBuffer`]: the bytes being edited, with point and mark
//! - [`History`]: bounded command history with search
//! - [`Screen`]: output batching and the visible form of control bytes
//! - [`Keymap`]: the primary and Meta key tables
//!
//! All I/O goes through [`Terminal`]. [`terminals::ScriptedTerminal`] replays canned
//! input, which is how the test suite drives whole editing sessions.

use std::io;

mod commands;
pub mod complete;
pub mod config;
pub mod editor;
pub mod filename;
pub mod history;
pub mod keymap;
pub mod line;
pub mod screen;
pub mod signal;
pub mod terminal;
pub mod terminals;

pub use complete::{Completer, Completion, FnCompleter, WordListCompleter};
pub use config::{EditorConfig, ScreenSize};
pub use editor::{LineEditor, Status};
pub use filename::FilenameCompleter;
pub use history::{Direction, History};
pub use keymap::{Command, Keymap};
pub use line::LineBuffer;
pub use screen::Screen;
pub use signal::PendingSignal;
pub use terminal::{SpecialChars, Terminal};

/// Error type for emacsline operations.
///
/// Editing mishaps (nothing to complete, history exhausted, failed search) are not
/// errors; they ring the bell. Only device failures surface here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading from or writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Querying or changing the terminal settings failed.
    #[error("{op} failed: {source}")]
    Terminal {
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Result type for emacsline operations.
pub type Result<T> = std::result::Result<T, Error>;
