//! Editor options and terminal geometry.

use std::env;

use crate::terminal::Terminal;

/// Default number of history entries kept.
pub const DEFAULT_HISTORY_SIZE: usize = 15;

/// Default initial capacity of the line buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64;

/// Width assumed when neither the terminal nor `COLUMNS` says otherwise.
pub const DEFAULT_COLS: usize = 80;
/// Height assumed when neither the terminal nor `LINES` says otherwise.
pub const DEFAULT_ROWS: usize = 24;

/// Options for a [`LineEditor`](crate::LineEditor).
///
/// # Examples
///
/// ```
/// use emacsline::EditorConfig;
///
/// let config = EditorConfig::default()
///     .with_history_size(100)
///     .with_meta_chars(true);
/// assert_eq!(config.history_size, 100);
/// assert!(!config.no_echo);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Maximum number of stored history lines (at least 1).
    pub history_size: usize,
    /// Initial capacity of the line buffer in bytes.
    pub buffer_capacity: usize,
    /// Show high-bit bytes as `M-x` and treat them as Meta-prefixed keys.
    pub meta_chars: bool,
    /// Suppress all output except the prompt.
    pub no_echo: bool,
    /// Re-raise interrupt, quit and suspend once the terminal is restored.
    pub deliver_signals: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            meta_chars: false,
            no_echo: false,
            deliver_signals: true,
        }
    }
}

impl EditorConfig {
    /// Sets the history capacity; zero is raised to one.
    pub fn with_history_size(mut self, size: usize) -> Self {
        self.history_size = size.max(1);
        self
    }

    /// Sets the initial line buffer capacity in bytes.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Starts with high-bit bytes shown and dispatched as Meta keys.
    pub fn with_meta_chars(mut self, on: bool) -> Self {
        self.meta_chars = on;
        self
    }

    /// Writes only the prompt, for password entry.
    pub fn with_no_echo(mut self, on: bool) -> Self {
        self.no_echo = on;
        self
    }

    /// Whether typed signals are re-raised after the terminal is restored.
    pub fn with_deliver_signals(mut self, on: bool) -> Self {
        self.deliver_signals = on;
        self
    }
}

/// Terminal geometry used for completion listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub cols: usize,
    pub rows: usize,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

impl ScreenSize {
    /// Asks the terminal first, then `COLUMNS`/`LINES`, then falls back to 80x24.
    pub fn resolve<T: Terminal>(terminal: &mut T) -> Self {
        let term = env::var("TERM").unwrap_or_else(|_| "dumb".to_owned());

        if let Some((cols, rows)) = terminal.window_size() {
            if cols > 0 && rows > 0 {
                log::debug!("terminal {term:?} reports {cols}x{rows}");
                return Self {
                    cols: usize::from(cols),
                    rows: usize::from(rows),
                };
            }
        }

        let size = Self::from_env_values(env::var("COLUMNS").ok(), env::var("LINES").ok());
        log::debug!("terminal {term:?} size {}x{} from environment", size.cols, size.rows);
        size
    }

    fn from_env_values(cols: Option<String>, rows: Option<String>) -> Self {
        let parse = |value: Option<String>| {
            value
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&n| n > 0)
        };
        match (parse(cols), parse(rows)) {
            (Some(cols), Some(rows)) => Self { cols, rows },
            _ => Self::default(),
        }
    }
}
