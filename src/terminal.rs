//! Terminal device abstraction.
//!
//! The editor never talks to a file descriptor directly. Everything it needs from the
//! device (bytes in, bytes out, raw mode, geometry) goes through [`Terminal`], so the
//! same editing core runs against a real tty, a Windows console or a scripted test
//! double.

use crate::Result;

/// The control characters the terminal driver had configured before raw mode.
///
/// Raw mode turns off the driver's own line editing and signal generation, so the
/// editor takes these over itself. A `None` field means the character is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialChars {
    /// Erase one character backwards (usually DEL or `^H`).
    pub erase: Option<u8>,
    /// Kill the whole line (usually `^U`).
    pub kill: Option<u8>,
    /// End of input when typed on an empty line (usually `^D`).
    pub eof: Option<u8>,
    /// Interrupt (usually `^C`).
    pub interrupt: Option<u8>,
    /// Quit (usually `^\`).
    pub quit: Option<u8>,
    /// Suspend (usually `^Z`).
    pub suspend: Option<u8>,
}

impl Default for SpecialChars {
    fn default() -> Self {
        Self {
            erase: Some(0x7f),
            kill: Some(0x15),
            eof: Some(0x04),
            interrupt: Some(0x03),
            quit: Some(0x1c),
            suspend: Some(0x1a),
        }
    }
}

impl SpecialChars {
    /// No special characters at all; every byte goes to the key tables.
    pub const fn none() -> Self {
        Self {
            erase: None,
            kill: None,
            eof: None,
            interrupt: None,
            quit: None,
            suspend: None,
        }
    }
}

/// Terminal abstraction that enables platform-agnostic line editing.
///
/// Implement this trait to use the editor with any I/O system: standard terminals,
/// serial lines, pseudo-terminals or scripted input.
///
/// # Example
///
/// ```
/// use emacsline::{Result, SpecialChars, Terminal};
///
/// struct Loopback {
///     input: Vec<u8>,
///     output: Vec<u8>,
/// }
///
/// impl Terminal for Loopback {
///     fn read_byte(&mut self) -> Result<Option<u8>> {
///         Ok(if self.input.is_empty() { None } else { Some(self.input.remove(0)) })
///     }
///
///     fn write(&mut self, data: &[u8]) -> Result<()> {
///         self.output.extend_from_slice(data);
///         Ok(())
///     }
///
/// #   fn flush(&mut self) -> Result<()> { Ok(()) }
/// #   fn is_interactive(&self) -> bool { true }
/// #   fn enter_raw_mode(&mut self) -> Result<SpecialChars> { Ok(SpecialChars::default()) }
/// #   fn exit_raw_mode(&mut self) -> Result<()> { Ok(()) }
///     // ... implement the remaining methods
/// }
/// ```
pub trait Terminal {
    /// Reads a single byte, blocking until one is available.
    ///
    /// Returns `Ok(None)` once the input stream is closed.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Writes raw bytes to the output.
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Flushes any output buffered below the editor.
    fn flush(&mut self) -> Result<()>;

    /// Returns `true` when input comes from an interactive terminal.
    ///
    /// When this is `false` the editor never touches terminal modes and reads plain
    /// newline-terminated lines.
    fn is_interactive(&self) -> bool;

    /// Saves the current terminal settings and switches to raw mode.
    ///
    /// Raw mode means: no echo, no canonical line assembly, no signal generation,
    /// blocking reads of at least one byte. Returns the special characters that were
    /// configured before the switch.
    fn enter_raw_mode(&mut self) -> Result<SpecialChars>;

    /// Restores exactly the settings saved by the last [`enter_raw_mode`](Self::enter_raw_mode).
    fn exit_raw_mode(&mut self) -> Result<()>;

    /// Current window size as `(columns, rows)`, if the device can report it.
    fn window_size(&mut self) -> Option<(u16, u16)> {
        None
    }

    /// Bytes that move the cursor one column to the left.
    fn backspace(&self) -> &[u8] {
        b"\x08"
    }
}
