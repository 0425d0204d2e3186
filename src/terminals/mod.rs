//! Terminal implementations.
//!
//! - **Unix/Linux**: [`StdioTerminal`] using termios
//! - **Windows**: [`StdioTerminal`] using the Windows Console API
//! - **Anywhere**: [`ScriptedTerminal`] replaying canned input, for tests and scripted hosts

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::StdioTerminal;

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::StdioTerminal;

mod scripted;

pub use scripted::ScriptedTerminal;
