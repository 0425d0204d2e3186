//! Signals typed at the keyboard while the terminal is in raw mode.
//!
//! Raw mode turns off the driver's signal generation, so the editor recognises the
//! interrupt, quit and suspend characters itself. The signal is remembered while the
//! read unwinds and re-raised only after the terminal settings have been restored.

use std::fmt;

/// A signal requested by a special character during a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingSignal {
    Interrupt,
    Quit,
    Suspend,
}

impl PendingSignal {
    #[cfg(unix)]
    fn signo(self) -> libc::c_int {
        match self {
            PendingSignal::Interrupt => libc::SIGINT,
            PendingSignal::Quit => libc::SIGQUIT,
            PendingSignal::Suspend => libc::SIGTSTP,
        }
    }

    /// Delivers the signal to the current process.
    #[cfg(unix)]
    pub fn raise(self) {
        log::debug!("re-raising {self}");
        // SAFETY: raise(3) has no memory-safety preconditions.
        let rc = unsafe { libc::raise(self.signo()) };
        if rc != 0 {
            log::warn!("raise({self}) failed: {}", std::io::Error::last_os_error());
        }
    }

    /// Windows consoles have no equivalent, the request is only logged.
    #[cfg(not(unix))]
    pub fn raise(self) {
        log::debug!("{self} requested, no process signal on this platform");
    }
}

impl fmt::Display for PendingSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PendingSignal::Interrupt => "SIGINT",
            PendingSignal::Quit => "SIGQUIT",
            PendingSignal::Suspend => "SIGTSTP",
        };
        f.write_str(name)
    }
}
