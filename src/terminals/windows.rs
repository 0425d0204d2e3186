//! Windows terminal implementation using the Console API.
//!
//! Raw mode clears line input, echo and processed input on the console input handle
//! and turns on virtual terminal input, so arrow keys arrive as the same `ESC [`
//! sequences a Unix terminal sends.

use crate::terminal::{SpecialChars, Terminal};
use crate::{Error, Result};
use std::io::{self, Write};
use winapi::um::consoleapi::{GetConsoleMode, SetConsoleMode};
use winapi::um::fileapi::ReadFile;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::processenv::GetStdHandle;
use winapi::um::winbase::{STD_INPUT_HANDLE, STD_OUTPUT_HANDLE};
use winapi::um::wincon::{
    GetConsoleScreenBufferInfo, CONSOLE_SCREEN_BUFFER_INFO, ENABLE_ECHO_INPUT,
    ENABLE_LINE_INPUT, ENABLE_PROCESSED_INPUT, ENABLE_VIRTUAL_TERMINAL_INPUT,
};
use winapi::um::winnt::HANDLE;

/// Windows terminal using stdin/stdout with the Console API.
///
/// # Examples
///
/// ```no_run
/// use emacsline::terminals::StdioTerminal;
///
/// let terminal = StdioTerminal::new()?;
/// # Ok::<(), emacsline::Error>(())
/// ```
pub struct StdioTerminal {
    stdin_handle: HANDLE,
    stdout_handle: HANDLE,
    original_mode: Option<u32>,
}

impl StdioTerminal {
    /// Creates a new Windows terminal using stdin/stdout handles.
    ///
    /// # Errors
    ///
    /// Returns an error if the standard handles cannot be obtained.
    pub fn new() -> Result<Self> {
        unsafe {
            let stdin_handle = GetStdHandle(STD_INPUT_HANDLE);
            let stdout_handle = GetStdHandle(STD_OUTPUT_HANDLE);

            if stdin_handle == INVALID_HANDLE_VALUE || stdout_handle == INVALID_HANDLE_VALUE {
                return Err(Error::Terminal {
                    op: "GetStdHandle",
                    source: io::Error::last_os_error(),
                });
            }

            Ok(Self {
                stdin_handle,
                stdout_handle,
                original_mode: None,
            })
        }
    }
}

impl Terminal for StdioTerminal {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        let mut bytes_read: u32 = 0;

        unsafe {
            if ReadFile(
                self.stdin_handle,
                buf.as_mut_ptr() as *mut _,
                1,
                &mut bytes_read,
                std::ptr::null_mut(),
            ) == 0
            {
                return Err(io::Error::last_os_error().into());
            }
        }

        Ok(if bytes_read == 0 { None } else { Some(buf[0]) })
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        io::stdout().write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        let mut mode: u32 = 0;
        unsafe { GetConsoleMode(self.stdin_handle, &mut mode) != 0 }
    }

    fn enter_raw_mode(&mut self) -> Result<SpecialChars> {
        unsafe {
            let mut mode: u32 = 0;
            if GetConsoleMode(self.stdin_handle, &mut mode) == 0 {
                return Err(Error::Terminal {
                    op: "GetConsoleMode",
                    source: io::Error::last_os_error(),
                });
            }

            if self.original_mode.is_none() {
                self.original_mode = Some(mode);
            }

            let new_mode = (mode & !(ENABLE_LINE_INPUT | ENABLE_ECHO_INPUT | ENABLE_PROCESSED_INPUT))
                | ENABLE_VIRTUAL_TERMINAL_INPUT;

            if SetConsoleMode(self.stdin_handle, new_mode) == 0 {
                return Err(Error::Terminal {
                    op: "SetConsoleMode",
                    source: io::Error::last_os_error(),
                });
            }
        }

        // The console has no configurable control characters.
        Ok(SpecialChars {
            erase: Some(0x08),
            quit: None,
            suspend: None,
            ..SpecialChars::default()
        })
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        if let Some(original) = self.original_mode {
            unsafe {
                if SetConsoleMode(self.stdin_handle, original) == 0 {
                    return Err(Error::Terminal {
                        op: "SetConsoleMode",
                        source: io::Error::last_os_error(),
                    });
                }
            }
            self.original_mode = None;
        }

        Ok(())
    }

    fn window_size(&mut self) -> Option<(u16, u16)> {
        unsafe {
            let mut csbi: CONSOLE_SCREEN_BUFFER_INFO = std::mem::zeroed();
            if GetConsoleScreenBufferInfo(self.stdout_handle, &mut csbi) == 0 {
                return None;
            }
            let cols = csbi.srWindow.Right - csbi.srWindow.Left + 1;
            let rows = csbi.srWindow.Bottom - csbi.srWindow.Top + 1;
            if cols > 0 && rows > 0 {
                Some((cols as u16, rows as u16))
            } else {
                None
            }
        }
    }
}

impl Drop for StdioTerminal {
    fn drop(&mut self) {
        let _ = self.exit_raw_mode();
    }
}
