// Unix terminal implementation using termios

use crate::terminal::{SpecialChars, Terminal};
use crate::{Error, Result};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;

/// Unix terminal on stdin/stdout, switched to raw mode with termios.
///
/// The settings in effect before [`enter_raw_mode`](Terminal::enter_raw_mode) are
/// kept and put back by [`exit_raw_mode`](Terminal::exit_raw_mode) or on drop.
pub struct StdioTerminal {
    stdin: io::Stdin,
    stdout: io::Stdout,
    original_termios: Option<libc::termios>,
}

impl StdioTerminal {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
            original_termios: None,
        }
    }
}

impl Default for StdioTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a `c_cc` slot to a special character; 0 and `_POSIX_VDISABLE` mean off.
fn cc(termios: &libc::termios, index: usize) -> Option<u8> {
    match termios.c_cc[index] {
        0 | 0xff => None,
        c => Some(c as u8),
    }
}

impl Terminal for StdioTerminal {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.stdin.lock().read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.stdout.write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        // SAFETY: isatty only inspects the descriptor.
        unsafe { libc::isatty(self.stdin.as_raw_fd()) == 1 }
    }

    fn enter_raw_mode(&mut self) -> Result<SpecialChars> {
        let fd = self.stdin.as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();

            if libc::tcgetattr(fd, &mut termios) != 0 {
                return Err(Error::Terminal {
                    op: "tcgetattr",
                    source: io::Error::last_os_error(),
                });
            }

            let specials = SpecialChars {
                erase: cc(&termios, libc::VERASE),
                kill: cc(&termios, libc::VKILL),
                eof: cc(&termios, libc::VEOF),
                interrupt: cc(&termios, libc::VINTR),
                quit: cc(&termios, libc::VQUIT),
                suspend: cc(&termios, libc::VSUSP),
            };

            // Save original settings
            if self.original_termios.is_none() {
                self.original_termios = Some(termios);
            }

            // Character at a time, no echo, no signals, 8-bit clean input
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG);
            termios.c_iflag &= !(libc::ISTRIP | libc::INPCK);

            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSADRAIN, &termios) != 0 {
                return Err(Error::Terminal {
                    op: "tcsetattr",
                    source: io::Error::last_os_error(),
                });
            }

            Ok(specials)
        }
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        if let Some(original) = self.original_termios {
            let fd = self.stdin.as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSADRAIN, &original) != 0 {
                    return Err(Error::Terminal {
                        op: "tcsetattr",
                        source: io::Error::last_os_error(),
                    });
                }
            }

            self.original_termios = None;
        }

        Ok(())
    }

    fn window_size(&mut self) -> Option<(u16, u16)> {
        let fd = self.stdin.as_raw_fd();
        unsafe {
            let mut ws: libc::winsize = std::mem::zeroed();
            if libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) == 0 && ws.ws_col > 0 && ws.ws_row > 0
            {
                Some((ws.ws_col, ws.ws_row))
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
