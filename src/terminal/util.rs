//! Terminal utilities

use crate::{Pdf2AudioError, Result};
use log::debug;
use nix::libc;
use std::io::{self, Write};
use std::os::unix::io::RawFd;

/// Switch to the alternate screen and hide the cursor
const ENTER_SCREEN: &str = "\x1b[?1049h\x1b[?25l";

/// Show the cursor and return to the main screen
const LEAVE_SCREEN: &str = "\x1b[?25h\x1b[?1049l";

/// Get the terminal size for the given file descriptor
///
/// Falls back to 80x24 when the size can't be queried.
pub fn get_terminal_size(fd: RawFd) -> Result<(u16, u16)> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };

    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 {
        Ok((ws.ws_col, ws.ws_row))
    } else {
        Ok((80, 24))
    }
}

/// Set raw mode on a terminal file descriptor
///
/// Raw mode delivers every keypress immediately, including control
/// characters and escape sequences. Returns the previous attributes.
pub fn set_raw_mode(fd: RawFd) -> Result<libc::termios> {
    let mut original_termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &mut original_termios) } != 0 {
        return Err(Pdf2AudioError::Terminal(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    let mut raw_termios = original_termios;

    unsafe {
        libc::cfmakeraw(&mut raw_termios);
    }
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw_termios) } != 0 {
        return Err(Pdf2AudioError::Terminal(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(original_termios)
}

/// Restore terminal attributes
pub fn restore_termios(fd: RawFd, termios: &libc::termios) {
    unsafe {
        libc::tcsetattr(fd, libc::TCSANOW, termios);
    }
}

/// RAII guard for the terminal
///
/// Puts the terminal in raw mode on the alternate screen and restores both
/// on drop, even when the program exits through an error.
pub struct TermiosGuard {
    fd: RawFd,
    termios: libc::termios,
}

impl TermiosGuard {
    pub fn enter(fd: RawFd) -> Result<Self> {
        let termios = set_raw_mode(fd)?;
        let mut stdout = io::stdout();
        stdout.write_all(ENTER_SCREEN.as_bytes())?;
        stdout.flush()?;
        Ok(Self { fd, termios })
    }
}

impl Drop for TermiosGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(LEAVE_SCREEN.as_bytes());
        let _ = stdout.flush();
        restore_termios(self.fd, &self.termios);
        debug!("Terminal attributes restored");
    }
}
