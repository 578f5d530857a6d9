//! Terminal initialization and interrogation.
//!
//! This module provides functions to put the terminal in raw mode such that
//! keystrokes can be read without blocking, and to query its current size.

use crate::error::{Error, Result};
use libc::{c_int, termios, winsize};
use libc::{STDIN_FILENO, STDOUT_FILENO, TCSADRAIN, TIOCGWINSZ, VMIN, VTIME};
use std::mem::MaybeUninit;
use std::sync::OnceLock;

/// Puts the terminal into raw mode.
///
/// Raw mode is configured such that reads do not block indefinitely when no bytes
/// are available. In this case, the underlying driver waits `1/10` second before
/// returning with nothing, which gives the controller a chance to notice changes
/// in terminal size.
pub fn init() -> Result<()> {
    let mut term = default_term()?;
    unsafe {
        libc::cfmakeraw(&mut term);
        term.c_cc[VMIN] = 0;
        term.c_cc[VTIME] = 1;
        check_err(libc::tcsetattr(STDIN_FILENO, TCSADRAIN, &term))
    }
}

/// Restores the terminal to its original configuration.
pub fn restore() -> Result<()> {
    let term = default_term()?;
    unsafe { check_err(libc::tcsetattr(STDIN_FILENO, TCSADRAIN, &term)) }
}

/// Returns the size of the terminal as (rows, cols).
///
/// Calls to this function always query the underlying driver, as the terminal size
/// may have changed since the prior request.
pub fn size() -> Result<(usize, usize)> {
    let win = unsafe {
        let mut win = MaybeUninit::<winsize>::uninit();
        check_err(libc::ioctl(STDOUT_FILENO, TIOCGWINSZ, win.as_mut_ptr()))?;
        win.assume_init()
    };
    Ok((win.ws_row as usize, win.ws_col as usize))
}

fn check_err(err: c_int) -> Result<()> {
    if err < 0 { Err(Error::os()) } else { Ok(()) }
}

/// Default terminal configuration, captured once before switching to raw mode.
static DEFAULT_TERM: OnceLock<termios> = OnceLock::new();

fn default_term() -> Result<termios> {
    if let Some(term) = DEFAULT_TERM.get() {
        Ok(*term)
    } else {
        let term = unsafe {
            let mut term = MaybeUninit::<termios>::uninit();
            check_err(libc::tcgetattr(STDIN_FILENO, term.as_mut_ptr()))?;
            term.assume_init()
        };
        Ok(*DEFAULT_TERM.get_or_init(|| term))
    }
}
