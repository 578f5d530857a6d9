//! A collection of functions that produce ANSI control sequences used in the
//! rendering of terminal output.
//!
//! Of particular note, ANSI sequences related to cursor positioning are `1`-based,
//! so functions in this module that accept *row* and *column* are presumed to be
//! `0`-based and silently add `1` to values.

pub fn clear_screen() -> &'static str {
    "\x1b[2J\x1b[H"
}

pub fn clear_line() -> &'static str {
    "\x1b[K"
}

pub fn show_cursor() -> &'static str {
    "\x1b[?25h"
}

pub fn hide_cursor() -> &'static str {
    "\x1b[?25l"
}

pub fn alt_screen(on: bool) -> &'static str {
    if on { "\x1b[?1049h" } else { "\x1b[?1049l" }
}

pub fn reverse_video(on: bool) -> &'static str {
    if on { "\x1b[7m" } else { "\x1b[0m" }
}

pub fn set_cursor(row: usize, col: usize) -> String {
    format!("\x1b[{};{}H", row + 1, col + 1)
}
