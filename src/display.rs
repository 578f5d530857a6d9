//! Sends display instructions to terminal.
//!
//! The screen is divided into the text rows of the window, followed by a status
//! row describing the current buffer, and finally a message row used for echoed
//! messages and prompts.

use crate::ansi;
use crate::buffer::Buffer;
use crate::column;
use crate::line::Line;
use crate::viewport::Window;
use std::io::{self, Write};

pub struct Display {
    out: String,
}

impl Display {
    pub fn new() -> Display {
        Display { out: String::new() }
    }

    /// Writes accumulated instructions to the terminal.
    pub fn send(&mut self) {
        if !self.out.is_empty() {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(self.out.as_bytes());
            let _ = stdout.flush();
            self.out.clear();
        }
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) -> &mut Display {
        self.out.push_str(&ansi::set_cursor(row, col));
        self
    }

    pub fn clear_screen(&mut self) -> &mut Display {
        self.out.push_str(ansi::clear_screen());
        self
    }

    pub fn clear_line(&mut self) -> &mut Display {
        self.out.push_str(ansi::clear_line());
        self
    }

    pub fn show_cursor(&mut self, on: bool) -> &mut Display {
        self.out
            .push_str(if on { ansi::show_cursor() } else { ansi::hide_cursor() });
        self
    }

    pub fn reverse_video(&mut self, on: bool) -> &mut Display {
        self.out.push_str(ansi::reverse_video(on));
        self
    }

    pub fn write_str(&mut self, text: &str) -> &mut Display {
        self.out.push_str(text);
        self
    }

    /// Paints the visible portion of `buf`, its status row, and the message row
    /// containing `echo`, then positions the terminal cursor.
    pub fn paint(&mut self, buf: &Buffer, win: &Window, echo: Option<&str>) -> &mut Display {
        self.show_cursor(false);

        // Walk back from the current line to the line shown on the top row.
        let view = buf.viewport();
        let doc = buf.doc();
        let mut id = Some(buf.cur());
        for _ in 0..view.y {
            id = id.and_then(|id| doc.prev(id));
        }

        for row in 0..win.rows {
            self.set_cursor(row, 0).clear_line();
            match id {
                Some(line_id) => {
                    self.write_str(&render_line(doc.line(line_id), win.cols, win.tab));
                    id = doc.next(line_id);
                }
                None => {
                    self.write_str("~");
                }
            }
        }

        self.set_cursor(win.rows, 0)
            .reverse_video(true)
            .write_str(&status_line(buf, win.cols))
            .reverse_video(false);
        self.set_cursor(win.rows + 1, 0).clear_line();
        if let Some(text) = echo {
            self.write_str(&truncate(text, win.cols.saturating_sub(1)));
        }

        let col = buf.x().min(win.cols.saturating_sub(1));
        self.set_cursor(view.y, col).show_cursor(true)
    }
}

impl Default for Display {
    fn default() -> Display {
        Display::new()
    }
}

/// Returns the visible form of `line` in a window `cols` wide.
///
/// Tabs are expanded to `tab` spaces and characters without a glyph are omitted.
/// A line that does not fit is cut short and terminated with `$` in the last
/// column.
pub fn render_line(line: &Line, cols: usize, tab: usize) -> String {
    let total = column::compute_width(line.chars(), line.len(), tab);
    let limit = if total > cols { cols.saturating_sub(1) } else { cols };

    let mut out = String::new();
    let mut width = 0;
    for &c in line.chars() {
        let w = column::char_width(c, tab);
        if width + w > limit {
            break;
        }
        if c == '\t' {
            out.extend(std::iter::repeat_n(' ', w));
        } else if w > 0 {
            out.push(c);
        }
        width += w;
    }
    if total > cols {
        out.extend(std::iter::repeat_n(' ', limit - width));
        out.push('$');
    }
    out
}

/// Returns the status row for `buf`, padded to `cols`.
pub fn status_line(buf: &Buffer, cols: usize) -> String {
    let text = format!(
        "{} {}  line {} col {} ({})",
        if buf.is_modified() { '*' } else { '-' },
        buf.name(),
        buf.row() + 1,
        buf.lx() + 1,
        buf.x() + 1,
    );
    let text = truncate(&text, cols);
    let width = text.chars().count();
    format!("{text}{}", " ".repeat(cols.saturating_sub(width)))
}

fn truncate(text: &str, cols: usize) -> String {
    text.chars().take(cols).collect()
}
