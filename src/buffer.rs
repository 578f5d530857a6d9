//! An editing buffer.
//!
//! A buffer owns a [`Document`] along with its own cursor, viewport and
//! modification state. The cursor is tracked in two coordinates: `lx`, the logical
//! index into the current line, and `x`, the display column of that index. Vertical
//! movement treats `x` as authoritative so the visual column sticks across lines of
//! differing content, whereas horizontal editing treats `lx` as authoritative.

use crate::clip::Clipboard;
use crate::column;
use crate::document::{Document, Landing, LineId};
use crate::error::{Error, Result};
use crate::line::Line;
use crate::search::{self, Pattern};
use crate::sys::{self, AsString};
use crate::viewport::{Viewport, Window};
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub struct Buffer {
    /// An optional path if the buffer is associated with a file.
    path: Option<PathBuf>,

    /// Lines of text contained in this buffer.
    doc: Document,

    /// Line on which the cursor resides.
    cur: LineId,

    /// Logical index of the cursor in the current line.
    lx: usize,

    /// Display column of the cursor, which is always the display width of the
    /// first `lx` characters of the current line.
    x: usize,

    /// Position of the cursor in the window.
    view: Viewport,

    /// Indicates that the document changed since it was loaded or last saved.
    modified: bool,
}

/// Reasons a [`goto_line`](Buffer::goto_line) request is rejected.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GotoError {
    TooSmall,
    TooLarge,
}

impl Display for GotoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GotoError::TooSmall => write!(f, "line number too small"),
            GotoError::TooLarge => write!(f, "line number too large"),
        }
    }
}

impl Buffer {
    // Suggested capacity of internal buffers for readers and writers.
    const BUFFER_SIZE: usize = 65_536;

    /// Creates an empty buffer not associated with any file.
    pub fn new() -> Buffer {
        Buffer::with_document(None, Document::new())
    }

    pub fn with_document(path: Option<PathBuf>, doc: Document) -> Buffer {
        let cur = doc.first();
        Buffer {
            path,
            doc,
            cur,
            lx: 0,
            x: 0,
            view: Viewport::new(),
            modified: false,
        }
    }

    /// Creates a buffer associated with `path` by loading its content.
    ///
    /// A `path` that does not exist is treated as a new file, yielding an empty
    /// buffer that remains associated with `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if `path` exists but could not be read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Buffer> {
        let path = path.as_ref();
        let doc = if path.exists() {
            let file = File::open(path).map_err(|e| Error::io(&path.as_string(), e))?;
            let mut reader = BufReader::with_capacity(Self::BUFFER_SIZE, file);
            Document::read(&mut reader).map_err(|e| match e {
                Error::Os { cause } => Error::io(&path.as_string(), cause),
                e => e,
            })?
        } else {
            Document::new()
        };
        Ok(Buffer::with_document(Some(path.to_path_buf()), doc))
    }

    /// Writes the document to `path`, returning the number of bytes written.
    ///
    /// On success, the buffer becomes associated with `path` and is no longer
    /// considered modified. On failure, neither the path nor the modification state
    /// is changed.
    pub fn save_to<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(&path.as_string(), e))?;
        let mut writer = BufWriter::with_capacity(Self::BUFFER_SIZE, file);
        let n = self.doc.write(&mut writer).map_err(|e| match e {
            Error::Os { cause } => Error::io(&path.as_string(), cause),
            e => e,
        })?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(n)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a displayable name for the buffer.
    pub fn name(&self) -> String {
        self.path
            .as_ref()
            .map(sys::pretty_path)
            .unwrap_or_else(|| "<no file>".to_string())
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn cur(&self) -> LineId {
        self.cur
    }

    pub fn cur_line(&self) -> &Line {
        self.doc.line(self.cur)
    }

    pub fn lx(&self) -> usize {
        self.lx
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn viewport(&self) -> Viewport {
        self.view
    }

    /// Returns the absolute `0`-based row of the cursor.
    pub fn row(&self) -> usize {
        self.view.row()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Sets the cursor column to the start of the character at the display column
    /// `x`, resolving to the leftmost character boundary.
    pub fn align_x(&mut self, tab: usize) {
        let (lx, x) = column::align(self.cur_line().chars(), self.x, tab);
        self.lx = lx;
        self.x = x;
    }

    /// Re-derives the cursor after switching lines, snapping to the end of the line
    /// if the cursor lies beyond it.
    pub fn correct_x(&mut self, tab: usize) {
        let line = self.cur_line();
        let end_x = column::compute_width(line.chars(), line.len(), tab);
        if self.lx > line.len() || self.x > end_x {
            self.move_end(tab);
        } else {
            self.align_x(tab);
        }
    }

    /// Moves the cursor right by one character, but no further than the end of the
    /// line or the last column of the window.
    pub fn incr_x(&mut self, win: &Window) {
        if self.lx < self.cur_line().len() && self.x + 1 < win.cols {
            self.step_right(win.tab);
        }
    }

    /// Moves the cursor left by one character, but no further than the start of the
    /// line.
    pub fn decr_x(&mut self, tab: usize) {
        if self.lx > 0 {
            self.lx -= 1;
            let c = self.cur_line().get(self.lx).unwrap_or(' ');
            self.x = self.x.saturating_sub(column::char_width(c, tab));
        }
    }

    pub fn move_start(&mut self) {
        self.lx = 0;
        self.x = 0;
    }

    pub fn move_end(&mut self, tab: usize) {
        let line = self.cur_line();
        let (lx, x) = (line.len(), column::compute_width(line.chars(), line.len(), tab));
        self.lx = lx;
        self.x = x;
    }

    pub fn move_up(&mut self, win: &Window) {
        if let Some(prev) = self.doc.prev(self.cur) {
            self.cur = prev;
            self.view.decr_y();
            self.correct_x(win.tab);
        }
    }

    pub fn move_down(&mut self, win: &Window) {
        if let Some(next) = self.doc.next(self.cur) {
            self.cur = next;
            self.view.incr_y(win.rows);
            self.correct_x(win.tab);
        }
    }

    /// Moves forward by as many as one window of lines.
    pub fn page_forward(&mut self, win: &Window) {
        for _ in 0..win.rows {
            match self.doc.next(self.cur) {
                Some(next) => {
                    self.cur = next;
                    self.view.incr_y(win.rows);
                }
                None => break,
            }
        }
        self.correct_x(win.tab);
    }

    /// Moves backward by as many as one window of lines.
    pub fn page_backward(&mut self, win: &Window) {
        for _ in 0..win.rows {
            match self.doc.prev(self.cur) {
                Some(prev) => {
                    self.cur = prev;
                    self.view.decr_y();
                }
                None => break,
            }
        }
        self.correct_x(win.tab);
    }

    pub fn center(&mut self, win: &Window) {
        self.view.center(win.rows);
    }

    pub fn align_top(&mut self) {
        self.view.align_top();
    }

    pub fn align_bottom(&mut self, win: &Window) {
        self.view.align_bottom(win.rows);
    }

    /// Fits the viewport into `win` after the window changes size.
    pub fn fit(&mut self, win: &Window) {
        self.view.fit(win.rows);
    }

    /// Moves the cursor to the `1`-based line number `line_nbr` and centers it in
    /// the window.
    ///
    /// The walk is relative to the current line, so only the lines between the
    /// current and target lines are visited.
    pub fn goto_line(&mut self, line_nbr: usize, win: &Window) -> std::result::Result<(), GotoError> {
        if line_nbr < 1 {
            return Err(GotoError::TooSmall);
        }
        let target = line_nbr - 1;
        let row = self.view.row();
        let mut id = self.cur;
        if row < target {
            for _ in row..target {
                id = self.doc.next(id).ok_or(GotoError::TooLarge)?;
            }
        } else {
            for _ in target..row {
                id = self.doc.prev(id).ok_or(GotoError::TooSmall)?;
            }
        }
        self.jump(id, target, win);
        self.correct_x(win.tab);
        Ok(())
    }

    /// Inserts `c` at the cursor and advances past it.
    pub fn insert_char(&mut self, c: char, tab: usize) {
        let lx = self.lx;
        self.doc.line_mut(self.cur).insert(lx, c);
        self.step_right(tab);
        self.modified = true;
    }

    /// Splits the current line at the cursor, moving the cursor to the start of
    /// the new line.
    pub fn insert_line(&mut self, win: &Window) {
        self.cur = self.doc.split_line(self.cur, self.lx);
        self.view.incr_y(win.rows);
        self.move_start();
        self.modified = true;
    }

    /// Removes the character before the cursor, or joins the current line onto
    /// the previous line if the cursor is at the start of the line.
    pub fn remove_before(&mut self, win: &Window) {
        if self.lx > 0 {
            self.lx -= 1;
            let lx = self.lx;
            let _ = self.doc.line_mut(self.cur).remove(lx);
            self.x = column::compute_width(self.cur_line().chars(), lx, win.tab);
            self.modified = true;
        } else if let Some(prev) = self.doc.prev(self.cur) {
            let len = self.doc.line(prev).len();
            self.doc.merge_next(prev);
            self.cur = prev;
            self.view.decr_y();
            self.lx = len;
            self.x = column::compute_width(self.cur_line().chars(), len, win.tab);
            self.modified = true;
        }
    }

    /// Removes the character at the cursor, or joins the next line onto the
    /// current line if the cursor is at the end of the line.
    pub fn remove_after(&mut self) {
        let lx = self.lx;
        if self.doc.line_mut(self.cur).remove(lx).is_some() || self.doc.merge_next(self.cur) {
            self.modified = true;
        }
    }

    /// Removes everything from the cursor to the end of the line, or joins the next
    /// line onto the current line if the cursor is already at the end.
    pub fn remove_end(&mut self) {
        if self.lx < self.cur_line().len() {
            let lx = self.lx;
            self.doc.line_mut(self.cur).truncate(lx);
            self.modified = true;
        } else if self.doc.merge_next(self.cur) {
            self.modified = true;
        }
    }

    /// Replaces the content of `clip` with copies of up to `count` lines starting
    /// at the current line, returning the number of lines copied.
    pub fn copy(&self, count: usize, clip: &mut Clipboard) -> usize {
        if count > 0 {
            let lines = self.doc.copy_span(self.cur, count);
            let n = lines.len();
            clip.set_lines(lines);
            n
        } else {
            0
        }
    }

    /// Moves up to `count` lines starting at the current line into `clip`,
    /// returning the number of lines cut.
    ///
    /// The cursor lands on the line preceding the removed lines, or the line
    /// following them if nothing precedes, or a fresh empty line if the document
    /// was emptied.
    pub fn cut(&mut self, count: usize, clip: &mut Clipboard, win: &Window) -> usize {
        if count > 0 {
            let (lines, landing) = self.doc.detach_span(self.cur, count);
            let n = lines.len();
            clip.set_lines(lines);
            self.cur = landing.id();
            if let Landing::Before(_) = landing {
                self.view.decr_y();
            }
            self.correct_x(win.tab);
            self.modified = true;
            n
        } else {
            0
        }
    }

    /// Inserts copies of the lines in `clip` immediately after the current line,
    /// leaving the cursor in place, and returns the number of lines pasted.
    pub fn paste(&mut self, clip: &Clipboard) -> usize {
        let mut id = self.cur;
        for line in clip.lines() {
            id = self.doc.insert_after(id, line.clone());
        }
        let n = clip.lines().len();
        if n > 0 {
            self.modified = true;
        }
        n
    }

    /// Searches for `pattern` starting with the current line and moves the cursor
    /// to the first match, returning `false` if nothing matched.
    pub fn find(&mut self, pattern: &dyn Pattern, win: &Window) -> bool {
        let found = search::find(&self.doc, self.cur, pattern);
        self.land(found, win)
    }

    /// Searches for the next match of `pattern` after the cursor.
    pub fn find_next(&mut self, pattern: &dyn Pattern, win: &Window) -> bool {
        let found = search::find_next(&self.doc, self.cur, self.lx, pattern);
        self.land(found, win)
    }

    fn land(&mut self, found: Option<search::Found>, win: &Window) -> bool {
        if let Some(found) = found {
            let row = self.doc.row_of(found.id);
            self.jump(found.id, row, win);
            self.lx = found.pos;
            self.x = column::compute_width(self.cur_line().chars(), found.pos, win.tab);
            true
        } else {
            false
        }
    }

    /// Makes `id`, located at the absolute `row`, the current line by stepping the
    /// viewport one row at a time, then centers it.
    fn jump(&mut self, id: LineId, row: usize, win: &Window) {
        let cur_row = self.view.row();
        if row > cur_row {
            for _ in cur_row..row {
                self.view.incr_y(win.rows);
            }
        } else {
            for _ in row..cur_row {
                self.view.decr_y();
            }
        }
        self.cur = id;
        self.view.center(win.rows);
    }

    fn step_right(&mut self, tab: usize) {
        if let Some(c) = self.cur_line().get(self.lx) {
            self.x += column::char_width(c, tab);
            self.lx += 1;
        }
    }
}

impl Default for Buffer {
    fn default() -> Buffer {
        Buffer::new()
    }
}
