//! Viewport and scroll bookkeeping.
//!
//! A viewport decomposes the absolute row of the cursor into the row within the
//! visible window (`y`) and the number of document rows scrolled past the top of
//! the window (`offset`), such that `y + offset` is always the absolute row.

use crate::column::DEFAULT_TAB_WIDTH;

/// Geometry of the window through which a buffer is viewed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Window {
    /// Number of rows available for text.
    pub rows: usize,

    /// Number of columns available for text.
    pub cols: usize,

    /// Display width of a tab character.
    pub tab: usize,
}

impl Window {
    pub fn new(rows: usize, cols: usize, tab: usize) -> Window {
        Window {
            rows: rows.max(1),
            cols: cols.max(1),
            tab,
        }
    }
}

impl Default for Window {
    fn default() -> Window {
        Window::new(22, 80, DEFAULT_TAB_WIDTH)
    }
}

#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Viewport {
    pub y: usize,
    pub offset: usize,
}

impl Viewport {
    pub fn new() -> Viewport {
        Viewport::default()
    }

    /// Returns the absolute document row of the cursor.
    pub fn row(&self) -> usize {
        self.y + self.offset
    }

    /// Moves the cursor one row down in a window of `rows` rows, scrolling only
    /// when the cursor is already on the bottom row.
    pub fn incr_y(&mut self, rows: usize) {
        if self.y + 1 < rows {
            self.y += 1;
        } else {
            self.offset += 1;
        }
    }

    /// Moves the cursor one row up, scrolling only when the cursor is already on
    /// the top row.
    pub fn decr_y(&mut self) {
        if self.y > 0 {
            self.y -= 1;
        } else {
            self.offset = self.offset.saturating_sub(1);
        }
    }

    /// Scrolls so the cursor row sits at the vertical midpoint of the window,
    /// stopping early if the window cannot scroll back any further.
    pub fn center(&mut self, rows: usize) {
        let middle = rows.saturating_sub(1) / 2;
        while self.y > middle {
            self.decr_y();
            self.offset += 1;
        }
        while self.y < middle && self.offset > 0 {
            self.incr_y(rows);
            self.offset -= 1;
        }
    }

    /// Scrolls so the cursor row becomes the top row of the window.
    pub fn align_top(&mut self) {
        while self.y > 0 {
            self.decr_y();
            self.offset += 1;
        }
    }

    /// Scrolls the cursor row toward the bottom of the window for as long as
    /// there are rows scrolled past the top.
    pub fn align_bottom(&mut self, rows: usize) {
        while self.y + 1 < rows && self.offset > 0 {
            self.incr_y(rows);
            self.offset -= 1;
        }
    }

    /// Fits the viewport into a window of `rows` rows after a resize, preserving
    /// the absolute row.
    pub fn fit(&mut self, rows: usize) {
        if rows > 0 && self.y >= rows {
            self.offset += self.y - (rows - 1);
            self.y = rows - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_is_edge_triggered() {
        let mut view = Viewport::new();
        for _ in 0..4 {
            view.incr_y(5);
        }
        assert_eq!(view, Viewport { y: 4, offset: 0 });

        // Bottom edge scrolls instead of moving.
        view.incr_y(5);
        assert_eq!(view, Viewport { y: 4, offset: 1 });

        // Interior movement does not scroll.
        view.decr_y();
        assert_eq!(view, Viewport { y: 3, offset: 1 });
    }

    #[test]
    fn top_edge_scrolls_back() {
        let mut view = Viewport { y: 0, offset: 3 };
        view.decr_y();
        assert_eq!(view, Viewport { y: 0, offset: 2 });
    }

    #[test]
    fn center_preserves_row() {
        let mut view = Viewport { y: 9, offset: 20 };
        view.center(11);
        assert_eq!(view, Viewport { y: 5, offset: 24 });
        assert_eq!(view.row(), 29);

        let mut view = Viewport { y: 1, offset: 20 };
        view.center(11);
        assert_eq!(view, Viewport { y: 5, offset: 16 });
    }

    #[test]
    fn center_stops_at_top_of_document() {
        let mut view = Viewport { y: 1, offset: 2 };
        view.center(11);
        assert_eq!(view, Viewport { y: 3, offset: 0 });
    }

    #[test]
    fn align_top_and_bottom() {
        let mut view = Viewport { y: 3, offset: 2 };
        view.align_top();
        assert_eq!(view, Viewport { y: 0, offset: 5 });
        view.align_bottom(4);
        assert_eq!(view, Viewport { y: 3, offset: 2 });
    }

    #[test]
    fn fit_after_shrink() {
        let mut view = Viewport { y: 9, offset: 1 };
        view.fit(5);
        assert_eq!(view, Viewport { y: 4, offset: 6 });
    }
}
