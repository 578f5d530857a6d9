//! Mapping between logical character indexes and display columns.
//!
//! Every character occupies the number of terminal cells reported by its glyph
//! width, except the tab, which always advances by a fixed width regardless of the
//! column where it starts.

use unicode_width::UnicodeWidthChar;

/// Tab width used when none is configured.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Returns the display width of `c`.
///
/// Control characters other than tab have no glyph and therefore occupy no cells.
pub fn char_width(c: char, tab: usize) -> usize {
    if c == '\t' {
        tab
    } else {
        c.width().unwrap_or(0)
    }
}

/// Returns the total display width of the first `count` characters of `text`.
pub fn compute_width(text: &[char], count: usize, tab: usize) -> usize {
    text.iter().take(count).map(|&c| char_width(c, tab)).sum()
}

/// Finds the logical index corresponding to the display column `x`.
///
/// The scan stops at the first character whose inclusive cumulative width exceeds
/// `x`, so a column that falls inside a wide character resolves to the start of
/// that character. Returns the logical index and the display column of that index,
/// or the end of `text` if `x` lies at or beyond its total width.
pub fn align(text: &[char], x: usize, tab: usize) -> (usize, usize) {
    let mut width = 0;
    for (i, &c) in text.iter().enumerate() {
        let next = width + char_width(c, tab);
        if next > x {
            return (i, width);
        }
        width = next;
    }
    (text.len(), width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn tab_has_fixed_width() {
        let text = chars("a\tb");
        assert_eq!(compute_width(&text, 3, 8), 10);
        assert_eq!(compute_width(&text, 2, 8), 9);

        // A tab advances by the same amount wherever it starts.
        let text = chars("abc\t");
        assert_eq!(compute_width(&text, 4, 8), 11);
    }

    #[test]
    fn count_beyond_length_is_bounded() {
        let text = chars("ab");
        assert_eq!(compute_width(&text, 99, 8), 2);
    }

    #[test]
    fn wide_glyphs_count_double() {
        let text = chars("a日b");
        assert_eq!(compute_width(&text, 3, 8), 4);
    }

    #[test]
    fn align_round_trips_width() {
        const TEXT: &str = "a\tbc日本\tz";
        let text = chars(TEXT);
        for i in 0..=text.len() {
            let x = compute_width(&text, i, 8);
            assert_eq!(align(&text, x, 8), (i, x));
        }
    }

    #[test]
    fn align_inside_glyph_snaps_left() {
        let text = chars("a\tb");

        // Columns 1 through 8 are covered by the tab starting at column 1.
        for x in 1..9 {
            assert_eq!(align(&text, x, 8), (1, 1));
        }
        assert_eq!(align(&text, 9, 8), (2, 9));
    }

    #[test]
    fn align_beyond_end() {
        let text = chars("abc");
        assert_eq!(align(&text, 40, 8), (3, 3));
        assert_eq!(align(&[], 5, 8), (0, 0));
    }
}
