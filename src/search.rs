//! Text searching.
//!
//! Searches operate one line at a time over the raw characters of a
//! [`Document`], independent of display width, and wrap from the last line back
//! to the first.

use crate::document::{Document, LineId};
use regex_lite::Regex;
use std::ops::{ControlFlow, Range};

/// Defines an interface for a pattern-matching algorithm.
pub trait Pattern {
    /// Returns the pattern.
    fn pattern(&self) -> &str;

    /// Searches `text` starting at `pos` for the leftmost match, returning the
    /// starting and ending character positions of the match.
    ///
    /// A return value of `None` indicates that `text` contains no match at or
    /// after `pos`.
    fn find(&self, text: &[char], pos: usize) -> Option<Match>;
}

/// Represents a pattern match, where the first value is the _starting_ position
/// and the second value is the _ending_ position.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Match(pub usize, pub usize);

/// The location of a match in a [`Document`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Found {
    pub id: LineId,
    pub pos: usize,
}

/// Returns a pattern-matching algorithm that compares `term` verbatim.
pub fn using_term(term: &str) -> Box<dyn Pattern> {
    Box::new(TermPattern::new(term))
}

/// Returns a pattern-matching algorithm using `regex` as the regular expression.
pub fn using_regex(regex: Regex) -> Box<dyn Pattern> {
    Box::new(RegexPattern::new(regex))
}

/// Finds the first match of `pattern` starting with the line `start`, reporting
/// the lowest matching position within a line and advancing through following
/// lines with wrap-around.
///
/// Returns `None` once the scan arrives back at `start` without a match.
pub fn find(doc: &Document, start: LineId, pattern: &dyn Pattern) -> Option<Found> {
    scan(doc, start, 0, pattern)
}

/// Finds the next match of `pattern` after position `pos` on line `start`,
/// continuing through following lines with wrap-around and finally considering
/// the portion of `start` at or before `pos`.
pub fn find_next(doc: &Document, start: LineId, pos: usize, pattern: &dyn Pattern) -> Option<Found> {
    let from = pos + 1;
    scan(doc, start, from, pattern).or_else(|| {
        if from > 0 {
            pattern
                .find(doc.line(start).chars(), 0)
                .filter(|m| m.0 < from)
                .map(|m| Found { id: start, pos: m.0 })
        } else {
            None
        }
    })
}

fn scan(doc: &Document, start: LineId, from: usize, pattern: &dyn Pattern) -> Option<Found> {
    let wrap = |id| doc.next(id).unwrap_or_else(|| doc.first());

    if let Some(Match(pos, _)) = pattern.find(doc.line(start).chars(), from) {
        return Some(Found { id: start, pos });
    }
    let mut id = wrap(start);
    while id != start {
        if let Some(Match(pos, _)) = pattern.find(doc.line(id).chars(), 0) {
            return Some(Found { id, pos });
        }
        id = wrap(id);
    }
    None
}

/// A term-oriented pattern-matching algorithm that compares characters verbatim.
struct TermPattern {
    /// The term provided during construction.
    term: String,

    /// A patternized version of [`term`](Self::term).
    pattern: Vec<char>,
}

impl TermPattern {
    fn new(term: &str) -> TermPattern {
        TermPattern {
            term: term.to_string(),
            pattern: term.chars().collect(),
        }
    }
}

impl Pattern for TermPattern {
    fn pattern(&self) -> &str {
        &self.term
    }

    fn find(&self, text: &[char], pos: usize) -> Option<Match> {
        let len = self.pattern.len();
        if len > 0 && pos + len <= text.len() {
            text[pos..]
                .windows(len)
                .position(|w| w == self.pattern.as_slice())
                .map(|i| Match(pos + i, pos + i + len))
        } else {
            // Short-circuit when obvious that pattern will not match.
            None
        }
    }
}

/// A regex-oriented pattern-matching algorithm.
///
/// Each line must be converted to a `&str` because the regex library does not
/// operate on character slices.
struct RegexPattern {
    regex: Regex,
}

impl RegexPattern {
    fn new(regex: Regex) -> RegexPattern {
        RegexPattern { regex }
    }
}

impl Pattern for RegexPattern {
    fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    fn find(&self, text: &[char], pos: usize) -> Option<Match> {
        let buf = text.iter().collect::<String>();
        if pos > text.len() {
            return None;
        }

        // Convert starting position into an offset.
        let pos_offset = pos_to_offset(&buf, pos);

        self.regex.find_at(&buf, pos_offset).map(|m| {
            // Convert starting and ending offsets into their respective character
            // positions.
            let Range { start, end } = m.range();
            let start_pos = offset_to_pos(&buf, start);

            // This trick saves us from rescanning entire line to find ending offset.
            let end_pos = start_pos + offset_to_pos(&buf[start..], end - start);
            Match(start_pos, end_pos)
        })
    }
}

/// Returns the byte offset in `buf` corresponding to the `pos`-th character.
///
/// If `buf` contains less than `pos` characters, then `buf.len()` is returned.
fn pos_to_offset(buf: &str, pos: usize) -> usize {
    buf.chars()
        .take(pos)
        .fold(0, |offset, c| offset + c.len_utf8())
}

/// Returns the character position in `buf` corresponding to the byte `offset`,
/// which is expected to be aligned to a UTF-8 code point boundary.
fn offset_to_pos(buf: &str, offset: usize) -> usize {
    let result = buf.chars().try_fold((0, 0), |(ofs, pos), c| {
        if ofs < offset {
            ControlFlow::Continue((ofs + c.len_utf8(), pos + 1))
        } else {
            ControlFlow::Break((ofs, pos))
        }
    });
    match result {
        ControlFlow::Break((_, pos)) => pos,
        ControlFlow::Continue((_, pos)) => pos,
    }
}
