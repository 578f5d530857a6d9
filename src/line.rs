//! Line storage.
//!
//! A [`Line`] is the unit of text in a [`Document`](crate::document::Document): an
//! ordered sequence of characters without a line terminator. The number of
//! characters in use and the allocated capacity are tracked separately, and
//! capacity grows in amortized steps rather than one character at a time.

use std::fmt::{self, Display, Formatter};

#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Line {
    text: Vec<char>,
}

impl Line {
    /// Capacity of a line when it first grows.
    const MIN_CAPACITY: usize = 16;

    /// Creates an empty line.
    pub fn new() -> Line {
        Line { text: Vec::new() }
    }

    /// Creates a line whose content is a copy of `text`.
    #[cfg(test)]
    pub fn from_text(text: &str) -> Line {
        Line {
            text: text.chars().collect(),
        }
    }

    pub fn from_chars(text: &[char]) -> Line {
        Line {
            text: text.to_vec(),
        }
    }

    /// Returns the number of characters in use.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns the number of characters the line can hold before it must grow.
    pub fn capacity(&self) -> usize {
        self.text.capacity()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.text
    }

    pub fn get(&self, at: usize) -> Option<char> {
        self.text.get(at).copied()
    }

    /// Inserts `c` at index `at`, which is bounded by the length of the line.
    pub fn insert(&mut self, at: usize, c: char) {
        let at = at.min(self.text.len());
        if self.len() == self.capacity() {
            // Doubles capacity when full.
            self.text.reserve_exact(self.capacity().max(Self::MIN_CAPACITY));
        }
        self.text.insert(at, c);
    }

    /// Removes and returns the character at `at`, or `None` if `at` is at or
    /// beyond the end of the line.
    pub fn remove(&mut self, at: usize) -> Option<char> {
        if at < self.text.len() {
            Some(self.text.remove(at))
        } else {
            None
        }
    }

    /// Drops every character from `at` onward.
    pub fn truncate(&mut self, at: usize) {
        self.text.truncate(at);
    }

    /// Splits the line at `at`, leaving `[0, at)` in place and returning a new line
    /// holding `[at, len)`.
    pub fn split_off(&mut self, at: usize) -> Line {
        let at = at.min(self.text.len());
        Line {
            text: self.text.split_off(at),
        }
    }

    /// Appends the content of `other` to the end of this line.
    pub fn append(&mut self, other: &Line) {
        self.text.extend_from_slice(&other.text);
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text.iter().collect::<String>())
    }
}
