//! A single-slot clipboard of whole lines.
//!
//! Every copy or cut replaces the entire content of the clipboard. When the
//! _global_ scope is selected, replaced content is also mirrored to the clipboard
//! provided by the OS, though pasting always draws from the local slot.

use crate::line::Line;
use arboard::Clipboard as GlobalClipboard;

pub struct Clipboard {
    lines: Vec<Line>,
    scope: Scope,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Scope {
    Local,
    Global,
}

impl Clipboard {
    pub fn new(scope: Scope) -> Clipboard {
        Clipboard {
            lines: Vec::new(),
            scope,
        }
    }

    /// Replaces the content of the clipboard with `lines`.
    pub fn set_lines(&mut self, lines: Vec<Line>) {
        if self.scope == Scope::Global {
            // OS-specific clipboards behave in different ways, so recommendation
            // is to create new instance prior to each access. Note that operations
            // could fail, possibly because of OS limitations or nuances, so
            // quietly ignore.
            let text = lines.iter().fold(String::new(), |mut text, line| {
                text.push_str(&line.to_string());
                text.push('\n');
                text
            });
            GlobalClipboard::new()
                .and_then(|mut clip| clip.set_text(text))
                .unwrap_or(())
        }
        self.lines = lines;
    }

    /// Returns the lines currently held in the clipboard.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
