//! A ring of open buffers.
//!
//! Buffers are held in an arena and linked in a circle, with exactly one buffer
//! current at any time. Buffers are added next to the current buffer and are
//! never removed individually.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::user::{self, Prompter};
use tracing::{debug, info};

struct Node {
    buffer: Buffer,
    prev: usize,
    next: usize,
}

pub struct BufferRing {
    nodes: Vec<Node>,
    cur: usize,
}

impl BufferRing {
    /// Creates a ring whose only member is `buffer`.
    pub fn new(buffer: Buffer) -> BufferRing {
        BufferRing {
            nodes: vec![Node {
                buffer,
                prev: 0,
                next: 0,
            }],
            cur: 0,
        }
    }

    /// Inserts `buffer` immediately after the current buffer and makes it current.
    pub fn open(&mut self, buffer: Buffer) {
        let id = self.nodes.len();
        let next = self.nodes[self.cur].next;
        self.nodes.push(Node {
            buffer,
            prev: self.cur,
            next,
        });
        self.nodes[next].prev = id;
        self.nodes[self.cur].next = id;
        self.cur = id;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn current(&self) -> &Buffer {
        &self.nodes[self.cur].buffer
    }

    pub fn current_mut(&mut self) -> &mut Buffer {
        &mut self.nodes[self.cur].buffer
    }

    /// Makes the next buffer in the ring current.
    pub fn next(&mut self) {
        self.cur = self.nodes[self.cur].next;
    }

    /// Makes the previous buffer in the ring current.
    pub fn prev(&mut self) {
        self.cur = self.nodes[self.cur].prev;
    }

    /// Resolves every modified buffer before exit, visiting each buffer once
    /// starting with the current buffer.
    ///
    /// For each modified buffer, the user chooses to save it, discard its changes,
    /// or cancel the exit entirely. A buffer without a file name is saved under a
    /// name solicited from the user.
    ///
    /// Returns `true` if every buffer was resolved, or `false` if the user
    /// cancelled. Either way, the current buffer is restored to where the pass
    /// started if the exit does not proceed.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if a buffer could not be saved, which also cancels the exit.
    pub fn close_all(&mut self, prompter: &mut dyn Prompter) -> Result<bool> {
        let start = self.cur;
        debug!(buffers = self.len(), "resolving buffers before exit");
        let result = self.resolve_all(prompter);
        if !matches!(result, Ok(true)) {
            self.cur = start;
        }
        result
    }

    fn resolve_all(&mut self, prompter: &mut dyn Prompter) -> Result<bool> {
        let start = self.cur;
        loop {
            if self.current().is_modified() && !self.resolve(prompter)? {
                info!(buffer = %self.current().name(), "exit cancelled");
                break Ok(false);
            }
            self.next();
            if self.cur == start {
                break Ok(true);
            }
        }
    }

    fn resolve(&mut self, prompter: &mut dyn Prompter) -> Result<bool> {
        let question = format!("{}: save changes? (y)es, (n)o, (c)ancel ", self.current().name());
        match prompter.confirm(&question, &['y', 'n', 'c']) {
            Some('y') => {
                let path = match self.current().path() {
                    Some(path) => path.to_path_buf(),
                    None => match user::ask_save_path(prompter) {
                        Some(path) => path,
                        None => return Ok(false),
                    },
                };
                let n = self.current_mut().save_to(&path)?;
                info!(buffer = %self.current().name(), bytes = n, "saved on exit");
                Ok(true)
            }
            Some('n') => {
                debug!(buffer = %self.current().name(), "changes discarded");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::line::Line;
    use crate::user::ScriptedPrompter;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn named(name: &str) -> Buffer {
        Buffer::with_document(Some(PathBuf::from(name)), Document::new())
    }

    fn modified(path: PathBuf) -> Buffer {
        let doc = Document::from_lines([Line::from_text("text")]);
        let mut buf = Buffer::with_document(Some(path), doc);
        buf.insert_char('!', 8);
        buf
    }

    #[test]
    fn switching_rotates_in_open_order() {
        let mut ring = BufferRing::new(named("A"));
        ring.open(named("B"));
        ring.open(named("C"));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.current().name(), "C");

        ring.next();
        assert_eq!(ring.current().name(), "A");
        ring.next();
        assert_eq!(ring.current().name(), "B");
        ring.next();
        assert_eq!(ring.current().name(), "C");
        ring.next();
        assert_eq!(ring.current().name(), "A");

        ring.prev();
        assert_eq!(ring.current().name(), "C");
    }

    #[test]
    fn open_inserts_after_current() {
        let mut ring = BufferRing::new(named("A"));
        ring.open(named("B"));
        ring.prev();
        ring.open(named("C"));

        // A -> C -> B -> A
        ring.next();
        assert_eq!(ring.current().name(), "B");
        ring.next();
        assert_eq!(ring.current().name(), "A");
        ring.next();
        assert_eq!(ring.current().name(), "C");
    }

    #[test]
    fn single_buffer_ring() {
        let mut ring = BufferRing::new(named("A"));
        ring.next();
        ring.prev();
        assert_eq!(ring.current().name(), "A");
    }

    #[test]
    fn close_unmodified_needs_no_answers() {
        let mut ring = BufferRing::new(named("A"));
        ring.open(named("B"));
        let mut prompter = ScriptedPrompter::new(&[]);
        assert!(ring.close_all(&mut prompter).unwrap());
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn close_saves_and_discards() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let mut ring = BufferRing::new(modified(a.clone()));
        ring.open(modified(b.clone()));

        // Starts with current buffer, which is b.
        let mut prompter = ScriptedPrompter::new(&["n", "y"]);
        assert!(ring.close_all(&mut prompter).unwrap());
        assert!(!b.exists());
        assert_eq!(std::fs::read_to_string(&a).unwrap(), "!text\n");
    }

    #[test]
    fn cancel_restores_current_buffer() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let mut ring = BufferRing::new(named("A"));
        ring.open(modified(a.clone()));
        ring.open(named("C"));
        ring.open(modified(dir.path().join("d.txt")));
        ring.prev();
        assert_eq!(ring.current().name(), "C");

        // C is clean, d is saved, A is clean, then cancel at a.
        let mut prompter = ScriptedPrompter::new(&["y", "c"]);
        assert!(!ring.close_all(&mut prompter).unwrap());
        assert_eq!(ring.current().name(), "C");
        assert!(dir.path().join("d.txt").exists());
        assert!(!a.exists());
    }

    #[test]
    fn unnamed_buffer_asks_for_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.txt");
        let mut buf = Buffer::new();
        buf.insert_char('x', 8);
        let mut ring = BufferRing::new(buf);

        let mut prompter = ScriptedPrompter::new(&["y", path.to_str().unwrap()]);
        assert!(ring.close_all(&mut prompter).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\n");

        // Empty name cancels the exit.
        let mut buf = Buffer::new();
        buf.insert_char('x', 8);
        let mut ring = BufferRing::new(buf);
        let mut prompter = ScriptedPrompter::new(&["y", ""]);
        assert!(!ring.close_all(&mut prompter).unwrap());
    }

    #[test]
    fn failed_save_cancels_exit() {
        let dir = TempDir::new().unwrap();
        let mut ring = BufferRing::new(named("A"));
        ring.open(modified(dir.path().join("no/such/dir.txt")));
        ring.prev();

        let mut prompter = ScriptedPrompter::new(&["y"]);
        assert!(ring.close_all(&mut prompter).is_err());
        assert_eq!(ring.current().name(), "A");
    }
}
