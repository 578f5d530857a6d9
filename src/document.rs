//! A document as a chain of lines.
//!
//! Lines are held in an arena and linked through `prev`/`next` handles rather than
//! pointers. The chain is acyclic, and a document always contains at least one
//! line: an empty document is exactly one empty line.

use crate::error::Result;
use crate::line::Line;
use std::io::{BufRead, Write};

/// A stable handle to a line in a [`Document`].
///
/// Handles stay valid until the line they refer to is removed from the document,
/// after which the slot may be reclaimed by another line.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LineId(usize);

#[derive(Debug)]
struct Node {
    line: Line,
    prev: Option<LineId>,
    next: Option<LineId>,
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    head: LineId,
}

/// The line where a cursor lands after a span of lines has been detached.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Landing {
    /// The line that preceded the span.
    Before(LineId),

    /// The line that followed the span, which is now the first line.
    After(LineId),

    /// A fresh empty line, because the span was the entire document.
    Fresh(LineId),
}

impl Landing {
    pub fn id(&self) -> LineId {
        match *self {
            Landing::Before(id) | Landing::After(id) | Landing::Fresh(id) => id,
        }
    }
}

/// An iterator over the line handles of a [`Document`] in chain order.
pub struct Ids<'a> {
    doc: &'a Document,
    id: Option<LineId>,
}

impl Document {
    /// Approximate number of characters read from a source in a single call, which
    /// also bounds the length of each line including its terminator. Source lines
    /// longer than this are read as successive lines.
    const READ_CHUNK_SIZE: usize = 1_023;

    /// Approximate number of bytes to encode before sending to a writer.
    const WRITE_CHUNK_SIZE: usize = 65_536;

    /// Creates an empty document.
    pub fn new() -> Document {
        Document {
            nodes: vec![Some(Node {
                line: Line::new(),
                prev: None,
                next: None,
            })],
            free: Vec::new(),
            head: LineId(0),
        }
    }

    /// Creates a document from `lines` in order, or an empty document if `lines`
    /// yields nothing.
    pub fn from_lines<I>(lines: I) -> Document
    where
        I: IntoIterator<Item = Line>,
    {
        let mut nodes = Vec::new();
        for (i, line) in lines.into_iter().enumerate() {
            nodes.push(Some(Node {
                line,
                prev: if i > 0 { Some(LineId(i - 1)) } else { None },
                next: None,
            }));
            if i > 0 {
                if let Some(prev) = nodes[i - 1].as_mut() {
                    prev.next = Some(LineId(i));
                }
            }
        }
        if nodes.is_empty() {
            Document::new()
        } else {
            Document {
                nodes,
                free: Vec::new(),
                head: LineId(0),
            }
        }
    }

    /// Reads a document from `reader`, one line per terminated record with the
    /// terminator removed.
    pub fn read<R>(reader: &mut R) -> Result<Document>
    where
        R: BufRead,
    {
        let mut lines = Vec::new();
        let mut record = String::new();
        loop {
            record.clear();
            if reader.read_line(&mut record)? == 0 {
                break;
            }
            let cs = record.chars().collect::<Vec<_>>();
            for chunk in cs.chunks(Self::READ_CHUNK_SIZE) {
                let text = match chunk.split_last() {
                    Some(('\n', text)) => text,
                    _ => chunk,
                };
                lines.push(Line::from_chars(text));
            }
        }
        Ok(Document::from_lines(lines))
    }

    /// Writes every line to `writer` followed by exactly one `\n`, returning the
    /// number of bytes written.
    pub fn write<W>(&self, writer: &mut W) -> Result<usize>
    where
        W: Write,
    {
        let mut bytes = [0; 4];
        let mut chunk = Vec::with_capacity(Self::WRITE_CHUNK_SIZE);
        let mut count = 0;

        for line in self.lines() {
            for c in line.chars() {
                chunk.extend_from_slice(c.encode_utf8(&mut bytes).as_bytes());
            }
            chunk.push(b'\n');
            if chunk.len() >= Self::WRITE_CHUNK_SIZE {
                writer.write_all(&chunk)?;
                count += chunk.len();
                chunk.clear();
            }
        }
        writer.write_all(&chunk)?;
        count += chunk.len();
        writer.flush()?;
        Ok(count)
    }

    pub fn first(&self) -> LineId {
        self.head
    }

    #[cfg(test)]
    pub fn last(&self) -> LineId {
        let mut id = self.head;
        while let Some(next) = self.next(id) {
            id = next;
        }
        id
    }

    /// Returns the number of lines, which is never less than `1`.
    pub fn len(&self) -> usize {
        self.ids().count()
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.node(id).next
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.node(id).prev
    }

    pub fn line(&self, id: LineId) -> &Line {
        &self.node(id).line
    }

    pub fn line_mut(&mut self, id: LineId) -> &mut Line {
        &mut self.node_mut(id).line
    }

    /// Returns the `0`-based row of `id` counting from the first line.
    pub fn row_of(&self, id: LineId) -> usize {
        let mut row = 0;
        let mut id = id;
        while let Some(prev) = self.prev(id) {
            id = prev;
            row += 1;
        }
        row
    }

    pub fn ids(&self) -> Ids<'_> {
        Ids {
            doc: self,
            id: Some(self.head),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.ids().map(|id| self.line(id))
    }

    /// Links `line` into the chain immediately after `id`, returning its handle.
    pub fn insert_after(&mut self, id: LineId, line: Line) -> LineId {
        let next = self.next(id);
        let new_id = self.alloc(Node {
            line,
            prev: Some(id),
            next,
        });
        if let Some(next) = next {
            self.node_mut(next).prev = Some(new_id);
        }
        self.node_mut(id).next = Some(new_id);
        new_id
    }

    /// Splits the line `id` at `at`, linking a new line holding the suffix
    /// immediately after it. The original line is truncated to `at`.
    pub fn split_line(&mut self, id: LineId, at: usize) -> LineId {
        let suffix = self.line_mut(id).split_off(at);
        self.insert_after(id, suffix)
    }

    /// Appends the content of the line following `id` to `id` and removes the
    /// following line, returning `false` if `id` is the last line.
    pub fn merge_next(&mut self, id: LineId) -> bool {
        if let Some(next) = self.next(id) {
            let line = self.unlink(next);
            self.line_mut(id).append(&line);
            true
        } else {
            false
        }
    }

    /// Returns copies of up to `count` lines starting at `id`.
    pub fn copy_span(&self, id: LineId, count: usize) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut cur = Some(id);
        while let Some(id) = cur {
            if lines.len() == count {
                break;
            }
            lines.push(self.line(id).clone());
            cur = self.next(id);
        }
        lines
    }

    /// Removes up to `count` lines starting at `id`, returning the removed lines in
    /// order along with the line where a cursor should land.
    ///
    /// If the span covers the entire document, a fresh empty line is created so the
    /// document is never left without lines.
    pub fn detach_span(&mut self, id: LineId, count: usize) -> (Vec<Line>, Landing) {
        let before = self.prev(id);
        let mut lines = Vec::new();
        let mut cur = Some(id);
        while let Some(id) = cur {
            if lines.len() == count {
                break;
            }
            cur = self.next(id);
            lines.push(self.unlink(id));
        }

        let landing = match (before, cur) {
            (Some(before), _) => Landing::Before(before),
            (None, Some(after)) => Landing::After(after),
            (None, None) => {
                let fresh = self.alloc(Node {
                    line: Line::new(),
                    prev: None,
                    next: None,
                });
                self.head = fresh;
                Landing::Fresh(fresh)
            }
        };
        (lines, landing)
    }

    /// Removes `id` from the chain, relinking its neighbors and reclaiming its slot.
    ///
    /// Callers are responsible for ensuring the document is not left empty.
    fn unlink(&mut self, id: LineId) -> Line {
        let node = self.nodes[id.0]
            .take()
            .unwrap_or_else(|| panic!("{id:?}: line not found"));
        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => {
                if let Some(next) = node.next {
                    self.head = next;
                }
            }
        }
        if let Some(next) = node.next {
            self.node_mut(next).prev = node.prev;
        }
        self.free.push(id.0);
        node.line
    }

    fn alloc(&mut self, node: Node) -> LineId {
        if let Some(i) = self.free.pop() {
            self.nodes[i] = Some(node);
            LineId(i)
        } else {
            self.nodes.push(Some(node));
            LineId(self.nodes.len() - 1)
        }
    }

    fn node(&self, id: LineId) -> &Node {
        self.nodes[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("{id:?}: line not found"))
    }

    fn node_mut(&mut self, id: LineId) -> &mut Node {
        self.nodes[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("{id:?}: line not found"))
    }
}

impl Default for Document {
    fn default() -> Document {
        Document::new()
    }
}

impl Iterator for Ids<'_> {
    type Item = LineId;

    fn next(&mut self) -> Option<LineId> {
        let id = self.id?;
        self.id = self.doc.next(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn doc_of(text: &[&str]) -> Document {
        Document::from_lines(text.iter().map(|s| Line::from_text(s)))
    }

    fn text_of(doc: &Document) -> Vec<String> {
        doc.lines().map(|line| line.to_string()).collect()
    }

    #[test]
    fn empty_document_has_one_line() {
        let doc = Document::from_lines(vec![]);
        assert_eq!(doc.len(), 1);
        assert!(doc.line(doc.first()).is_empty());
        assert_eq!(doc.first(), doc.last());
    }

    #[test]
    fn chain_links_both_ways() {
        let doc = doc_of(&["a", "b", "c"]);
        let ids = doc.ids().collect::<Vec<_>>();
        assert_eq!(ids.len(), 3);
        assert_eq!(doc.prev(ids[0]), None);
        assert_eq!(doc.next(ids[2]), None);
        assert_eq!(doc.next(ids[0]), Some(ids[1]));
        assert_eq!(doc.prev(ids[2]), Some(ids[1]));
        assert_eq!(doc.row_of(ids[2]), 2);
        assert_eq!(doc.last(), ids[2]);
    }

    #[test]
    fn split_then_merge_restores_line() {
        const TEXT: &str = "abc\tdéf";

        for at in 0..=TEXT.chars().count() {
            let mut doc = doc_of(&["x", TEXT, "y"]);
            let id = doc.next(doc.first()).unwrap();
            let new_id = doc.split_line(id, at);
            assert_eq!(doc.len(), 4);
            assert_eq!(doc.line(id).len() + doc.line(new_id).len(), 7);
            assert!(doc.merge_next(id));
            assert_eq!(text_of(&doc), vec!["x", TEXT, "y"]);
        }
    }

    #[test]
    fn merge_last_line_is_noop() {
        let mut doc = doc_of(&["a", "b"]);
        let last = doc.last();
        assert!(!doc.merge_next(last));
        assert_eq!(text_of(&doc), vec!["a", "b"]);
    }

    #[test]
    fn detach_span_lands_before() {
        let mut doc = doc_of(&["a", "b", "c", "d"]);
        let b = doc.next(doc.first()).unwrap();
        let (lines, landing) = doc.detach_span(b, 2);
        assert_eq!(
            lines.iter().map(|l| l.to_string()).collect::<Vec<_>>(),
            vec!["b", "c"]
        );
        assert_eq!(landing, Landing::Before(doc.first()));
        assert_eq!(text_of(&doc), vec!["a", "d"]);
    }

    #[test]
    fn detach_span_at_head_lands_after() {
        let mut doc = doc_of(&["a", "b", "c"]);
        let (lines, landing) = doc.detach_span(doc.first(), 1);
        assert_eq!(lines.len(), 1);
        assert!(matches!(landing, Landing::After(_)));
        assert_eq!(landing.id(), doc.first());
        assert_eq!(text_of(&doc), vec!["b", "c"]);
    }

    #[test]
    fn detach_everything_leaves_fresh_line() {
        let mut doc = doc_of(&["a", "b"]);
        let (lines, landing) = doc.detach_span(doc.first(), 10);
        assert_eq!(lines.len(), 2);
        assert!(matches!(landing, Landing::Fresh(_)));
        assert_eq!(doc.len(), 1);
        assert_eq!(text_of(&doc), vec![""]);
    }

    #[test]
    fn slots_are_reclaimed() {
        let mut doc = doc_of(&["a", "b"]);
        let first = doc.first();
        assert!(doc.merge_next(first));
        let slots = doc.nodes.len();
        let _ = doc.insert_after(first, Line::from_text("c"));
        assert_eq!(doc.nodes.len(), slots);
        assert_eq!(text_of(&doc), vec!["ab", "c"]);
    }

    #[test]
    fn read_strips_terminators() {
        let mut reader = Cursor::new("abc\n\nde\nlast".to_string());
        let doc = Document::read(&mut reader).unwrap();
        assert_eq!(text_of(&doc), vec!["abc", "", "de", "last"]);
    }

    #[test]
    fn read_empty_source() {
        let mut reader = Cursor::new(String::new());
        let doc = Document::read(&mut reader).unwrap();
        assert_eq!(text_of(&doc), vec![""]);
    }

    #[test]
    fn read_splits_long_lines() {
        let text = "x".repeat(Document::READ_CHUNK_SIZE + 5) + "\n";
        let mut reader = Cursor::new(text);
        let doc = Document::read(&mut reader).unwrap();
        let lens = doc.lines().map(|l| l.len()).collect::<Vec<_>>();
        assert_eq!(lens, vec![Document::READ_CHUNK_SIZE, 5]);
    }

    #[test]
    fn write_terminates_every_line() {
        let doc = doc_of(&["ųų!", "", "ab"]);
        let mut writer = Cursor::new(Vec::new());
        let n = doc.write(&mut writer).unwrap();
        let out = writer.into_inner();
        assert_eq!(n, out.len());
        assert_eq!(String::from_utf8(out).unwrap(), "ųų!\n\nab\n");
    }
}
