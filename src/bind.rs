//! Key bindings.
use crate::error::{Error, Result};
use crate::key::{self, Key, KeyMap};
use crate::op::{self, OpFn, OpMap};
use std::collections::HashMap;

/// Map of [`Key`]s to names of editing operations.
pub type BindMap = HashMap<Key, &'static str>;

/// A mapping of [`Key`]s to editing functions.
pub struct Bindings {
    key_map: KeyMap,
    op_map: OpMap,
    bind_map: BindMap,
}

impl Bindings {
    /// Creates the default key bindings.
    pub fn new() -> Bindings {
        let mut this = Bindings {
            key_map: key::init_key_map(),
            op_map: op::init_op_map(),
            bind_map: BindMap::new(),
        };

        for (key_name, op) in Self::DEFAULT_BINDINGS {
            this.bind(key_name, op)
                .unwrap_or_else(|e| panic!("{e}: default bindings failed"));
        }
        this
    }

    /// Binds the key named `key_name` to the editing operation `op`.
    ///
    /// A successful bind will override an existing binding of the same key. Any
    /// single character is also accepted as a key name.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if either of `key_name` or `op` do not match the name of
    /// known keys or editing operations, respectively.
    pub fn bind(&mut self, key_name: &str, op: &str) -> Result<()> {
        let key = self.to_key(key_name)?;
        let (&op, _) = self
            .op_map
            .get_key_value(op)
            .ok_or_else(|| Error::invalid_op(op))?;
        self.bind_map.insert(key, op);
        Ok(())
    }

    fn to_key(&self, name: &str) -> Result<Key> {
        self.key_map
            .get(name)
            .copied()
            .or_else(|| {
                let mut chars = name.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    Some(Key::Char(c))
                } else {
                    None
                }
            })
            .ok_or_else(|| Error::invalid_key(name))
    }

    /// Returns the name of the operation bound to `key` along with its function
    /// pointer, otherwise `None`.
    pub fn find(&self, key: &Key) -> Option<(&'static str, OpFn)> {
        self.bind_map
            .get(key)
            .and_then(|op| self.op_map.get(op).map(|(op_fn, _)| (*op, *op_fn)))
    }

    pub fn bindings(&self) -> &BindMap {
        &self.bind_map
    }

    /// Returns the editing operations in listing order along with their
    /// descriptions.
    pub fn ops(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.op_map.iter().map(|(op, (_, desc))| (*op, *desc))
    }

    /// Default mapping of keys to editing operations.
    const DEFAULT_BINDINGS: [(&'static str, &'static str); 41] = [
        // --- exit ---
        ("C-x", "quit"),
        // --- navigation ---
        ("left", "move-left"),
        ("right", "move-right"),
        ("up", "move-up"),
        ("down", "move-down"),
        ("pg_up", "move-page-up"),
        ("pg_down", "move-page-down"),
        ("C-a", "move-start"),
        ("home", "move-start"),
        ("C-e", "move-end"),
        ("end", "move-end"),
        ("C-t", "align-top"),
        ("C-b", "align-bottom"),
        ("C-z", "scroll-center"),
        ("C-g", "goto-line"),
        // --- insertion and removal ---
        ("ret", "insert-line"),
        ("tab", "insert-tab"),
        ("bs", "remove-before"),
        ("C-h", "remove-before"),
        ("C-d", "remove-after"),
        ("del", "remove-after"),
        ("C-k", "remove-end"),
        // --- clipboard ---
        ("C-c", "copy"),
        ("C-u", "cut"),
        ("C-v", "paste"),
        // --- search ---
        ("C-f", "search"),
        ("C-r", "search-regex"),
        ("C-]", "search-next"),
        // --- files and buffers ---
        ("C-o", "open-file"),
        ("C-s", "save-file"),
        ("C-w", "save-file-as"),
        ("C-n", "next-buffer"),
        ("C-p", "prev-buffer"),
        // --- macros ---
        ("F3", "start-macro"),
        ("F4", "stop-macro"),
        ("F5", "replay-macro"),
        ("C-_", "start-macro"),
        ("C-^", "stop-macro"),
        ("C-\\", "replay-macro"),
        // --- display ---
        ("C-l", "redraw"),
        ("F1", "redraw"),
    ];
}

impl Default for Bindings {
    fn default() -> Bindings {
        Bindings::new()
    }
}
