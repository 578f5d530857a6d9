//! Editing environment.
//!
//! The environment gathers every piece of mutable editor state so that operations
//! receive all of it explicitly through a single reference.

use crate::buffer::Buffer;
use crate::clip::{Clipboard, Scope};
use crate::config::Configuration;
use crate::recorder::Recorder;
use crate::ring::BufferRing;
use crate::search::Pattern;
use crate::viewport::Window;

pub struct Environment {
    pub ring: BufferRing,
    pub clipboard: Clipboard,
    pub recorder: Recorder,
    pub window: Window,

    /// Pattern from the most recent search, used when searching again.
    pub last_pattern: Option<Box<dyn Pattern>>,
}

impl Environment {
    /// Creates an environment whose ring holds `buffers` in the given order, with
    /// the first buffer current.
    ///
    /// An empty buffer is created if `buffers` is empty.
    pub fn new(config: &Configuration, window: Window, buffers: Vec<Buffer>) -> Environment {
        let mut buffers = buffers.into_iter();
        let mut ring = BufferRing::new(buffers.next().unwrap_or_default());
        for buffer in buffers {
            ring.open(buffer);
        }
        ring.next();

        let scope = if config.settings.clip_global {
            Scope::Global
        } else {
            Scope::Local
        };
        Environment {
            ring,
            clipboard: Clipboard::new(scope),
            recorder: Recorder::new(config.settings.macro_size),
            window,
            last_pattern: None,
        }
    }

    /// Returns the current buffer.
    pub fn buffer(&self) -> &Buffer {
        self.ring.current()
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.ring.current_mut()
    }

    /// Changes the window size and fits the current buffer into it. Other buffers
    /// are fitted when they become current.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.window = Window::new(rows, cols, self.window.tab);
        let win = self.window;
        self.buffer_mut().fit(&win);
    }
}
