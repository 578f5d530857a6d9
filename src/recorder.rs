//! Keystroke macro recording.
//!
//! While recording, every dispatched key is appended to a bounded log. Keys that
//! arrive after the log reaches capacity are quietly dropped.

use crate::key::Key;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum State {
    Idle,
    Recording,
}

pub struct Recorder {
    state: State,
    keys: Vec<Key>,
    capacity: usize,

    /// Indicates whether the most recently dispatched key was appended to the log,
    /// which decides whether the key that triggered a stop can be discarded.
    appended: bool,
}

impl Recorder {
    /// Default capacity of the log.
    pub const DEFAULT_CAPACITY: usize = 1_024;

    pub fn new(capacity: usize) -> Recorder {
        Recorder {
            state: State::Idle,
            keys: Vec::new(),
            capacity,
            appended: false,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == State::Recording
    }

    /// Returns the recorded keys.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Appends `key` to the log if recording and the log has room.
    pub fn record(&mut self, key: Key) {
        self.appended = self.is_recording() && self.keys.len() < self.capacity;
        if self.appended {
            self.keys.push(key);
        }
    }

    /// Clears the log and starts recording, returning `false` if already recording.
    pub fn start(&mut self) -> bool {
        if self.is_recording() {
            false
        } else {
            self.keys.clear();
            self.appended = false;
            self.state = State::Recording;
            true
        }
    }

    /// Stops recording and freezes the log, returning `false` if not recording.
    ///
    /// The key that triggered the stop has already been recorded by the time this
    /// is called, so it is removed from the log.
    pub fn stop(&mut self) -> bool {
        if self.is_recording() {
            self.discard_last();
            self.state = State::Idle;
            true
        } else {
            false
        }
    }

    /// Removes the most recently recorded key, but only if it was actually
    /// appended.
    pub fn discard_last(&mut self) {
        if self.appended {
            let _ = self.keys.pop();
            self.appended = false;
        }
    }
}
