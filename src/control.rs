//! Main controller.
use crate::bind::Bindings;
use crate::display::Display;
use crate::env::Environment;
use crate::error::Result;
use crate::key::{Key, Keyboard};
use crate::op::{Action, MACRO_OPS};
use crate::term;
use crate::user::{Prompter, TermPrompter};
use tracing::{debug, trace};

/// The primary control point for coordinating user interaction and editing
/// operations.
pub struct Controller {
    env: Environment,
    bindings: Bindings,

    /// Terminal size as of the last check, in (rows, cols).
    term_size: (usize, usize),

    /// Message shown on the message row until the next key is processed.
    echo: Option<String>,
}

impl Controller {
    /// Number of terminal rows not available for text, the status and message rows.
    const RESERVED_ROWS: usize = 2;

    pub fn new(env: Environment, bindings: Bindings) -> Controller {
        let term_size = (env.window.rows + Self::RESERVED_ROWS, env.window.cols);
        Controller {
            env,
            bindings,
            term_size,
            echo: None,
        }
    }

    #[cfg(test)]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Runs the main processing loop.
    ///
    /// This loop orchestrates the entire editing experience, reading [keys](Key)
    /// and calling their corresponding editing functions until instructed to quit.
    pub fn run(&mut self, keyboard: &mut Keyboard) -> Result<()> {
        let mut display = Display::new();
        self.check_size()?;
        display.clear_screen();
        self.paint(&mut display);

        loop {
            let key = keyboard.read()?;
            if key == Key::None {
                // Nothing read while waiting, so a good time to notice a change in
                // terminal size.
                if self.check_size()? {
                    display.clear_screen();
                    self.paint(&mut display);
                }
            } else {
                self.echo = None;
                let win = self.env.window;
                let mut prompter = TermPrompter::new(keyboard, win.rows + 1, win.cols);
                match self.process(key, &mut prompter) {
                    Some(Action::Quit) => break,
                    Some(Action::Redraw) => {
                        display.clear_screen();
                    }
                    Some(Action::Echo(text)) => self.echo = Some(text),
                    _ => (),
                }
                self.paint(&mut display);
            }
        }
        Ok(())
    }

    /// Processes a key read from the user, replaying a recorded macro if that is
    /// what the key calls for.
    ///
    /// Returns the action that remains for the caller to carry out.
    pub fn process(&mut self, key: Key, prompter: &mut dyn Prompter) -> Option<Action> {
        match self.dispatch(key, false, prompter) {
            Some(Action::Replay(keys)) => {
                let mut last = None;
                for key in keys {
                    match self.dispatch(key, true, prompter) {
                        Some(Action::Quit) => return Some(Action::Quit),
                        Some(Action::Replay(_)) => (),
                        Some(action) => last = Some(action),
                        None => (),
                    }
                }
                last
            }
            action => action,
        }
    }

    /// Dispatches `key` to its bound operation, or inserts it literally if unbound
    /// and printable.
    ///
    /// A `synthetic` key comes from a replayed macro, so it is never recorded and
    /// can never trigger the macro operations.
    fn dispatch(&mut self, key: Key, synthetic: bool, prompter: &mut dyn Prompter) -> Option<Action> {
        if !synthetic {
            self.env.recorder.record(key);
        }
        match self.bindings.find(&key) {
            Some((op, _)) if synthetic && MACRO_OPS.contains(&op) => {
                debug!(op, "macro operation ignored during replay");
                None
            }
            Some((op, op_fn)) => {
                trace!(%key, op, "dispatch");
                op_fn(&mut self.env, prompter)
            }
            None => match key {
                Key::Char(c) if c >= ' ' => {
                    let tab = self.env.window.tab;
                    self.env.buffer_mut().insert_char(c, tab);
                    None
                }
                _ => Action::echo(&format!("{key}: undefined key")),
            },
        }
    }

    /// Resizes the window if the terminal size changed, returning `true` if so.
    fn check_size(&mut self) -> Result<bool> {
        let size = term::size()?;
        if size != self.term_size {
            debug!(rows = size.0, cols = size.1, "terminal resized");
            self.term_size = size;
            self.env
                .resize(size.0.saturating_sub(Self::RESERVED_ROWS), size.1);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn paint(&self, display: &mut Display) {
        display
            .paint(self.env.buffer(), &self.env.window, self.echo.as_deref())
            .send();
    }
}
