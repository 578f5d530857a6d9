//! # User interaction
//!
//! Operations that need something from the user, such as a file name or a yes/no
//! decision, ask through a [`Prompter`]. The controller supplies a prompter bound
//! to the terminal, while tests supply one that replays scripted answers.

use crate::display::Display;
use crate::key::{Key, Keyboard};
use std::path::PathBuf;

/// Defines an interface for soliciting input from a user.
pub trait Prompter {
    /// Displays `prompt` and returns the line of input entered by the user.
    ///
    /// A return value of `None` indicates that the user cancelled the request.
    fn prompt(&mut self, prompt: &str) -> Option<String>;

    /// Asks `question` and returns the first of `answers` chosen by the user,
    /// asking again until one of `answers` is chosen.
    ///
    /// A return value of `None` indicates that the user cancelled the request.
    fn confirm(&mut self, question: &str, answers: &[char]) -> Option<char> {
        loop {
            let value = self.prompt(question)?;
            if let Some(c) = value.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
                if answers.contains(&c) {
                    break Some(c);
                }
            }
        }
    }
}

/// Parses `value` as a positive count, returning `None` if `value` is not a number
/// or is zero.
pub fn parse_count(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

/// Asks for the name of a file to write, confirming before an existing file
/// would be overwritten.
///
/// Declining to overwrite asks for another name. Returns `None` if the user
/// cancels or enters an empty name.
pub fn ask_save_path(prompter: &mut dyn Prompter) -> Option<PathBuf> {
    loop {
        let name = prompter.prompt("save as: ")?;
        let name = name.trim();
        if name.is_empty() {
            break None;
        }
        let path = PathBuf::from(name);
        if !path.exists() {
            break Some(path);
        }
        let question = format!("{name}: file exists, overwrite? (y/n) ");
        if prompter.confirm(&question, &['y', 'n'])? == 'y' {
            break Some(path);
        }
    }
}

/// A prompter that reads keys from the terminal and echoes input on the message
/// row.
pub struct TermPrompter<'a> {
    keyboard: &'a mut Keyboard,
    row: usize,
    cols: usize,
}

impl<'a> TermPrompter<'a> {
    /// Creates a prompter that reads from `keyboard` and echoes on `row` of a
    /// terminal that is `cols` wide.
    pub fn new(keyboard: &'a mut Keyboard, row: usize, cols: usize) -> TermPrompter<'a> {
        TermPrompter {
            keyboard,
            row,
            cols,
        }
    }

    fn show(&self, prompt: &str, value: &str) {
        let text = format!("{prompt}{value}");
        let text = text
            .chars()
            .rev()
            .take(self.cols.saturating_sub(1))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<String>();
        Display::new()
            .set_cursor(self.row, 0)
            .clear_line()
            .write_str(&text)
            .send();
    }

    fn read(&mut self) -> Option<Key> {
        // Read errors are treated as cancellation since nothing further can be
        // read anyway.
        loop {
            match self.keyboard.read() {
                Ok(Key::None) => continue,
                Ok(key) => break Some(key),
                Err(_) => break None,
            }
        }
    }
}

impl Prompter for TermPrompter<'_> {
    fn prompt(&mut self, prompt: &str) -> Option<String> {
        let mut value = String::new();
        loop {
            self.show(prompt, &value);
            match self.read()? {
                Key::Char(c) => value.push(c),
                Key::Control(9) => value.push('\t'),
                Key::Backspace | Key::Control(8) => {
                    let _ = value.pop();
                }
                Key::Control(13) => break Some(value),
                // C-g and ESC
                Key::Control(7) | Key::Control(27) => break None,
                _ => (),
            }
        }
    }

    fn confirm(&mut self, question: &str, answers: &[char]) -> Option<char> {
        loop {
            self.show(question, "");
            match self.read()? {
                Key::Char(c) if answers.contains(&c.to_ascii_lowercase()) => {
                    break Some(c.to_ascii_lowercase());
                }
                Key::Control(7) | Key::Control(27) => break None,
                _ => (),
            }
        }
    }
}

/// A prompter that answers from a fixed script and cancels once the script runs
/// out.
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> ScriptedPrompter {
        ScriptedPrompter {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            asked: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, prompt: &str) -> Option<String> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front()
    }
}
