//! Editing operations.
//!
//! A collection of functions intended to be associated with canonical names of
//! editing operations. These functions serve as the glue between a [`Key`] and its
//! respective action in the context of the editing experience.
//!
//! See [`Bindings`](crate::bind::Bindings) for further details on binding keys at
//! runtime.

use crate::buffer::Buffer;
use crate::env::Environment;
use crate::error::Error;
use crate::key::Key;
use crate::search;
use crate::user::{self, Prompter};
use indexmap::IndexMap;
use regex_lite::Regex;
use std::path::Path;
use tracing::{debug, info, warn};

/// A function type that implements an editing operation.
pub type OpFn = fn(&mut Environment, &mut dyn Prompter) -> Option<Action>;

/// Map of editing operation names to function pointers and descriptions.
pub type OpMap = IndexMap<&'static str, (OpFn, &'static str)>;

/// An action returned by an [`OpFn`] that is meant to be carried out by the
/// controller orchestrating calls to such functions.
#[derive(Debug, Eq, PartialEq)]
pub enum Action {
    Quit,
    Redraw,
    Echo(String),
    Replay(Vec<Key>),
}

impl Action {
    pub fn quit() -> Option<Action> {
        Some(Action::Quit)
    }

    pub fn redraw() -> Option<Action> {
        Some(Action::Redraw)
    }

    pub fn echo<T: ToString + ?Sized>(text: &T) -> Option<Action> {
        Some(Action::Echo(text.to_string()))
    }
}

/// Names of operations that control macro recording, which must never run as
/// part of a replay.
pub const MACRO_OPS: [&str; 3] = ["start-macro", "stop-macro", "replay-macro"];

/// Operation: `quit`
fn quit(env: &mut Environment, prompter: &mut dyn Prompter) -> Option<Action> {
    match env.ring.close_all(prompter) {
        Ok(true) => Action::quit(),
        Ok(false) => None,
        Err(e) => {
            warn!("exit cancelled: {e}");
            Action::echo(&e)
        }
    }
}

/// Operation: `move-left`
fn move_left(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let tab = env.window.tab;
    env.buffer_mut().decr_x(tab);
    None
}

/// Operation: `move-right`
fn move_right(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let win = env.window;
    env.buffer_mut().incr_x(&win);
    None
}

/// Operation: `move-up`
fn move_up(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let win = env.window;
    env.buffer_mut().move_up(&win);
    None
}

/// Operation: `move-down`
fn move_down(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let win = env.window;
    env.buffer_mut().move_down(&win);
    None
}

/// Operation: `move-page-up`
fn move_page_up(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let win = env.window;
    env.buffer_mut().page_backward(&win);
    None
}

/// Operation: `move-page-down`
fn move_page_down(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let win = env.window;
    env.buffer_mut().page_forward(&win);
    None
}

/// Operation: `move-start`
fn move_start(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    env.buffer_mut().move_start();
    None
}

/// Operation: `move-end`
fn move_end(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let tab = env.window.tab;
    env.buffer_mut().move_end(tab);
    None
}

/// Operation: `align-top`
fn align_top(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    env.buffer_mut().align_top();
    None
}

/// Operation: `align-bottom`
fn align_bottom(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let win = env.window;
    env.buffer_mut().align_bottom(&win);
    None
}

/// Operation: `scroll-center`
fn scroll_center(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let win = env.window;
    env.buffer_mut().center(&win);
    None
}

/// Operation: `goto-line`
fn goto_line(env: &mut Environment, prompter: &mut dyn Prompter) -> Option<Action> {
    let value = prompter.prompt("goto line: ")?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<usize>() {
        Ok(line_nbr) => {
            let win = env.window;
            env.buffer_mut()
                .goto_line(line_nbr, &win)
                .err()
                .and_then(|e| Action::echo(&e))
        }
        Err(_) => Action::echo(&format!("{value}: invalid line number")),
    }
}

/// Operation: `insert-line`
fn insert_line(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let win = env.window;
    env.buffer_mut().insert_line(&win);
    None
}

/// Operation: `insert-tab`
fn insert_tab(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let tab = env.window.tab;
    env.buffer_mut().insert_char('\t', tab);
    None
}

/// Operation: `remove-before`
fn remove_before(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let win = env.window;
    env.buffer_mut().remove_before(&win);
    None
}

/// Operation: `remove-after`
fn remove_after(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    env.buffer_mut().remove_after();
    None
}

/// Operation: `remove-end`
fn remove_end(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    env.buffer_mut().remove_end();
    None
}

/// Asks for a count of lines, echoing a complaint if the answer is not a positive
/// number.
fn ask_count(prompter: &mut dyn Prompter, prompt: &str) -> Result<usize, Option<Action>> {
    let Some(value) = prompter.prompt(prompt) else {
        return Err(None);
    };
    user::parse_count(&value).ok_or_else(|| Action::echo(&format!("{}: invalid count", value.trim())))
}

fn lines_message(n: usize, verb: &str) -> String {
    format!("{verb} {n} line{}", if n == 1 { "" } else { "s" })
}

/// Operation: `copy`
fn copy(env: &mut Environment, prompter: &mut dyn Prompter) -> Option<Action> {
    match ask_count(prompter, "copy lines: ") {
        Ok(count) => {
            let n = env.ring.current().copy(count, &mut env.clipboard);
            Action::echo(&lines_message(n, "copied"))
        }
        Err(action) => action,
    }
}

/// Operation: `cut`
fn cut(env: &mut Environment, prompter: &mut dyn Prompter) -> Option<Action> {
    match ask_count(prompter, "cut lines: ") {
        Ok(count) => {
            let win = env.window;
            let n = env.ring.current_mut().cut(count, &mut env.clipboard, &win);
            Action::echo(&lines_message(n, "cut"))
        }
        Err(action) => action,
    }
}

/// Operation: `paste`
fn paste(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    if env.clipboard.is_empty() {
        Action::echo("clipboard empty")
    } else {
        let n = env.ring.current_mut().paste(&env.clipboard);
        Action::echo(&lines_message(n, "pasted"))
    }
}

/// Operation: `search`
fn search(env: &mut Environment, prompter: &mut dyn Prompter) -> Option<Action> {
    let term = prompter.prompt("search: ")?;
    if term.is_empty() {
        None
    } else {
        find(env, search::using_term(&term))
    }
}

/// Operation: `search-regex`
fn search_regex(env: &mut Environment, prompter: &mut dyn Prompter) -> Option<Action> {
    let pattern = prompter.prompt("search regex: ")?;
    if pattern.is_empty() {
        None
    } else {
        match Regex::new(&pattern) {
            Ok(regex) => find(env, search::using_regex(regex)),
            Err(e) => Action::echo(&Error::invalid_regex(&pattern, &e)),
        }
    }
}

fn find(env: &mut Environment, pattern: Box<dyn search::Pattern>) -> Option<Action> {
    let win = env.window;
    let found = env.ring.current_mut().find(pattern.as_ref(), &win);
    debug!(pattern = pattern.pattern(), found, "search");
    env.last_pattern = Some(pattern);
    if found { None } else { Action::echo("not found") }
}

/// Operation: `search-next`
fn search_next(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    let win = env.window;
    match env.last_pattern.as_deref() {
        Some(pattern) => {
            if env.ring.current_mut().find_next(pattern, &win) {
                None
            } else {
                Action::echo("not found")
            }
        }
        None => Action::echo("no previous search"),
    }
}

/// Operation: `open-file`
fn open_file(env: &mut Environment, prompter: &mut dyn Prompter) -> Option<Action> {
    let name = prompter.prompt("open file: ")?;
    let name = name.trim();
    if name.is_empty() {
        return Action::echo("aborted opening");
    }
    let is_new = !Path::new(name).exists();
    match Buffer::load(name) {
        Ok(buffer) => {
            let lines = buffer.doc().len();
            info!(file = name, lines, "opened");
            env.ring.open(buffer);
            if is_new {
                Action::echo(&format!("{name}: new file"))
            } else {
                Action::echo(&format!("{name}: {}", lines_message(lines, "read")))
            }
        }
        Err(e) => {
            warn!("open failed: {e}");
            Action::echo(&e)
        }
    }
}

fn save_to(buffer: &mut Buffer, path: &Path) -> Option<Action> {
    match buffer.save_to(path) {
        Ok(n) => {
            info!(file = %buffer.name(), bytes = n, "saved");
            Action::echo(&format!("wrote {n} bytes"))
        }
        Err(e) => {
            warn!("save failed: {e}");
            Action::echo(&e)
        }
    }
}

/// Operation: `save-file`
fn save_file(env: &mut Environment, prompter: &mut dyn Prompter) -> Option<Action> {
    match env.buffer().path().map(|path| path.to_path_buf()) {
        Some(path) => save_to(env.buffer_mut(), &path),
        None => save_file_as(env, prompter),
    }
}

/// Operation: `save-file-as`
fn save_file_as(env: &mut Environment, prompter: &mut dyn Prompter) -> Option<Action> {
    match user::ask_save_path(prompter) {
        Some(path) => save_to(env.buffer_mut(), &path),
        None => Action::echo("aborted saving"),
    }
}

fn switch_to(env: &mut Environment) -> Option<Action> {
    let win = env.window;
    env.buffer_mut().fit(&win);
    Action::echo(&env.buffer().name())
}

/// Operation: `next-buffer`
fn next_buffer(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    env.ring.next();
    switch_to(env)
}

/// Operation: `prev-buffer`
fn prev_buffer(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    env.ring.prev();
    switch_to(env)
}

/// Operation: `start-macro`
fn start_macro(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    if env.recorder.start() {
        info!("macro recording started");
        Action::echo("recording macro")
    } else {
        Action::echo("already recording")
    }
}

/// Operation: `stop-macro`
fn stop_macro(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    if env.recorder.stop() {
        let n = env.recorder.keys().len();
        info!(keys = n, "macro recording stopped");
        Action::echo(&format!("recorded {n} keys"))
    } else {
        Action::echo("not recording")
    }
}

/// Operation: `replay-macro`
fn replay_macro(env: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    if env.recorder.is_recording() {
        env.recorder.discard_last();
        Action::echo("stop recording before replay")
    } else if env.recorder.keys().is_empty() {
        Action::echo("no macro recorded")
    } else {
        debug!(keys = env.recorder.keys().len(), "macro replay");
        Some(Action::Replay(env.recorder.keys().to_vec()))
    }
}

/// Operation: `redraw`
fn redraw(_: &mut Environment, _: &mut dyn Prompter) -> Option<Action> {
    Action::redraw()
}

/// Returns a map of editing operations in the order they are listed by help.
pub fn init_op_map() -> OpMap {
    let mut op_map = OpMap::new();
    for (op, op_fn, desc) in OP_MAPPINGS {
        op_map.insert(op, (op_fn, desc));
    }
    op_map
}

/// Predefined mapping of editing operations to function pointers.
const OP_MAPPINGS: [(&str, OpFn, &str); 33] = [
    // --- exit ---
    ("quit", quit, "resolve modified buffers and exit"),
    // --- navigation ---
    ("move-left", move_left, "move cursor left one character"),
    ("move-right", move_right, "move cursor right one character"),
    ("move-up", move_up, "move cursor up one line"),
    ("move-down", move_down, "move cursor down one line"),
    ("move-page-up", move_page_up, "move cursor up one page"),
    ("move-page-down", move_page_down, "move cursor down one page"),
    ("move-start", move_start, "move cursor to start of line"),
    ("move-end", move_end, "move cursor to end of line"),
    ("align-top", align_top, "scroll current line to top of window"),
    ("align-bottom", align_bottom, "scroll current line toward bottom of window"),
    ("scroll-center", scroll_center, "scroll current line to center of window"),
    ("goto-line", goto_line, "move cursor to line number"),
    // --- insertion and removal ---
    ("insert-line", insert_line, "split line at cursor"),
    ("insert-tab", insert_tab, "insert tab at cursor"),
    ("remove-before", remove_before, "remove character before cursor"),
    ("remove-after", remove_after, "remove character at cursor"),
    ("remove-end", remove_end, "remove characters from cursor to end of line"),
    // --- clipboard ---
    ("copy", copy, "copy lines to clipboard"),
    ("cut", cut, "cut lines to clipboard"),
    ("paste", paste, "paste clipboard after current line"),
    // --- search ---
    ("search", search, "search for term"),
    ("search-regex", search_regex, "search for regular expression"),
    ("search-next", search_next, "search for next match"),
    // --- files and buffers ---
    ("open-file", open_file, "open file in new buffer"),
    ("save-file", save_file, "save buffer"),
    ("save-file-as", save_file_as, "save buffer under new name"),
    ("next-buffer", next_buffer, "switch to next buffer"),
    ("prev-buffer", prev_buffer, "switch to previous buffer"),
    // --- macros ---
    ("start-macro", start_macro, "start recording macro"),
    ("stop-macro", stop_macro, "stop recording macro"),
    ("replay-macro", replay_macro, "replay recorded macro"),
    // --- display ---
    ("redraw", redraw, "redraw display"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::document::Document;
    use crate::line::Line;
    use crate::user::ScriptedPrompter;
    use crate::viewport::Window;
    use tempfile::TempDir;

    fn env_of(text: &[&str]) -> Environment {
        let doc = Document::from_lines(text.iter().map(|s| Line::from_text(s)));
        let buffer = Buffer::with_document(None, doc);
        Environment::new(&Configuration::default(), Window::new(10, 80, 8), vec![buffer])
    }

    fn run(env: &mut Environment, op: &str, answers: &[&str]) -> Option<Action> {
        let op_map = init_op_map();
        let (op_fn, _) = op_map.get(op).unwrap();
        op_fn(env, &mut ScriptedPrompter::new(answers))
    }

    fn text_of(env: &Environment) -> Vec<String> {
        env.buffer().doc().lines().map(|line| line.to_string()).collect()
    }

    #[test]
    fn op_names_are_unique() {
        assert_eq!(init_op_map().len(), OP_MAPPINGS.len());
        for op in MACRO_OPS {
            assert!(init_op_map().contains_key(op));
        }
    }

    #[test]
    fn copy_rejects_invalid_counts() {
        let mut env = env_of(&["a", "b"]);
        assert_eq!(run(&mut env, "copy", &["0"]), Action::echo("0: invalid count"));
        assert_eq!(run(&mut env, "copy", &["abc"]), Action::echo("abc: invalid count"));
        assert!(env.clipboard.is_empty());

        // Cancelled prompt does nothing at all.
        assert_eq!(run(&mut env, "copy", &[]), None);
    }

    #[test]
    fn cut_and_paste() {
        let mut env = env_of(&["a", "b", "c"]);
        run(&mut env, "move-down", &[]);
        assert_eq!(run(&mut env, "cut", &["5"]), Action::echo("cut 2 lines"));
        assert_eq!(text_of(&env), vec!["a"]);
        assert_eq!(run(&mut env, "paste", &[]), Action::echo("pasted 2 lines"));
        assert_eq!(text_of(&env), vec!["a", "b", "c"]);
    }

    #[test]
    fn paste_from_empty_clipboard() {
        let mut env = env_of(&["a"]);
        assert_eq!(run(&mut env, "paste", &[]), Action::echo("clipboard empty"));
        assert!(!env.buffer().is_modified());
    }

    #[test]
    fn goto_line_reports_range_errors() {
        let mut env = env_of(&["a", "b"]);
        assert_eq!(run(&mut env, "goto-line", &["0"]), Action::echo("line number too small"));
        assert_eq!(run(&mut env, "goto-line", &["3"]), Action::echo("line number too large"));
        assert_eq!(run(&mut env, "goto-line", &["x"]), Action::echo("x: invalid line number"));
        assert_eq!(run(&mut env, "goto-line", &["2"]), None);
        assert_eq!(env.buffer().row(), 1);
    }

    #[test]
    fn search_and_search_next() {
        let mut env = env_of(&["ab", "xab", "c"]);
        assert_eq!(run(&mut env, "search-next", &[]), Action::echo("no previous search"));
        assert_eq!(run(&mut env, "search", &["ab"]), None);
        assert_eq!(env.buffer().row(), 0);
        assert_eq!(run(&mut env, "search-next", &[]), None);
        assert_eq!((env.buffer().row(), env.buffer().lx()), (1, 1));
        assert_eq!(run(&mut env, "search-next", &[]), None);
        assert_eq!((env.buffer().row(), env.buffer().lx()), (0, 0));
        assert_eq!(run(&mut env, "search", &["zz"]), Action::echo("not found"));
        assert_eq!(run(&mut env, "search", &[""]), None);
    }

    #[test]
    fn search_regex_reports_bad_expression() {
        let mut env = env_of(&["abc", "a1"]);
        assert_eq!(run(&mut env, "search-regex", &["[0-9]"]), None);
        assert_eq!((env.buffer().row(), env.buffer().lx()), (1, 1));
        match run(&mut env, "search-regex", &["(unclosed"]) {
            Some(Action::Echo(text)) => assert!(text.starts_with("(unclosed: invalid regular expression")),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn save_file_without_name_asks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let mut env = env_of(&["hello"]);
        assert_eq!(run(&mut env, "save-file", &[""]), Action::echo("aborted saving"));
        assert!(env.buffer().path().is_none());

        assert_eq!(
            run(&mut env, "save-file", &[path.to_str().unwrap()]),
            Action::echo("wrote 6 bytes")
        );
        assert_eq!(env.buffer().path(), Some(path.as_path()));

        // Named now, so no questions asked.
        assert_eq!(run(&mut env, "save-file", &[]), Action::echo("wrote 6 bytes"));
    }

    #[test]
    fn open_file_adds_buffer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "one\ntwo\n").unwrap();
        let name = path.to_str().unwrap();

        let mut env = env_of(&["a"]);
        assert_eq!(run(&mut env, "open-file", &[name]), Action::echo(&format!("{name}: read 2 lines")));
        assert_eq!(env.ring.len(), 2);
        assert_eq!(text_of(&env), vec!["one", "two"]);

        let missing = dir.path().join("missing.txt");
        let missing = missing.to_str().unwrap();
        assert_eq!(run(&mut env, "open-file", &[missing]), Action::echo(&format!("{missing}: new file")));
        assert_eq!(text_of(&env), vec![""]);

        assert_eq!(run(&mut env, "open-file", &[""]), Action::echo("aborted opening"));
        assert_eq!(env.ring.len(), 3);
    }

    #[test]
    fn quit_with_clean_buffers() {
        let mut env = env_of(&["a"]);
        assert_eq!(run(&mut env, "quit", &[]), Action::quit());
    }

    #[test]
    fn quit_cancelled() {
        let mut env = env_of(&["a"]);
        run(&mut env, "remove-after", &[]);
        assert_eq!(run(&mut env, "quit", &["c"]), None);
        assert_eq!(run(&mut env, "quit", &["n"]), Action::quit());
    }

    #[test]
    fn replay_rejected_while_recording() {
        let mut env = env_of(&["a"]);
        assert_eq!(run(&mut env, "replay-macro", &[]), Action::echo("no macro recorded"));
        run(&mut env, "start-macro", &[]);
        assert_eq!(run(&mut env, "start-macro", &[]), Action::echo("already recording"));
        assert_eq!(
            run(&mut env, "replay-macro", &[]),
            Action::echo("stop recording before replay")
        );
    }
}
