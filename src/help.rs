//! A collection of functions related to help.

#![allow(unused_must_use, reason = "infallible calls to write!()")]

use crate::bind::{BindMap, Bindings};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Returns a formatted list of editing operations and their descriptions, in the
/// order of the command table.
pub fn ops_content(bindings: &Bindings) -> String {
    const HEADER_OP: &str = "[Operation]";
    const HEADER_DESC: &str = "[Description]";

    // Calculate maximum width of operation names to align output.
    let op_width = bindings
        .ops()
        .map(|(op, _)| op.len())
        .max()
        .unwrap_or(0)
        .max(HEADER_OP.len());

    let mut out = String::new();
    writeln!(out, "{HEADER_OP:<op_width$}   {HEADER_DESC}");
    for (op, desc) in bindings.ops() {
        writeln!(out, "{op:<op_width$}   {desc}");
    }
    out
}

/// Returns a TOML-formatted list of key bindings, sorted by key name, suitable for
/// the `[bindings]` table of a configuration file.
pub fn bindings_content(bindings: &BindMap) -> String {
    let bindings = prepare_bindings(bindings);
    let mut out = String::new();
    writeln!(out, "[bindings]");
    for (key_name, op) in bindings {
        writeln!(out, "'{key_name}' = '{op}'");
    }
    out
}

fn prepare_bindings(bindings: &BindMap) -> BTreeMap<String, &'static str> {
    bindings
        .iter()
        .map(|(key, op)| (key.to_string(), *op))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_in_table_order() {
        let content = ops_content(&Bindings::new());
        let ops = content
            .lines()
            .skip(1)
            .map(|line| line.split_whitespace().next().unwrap_or(""))
            .collect::<Vec<_>>();
        assert_eq!(ops.first(), Some(&"quit"));
        assert_eq!(ops.last(), Some(&"redraw"));
        assert!(content.starts_with("[Operation]"));
    }

    #[test]
    fn bindings_as_toml() {
        let content = bindings_content(Bindings::new().bindings());
        assert!(content.starts_with("[bindings]\n"));
        assert!(content.contains("'C-x' = 'quit'\n"));
        assert!(content.contains("'F5' = 'replay-macro'\n"));

        // Output is acceptable as configuration.
        let table = content.parse::<toml::Table>().unwrap();
        assert!(table.contains_key("bindings"));
    }
}
