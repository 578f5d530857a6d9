//! # System functions
//!
//! Convenience wrappers around common system-level operations that take an
//! opinionated stance on how to interpret errors.
use std::env;
use std::path::{Path, PathBuf};

pub trait AsString {
    fn as_string(&self) -> String;
}

impl AsString for PathBuf {
    fn as_string(&self) -> String {
        self.display().to_string()
    }
}

impl AsString for Path {
    fn as_string(&self) -> String {
        self.display().to_string()
    }
}

/// Returns the `HOME` path as derived from the environment, or `"."` if `HOME`
/// is not set.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns a shortened form of `path` for display, replacing a leading `HOME`
/// directory with `"~"`.
pub fn pretty_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    match path.strip_prefix(home_dir()) {
        Ok(suffix) if !suffix.as_os_str().is_empty() && path.is_absolute() => {
            format!("~/{}", suffix.as_string())
        }
        _ => path.as_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_path_shortens_home() {
        let path = home_dir().join("notes.txt");
        if path.is_absolute() {
            assert_eq!(pretty_path(&path), "~/notes.txt");
        }
        assert_eq!(pretty_path("relative.txt"), "relative.txt");
    }
}
