//! Diagnostic logging.
//!
//! Events are written to a log file only when one is configured, since the
//! terminal itself belongs to the editor.

use crate::config::Settings;
use crate::error::{Error, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;

/// Installs the global subscriber if `settings` names a log file, otherwise does
/// nothing.
pub fn init(settings: &Settings) -> Result<()> {
    if let Some(ref log_file) = settings.log_file {
        let level = parse_level(&settings.log_level)?;
        tracing_subscriber::fmt()
            .with_writer(file_appender(log_file)?)
            .with_ansi(false)
            .with_max_level(level)
            .try_init()
            .map_err(Error::logging)?;
    }
    Ok(())
}

fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| Error::logging(format!("{level}: invalid log level")))
}

/// Returns an appender that writes to `path` and never rolls over.
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::logging(format!("{}: not a file", path.display())))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(Error::logging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn levels() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level("WARN").unwrap(), LevelFilter::WARN);
        assert!(matches!(parse_level("loud"), Err(Error::Logging { .. })));
    }

    #[test]
    fn appender_requires_file_name() {
        let dir = TempDir::new().unwrap();
        assert!(file_appender(&dir.path().join("jot.log")).is_ok());
        assert!(file_appender(Path::new("/")).is_err());
    }
}
