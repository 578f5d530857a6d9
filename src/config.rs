//! Contains everything related to configuration.
//!
//! All default values for configurable aspects of the editor are defined in this
//! module, including *settings* and *key bindings*.
//!
//! At a minimum, [`Configuration::default()`] is sufficient for initializing the
//! editor. However, the normal process is to apply multiple tiers of configuration,
//! all optional, resulting in a final blended configuration.
//!
//! External configuration files are expected to be formatted according to the
//! [TOML specification](https://toml.io).
//!
//! The default method of loading an external configuration file via
//! [`Configuration::load()`] will try to locate files in the following locations in
//! order of precedence:
//!
//! * `$HOME/.jotrc`
//! * `$HOME/.jot/jotrc`
//! * `$HOME/.config/jot/jotrc`

use crate::bind::Bindings;
use crate::column::DEFAULT_TAB_WIDTH;
use crate::error::{Error, Result};
use crate::opt::Options;
use crate::recorder::Recorder;
use crate::sys::{self, AsString};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A configuration representing all aspects of the editing experience.
pub struct Configuration {
    /// A collection of configurable settings that control the behavior of the
    /// editor.
    pub settings: Settings,

    /// A map of keys to editing operations.
    pub bindings: Bindings,
}

pub struct Settings {
    pub tab_size: usize,
    pub macro_size: usize,
    pub clip_global: bool,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ExternalConfiguration {
    settings: Option<ExternalSettings>,
    bindings: Option<HashMap<String, String>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ExternalSettings {
    tab_size: Option<usize>,
    macro_size: Option<usize>,
    clip_global: Option<bool>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
}

impl Settings {
    /// Applies the external settings `ext` on top of `self`.
    fn apply(&mut self, ext: Option<ExternalSettings>) {
        if let Some(ext) = ext {
            self.tab_size = ext.tab_size.unwrap_or(self.tab_size);
            self.macro_size = ext.macro_size.unwrap_or(self.macro_size);
            self.clip_global = ext.clip_global.unwrap_or(self.clip_global);
            self.log_file = ext.log_file.or(self.log_file.take());
            self.log_level = ext.log_level.unwrap_or_else(|| self.log_level.clone());
        }
    }

    /// Applies the relevant settings from `opts` on top of `self`.
    pub fn apply_opts(&mut self, opts: &Options) {
        self.tab_size = opts.tab_size.unwrap_or(self.tab_size);
        if let Some(ref log_file) = opts.log_file {
            self.log_file = Some(PathBuf::from(log_file));
        }
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            tab_size: DEFAULT_TAB_WIDTH,
            macro_size: Recorder::DEFAULT_CAPACITY,
            clip_global: false,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// A collection of resource files to try loading in order of precedence.
    const TRY_FILES: [&str; 3] = [".jotrc", ".jot/jotrc", ".config/jot/jotrc"];

    /// Returns a configuration that is formed by attempting to load a resource file
    /// from well-known locations.
    pub fn load() -> Result<Configuration> {
        let mut config = Configuration::default();
        let root_path = sys::home_dir();
        for try_path in Self::TRY_FILES {
            let path = root_path.join(try_path);
            if path.exists() {
                let ext = Self::read_file(&path)?;
                config.apply(&path, ext)?;
                break;
            }
        }
        Ok(config)
    }

    /// Returns a configuration loaded from the resource file at `path`.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        let path = path.as_ref();
        let mut config = Configuration::default();
        let ext = Self::read_file(path)?;
        config.apply(path, ext)?;
        Ok(config)
    }

    /// Applies the relevant settings from `opts` on top of `self`.
    pub fn apply_opts(&mut self, opts: &Options) {
        self.settings.apply_opts(opts);
    }

    /// Applies the external configuration `ext` on top of `self`.
    fn apply(&mut self, path: &Path, ext: ExternalConfiguration) -> Result<()> {
        self.settings.apply(ext.settings);
        if self.settings.tab_size == 0 {
            return Err(Error::Configuration {
                path: path.as_string(),
                cause: "tab-size must be positive".to_string(),
            });
        }
        if let Some(bindings) = ext.bindings {
            for (key_name, op) in bindings {
                self.bindings.bind(&key_name, &op)?;
            }
        }
        Ok(())
    }

    fn read_file(path: &Path) -> Result<ExternalConfiguration> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(&path.as_string(), e))?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<ExternalConfiguration> {
        toml::from_str::<ExternalConfiguration>(content)
            .map_err(|e| Error::configuration(&path.as_string(), &e))
    }
}

impl Default for Configuration {
    fn default() -> Configuration {
        Configuration {
            settings: Settings::default(),
            bindings: Bindings::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("jotrc");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults() {
        let config = Configuration::default();
        assert_eq!(config.settings.tab_size, 8);
        assert_eq!(config.settings.macro_size, 1_024);
        assert!(!config.settings.clip_global);
        assert!(config.settings.log_file.is_none());
        assert_eq!(config.settings.log_level, "info");
    }

    #[test]
    fn load_settings_and_bindings() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
            [settings]
            tab-size = 4
            macro-size = 16
            clip-global = true
            log-file = "/tmp/jot.log"
            log-level = "debug"

            [bindings]
            "C-q" = "quit"
            "#,
        );
        let config = Configuration::load_file(&path).unwrap();
        assert_eq!(config.settings.tab_size, 4);
        assert_eq!(config.settings.macro_size, 16);
        assert!(config.settings.clip_global);
        assert_eq!(config.settings.log_file, Some(PathBuf::from("/tmp/jot.log")));
        assert_eq!(config.settings.log_level, "debug");
        let (op, _) = config.bindings.find(&Key::Control(17)).unwrap();
        assert_eq!(op, "quit");
    }

    #[test]
    fn unknown_fields_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[settings]\ntab-width = 4\n");
        assert!(matches!(
            Configuration::load_file(&path),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn zero_tab_size_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[settings]\ntab-size = 0\n");
        assert!(matches!(
            Configuration::load_file(&path),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn bad_binding_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[bindings]\n\"C-q\" = \"no-such-op\"\n");
        assert!(matches!(
            Configuration::load_file(&path),
            Err(Error::InvalidOp { .. })
        ));
    }

    #[test]
    fn options_override_settings() {
        let mut config = Configuration::default();
        let opts = Options::parse(["--tab-size", "2", "--log", "jot.log"].map(String::from)).unwrap();
        config.apply_opts(&opts);
        assert_eq!(config.settings.tab_size, 2);
        assert_eq!(config.settings.log_file, Some(PathBuf::from("jot.log")));
    }

    #[test]
    fn missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Configuration::load_file(dir.path().join("nope")),
            Err(Error::Io { .. })
        ));
    }
}
