//! Application settings.
//!
//! Settings are read from a TOML file with kebab-case keys. Every section
//! and field has a default, so a partial file (or no file at all) is valid:
//!
//! ```toml
//! [navigation]
//! history = "web"
//! base = "/"
//! fallback = "reject"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! max-files = 3
//! directory = "logs"
//! ```

use crate::navigation::{Fallback, HistoryMode};
use anyhow::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_PATH: &str = "Settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub navigation: NavigationSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// A file that exists but cannot be parsed is an error: silently
    /// ignoring it would start the application with a routing setup the
    /// user did not ask for.
    ///
    /// Diagnostics go to stderr because logging is configured from these
    /// settings and is not available yet.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings, Error> {
        let path = path.as_ref();
        if !path.exists() {
            eprintln!(
                "No settings file at {}, using defaults",
                path.display()
            );
            return Ok(Settings::default());
        }

        crate::helpers::load_toml(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        crate::helpers::save_toml(self, path)
    }
}

/// How the navigation controller is set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NavigationSettings {
    /// How locations appear in the host URL.
    pub history: HistoryMode,
    /// Prefix under which the application is served.
    pub base: String,
    /// What to do with paths no route declares.
    pub fallback: Fallback,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        NavigationSettings {
            history: HistoryMode::Web,
            base: "/".to_string(),
            fallback: Fallback::Reject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingSettings {
    pub enabled: bool,
    /// Filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Number of run log files to keep (0 keeps all).
    pub max_files: usize,
    /// Log directory, relative to the working directory.
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            enabled: true,
            level: "info".to_string(),
            max_files: 3,
            directory: PathBuf::from("logs"),
        }
    }
}
