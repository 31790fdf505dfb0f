//! Display preference store
//!
//! The only thing that outlives a session is whether the board is drawn in
//! dark or light mode. It is kept as a small JSON file, read once at startup
//! and rewritten every time the mode is toggled.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading or writing preferences
#[derive(Error, Debug)]
pub enum Error {
    /// The file could not be read or written
    #[error("preferences file: {0}")]
    Io(#[from] std::io::Error),
    /// The file exists but does not hold valid preferences
    #[error("malformed preferences: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Color scheme of the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

/// Persisted display preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Whether dark mode is on
    pub dark_mode: bool,
}

impl Preferences {
    /// The mode the flag selects
    pub fn mode(self) -> DisplayMode {
        if self.dark_mode {
            DisplayMode::Dark
        } else {
            DisplayMode::Light
        }
    }
}

/// Preferences bound to the file they are stored in
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    preferences: Preferences,
}

impl PreferenceStore {
    /// Reads preferences from `path`
    ///
    /// A missing file means light mode; nothing is written until the first
    /// toggle.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file exists but cannot be read and
    /// `Error::Malformed` if it does not parse.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();

        let preferences = if path.exists() {
            let document = std::fs::read_to_string(&path)?;
            serde_json::from_str(&document)?
        } else {
            tracing::debug!(path = %path.display(), "no preferences file, using defaults");
            Preferences::default()
        };

        Ok(Self { path, preferences })
    }

    /// Where the preferences live
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current preferences
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Current display mode
    pub fn mode(&self) -> DisplayMode {
        self.preferences.mode()
    }

    /// Flips between dark and light mode and writes the result
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be written. The in-memory
    /// mode is flipped either way.
    pub fn toggle(&mut self) -> Result<DisplayMode, Error> {
        self.preferences.dark_mode = !self.preferences.dark_mode;
        self.save()?;
        Ok(self.mode())
    }

    /// Writes the preferences through a temporary file and a rename
    fn save(&self) -> Result<(), Error> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, serde_json::to_string_pretty(&self.preferences)?)?;
        std::fs::rename(temp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), dark_mode = self.preferences.dark_mode, "saved preferences");
        Ok(())
    }
}
