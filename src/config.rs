//! Store configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use std::path::Path;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::history::DEFAULT_UNDO_LIMIT;
use crate::hosts::HostFilterConfig;
use crate::model::DEFAULT_FOLDER_COLOR;

/// Number of history entries shown in the "top visited" list.
pub const DEFAULT_TOP_VISITED_LIMIT: usize = 20;

const FOLDER_PALETTE: &[&str] = &[
    "#ffcdd2", "#f8bbd0", "#e1bee7", "#d1c4e9", "#c5cae9", "#bbdefb", "#b3e5fc", "#b2ebf2",
    "#b2dfdb", "#c8e6c9", "#dcedc8", "#f0f4c3", "#fff9c4", "#ffecb3", "#ffe0b2", "#ffccbc",
    "#d7ccc8", "#cfd8dc",
];

/// Tunables for a [`Store`](crate::Store).
///
/// # Example
///
/// ```toml
/// undo_limit = 64
/// default_folder_color = "#ffffff"
///
/// [host_filters]
/// translation_hosts = ["www.deepl.com"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of undo steps kept. Oldest steps are dropped first.
    pub undo_limit: usize,
    /// Colour of folders created without an explicit colour.
    pub default_folder_color: String,
    /// Colours drawn from when a folder gets a random colour.
    pub folder_palette: Vec<String>,
    pub top_visited_limit: usize,
    pub host_filters: HostFilterConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
            default_folder_color: DEFAULT_FOLDER_COLOR.to_owned(),
            folder_palette: FOLDER_PALETTE.iter().map(|c| (*c).to_owned()).collect(),
            top_visited_limit: DEFAULT_TOP_VISITED_LIMIT,
            host_filters: HostFilterConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for values the store cannot use.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// as [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), undo_limit = config.undo_limit, "loaded store config");
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.undo_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "undo_limit",
                reason: "must be at least 1".into(),
            });
        }
        if self.default_folder_color.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "default_folder_color",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Pick a colour from the palette at random.
    ///
    /// Falls back to the default folder colour when the palette is empty.
    pub fn random_folder_color(&self) -> String {
        random_folder_color(&self.folder_palette)
            .unwrap_or(self.default_folder_color.as_str())
            .to_owned()
    }
}

/// Pick a colour from `palette` at random, or `None` if it is empty.
pub fn random_folder_color(palette: &[String]) -> Option<&str> {
    palette
        .choose(&mut rand::thread_rng())
        .map(String::as_str)
}
