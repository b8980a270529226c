use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::data::record_compare::SortKey;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Entries shown per page
    pub page_size: usize,

    /// Show the absolute entry number in the first column
    pub show_row_numbers: bool,

    /// Body text is cut to this many characters in the table (0 = no limit)
    pub body_preview_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Include deleted entries unless told otherwise
    pub show_deleted: bool,

    pub sort_key: SortKey,

    /// false = newest / highest first
    pub ascending: bool,

    /// Memoized filter+sort results per session (0 disables)
    pub cache_capacity: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            show_row_numbers: true,
            body_preview_chars: 80,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            show_deleted: true,
            sort_key: SortKey::Timestamp,
            ascending: false,
            cache_capacity: 32,
        }
    }
}

impl Config {
    /// Load config from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::get_config_path()?)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("entry-archive").join("config.toml"))
    }

    /// Write the commented template to `path`, creating parent directories
    pub fn write_default_with_comments<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, Self::create_default_with_comments())
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Entry Archive Configuration File
# Location: ~/.config/entry-archive/config.toml (Linux)
#           ~/Library/Application Support/entry-archive/config.toml (macOS)
#           %APPDATA%\entry-archive\config.toml (Windows)

[display]
# Entries shown per page
page_size = 10

# Show the entry number in the first column
show_row_numbers = true

# Cut entry bodies to this many characters in the table (0 = no limit)
body_preview_chars = 80

[behavior]
# Include deleted entries in results
show_deleted = true

# Default sort column: "timestamp", "score" or "title"
sort_key = "timestamp"

# false shows newest (or highest) first
ascending = false

# Number of filter+sort results kept in memory (0 disables)
cache_capacity = 32
"#
        .to_string()
    }
}
