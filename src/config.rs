//! Configuration file support
//!
//! Loads settings from ~/.convo-edit.toml (or %USERPROFILE%\.convo-edit.toml
//! on Windows). A missing file means the built-in defaults.
//!
//! Example:
//! ```text
//! live_tokenizer = "default"   # "*" counts every tokenizer on each edit
//!
//! [[highlights]]
//! pattern = '\*(.+?)\*'
//! color = "red"
//! bold = true
//!
//! [tokenizers]
//! default = ["builtin:whitespace"]
//! llama = ["/models/llama/tokenizer.json", "builtin:chars"]
//!
//! [view]
//! font_size = 16
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EditorError, Result};

/// Name of the tokenizer used for live per-segment counts
pub const DEFAULT_LIVE_TOKENIZER: &str = "default";

/// `live_tokenizer` value selecting every registered tokenizer
pub const ALL_TOKENIZERS: &str = "*";

/// One `{pattern, color}` highlight entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightConfig {
    pub pattern: String,
    pub color: String,
    #[serde(default)]
    pub bold: bool,
}

impl HighlightConfig {
    pub fn new(pattern: &str, color: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            color: color.to_string(),
            bold: false,
        }
    }
}

/// Presentation settings consumed by front ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Text font size in points
    pub font_size: u16,
    /// Text area background color name
    pub background: String,
    /// Height in rows of the primary segment's text area
    pub main_height: u16,
    /// Height in rows of every other segment's text area
    pub others_height: u16,
    /// Width in columns of all text areas
    pub width: u16,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            font_size: 16,
            background: "grey".to_string(),
            main_height: 8,
            others_height: 4,
            width: 150,
        }
    }
}

impl ViewSettings {
    pub fn increase_font_size(&mut self) {
        self.font_size = self.font_size.saturating_add(1);
    }

    /// Shrink the font, never below 1
    pub fn decrease_font_size(&mut self) {
        if self.font_size > 1 {
            self.font_size -= 1;
        }
    }
}

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tokenizer counted on every edit; `"*"` counts all of them
    pub live_tokenizer: String,
    /// Highlight rules in application order
    pub highlights: Vec<HighlightConfig>,
    /// Tokenizer name -> backend identifiers, tried in order
    pub tokenizers: BTreeMap<String, Vec<String>>,
    pub view: ViewSettings,
}

impl Default for Config {
    fn default() -> Self {
        let mut tokenizers = BTreeMap::new();
        tokenizers.insert(
            DEFAULT_LIVE_TOKENIZER.to_string(),
            vec!["builtin:whitespace".to_string()],
        );

        Self {
            live_tokenizer: DEFAULT_LIVE_TOKENIZER.to_string(),
            highlights: vec![
                HighlightConfig::new(r"\*(.+?)\*", "red"),
                HighlightConfig::new(r"\bSicarius\b", "green"),
            ],
            tokenizers,
            view: ViewSettings::default(),
        }
    }
}

impl Config {
    /// The single live tokenizer name, or `None` when every tokenizer is live
    pub fn live_tokenizer_name(&self) -> Option<&str> {
        match self.live_tokenizer.trim() {
            ALL_TOKENIZERS => None,
            name => Some(name),
        }
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".convo-edit.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".convo-edit.toml"))
        }
    }

    /// Load configuration from the default location, or the defaults
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_or_default(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load configuration from `path`, falling back to defaults if absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using built-in defaults");
            return Ok(Config::default());
        }
        Self::load_from(path)
    }

    /// Load configuration from an existing file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::parse(&contents)?;
        info!(
            path = %path.display(),
            highlights = config.highlights.len(),
            tokenizers = config.tokenizers.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| EditorError::Config(e.to_string()))
    }

    /// Serialize to TOML text
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EditorError::Config(e.to_string()))
    }

    /// Save current configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
