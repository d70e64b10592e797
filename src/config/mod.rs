// Configuration management for bangstats
// Handles loading/saving settings, with sensible defaults when config is missing

use crate::history::LoadMode;
use crate::stats::DEFAULT_TOP_N;
use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history_files: Vec<PathBuf>,
    pub loader: LoaderConfig,
    pub report: ReportConfig,
    pub artists: ArtistImages,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub strict: bool, // abort on the first bad record instead of skipping it
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_n: usize,
    pub top_tracks: usize,
    pub zero_fill_months: bool,
    pub export_path: Option<PathBuf>,
}

/// Artist name -> picture to show next to them in the ranking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistImages {
    pub images: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_files: vec![PathBuf::from("StreamingHistory0.json")],
            loader: LoaderConfig::default(),
            report: ReportConfig::default(),
            artists: ArtistImages::default(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            top_tracks: DEFAULT_TOP_N,
            zero_fill_months: false,
            export_path: None,
        }
    }
}

impl LoaderConfig {
    pub fn mode(&self) -> LoadMode {
        if self.strict {
            LoadMode::Strict
        } else {
            LoadMode::Lenient
        }
    }
}

impl ArtistImages {
    pub fn image_for(&self, artist_name: &str) -> Option<&str> {
        self.images.get(artist_name).map(String::as_str)
    }
}

impl Config {
    /// Load from the default location, writing defaults there on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading config from {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("bangstats");

        Ok(config_dir.join("config.toml"))
    }
}
