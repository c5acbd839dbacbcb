//! Configuration file support for tiergraph
//!
//! Every key is optional; anything left out falls back to the built-in
//! defaults, and CLI flags override both.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # .tiergraph.toml
//!
//! [input]
//! file = "Employee_cleaned.csv"
//! source_field = "PaymentTier"
//! destination_field = "ExperienceInCurrentDomain"
//!
//! [server]
//! port = 5000
//!
//! [chart]
//! image = "tier_experience_chart.png"
//! html = "tier_experience_report.html"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::chart::DEFAULT_IMAGE_FILE;
use crate::dataset::{
    DEFAULT_DESTINATION_FIELD, DEFAULT_INPUT_FILE, DEFAULT_SOURCE_FIELD, FieldPair,
};
use crate::export::ExportPaths;
use crate::report::DEFAULT_HTML_FILE;

/// Default port for the web surface
pub const DEFAULT_PORT: u16 = 5000;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Input section
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// CSV file to read
    #[serde(default = "default_input_file")]
    pub file: PathBuf,

    /// Column holding the pay tier
    #[serde(default = "default_source_field")]
    pub source_field: String,

    /// Column holding the years of experience
    #[serde(default = "default_destination_field")]
    pub destination_field: String,
}

fn default_input_file() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_FILE)
}

fn default_source_field() -> String {
    DEFAULT_SOURCE_FIELD.to_string()
}

fn default_destination_field() -> String {
    DEFAULT_DESTINATION_FIELD.to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file: default_input_file(),
            source_field: default_source_field(),
            destination_field: default_destination_field(),
        }
    }
}

impl InputConfig {
    pub fn fields(&self) -> FieldPair {
        FieldPair::new(&self.source_field, &self.destination_field)
    }
}

/// Web server section
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Chart export section
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_image")]
    pub image: PathBuf,

    #[serde(default = "default_html")]
    pub html: PathBuf,
}

fn default_image() -> PathBuf {
    PathBuf::from(DEFAULT_IMAGE_FILE)
}

fn default_html() -> PathBuf {
    PathBuf::from(DEFAULT_HTML_FILE)
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            html: default_html(),
        }
    }
}

impl ChartConfig {
    pub fn export_paths(&self) -> ExportPaths {
        ExportPaths {
            image: self.image.clone(),
            html: self.html.clone(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TierGraphConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub chart: ChartConfig,
}

/// Load configuration from an explicit file
pub fn load_config_file(path: &Path) -> Result<TierGraphConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: TierGraphConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration starting from `start_path`
///
/// Searches for `.tiergraph.toml` in the given directory and parent directories.
pub fn load_config(start_path: &Path) -> Result<TierGraphConfig, ConfigError> {
    match find_config_file(start_path) {
        Some(path) => load_config_file(&path),
        None => Ok(TierGraphConfig::default()),
    }
}

/// Find the config file by searching up the directory tree
pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let config_names = [".tiergraph.toml", "tiergraph.toml"];

    let mut current = if start_path.is_file() {
        start_path.parent()?.to_path_buf()
    } else {
        start_path.to_path_buf()
    };

    loop {
        for name in &config_names {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // Move to parent directory
        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            break;
        }
    }

    None
}
