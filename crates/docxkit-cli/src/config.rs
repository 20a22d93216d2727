//! Configuration Settings
//!
//! Optional `docxkit.toml` with defaults for the command-line front end.
//!
//! ```toml
//! [output]
//! dir = "build"
//!
//! [image]
//! width_emu = 914400
//! height_emu = 914400
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "docxkit.toml";

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Output settings for newly created documents
    pub output: OutputSettings,
    /// Image insertion defaults
    pub image: ImageSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from an explicit file, or `docxkit.toml` if present
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }
}

/// Where new documents go
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    /// Default output directory
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

/// Image size used when none is given on the command line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageSettings {
    pub width_emu: i64,
    pub height_emu: i64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            width_emu: docxkit_ooxml::image::EMU_PER_INCH,
            height_emu: docxkit_ooxml::image::EMU_PER_INCH,
        }
    }
}
