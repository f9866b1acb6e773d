//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the moon-config.toml file.
//! It covers render defaults, the observer location used for astronomy queries, and
//! where base textures live.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::lunar::Location;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "moon-config.toml";

/// Application configuration loaded from moon-config.toml
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Image output defaults
    #[serde(default)]
    pub render: RenderConfig,
    /// Observer position for moonrise/moonset and the current phase
    #[serde(default)]
    pub location: Location,
    /// Base texture assets
    #[serde(default)]
    pub textures: TextureConfig,
}

/// Render defaults
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width and height in pixels
    pub size: u32,
    /// Brightness of the unlit side, 0.0 (black) to 1.0 (untouched)
    pub shadow: f64,
    /// Icon color for the lit part, `#rrggbb` or `#rrggbbaa`
    pub light_color: String,
    /// Icon color for the unlit part
    pub shadow_color: String,
    /// Outline the icon instead of filling it
    pub stroke: bool,
}

/// Texture asset configuration
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TextureConfig {
    /// Directory holding `moon-<size>.png` files; generated textures when unset
    pub directory: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            size: 256,
            shadow: 0.1,
            light_color: "#ffffff".to_string(),
            shadow_color: "#202020".to_string(),
            stroke: false,
        }
    }
}

impl RenderConfig {
    /// Lit icon color, white if the configured value does not parse
    pub fn light(&self) -> Rgba<u8> {
        parse_color(&self.light_color).unwrap_or(Rgba([0xff, 0xff, 0xff, 0xff]))
    }

    /// Unlit icon color, near-black if the configured value does not parse
    pub fn shadow(&self) -> Rgba<u8> {
        parse_color(&self.shadow_color).unwrap_or(Rgba([0x20, 0x20, 0x20, 0xff]))
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`.
pub fn parse_color(text: &str) -> Option<Rgba<u8>> {
    let hex = text.trim().strip_prefix('#')?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xff };
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

impl Config {
    /// Load configuration from moon-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!("loaded configuration from {}", path.as_ref().display());
                    config
                }
                Err(e) => {
                    log::warn!("invalid config file format: {}", e);
                    log::warn!("using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
