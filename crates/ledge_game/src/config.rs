use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use ledge_platform::window::PlatformConfig;

use crate::session::SessionConfig;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/game.json";
const SUPPORTED_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub version: String,
    pub window: WindowConfig,
    /// Text level to load instead of the built-in one.
    pub level_path: Option<PathBuf>,
    /// Sprite manifest; without one the game draws flat-colour placeholders.
    pub sprites_path: Option<PathBuf>,
    /// Refuse levels with grammar diagnostics instead of recovering.
    pub strict_level_grammar: bool,
    pub session: SessionConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION.to_string(),
            window: WindowConfig::default(),
            level_path: None,
            sprites_path: None,
            strict_level_grammar: true,
            session: SessionConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let platform = PlatformConfig::default();
        Self {
            title: platform.title,
            width: platform.width,
            height: platform.height,
        }
    }
}

impl WindowConfig {
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Load the game config. A missing file is not an error: every field has a default.
pub fn load_config_from_path(config_path: &Path) -> Result<GameConfig, String> {
    if !config_path.exists() {
        log::info!(
            "No config at {}, using defaults",
            config_path.display()
        );
        return Ok(GameConfig::default());
    }
    let raw = fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read config file {}: {e}", config_path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", config_path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.version != SUPPORTED_VERSION {
        return Err(format!(
            "Config validation failed: unsupported version '{}'",
            config.version
        ));
    }
    if config.window.width == 0 || config.window.height == 0 {
        return Err("Config validation failed: window size must be > 0".to_string());
    }
    config.session.validate()
}
