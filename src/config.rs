use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    pub shader_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "trigon".to_string(),
            width: 1200,
            height: 800,
            vsync: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.2, 0.3, 0.3, 1.0],
            shader_path: PathBuf::from("assets/shaders/basic.shader"),
        }
    }
}

impl AppConfig {
    /// Reads the config file at `path`, writing a default one first if none
    /// exists.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = AppConfig::default();
            let contents = toml::to_string_pretty(&config)?;
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write default config to {}", path.display()))?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.window.height, 800);
        assert!(config.window.vsync);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str("[window]\ntitle = \"demo\"\n").unwrap();
        assert_eq!(config.window.title, "demo");
        assert_eq!(config.window.width, 1200);
        assert_eq!(
            config.render.shader_path,
            PathBuf::from("assets/shaders/basic.shader")
        );
    }

    #[test]
    fn test_default_file_round_trips() {
        let contents = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&contents).unwrap();
        assert_eq!(parsed.window.title, AppConfig::default().window.title);
        assert_eq!(parsed.render.clear_color, [0.2, 0.3, 0.3, 1.0]);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let created = AppConfig::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.window.width, 1200);

        let reloaded = AppConfig::load_or_create(&path).unwrap();
        assert_eq!(reloaded.window.title, created.window.title);
    }
}
