//! Configuration management for Stitch.
//!
//! Configuration is loaded from `config.toml` in the platform config directory
//! with sensible defaults. All config structs implement `Default` with the
//! values the montage layout was designed around.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Stitch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layout and annotation settings
    pub render: RenderConfig,

    /// Font settings
    pub font: FontConfig,

    /// Processing settings
    pub processing: ProcessingConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.stitch.stitch/config.toml
    /// - Linux: ~/.config/stitch/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\stitch\config\config.toml
    ///
    /// Falls back to ~/.stitch/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "stitch", "stitch")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".stitch").join("config.toml")
            })
    }

    /// Get the resolved font file path (with ~ expansion).
    pub fn font_path(&self) -> PathBuf {
        let path_str = self.font.path.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Number of worker slots to run composite jobs on.
    ///
    /// `parallel_workers = 0` means one slot per available execution unit.
    pub fn worker_count(&self) -> usize {
        match self.processing.parallel_workers {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.mode, RenderMode::Scale);
        assert_eq!(config.render.max_height, 1080);
        assert_eq!(config.render.crop_size, 800);
        assert_eq!(config.render.divider_width, 3);
        assert_eq!(config.render.font_color, [0, 255, 0]);
        assert_eq!(config.output.dir_name, "Results");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[render]"));
        assert!(toml.contains("[processing]"));
        assert!(toml.contains("mode = \"scale\""));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [render]
            mode = "crop"
            crop_size = 512
            shuffle = true
            "#,
        )
        .unwrap();
        assert_eq!(config.render.mode, RenderMode::Crop);
        assert_eq!(config.render.crop_size, 512);
        assert_eq!(config.render.max_height, 1080);
        assert!(config.render.shuffle);
        assert_eq!(config.processing.supported_formats.len(), 4);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[render]\nmax_height = 600\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.render.max_height, 600);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[render]\nmax_height = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("max_height"));
    }

    #[test]
    fn test_worker_count_auto() {
        let mut config = Config::default();
        config.processing.parallel_workers = 0;
        assert!(config.worker_count() >= 1);

        config.processing.parallel_workers = 3;
        assert_eq!(config.worker_count(), 3);
    }

    #[test]
    fn test_font_path_expands_tilde() {
        let mut config = Config::default();
        config.font.path = PathBuf::from("/fonts/test.ttf");
        assert_eq!(config.font_path(), PathBuf::from("/fonts/test.ttf"));

        config.font.path = PathBuf::from("~/fonts/test.ttf");
        assert!(!config.font_path().to_string_lossy().starts_with('~'));
    }
}
