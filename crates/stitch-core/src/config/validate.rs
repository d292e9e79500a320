//! Configuration validation with range checks.

use std::path::{Component, Path};

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.max_height == 0 {
            return Err(ConfigError::ValidationError(
                "render.max_height must be > 0".into(),
            ));
        }
        if self.render.crop_size == 0 {
            return Err(ConfigError::ValidationError(
                "render.crop_size must be > 0".into(),
            ));
        }
        if self.font.small_size <= 0.0 || self.font.medium_size <= 0.0 {
            return Err(ConfigError::ValidationError(
                "font.small_size and font.medium_size must be > 0".into(),
            ));
        }
        if self.output.quality == 0 || self.output.quality > 100 {
            return Err(ConfigError::ValidationError(
                "output.quality must be between 1 and 100".into(),
            ));
        }
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        let mut components = Path::new(&self.output.dir_name).components();
        let single_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_name {
            return Err(ConfigError::ValidationError(
                "output.dir_name must be a single directory name".into(),
            ));
        }
        Ok(())
    }
}
