use std::{path::PathBuf, time::Duration};

use crate::{
    error::{GeneratorError, Result},
    models::{GenerationOptions, ImageQuality, ImageSize, ImageStyle},
};

pub const DEFAULT_ENDPOINT: &str = "https://api.x.ai/v1/images/generations";
pub const DEFAULT_MODEL: &str = "grok-2-vision-1212";
pub const DEFAULT_DOWNLOAD_FOLDER: &str = "grok_images";
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub download_folder: PathBuf,
    pub endpoint: String,
    pub model: String,
    pub default_size: ImageSize,
    pub default_quality: ImageQuality,
    pub default_style: ImageStyle,
    /// Pause after every attempt, successful or not.
    pub delay: Duration,
}

impl GeneratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        GeneratorConfig {
            api_key: api_key.into(),
            download_folder: PathBuf::from(DEFAULT_DOWNLOAD_FOLDER),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            default_size: ImageSize::default(),
            default_quality: ImageQuality::default(),
            default_style: ImageStyle::default(),
            delay: DEFAULT_DELAY,
        }
    }

    pub fn with_download_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.download_folder = folder.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_default_size(mut self, size: ImageSize) -> Self {
        self.default_size = size;
        self
    }

    pub fn with_default_quality(mut self, quality: ImageQuality) -> Self {
        self.default_quality = quality;
        self
    }

    pub fn with_default_style(mut self, style: ImageStyle) -> Self {
        self.default_style = style;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(GeneratorError::Config("API key is required".into()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(GeneratorError::Config("Endpoint URL is required".into()));
        }
        Ok(())
    }

    /// Fills the unset fields of `options` with this config's defaults.
    pub fn resolve(&self, options: &GenerationOptions) -> (ImageSize, ImageQuality, ImageStyle) {
        (
            options.size.unwrap_or(self.default_size),
            options.quality.unwrap_or(self.default_quality),
            options.style.unwrap_or(self.default_style),
        )
    }
}
