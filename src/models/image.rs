use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{GeneratorError, Result};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ImageSize {
    #[strum(serialize = "256x256")]
    #[serde(rename = "256x256")]
    Square256,
    #[strum(serialize = "512x512")]
    #[serde(rename = "512x512")]
    Square512,
    #[default]
    #[strum(serialize = "1024x1024")]
    #[serde(rename = "1024x1024")]
    Square1024,
    #[strum(serialize = "1792x1024")]
    #[serde(rename = "1792x1024")]
    Landscape1792,
    #[strum(serialize = "1024x1792")]
    #[serde(rename = "1024x1792")]
    Portrait1792,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    #[default]
    Natural,
    Vivid,
}

/// Per-request overrides. Unset fields fall back to the configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    pub size: Option<ImageSize>,
    pub quality: Option<ImageQuality>,
    pub style: Option<ImageStyle>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_quality(mut self, quality: ImageQuality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_style(mut self, style: ImageStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// Body of the generation POST.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u8,
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub style: ImageStyle,
}

impl GenerationRequest {
    pub fn new(
        prompt: impl Into<String>,
        model: impl Into<String>,
        size: ImageSize,
        quality: ImageQuality,
        style: ImageStyle,
    ) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(GeneratorError::EmptyPrompt);
        }

        Ok(Self {
            model: model.into(),
            prompt,
            n: 1,
            size,
            quality,
            style,
        })
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneratedImage {
    pub url: String,
}

// Servers send `"data": null` as well as leaving the key out.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<GeneratedImage>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<GeneratedImage>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct GenerationResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<GeneratedImage>,
}

impl GenerationResponse {
    pub fn first_url(&self) -> Option<&str> {
        self.data.first().map(|image| image.url.as_str())
    }
}
