pub mod downloader;
pub mod image_client;

use std::path::PathBuf;

use crate::{
    config::GeneratorConfig,
    error::{GeneratorError, Result},
    logger,
    models::{GenerationOptions, GenerationRequest, GenerationResponse},
};
use reqwest::Client;
use uuid::Uuid;

pub use downloader::Downloader;
pub use image_client::ImageClient;

fn report(context: &str, error: &GeneratorError) {
    log::error!("❌ {}: {}", context, error);
    if let Some(body) = error.response_body() {
        log::error!("Response: {}", body);
    }
}

/// Ties the API client and the downloader to one download folder.
///
/// The `Option`-returning methods are the failure boundary: every error is
/// logged there and turned into `None`. The `try_` variants keep the typed
/// error for callers that want it.
#[derive(Clone)]
pub struct ImageGenerator {
    config: GeneratorConfig,
    image_client: ImageClient,
    downloader: Downloader,
}

impl ImageGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;

        std::fs::create_dir_all(&config.download_folder).map_err(|source| {
            GeneratorError::Filesystem {
                path: config.download_folder.clone(),
                source,
            }
        })?;
        log::info!(
            "✓ Download folder created/verified: {}",
            config.download_folder.display()
        );

        let client = Client::new();

        Ok(Self {
            image_client: ImageClient::new(client.clone(), &config.endpoint, &config.api_key),
            downloader: Downloader::new(client, &config.download_folder),
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    pub async fn try_generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse> {
        let (size, quality, style) = self.config.resolve(options);
        let request = GenerationRequest::new(prompt, &self.config.model, size, quality, style)?;

        log::info!("🎨 Generating image with prompt: '{}'", prompt);
        let _timer = logger::timer("image generation");
        self.image_client.generate(&request).await
    }

    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Option<GenerationResponse> {
        self.try_generate(prompt, options)
            .await
            .map_err(|e| report("Error generating image", &e))
            .ok()
    }

    pub async fn try_download(&self, url: &str, prompt: &str) -> Result<PathBuf> {
        let _timer = logger::timer("image download");
        self.downloader.download(url, prompt).await
    }

    pub async fn download(&self, url: &str, prompt: &str) -> Option<PathBuf> {
        self.try_download(url, prompt)
            .await
            .map_err(|e| report("Error downloading image", &e))
            .ok()
    }

    pub async fn try_generate_and_download(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<PathBuf> {
        let response = self.try_generate(prompt, options).await?;
        let url = response.first_url().ok_or(GeneratorError::NoImageUrl)?;
        self.try_download(url, prompt).await
    }

    /// Generates one image and saves it. Returns the saved path, or `None`
    /// once the failure has been reported.
    pub async fn generate_and_download(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Option<PathBuf> {
        let attempt = Uuid::new_v4();
        log::debug!("Starting attempt {}", attempt);

        let response = self.generate(prompt, options).await?;
        let path = match response.first_url() {
            Some(url) => self.download(url, prompt).await,
            None => {
                log::error!("❌ {}", GeneratorError::NoImageUrl);
                None
            }
        };

        log::debug!(
            "Attempt {} {}",
            attempt,
            if path.is_some() { "succeeded" } else { "failed" }
        );
        path
    }
}
