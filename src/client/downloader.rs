use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use reqwest::Client;

use crate::error::{GeneratorError, Result};

/// Characters of the prompt considered when naming the file.
pub const PROMPT_NAME_CHARS: usize = 50;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Reduces a prompt to a filename fragment made of alphanumerics, `-` and `_`.
pub fn sanitize_prompt(prompt: &str) -> String {
    prompt
        .chars()
        .take(PROMPT_NAME_CHARS)
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}

pub fn image_filename(prompt: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_{}.png",
        timestamp.format(TIMESTAMP_FORMAT),
        sanitize_prompt(prompt)
    )
}

// Same prompt within the same second would otherwise overwrite the earlier file.
fn available_path(folder: &Path, filename: &str) -> PathBuf {
    let candidate = folder.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let stem = filename.strip_suffix(".png").unwrap_or(filename);
    (2..)
        .map(|n| folder.join(format!("{stem}_{n}.png")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[derive(Clone)]
pub struct Downloader {
    client: Client,
    folder: PathBuf,
}

impl Downloader {
    pub fn new(client: Client, folder: impl Into<PathBuf>) -> Self {
        Self {
            client,
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Fetches `url` and stores the body under a name derived from `prompt`.
    pub async fn download(&self, url: &str, prompt: &str) -> Result<PathBuf> {
        let filename = image_filename(prompt, Local::now().naive_local());
        let path = available_path(&self.folder, &filename);

        log::info!("⬇️  Downloading image...");
        log::debug!("Image URL: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::HttpStatus { status, body });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| GeneratorError::Filesystem {
                path: path.clone(),
                source,
            })?;

        log::info!("✓ Image saved: {}", path.display());
        Ok(path)
    }
}
